/// Non-breaking space as produced by PDF text layers (U+00A0)
pub const NBSP: char = '\u{a0}';

/// Removes the abstract line from the heading text it is rendered inside of.
///
/// The heading of a publication entry contains its abstract as a nested
/// element, so the rendered heading text is `"<title> <abstract>"`. Every
/// occurrence is removed, including ones formed by joining the text around
/// a removed one, and the remainder trimmed.
pub fn strip_abstract(heading: &str, abstract_text: &str) -> String {
    if abstract_text.is_empty() {
        return heading.trim().to_string();
    }
    let mut title = heading.to_string();
    while title.contains(abstract_text) {
        title = title.replace(abstract_text, "");
    }
    title.trim().to_string()
}

/// Replaces non-breaking spaces in extracted document text with regular spaces
pub fn normalize_document_text(text: &str) -> String {
    text.replace(NBSP, " ")
}

/// Collapses runs of whitespace into single spaces, as a browser renders element text
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Treats an empty string as absent
pub fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
