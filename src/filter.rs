use crate::error::CollectError;
use regex::Regex;
use url::Url;

/// Decides which links of a publication entry point at document files
#[derive(Debug)]
pub struct DocumentLinkFilter {
    base_url: Url,
    suffix_regexes: Vec<Regex>,
}

impl DocumentLinkFilter {
    /// Create a filter resolving links against `base_url` and accepting the given suffixes
    pub fn new(base_url: &str, suffixes: &[String]) -> Result<Self, CollectError> {
        let base_url = Url::parse(base_url).map_err(|source| CollectError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;

        // Escaped suffixes always compile
        let suffix_regexes = suffixes
            .iter()
            .filter(|suffix| !suffix.is_empty())
            .filter_map(|suffix| Regex::new(&format!("(?i){}$", regex::escape(suffix))).ok())
            .collect();

        Ok(Self {
            base_url,
            suffix_regexes,
        })
    }

    /// Resolves an href as found in the page into an absolute URL without fragment
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let mut resolved = self.base_url.join(href.trim()).ok()?;
        resolved.set_fragment(None);
        Some(resolved)
    }

    /// Whether the URL path ends with one of the document suffixes (query ignored)
    pub fn is_document(&self, url: &Url) -> bool {
        let path = url.path();
        self.suffix_regexes.iter().any(|regex| regex.is_match(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LISTING_URL;

    fn pdf_filter() -> DocumentLinkFilter {
        DocumentLinkFilter::new(LISTING_URL, &[".pdf".to_string()]).unwrap()
    }

    #[test]
    fn test_resolve_relative_links() {
        let filter = pdf_filter();

        let resolved = filter.resolve("/media/report.pdf").unwrap();
        assert_eq!(resolved.as_str(), "https://www.abe-eba.eu/media/report.pdf");

        let resolved = filter.resolve("annex.pdf#page=2").unwrap();
        assert_eq!(
            resolved.as_str(),
            "https://www.abe-eba.eu/publications/annex.pdf"
        );

        let absolute = filter.resolve("https://cdn.example.com/file.pdf").unwrap();
        assert_eq!(absolute.as_str(), "https://cdn.example.com/file.pdf");
    }

    #[test]
    fn test_document_suffix() {
        let filter = pdf_filter();

        let pdf = Url::parse("https://www.abe-eba.eu/media/report.pdf").unwrap();
        assert!(filter.is_document(&pdf));

        let upper = Url::parse("https://www.abe-eba.eu/media/REPORT.PDF").unwrap();
        assert!(filter.is_document(&upper));

        let with_query = Url::parse("https://www.abe-eba.eu/media/report.pdf?v=2").unwrap();
        assert!(filter.is_document(&with_query));

        let html = Url::parse("https://www.abe-eba.eu/publications/report.html").unwrap();
        assert!(!filter.is_document(&html));

        let lookalike = Url::parse("https://www.abe-eba.eu/pdf/").unwrap();
        assert!(!filter.is_document(&lookalike));
    }

    #[test]
    fn test_multiple_suffixes() {
        let filter = DocumentLinkFilter::new(
            LISTING_URL,
            &[".pdf".to_string(), ".docx".to_string(), String::new()],
        )
        .unwrap();

        let docx = Url::parse("https://www.abe-eba.eu/media/form.docx").unwrap();
        assert!(filter.is_document(&docx));

        // The empty suffix is ignored rather than matching everything
        let page = Url::parse("https://www.abe-eba.eu/about").unwrap();
        assert!(!filter.is_document(&page));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = DocumentLinkFilter::new("not a url", &[".pdf".to_string()]).unwrap_err();
        assert!(matches!(err, CollectError::InvalidUrl { .. }));
    }
}
