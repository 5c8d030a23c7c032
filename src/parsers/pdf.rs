use crate::error::PdfError;
use crate::parsers::text::normalize_document_text;
use lopdf::Document;

/// Extracts the text of an in-memory PDF, page by page.
///
/// Page texts are concatenated in page order and non-breaking spaces are
/// replaced with regular spaces. A document without a text layer yields an
/// empty string.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let doc = Document::load_mem(bytes)?;
    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        let page_text = doc.extract_text(&[*page_number])?;
        text.push_str(&page_text);
    }

    ::log::trace!(
        "Extracted {} characters from {} pages",
        text.len(),
        doc.get_pages().len()
    );

    Ok(normalize_document_text(&text))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};

    /// Builds a PDF with one page per entry of `pages`, each showing its text
    pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![100.into(), 600.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;

    #[test]
    fn test_extracts_pages_in_order() {
        let bytes = pdf_with_pages(&["Payments outlook", "Second page"]);
        let text = extract_text(&bytes).unwrap();

        let first = text.find("Payments outlook").expect("first page text");
        let second = text.find("Second page").expect("second page text");
        assert!(first < second);
    }

    #[test]
    fn test_rejects_non_pdf_bytes() {
        let err = extract_text(b"<html>not a pdf</html>").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }
}
