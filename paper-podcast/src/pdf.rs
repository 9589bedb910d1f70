//! PDF text extraction.

use lopdf::Document;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to load PDF: {0}")]
    Load(String),

    #[error("PDF is encrypted")]
    Encrypted,
}

/// Text pulled out of a PDF, page by page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedText {
    /// All page texts concatenated in page order
    pub text: String,
    /// Number of pages in the document
    pub page_count: usize,
    /// 1-based numbers of pages whose text could not be extracted
    pub failed_pages: Vec<u32>,
}

impl ExtractedText {
    pub fn word_count(&self) -> usize {
        crate::text::word_count(&self.text)
    }
}

/// Extract the text of every page of a PDF held in memory.
///
/// Page texts are joined with no separator. A page whose extraction fails
/// contributes an empty string and is listed in `failed_pages`; only a
/// document that cannot be opened at all is an error.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Load(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }

    let pages = doc.get_pages();
    let mut extracted = ExtractedText {
        page_count: pages.len(),
        ..ExtractedText::default()
    };

    for page_num in pages.keys().copied() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => extracted.text.push_str(&page_text),
            Err(e) => {
                log::debug!("page {} has no extractable text: {}", page_num, e);
                extracted.failed_pages.push(page_num);
            }
        }
    }

    log::info!(
        "extracted {} words from {} pages ({} failed)",
        extracted.word_count(),
        extracted.page_count,
        extracted.failed_pages.len()
    );

    Ok(extracted)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a minimal PDF with one Helvetica text line per page.
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
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

    #[test]
    fn test_extract_pages_in_order() {
        let pdf = build_pdf(&["Attention is all you need.", "Transformers scale well."]);
        let extracted = extract_text(&pdf).unwrap();

        assert_eq!(extracted.page_count, 2);
        assert!(extracted.failed_pages.is_empty());
        let first = extracted.text.find("Attention").unwrap();
        let second = extracted.text.find("Transformers").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_word_count() {
        let pdf = build_pdf(&["one two three"]);
        let extracted = extract_text(&pdf).unwrap();
        assert_eq!(extracted.word_count(), 3);
    }

    #[test]
    fn test_garbage_is_load_error() {
        let result = extract_text(b"this is not a pdf");
        assert!(matches!(result, Err(PdfError::Load(_))));
    }

    #[test]
    fn test_empty_input_is_load_error() {
        assert!(extract_text(&[]).is_err());
    }
}
