use crate::error::PdfError;
use crate::parsers::pdf;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::USER_AGENT;

/// Turns the document behind a URL into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, url: &str) -> Result<String, PdfError>;
}

/// Downloads PDFs over HTTP and extracts their text layer
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    client: Client,
    user_agent: String,
}

impl PdfTextExtractor {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
        }
    }

    /// Downloads the raw document bytes
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, PdfError> {
        ::log::debug!("Downloading document: {}", url);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PdfError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        ::log::debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract_text(&self, url: &str) -> Result<String, PdfError> {
        let bytes = self.fetch(url).await?;
        pdf::extract_text(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::pdf::fixtures::pdf_with_pages;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0";

    #[tokio::test]
    async fn test_downloads_with_browser_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/report.pdf"))
            .and(header("User-Agent", UA))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(pdf_with_pages(&["Annual report"]))
                    .insert_header("Content-Type", "application/pdf"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let extractor = PdfTextExtractor::new(UA);
        let url = format!("{}/media/report.pdf", mock_server.uri());
        let text = extractor.extract_text(&url).await.unwrap();

        assert!(text.contains("Annual report"), "got {:?}", text);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let extractor = PdfTextExtractor::new(UA);
        let url = format!("{}/missing.pdf", mock_server.uri());
        let err = extractor.extract_text(&url).await.unwrap_err();

        assert!(matches!(err, PdfError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_html_body_is_not_a_pdf() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page.pdf"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let extractor = PdfTextExtractor::new(UA);
        let url = format!("{}/page.pdf", mock_server.uri());
        let err = extractor.extract_text(&url).await.unwrap_err();

        assert!(matches!(err, PdfError::Parse(_)));
    }
}
