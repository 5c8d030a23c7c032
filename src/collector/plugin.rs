use crate::document::DocumentRecord;
use async_trait::async_trait;

/// A source the platform can run to obtain new documents
#[async_trait]
pub trait SourcePlugin: Send {
    /// Short name of the source, used in logs and storage
    fn source_name(&self) -> &str;

    /// Collects documents from the source. Never fails; errors end the
    /// run early and the documents found so far are returned.
    async fn content(&mut self) -> Vec<DocumentRecord>;
}
