use crate::error::google::GoogleError;
use crate::model::document::Document;
use crate::service::google::{api_url, GoogleClient};

const DOCS_API: &str = "https://docs.googleapis.com/v1/documents/";

impl GoogleClient {
    /// Fetches a document with its full structural content.
    pub async fn doc_read(&self, document_id: &str) -> Result<Document, GoogleError> {
        let url = api_url(DOCS_API, &[document_id])?;
        self.get_json(url).await
    }
}
