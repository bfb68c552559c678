//! Receipt upload and parsing

use reqwest::multipart::{Form, Part};
use tally_core::expense::ParsedReceipt;
use tracing::info;

use crate::client::ApiClient;
use crate::error::Result;

pub struct Documents<'a> {
    client: &'a ApiClient,
}

impl<'a> Documents<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Upload a receipt image or PDF to the OCR/AI parser
    pub async fn parse_receipt(
        &self,
        filename: impl Into<String>,
        content: Vec<u8>,
    ) -> Result<ParsedReceipt> {
        let filename = filename.into();
        info!("Uploading receipt {} ({} bytes)", filename, content.len());

        let form = Form::new().part("file", Part::bytes(content).file_name(filename));
        self.client.post_multipart("/parse/ai", form).await
    }
}
