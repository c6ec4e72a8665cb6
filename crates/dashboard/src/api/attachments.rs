//! Attachment upload.

use tracing::{info, instrument};

use super::MarketplaceApi;
use super::types::{Attachment, AttachmentsEnvelope};
use crate::error::ApiError;
use crate::http::ApiRequest;
use crate::upload::ImageUpload;

impl MarketplaceApi {
    /// Upload images (`POST /attachments`, multipart field `files`).
    ///
    /// Returns the created attachments in upload order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the backend rejects a file, or
    /// `ApiError::Unknown` if it answers with no attachments.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_attachments(&self, files: Vec<ImageUpload>) -> Result<Vec<Attachment>, ApiError> {
        let envelope: AttachmentsEnvelope = self
            .http
            .send(ApiRequest::post("attachments").multipart("files", files))
            .await?;

        if envelope.attachments.is_empty() {
            return Err(ApiError::Unknown(
                "upload succeeded but no attachment was returned".to_string(),
            ));
        }

        info!(count = envelope.attachments.len(), "Attachments uploaded");
        Ok(envelope.attachments)
    }
}
