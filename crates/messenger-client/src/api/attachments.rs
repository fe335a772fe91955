//! Attachments and PDF export API.
//!
//! Downloads are two-step: a metadata GET returns a short-lived signed link
//! (and a cookie via a `302`), then the link is fetched with the cookie into
//! a fresh temporary directory.

use std::path::PathBuf;

use serde::Deserialize;

use crate::client::{ApiResponse, MessengerClient};
use crate::error::Result;
use crate::query::{encode_segment, format_timestamp, to_query_string};
use crate::types::{AttachmentRef, PdfRequest, SignedUrl};

/// Mime type requested for chat exports.
const PDF_MIME: &str = "application/pdf";

#[derive(Debug, Deserialize)]
struct LinkBody {
    link: String,
}

fn signed_url(response: ApiResponse) -> Result<SignedUrl> {
    let cookie = response.cookie.clone();
    let LinkBody { link } = response.json()?;
    Ok(SignedUrl { link, cookie })
}

/// Attachments API client.
pub struct AttachmentsApi {
    client: MessengerClient,
}

impl AttachmentsApi {
    pub(crate) fn new(client: MessengerClient) -> Self {
        Self { client }
    }

    /// Get a signed download link for an attachment.
    pub async fn attachment_url(&self, attachment: &AttachmentRef) -> Result<SignedUrl> {
        let path = format!(
            "{}/attachments/{}{}",
            attachment.chat.path(),
            encode_segment(&attachment.id),
            to_query_string(&[("headers", "false")])
        );
        signed_url(self.client.get(&path).await?)
    }

    /// Download an attachment, returning the local file path.
    pub async fn download_attachment(&self, attachment: &AttachmentRef) -> Result<PathBuf> {
        tracing::debug!(id = %attachment.id, chat = %attachment.chat.id, "Downloading attachment");
        let url = self.attachment_url(attachment).await.inspect_err(|e| {
            tracing::error!(id = %attachment.id, error = %e, "Unable to retrieve download url");
        })?;
        self.client
            .download(
                &url.link,
                &attachment.name,
                &attachment.mime_type,
                url.cookie.as_deref(),
            )
            .await
    }

    /// Get a signed download link for a PDF export of a chat.
    pub async fn pdf_url(&self, pdf: &PdfRequest) -> Result<SignedUrl> {
        let mut params = Vec::with_capacity(3);
        if let Some(start) = &pdf.start_date {
            params.push(("start_date", format_timestamp(start)));
        }
        if let Some(end) = &pdf.end_date {
            params.push(("end_date", format_timestamp(end)));
        }
        params.push(("headers", "false".to_string()));

        let path = format!("{}/pdf{}", pdf.chat.path(), to_query_string(&params));
        signed_url(self.client.get(&path).await?)
    }

    /// Download a PDF export of a chat, returning the local file path.
    pub async fn download_pdf(&self, pdf: &PdfRequest) -> Result<PathBuf> {
        tracing::debug!(chat = %pdf.chat.id, "Downloading chat pdf");
        let url = self.pdf_url(pdf).await.inspect_err(|e| {
            tracing::error!(chat = %pdf.chat.id, error = %e, "Unable to retrieve pdf url");
        })?;
        self.client
            .download(&url.link, &pdf.filename, PDF_MIME, url.cookie.as_deref())
            .await
    }
}
