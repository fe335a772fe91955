//! Download command - fetch attachments and chat exports.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use console::Style;
use messenger_client::{AttachmentRef, PdfRequest};

use super::{ChatTarget, Context};

/// Arguments for the download command.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(subcommand)]
    pub command: DownloadCommand,
}

#[derive(Subcommand, Debug)]
pub enum DownloadCommand {
    /// Download an attachment
    Attachment {
        #[command(flatten)]
        target: ChatTarget,

        /// Attachment ID
        attachment_id: String,

        /// File name to save as
        name: String,

        /// Mime type of the attachment
        mime: String,
    },

    /// Download a chat as PDF
    Pdf {
        #[command(flatten)]
        target: ChatTarget,

        /// File name to save as
        filename: String,

        /// Only include messages after this time (RFC 3339)
        #[arg(long)]
        start: Option<DateTime<Utc>>,

        /// Only include messages before this time (RFC 3339)
        #[arg(long)]
        end: Option<DateTime<Utc>>,
    },
}

/// Run the download command.
pub async fn run(args: DownloadArgs, ctx: &Context) -> Result<()> {
    let attachments = ctx.client.attachments();

    let path = match args.command {
        DownloadCommand::Attachment {
            target,
            attachment_id,
            name,
            mime,
        } => {
            let attachment = AttachmentRef::new(attachment_id, name, mime, target.chat_ref());
            attachments.download_attachment(&attachment).await?
        }
        DownloadCommand::Pdf {
            target,
            filename,
            start,
            end,
        } => {
            let mut pdf = PdfRequest::new(target.chat_ref(), filename);
            pdf.start_date = start;
            pdf.end_date = end;
            attachments.download_pdf(&pdf).await?
        }
    };

    if ctx.json_output {
        println!("{}", serde_json::json!({ "path": path }));
    } else {
        let green = Style::new().green();
        println!("{} Downloaded to {}", green.apply_to("✓"), path.display());
    }

    Ok(())
}
