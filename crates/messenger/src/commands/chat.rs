//! Chat command - read chats and send messages.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use super::{ChatTarget, Context, print_payload};
use messenger_client::SendMessage;

/// Arguments for the chat command.
#[derive(Args, Debug)]
pub struct ChatArgs {
    #[command(subcommand)]
    pub command: ChatCommand,
}

#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// Show a conversation or group chat
    Get {
        #[command(flatten)]
        target: ChatTarget,
    },

    /// Show a single message
    Message {
        #[command(flatten)]
        target: ChatTarget,

        /// Message ID
        message_id: String,
    },

    /// Send a message, optionally with attachments
    Send {
        #[command(flatten)]
        target: ChatTarget,

        /// Message text
        body: String,

        /// File to attach (repeatable)
        #[arg(short, long = "attach")]
        attachments: Vec<PathBuf>,
    },
}

/// Run the chat command.
pub async fn run(args: ChatArgs, ctx: &Context) -> Result<()> {
    let chats = ctx.client.chats();

    match args.command {
        ChatCommand::Get { target } => {
            let payload = chats.get(&target.chat_ref()).await?;
            print_payload(ctx, "Chat retrieved", &payload)?;
        }
        ChatCommand::Message { target, message_id } => {
            let payload = chats.message(&target.chat_ref(), &message_id).await?;
            print_payload(ctx, "Message retrieved", &payload)?;
        }
        ChatCommand::Send {
            target,
            body,
            attachments,
        } => {
            let mut message = SendMessage::new(target.chat_ref(), body);
            message.add_attachment_paths(attachments);
            let payload = chats.send_message(&message).await?;
            print_payload(ctx, "Message sent", &payload)?;
        }
    }

    Ok(())
}
