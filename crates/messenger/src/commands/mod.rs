//! CLI command handlers.

pub mod chat;
pub mod download;
pub mod group;
pub mod user;

use anyhow::Result;
use clap::Args;
use console::Style;
use messenger_client::{ChatRef, MessengerClient, Payload};

/// Shared context for all commands.
#[derive(Clone)]
pub struct Context {
    /// Configured API client.
    pub client: MessengerClient,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// Chat selection shared by chat-scoped commands.
#[derive(Args, Debug, Clone)]
pub struct ChatTarget {
    /// Chat ID
    pub chat_id: String,

    /// The chat is a group chat (default: conversation)
    #[arg(short, long)]
    pub group: bool,

    /// The ID is in the auxiliary (external) namespace
    #[arg(long)]
    pub aux: bool,
}

impl ChatTarget {
    pub fn chat_ref(&self) -> ChatRef {
        ChatRef::new(self.chat_id.clone(), self.group, self.aux)
    }
}

/// Print an API payload: pretty JSON, or a one-line confirmation.
pub fn print_payload(ctx: &Context, what: &str, payload: &Payload) -> Result<()> {
    match payload {
        Some(body) if ctx.json_output || ctx.verbose => {
            println!("{}", serde_json::to_string_pretty(body)?);
        }
        _ => {
            let green = Style::new().green();
            println!("{} {}", green.apply_to("✓"), what);
        }
    }
    Ok(())
}
