//! HTTP client SDK for the Messenger chat API.
//!
//! Every operation maps onto one HTTP request against
//! `{protocol}://{domain}/{version}/`, authenticated with a bearer token.
//! Calls resolve to [`Result`]: success carries the parsed JSON body (if
//! any), failures carry an [`Error`] describing whether the call was
//! rejected locally, failed in transport, or was refused by the server.
//!
//! # Example
//!
//! ```no_run
//! use messenger_client::{ChatRef, Mention, MessengerClient, Result, SendMessage};
//!
//! # async fn example() -> Result<()> {
//! // Token, domain etc. from MESSENGER_API_* variables
//! let client = MessengerClient::from_env()?;
//!
//! // Post a message to a group chat
//! let chat = ChatRef::group("5f1c...");
//! client
//!     .chats()
//!     .send_message(&SendMessage::new(chat.clone(), "Hello!"))
//!     .await?;
//!
//! // Resolve mentions from an incoming message
//! let members = client
//!     .mentions()
//!     .complete(&[Mention::id("@all")], &["bot-id".to_string()], &chat)
//!     .await;
//! println!("Mentioned {} members", members.len());
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Users**: invites, lookups, providers, verifications, company checks
//! - **Groups**: create, members, subject, settings, avatar, close
//! - **Chats**: chat and message lookups, sending messages and questions,
//!   verification requests
//! - **Attachments**: signed URLs and downloads for attachments and PDF exports
//! - **Mentions**: resolving mentions, including `@all`

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod types;

pub use api::Payload;
pub use client::{ApiResponse, ClientBuilder, MessengerClient};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use types::*;
