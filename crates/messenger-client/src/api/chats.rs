//! Chats API: conversations, group chats and their messages.

use crate::api::Payload;
use crate::client::MessengerClient;
use crate::error::Result;
use crate::query::encode_segment;
use crate::types::{ChatRef, SendMessage, VerificationBody};

/// Chats API client.
pub struct ChatsApi {
    client: MessengerClient,
}

impl ChatsApi {
    pub(crate) fn new(client: MessengerClient) -> Self {
        Self { client }
    }

    /// Get a conversation or group chat.
    pub async fn get(&self, chat: &ChatRef) -> Result<Payload> {
        Ok(self.client.get(&chat.path()).await?.body)
    }

    /// Get a single message.
    pub async fn message(&self, chat: &ChatRef, message_id: &str) -> Result<Payload> {
        let path = format!("{}/messages/{}", chat.path(), encode_segment(message_id));
        Ok(self.client.get(&path).await?.body)
    }

    /// Send a message.
    ///
    /// With attachments the message is uploaded as multipart form data to
    /// the attachments endpoint; a question is only sent with plain messages.
    pub async fn send_message(&self, message: &SendMessage) -> Result<Payload> {
        let chat_path = message.chat.path();
        let response = if message.has_attachments() {
            let mut fields = serde_json::Map::new();
            fields.insert(
                "message".to_string(),
                serde_json::Value::String(message.body.clone()),
            );
            self.client
                .post_multipart(
                    &format!("{}/attachments", chat_path),
                    Some(&fields),
                    "files",
                    &message.attachment_paths,
                )
                .await?
        } else {
            self.client
                .post(&format!("{}/messages", chat_path), &message.to_body())
                .await?
        };
        Ok(response.body)
    }

    /// Ask a user to verify themselves with an identity provider.
    pub async fn ask_verification(
        &self,
        chat: &ChatRef,
        user_id: &str,
        provider_id: &str,
    ) -> Result<Payload> {
        let body = VerificationBody {
            user_id,
            provider_id,
        };
        let path = format!("{}/verification", chat.path());
        Ok(self.client.post(&path, &body).await?.body)
    }
}
