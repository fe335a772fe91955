//! Mention resolution.

use std::collections::HashSet;

use futures::future::join_all;

use crate::client::MessengerClient;
use crate::types::{ChatRef, Mention, User};

/// Mentions API client.
pub struct MentionsApi {
    client: MessengerClient,
}

impl MentionsApi {
    pub(crate) fn new(client: MessengerClient) -> Self {
        Self { client }
    }

    /// Resolve the mentions of a message into full user records.
    ///
    /// An `@all` mention in a group chat resolves to every member. Bare IDs
    /// are looked up concurrently; lookups that fail are dropped. IDs in
    /// `exclude_ids` (typically the sender) are skipped. This never fails:
    /// whatever could be resolved is returned.
    pub async fn complete(
        &self,
        mentions: &[Mention],
        exclude_ids: &[String],
        chat: &ChatRef,
    ) -> Vec<User> {
        let excluded: HashSet<&str> = exclude_ids.iter().map(String::as_str).collect();
        let mut resolved: Vec<User> = Vec::new();
        let mut user_ids: Vec<&str> = Vec::new();
        let mut mentioned_all = false;

        for mention in mentions {
            if mention.is_all() {
                mentioned_all = true;
                break;
            }
            if mention.is_named() {
                resolved.push(mention.clone().into());
            } else if !excluded.contains(mention.id.as_str()) {
                user_ids.push(&mention.id);
            }
        }

        if mentioned_all && chat.is_group() {
            match self.client.groups().members(&chat.id, chat.aux).await {
                Ok(members) => {
                    return members
                        .into_iter()
                        .filter(|m| {
                            let keep = !excluded.contains(m.id.as_str());
                            if !keep {
                                tracing::debug!(id = %m.id, "Ignored excluded member as mention");
                            }
                            keep
                        })
                        .collect();
                }
                Err(e) => {
                    tracing::error!(chat = %chat.id, error = %e, "Unable to retrieve members for @all");
                    return resolved;
                }
            }
        }

        if !user_ids.is_empty() {
            let users = self.client.users();
            let lookups = user_ids.iter().map(|id| users.get(id, false));
            for (id, result) in user_ids.iter().zip(join_all(lookups).await) {
                match result {
                    Ok(user) => resolved.push(user),
                    Err(e) => tracing::warn!(id, error = %e, "Unable to resolve mention"),
                }
            }
        }

        resolved
    }
}
