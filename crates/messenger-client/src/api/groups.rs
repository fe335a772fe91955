//! Group chats API.

use std::path::PathBuf;

use crate::api::Payload;
use crate::client::MessengerClient;
use crate::error::Result;
use crate::query::encode_segment;
use crate::types::{
    CloseBody, CreateGroup, GroupSettings, MembersBody, SubjectBody, User, aux_prefix,
};

/// Group chats API client.
pub struct GroupsApi {
    client: MessengerClient,
}

impl GroupsApi {
    pub(crate) fn new(client: MessengerClient) -> Self {
        Self { client }
    }

    fn path(id: &str, aux: bool) -> String {
        format!("{}groupchats/{}", aux_prefix(aux), encode_segment(id))
    }

    /// Create a group chat.
    pub async fn create(&self, group: &CreateGroup) -> Result<Payload> {
        Ok(self.client.post(group.path(), &group.to_body()).await?.body)
    }

    /// List the members of a group chat.
    ///
    /// Entries that don't describe a user (no usable `id`) are skipped.
    pub async fn members(&self, id: &str, aux: bool) -> Result<Vec<User>> {
        let entries: Vec<serde_json::Value> = self
            .client
            .get_json(&format!("{}/members", Self::path(id, aux)))
            .await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(group = id, error = %e, "Skipping malformed member entry");
                    None
                }
            })
            .collect())
    }

    /// Add users to a group chat.
    pub async fn add_members(&self, id: &str, aux: bool, user_ids: &[String]) -> Result<Payload> {
        let body = MembersBody { members: user_ids };
        let path = format!("{}/members", Self::path(id, aux));
        Ok(self.client.put(&path, &body).await?.body)
    }

    /// Remove users from a group chat.
    pub async fn remove_members(
        &self,
        id: &str,
        aux: bool,
        user_ids: &[String],
    ) -> Result<Payload> {
        let body = MembersBody { members: user_ids };
        let path = format!("{}/members", Self::path(id, aux));
        Ok(self.client.delete(&path, &body).await?.body)
    }

    /// Rename a group chat.
    pub async fn change_subject(&self, id: &str, aux: bool, subject: &str) -> Result<Payload> {
        let body = SubjectBody { subject };
        Ok(self.client.put(&Self::path(id, aux), &body).await?.body)
    }

    /// Update group settings. Only fields that are set are sent.
    pub async fn change_settings(
        &self,
        id: &str,
        aux: bool,
        settings: &GroupSettings,
    ) -> Result<Payload> {
        let path = format!("{}/settings", Self::path(id, aux));
        Ok(self.client.put(&path, settings).await?.body)
    }

    /// Upload a new group avatar.
    pub async fn change_avatar(
        &self,
        id: &str,
        aux: bool,
        avatar_path: impl Into<PathBuf>,
    ) -> Result<Payload> {
        let path = format!("{}/avatar", Self::path(id, aux));
        let files = [avatar_path.into()];
        Ok(self
            .client
            .post_multipart(&path, None, "avatar", &files)
            .await?
            .body)
    }

    /// Close a group chat.
    pub async fn close(&self, id: &str, aux: bool, send_email: bool) -> Result<Payload> {
        let body = CloseBody { send_email };
        Ok(self.client.delete(&Self::path(id, aux), &body).await?.body)
    }
}
