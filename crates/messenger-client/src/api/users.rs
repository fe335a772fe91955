//! Users API.

use crate::api::Payload;
use crate::client::MessengerClient;
use crate::error::Result;
use crate::query::encode_segment;
use crate::types::{Invite, User, aux_prefix};

/// Users API client.
pub struct UsersApi {
    client: MessengerClient,
}

impl UsersApi {
    pub(crate) fn new(client: MessengerClient) -> Self {
        Self { client }
    }

    /// Invite a user; the endpoint follows the invite type.
    pub async fn invite(&self, invite: &Invite) -> Result<Payload> {
        let path = invite.invite_type.path();
        Ok(self.client.post(path, &invite.to_body()).await?.body)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str, aux: bool) -> Result<User> {
        self.client
            .get_json(&format!("{}users/{}", aux_prefix(aux), encode_segment(id)))
            .await
    }

    /// List the identity providers linked to a user.
    pub async fn providers(&self, id: &str) -> Result<Payload> {
        let path = format!("users/{}/providers", encode_segment(id));
        Ok(self.client.get(&path).await?.body)
    }

    /// List the verifications a user has completed.
    pub async fn verifications(&self, id: &str) -> Result<Payload> {
        let path = format!("users/{}/verifications", encode_segment(id));
        Ok(self.client.get(&path).await?.body)
    }

    /// Whether `user_id` works at the same company as `check_user`.
    pub async fn is_coworker(&self, user_id: &str, check_user: &User) -> Result<bool> {
        match check_user.company_id.as_deref() {
            Some(company_id) => self.is_from_company(user_id, company_id).await,
            None => {
                tracing::debug!(user_id, check_user = %check_user.id, "Reference user has no company");
                Ok(false)
            }
        }
    }

    /// Whether `user_id` belongs to `company_id`.
    pub async fn is_from_company(&self, user_id: &str, company_id: &str) -> Result<bool> {
        let user = self.get(user_id, false).await?;
        let is_member = user.company_id.as_deref() == Some(company_id);
        tracing::debug!(
            user_id,
            company_id,
            user_company_id = ?user.company_id,
            is_member,
            "Checked company membership"
        );
        Ok(is_member)
    }
}
