//! API endpoint implementations.

mod attachments;
mod chats;
mod groups;
mod mentions;
mod users;

pub use attachments::AttachmentsApi;
pub use chats::ChatsApi;
pub use groups::GroupsApi;
pub use mentions::MentionsApi;
pub use users::UsersApi;

/// Parsed body of an accepted call; `None` when the server sent no body.
pub type Payload = Option<serde_json::Value>;
