//! Request parameters and response types for the Messenger API.
//!
//! Parameter types are built with required fields up front and optional
//! fields through `with_*` setters. Each one knows how to render the JSON
//! body its endpoint expects.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::query::encode_segment;

/// Default style applied to question options that don't set one.
pub const DEFAULT_OPTION_STYLE: &str = "red";

// ─────────────────────────────────────────────────────────────────────────────
// Chats
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of chat a resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatKind {
    /// One-to-one conversation.
    Conversation,
    /// Group chat.
    Group,
}

impl ChatKind {
    fn collection(self) -> &'static str {
        match self {
            ChatKind::Conversation => "conversations",
            ChatKind::Group => "groupchats",
        }
    }
}

/// Reference to a conversation or group chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRef {
    /// Chat ID.
    pub id: String,
    /// Conversation or group chat.
    pub kind: ChatKind,
    /// Whether the ID lives in the auxiliary (external) namespace.
    pub aux: bool,
}

impl ChatRef {
    /// Reference a one-to-one conversation.
    pub fn conversation(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ChatKind::Conversation,
            aux: false,
        }
    }

    /// Reference a group chat.
    pub fn group(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: ChatKind::Group,
            aux: false,
        }
    }

    /// Build from the conversation/group flag pair used by callers.
    pub fn new(id: impl Into<String>, is_group: bool, is_aux: bool) -> Self {
        let chat = if is_group {
            Self::group(id)
        } else {
            Self::conversation(id)
        };
        chat.with_aux(is_aux)
    }

    /// Select the auxiliary namespace.
    pub fn with_aux(mut self, aux: bool) -> Self {
        self.aux = aux;
        self
    }

    /// Whether this is a group chat.
    pub fn is_group(&self) -> bool {
        self.kind == ChatKind::Group
    }

    /// Resource path, e.g. `aux/groupchats/{id}`.
    pub fn path(&self) -> String {
        format!(
            "{}{}/{}",
            aux_prefix(self.aux),
            self.kind.collection(),
            encode_segment(&self.id)
        )
    }
}

pub(crate) fn aux_prefix(aux: bool) -> &'static str {
    if aux { "aux/" } else { "" }
}

// ─────────────────────────────────────────────────────────────────────────────
// Invites
// ─────────────────────────────────────────────────────────────────────────────

/// Kind of invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InviteType {
    /// Colleague within the inviting company.
    Coworker,
    /// External contact.
    Contact,
    /// Private (consumer) user.
    PrivateUser,
}

impl InviteType {
    /// Wire name of the invite type.
    pub fn as_str(self) -> &'static str {
        match self {
            InviteType::Coworker => "coworker",
            InviteType::Contact => "contact",
            InviteType::PrivateUser => "private_user",
        }
    }

    /// Invite endpoint for this type.
    pub fn path(self) -> &'static str {
        match self {
            InviteType::Coworker => "users/invite/coworker",
            InviteType::Contact => "users/invite/contact",
            InviteType::PrivateUser => "users/invite/private",
        }
    }
}

impl FromStr for InviteType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "coworker" => Ok(InviteType::Coworker),
            "contact" => Ok(InviteType::Contact),
            "private_user" => Ok(InviteType::PrivateUser),
            other => Err(Error::InvalidInviteType(other.to_string())),
        }
    }
}

impl fmt::Display for InviteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an invitee is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InviteContact {
    /// Email address.
    Email(String),
    /// Phone number, sent as `phone_number`.
    Phone(String),
}

/// Invitation for a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invite {
    pub contact: InviteContact,
    pub first_name: String,
    pub last_name: String,
    /// Selects the invite endpoint.
    pub invite_type: InviteType,
    /// Personal text, only used when a conversation is created.
    pub invite_text: Option<String>,
    pub send_email: Option<bool>,
    /// External identifier in the auxiliary namespace.
    pub aux_id: Option<String>,
    /// Whether a conversation should be opened with the invitee.
    pub create_conversation: bool,
}

impl Invite {
    /// Invite by email address.
    pub fn email(
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        invite_type: InviteType,
    ) -> Self {
        Self::with_contact(
            InviteContact::Email(email.into()),
            first_name,
            last_name,
            invite_type,
        )
    }

    /// Invite by phone number.
    pub fn phone(
        phone_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        invite_type: InviteType,
    ) -> Self {
        Self::with_contact(
            InviteContact::Phone(phone_number.into()),
            first_name,
            last_name,
            invite_type,
        )
    }

    fn with_contact(
        contact: InviteContact,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        invite_type: InviteType,
    ) -> Self {
        Self {
            contact,
            first_name: first_name.into(),
            last_name: last_name.into(),
            invite_type,
            invite_text: None,
            send_email: None,
            aux_id: None,
            create_conversation: false,
        }
    }

    /// Set the personal invite text.
    pub fn with_invite_text(mut self, text: impl Into<String>) -> Self {
        self.invite_text = Some(text.into());
        self
    }

    /// Set whether the invitee gets an email.
    pub fn with_send_email(mut self, send: bool) -> Self {
        self.send_email = Some(send);
        self
    }

    /// Set the auxiliary ID.
    pub fn with_aux_id(mut self, aux_id: impl Into<String>) -> Self {
        self.aux_id = Some(aux_id.into());
        self
    }

    /// Set whether a conversation is opened with the invitee.
    pub fn with_create_conversation(mut self, create: bool) -> Self {
        self.create_conversation = create;
        self
    }

    fn email_address(&self) -> Option<&str> {
        match &self.contact {
            InviteContact::Email(email) => Some(email),
            InviteContact::Phone(_) => None,
        }
    }

    fn phone_number(&self) -> Option<&str> {
        match &self.contact {
            InviteContact::Phone(phone) => Some(phone),
            InviteContact::Email(_) => None,
        }
    }

    /// Body for the standalone invite endpoints.
    pub(crate) fn to_body(&self) -> InviteBody<'_> {
        InviteBody {
            email: self.email_address(),
            phone_number: self.phone_number(),
            first_name: &self.first_name,
            last_name: &self.last_name,
            invite_text: self.invite_text.as_deref(),
            send_email: self.send_email,
            aux_id: self.aux_id.as_deref(),
        }
    }

    /// Body of one entry in a group creation's `invite_users`.
    pub(crate) fn to_group_body(&self) -> GroupInviteBody<'_> {
        GroupInviteBody {
            create_conversation: self.create_conversation,
            email: self.email_address(),
            phone_number: self.phone_number(),
            first_name: &self.first_name,
            last_name: &self.last_name,
            invite_text: self.invite_text.as_deref(),
            aux_id: self.aux_id.as_deref(),
            invite_type: self.invite_type,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct InviteBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    invite_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aux_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GroupInviteBody<'a> {
    create_conversation: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    invite_text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aux_id: Option<&'a str>,
    invite_type: InviteType,
}

// ─────────────────────────────────────────────────────────────────────────────
// Group chats
// ─────────────────────────────────────────────────────────────────────────────

/// Group chat settings. Unset fields are left out of settings updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_contacts: Option<bool>,
    /// Seconds of inactivity before the chat closes (0 disables).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_close_after: Option<u64>,
    /// Seconds before the chat expires (0 disables).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_expire_after: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybrid_messaging: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members_can_invite: Option<bool>,
}

impl GroupSettings {
    /// Create settings with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether contacts may join.
    pub fn with_allow_contacts(mut self, allow: bool) -> Self {
        self.allow_contacts = Some(allow);
        self
    }

    /// Set the auto-close delay in seconds.
    pub fn with_auto_close_after(mut self, after: u64) -> Self {
        self.auto_close_after = Some(after);
        self
    }

    /// Set the auto-expire delay in seconds.
    pub fn with_auto_expire_after(mut self, after: u64) -> Self {
        self.auto_expire_after = Some(after);
        self
    }

    /// Set whether hybrid messaging is enabled.
    pub fn with_hybrid_messaging(mut self, hybrid: bool) -> Self {
        self.hybrid_messaging = Some(hybrid);
        self
    }

    /// Set whether members may invite others.
    pub fn with_members_can_invite(mut self, can_invite: bool) -> Self {
        self.members_can_invite = Some(can_invite);
        self
    }

    /// Fill unset fields with the defaults used when creating a group.
    pub fn or_defaults(&self) -> Self {
        Self {
            allow_contacts: Some(self.allow_contacts.unwrap_or(true)),
            auto_close_after: Some(self.auto_close_after.unwrap_or(0)),
            auto_expire_after: Some(self.auto_expire_after.unwrap_or(0)),
            hybrid_messaging: Some(self.hybrid_messaging.unwrap_or(false)),
            members_can_invite: Some(self.members_can_invite.unwrap_or(true)),
        }
    }
}

/// Parameters for creating a group chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateGroup {
    pub subject: String,
    pub member_ids: Vec<String>,
    pub invites: Vec<Invite>,
    pub settings: GroupSettings,
    pub send_email: Option<bool>,
    /// External identifier; routes creation to the auxiliary namespace.
    pub aux_id: Option<String>,
}

impl CreateGroup {
    /// Create a group with a subject and nothing else.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            member_ids: Vec::new(),
            invites: Vec::new(),
            settings: GroupSettings::default(),
            send_email: None,
            aux_id: None,
        }
    }

    /// Add an existing user as member.
    pub fn add_member_id(&mut self, id: impl Into<String>) {
        self.member_ids.push(id.into());
    }

    /// Add several existing users as members.
    pub fn add_member_ids<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.member_ids.extend(ids.into_iter().map(Into::into));
    }

    /// Add an invitation for a new user.
    pub fn add_invite(&mut self, invite: Invite) {
        self.invites.push(invite);
    }

    /// Add several invitations.
    pub fn add_invites(&mut self, invites: impl IntoIterator<Item = Invite>) {
        self.invites.extend(invites);
    }

    /// Set the group settings.
    pub fn with_settings(mut self, settings: GroupSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Set whether members get an email.
    pub fn with_send_email(mut self, send: bool) -> Self {
        self.send_email = Some(send);
        self
    }

    /// Set the auxiliary ID; the group is then created under `aux/`.
    pub fn with_aux_id(mut self, aux_id: impl Into<String>) -> Self {
        self.aux_id = Some(aux_id.into());
        self
    }

    /// Endpoint for creation.
    pub fn path(&self) -> &'static str {
        if self.aux_id.is_some() {
            "aux/groupchats"
        } else {
            "groupchats"
        }
    }

    pub(crate) fn to_body(&self) -> CreateGroupBody<'_> {
        let has_aux_members = self.invites.iter().any(|i| i.aux_id.is_some());
        CreateGroupBody {
            invite_users: self.invites.iter().map(Invite::to_group_body).collect(),
            members: &self.member_ids,
            settings: self.settings.or_defaults(),
            subject: &self.subject,
            send_email: self.send_email,
            aux_id: self.aux_id.as_deref(),
            aux_members: (self.aux_id.is_some() && has_aux_members).then_some(true),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateGroupBody<'a> {
    invite_users: Vec<GroupInviteBody<'a>>,
    members: &'a [String],
    settings: GroupSettings,
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aux_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aux_members: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MembersBody<'a> {
    pub members: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectBody<'a> {
    pub subject: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CloseBody {
    pub send_email: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// One answer button of a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub name: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

impl QuestionOption {
    /// Create an option with the default style.
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            style: None,
        }
    }

    /// Set the option style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.label.is_empty()
    }
}

/// A poll attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPayload {
    pub options: Vec<QuestionOption>,
    pub multi_answer: bool,
    pub style: Option<String>,
    /// Users allowed to answer; empty means everyone.
    pub user_ids: Vec<String>,
}

impl QuestionPayload {
    /// Create an empty question.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prepared option.
    pub fn add_question_option(&mut self, option: QuestionOption) {
        self.options.push(option);
    }

    /// Add an option; `style` falls back to the default style.
    pub fn add_option(
        &mut self,
        name: impl Into<String>,
        label: impl Into<String>,
        style: Option<&str>,
    ) {
        let mut option = QuestionOption::new(name, label);
        option.style = style.map(str::to_string);
        self.add_question_option(option);
    }

    /// Limit answering to a user.
    pub fn add_user_id(&mut self, user_id: impl Into<String>) {
        self.user_ids.push(user_id.into());
    }

    /// Limit answering to several users.
    pub fn add_user_ids<I, S>(&mut self, user_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.user_ids.extend(user_ids.into_iter().map(Into::into));
    }

    /// Set whether several options may be picked.
    pub fn with_multi_answer(mut self, multi: bool) -> Self {
        self.multi_answer = multi;
        self
    }

    /// Set the question style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Render the question, or `None` when no option has both name and label.
    pub(crate) fn to_body(&self) -> Option<QuestionBody<'_>> {
        let options: Vec<_> = self
            .options
            .iter()
            .filter(|o| o.is_complete())
            .map(|o| OptionBody {
                style: o
                    .style
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .unwrap_or(DEFAULT_OPTION_STYLE),
                label: &o.label,
                name: &o.name,
            })
            .collect();

        if options.is_empty() {
            return None;
        }

        Some(QuestionBody {
            options,
            multi_answer: self.multi_answer,
            style: self.style.as_deref().filter(|s| !s.is_empty()),
            users: (!self.user_ids.is_empty()).then_some(self.user_ids.as_slice()),
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OptionBody<'a> {
    style: &'a str,
    label: &'a str,
    name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionBody<'a> {
    options: Vec<OptionBody<'a>>,
    multi_answer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    users: Option<&'a [String]>,
}

/// A message to send to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessage {
    pub chat: ChatRef,
    pub body: String,
    /// Local files to upload; non-empty switches to a multipart upload.
    pub attachment_paths: Vec<PathBuf>,
    pub question: Option<QuestionPayload>,
}

impl SendMessage {
    /// Create a plain text message.
    pub fn new(chat: ChatRef, body: impl Into<String>) -> Self {
        Self {
            chat,
            body: body.into(),
            attachment_paths: Vec::new(),
            question: None,
        }
    }

    /// Attach a file.
    pub fn add_attachment_path(&mut self, path: impl Into<PathBuf>) {
        self.attachment_paths.push(path.into());
    }

    /// Attach several files.
    pub fn add_attachment_paths<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.attachment_paths
            .extend(paths.into_iter().map(Into::into));
    }

    /// Set the question to ask.
    pub fn with_question(mut self, question: QuestionPayload) -> Self {
        self.question = Some(question);
        self
    }

    /// Whether the message goes out as multipart.
    pub fn has_attachments(&self) -> bool {
        !self.attachment_paths.is_empty()
    }

    pub(crate) fn to_body(&self) -> MessageBody<'_> {
        MessageBody {
            body: &self.body,
            question: self.question.as_ref().and_then(QuestionPayload::to_body),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageBody<'a> {
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<QuestionBody<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct VerificationBody<'a> {
    pub user_id: &'a str,
    pub provider_id: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Attachments and PDFs
// ─────────────────────────────────────────────────────────────────────────────

/// An attachment posted in a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub id: String,
    /// Original file name; used for the downloaded file.
    pub name: String,
    pub mime_type: String,
    pub chat: ChatRef,
}

impl AttachmentRef {
    /// Reference an attachment in a chat.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        chat: ChatRef,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            chat,
        }
    }
}

/// Export of a chat's history as PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRequest {
    pub chat: ChatRef,
    /// File name for the downloaded PDF.
    pub filename: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl PdfRequest {
    /// Request a full export of a chat.
    pub fn new(chat: ChatRef, filename: impl Into<String>) -> Self {
        Self {
            chat,
            filename: filename.into(),
            start_date: None,
            end_date: None,
        }
    }

    /// Only include messages from `date` on.
    pub fn with_start_date(mut self, date: DateTime<Utc>) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Only include messages up to `date`.
    pub fn with_end_date(mut self, date: DateTime<Utc>) -> Self {
        self.end_date = Some(date);
        self
    }
}

/// Download link returned by the signed-URL endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrl {
    pub link: String,
    /// Cookie from the redirect response, required by the download.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Users and mentions
// ─────────────────────────────────────────────────────────────────────────────

/// A mention as found in an incoming message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mention {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Mention {
    /// A bare user ID that still has to be resolved.
    pub fn id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            last_name: None,
            extra: serde_json::Map::new(),
        }
    }

    /// A mention that already carries the user's name.
    pub fn named(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            ..Self::id(id)
        }
    }

    /// Whether this is the mention-everyone sentinel.
    pub fn is_all(&self) -> bool {
        self.id.eq_ignore_ascii_case("@all")
    }

    /// Whether both names are present.
    pub fn is_named(&self) -> bool {
        let present = |n: &Option<String>| n.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.first_name) && present(&self.last_name)
    }
}

/// A Messenger user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "required_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// `first last`, skipping missing parts.
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Mention> for User {
    fn from(mention: Mention) -> Self {
        let mut extra = mention.extra;
        let company_id = extra.remove("company_id").and_then(|v| id_from_value(&v));
        Self {
            id: mention.id,
            first_name: mention.first_name,
            last_name: mention.last_name,
            company_id,
            extra,
        }
    }
}

fn id_from_value(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept a string or numeric ID that must be present.
fn required_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    id_from_value(&value).ok_or_else(|| {
        serde::de::Error::custom(format!("expected a string or numeric id, got {}", value))
    })
}

/// Accept string or numeric IDs.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(id_from_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_paths() {
        assert_eq!(ChatRef::conversation("c1").path(), "conversations/c1");
        assert_eq!(ChatRef::group("g1").path(), "groupchats/g1");
        assert_eq!(
            ChatRef::group("g 1").with_aux(true).path(),
            "aux/groupchats/g%201"
        );
        assert_eq!(
            ChatRef::new("x", false, true).path(),
            "aux/conversations/x"
        );
    }

    #[test]
    fn test_invite_type_parsing() {
        assert_eq!(
            "private_user".parse::<InviteType>().unwrap(),
            InviteType::PrivateUser
        );
        assert_eq!(InviteType::PrivateUser.path(), "users/invite/private");
        assert!(matches!(
            "friend".parse::<InviteType>(),
            Err(Error::InvalidInviteType(t)) if t == "friend"
        ));
    }

    #[test]
    fn test_invite_body() {
        let invite = Invite::email("a@b.c", "Ann", "Lee", InviteType::Contact)
            .with_send_email(false)
            .with_aux_id("ext-1");
        let body = serde_json::to_value(invite.to_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "email": "a@b.c",
                "first_name": "Ann",
                "last_name": "Lee",
                "send_email": false,
                "aux_id": "ext-1"
            })
        );

        let phone = Invite::phone("+31600000000", "Bo", "Ek", InviteType::Coworker);
        let body = serde_json::to_value(phone.to_body()).unwrap();
        assert_eq!(body["phone_number"], "+31600000000");
        assert!(body.get("email").is_none());
    }

    #[test]
    fn test_create_group_body_defaults() {
        let mut group = CreateGroup::new("Support");
        group.add_member_ids(["u1", "u2"]);
        group.add_invite(
            Invite::email("a@b.c", "Ann", "Lee", InviteType::Contact)
                .with_invite_text("Welcome"),
        );
        assert_eq!(group.path(), "groupchats");

        let body = serde_json::to_value(group.to_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "invite_users": [{
                    "create_conversation": false,
                    "email": "a@b.c",
                    "first_name": "Ann",
                    "last_name": "Lee",
                    "invite_text": "Welcome",
                    "invite_type": "contact"
                }],
                "members": ["u1", "u2"],
                "settings": {
                    "allow_contacts": true,
                    "auto_close_after": 0,
                    "auto_expire_after": 0,
                    "hybrid_messaging": false,
                    "members_can_invite": true
                },
                "subject": "Support"
            })
        );
    }

    #[test]
    fn test_create_group_aux_members() {
        let mut group = CreateGroup::new("Ext").with_aux_id("grp-9");
        group.add_invite(Invite::email("a@b.c", "A", "B", InviteType::Contact));
        assert_eq!(group.path(), "aux/groupchats");
        let body = serde_json::to_value(group.to_body()).unwrap();
        assert_eq!(body["aux_id"], "grp-9");
        assert!(body.get("aux_members").is_none());

        group.add_invite(
            Invite::email("c@d.e", "C", "D", InviteType::Contact).with_aux_id("m-1"),
        );
        let body = serde_json::to_value(group.to_body()).unwrap();
        assert_eq!(body["aux_members"], true);
    }

    #[test]
    fn test_aux_members_requires_group_aux_id() {
        let mut group = CreateGroup::new("Plain");
        group.add_invite(Invite::email("a@b.c", "A", "B", InviteType::Contact).with_aux_id("m"));
        let body = serde_json::to_value(group.to_body()).unwrap();
        assert!(body.get("aux_members").is_none());
        assert!(body.get("aux_id").is_none());
    }

    #[test]
    fn test_settings_update_sends_only_set_fields() {
        let settings = GroupSettings::new().with_hybrid_messaging(true);
        assert_eq!(
            serde_json::to_value(&settings).unwrap(),
            json!({ "hybrid_messaging": true })
        );
    }

    #[test]
    fn test_question_filters_and_defaults_style() {
        let mut question = QuestionPayload::new().with_multi_answer(true);
        question.add_option("yes", "Yes", None);
        question.add_option("no", "No", Some("green"));
        question.add_option("", "Broken", None);
        question.add_user_id("u1");

        let message = SendMessage::new(ChatRef::group("g"), "Agree?").with_question(question);
        let body = serde_json::to_value(message.to_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "body": "Agree?",
                "question": {
                    "options": [
                        { "style": "red", "label": "Yes", "name": "yes" },
                        { "style": "green", "label": "No", "name": "no" }
                    ],
                    "multi_answer": true,
                    "users": ["u1"]
                }
            })
        );
    }

    #[test]
    fn test_question_without_valid_options_is_omitted() {
        let mut question = QuestionPayload::new();
        question.add_question_option(QuestionOption::new("only-name", ""));
        let message = SendMessage::new(ChatRef::conversation("c"), "hi").with_question(question);
        let body = serde_json::to_value(message.to_body()).unwrap();
        assert_eq!(body, json!({ "body": "hi" }));
    }

    #[test]
    fn test_mention_flags() {
        assert!(Mention::id("@All").is_all());
        assert!(!Mention::id("u1").is_named());
        assert!(Mention::named("u1", "A", "B").is_named());

        let partial: Mention = serde_json::from_value(json!({
            "id": "u2", "first_name": "A", "last_name": ""
        }))
        .unwrap();
        assert!(!partial.is_named());
    }

    #[test]
    fn test_user_lenient_company_id() {
        let user: User = serde_json::from_value(json!({
            "id": "u1", "first_name": "A", "company_id": 42, "avatar": "x.png"
        }))
        .unwrap();
        assert_eq!(user.company_id.as_deref(), Some("42"));
        assert_eq!(user.extra["avatar"], "x.png");
        assert_eq!(user.display_name(), "A");

        let user: User = serde_json::from_value(json!({ "id": "u2", "company_id": null })).unwrap();
        assert_eq!(user.company_id, None);
    }

    #[test]
    fn test_numeric_ids() {
        let user: User = serde_json::from_value(json!({ "id": 7, "first_name": "Ann" })).unwrap();
        assert_eq!(user.id, "7");

        let mention: Mention = serde_json::from_value(json!({ "id": 12 })).unwrap();
        assert_eq!(mention.id, "12");
        assert!(!mention.is_named());
    }

    #[test]
    fn test_id_is_required() {
        assert!(serde_json::from_value::<User>(json!({ "first_name": "Ann" })).is_err());
        assert!(serde_json::from_value::<User>(json!({ "id": null })).is_err());
        assert!(serde_json::from_value::<Mention>(json!({ "id": ["u1"] })).is_err());
    }
}
