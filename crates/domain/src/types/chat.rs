//! Chat service models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ADMIN_TOKEN_HEADER, CLIENT_INFO_HEADER, CREATION_TAGS_HEADER, DEFAULT_MESSAGES_LIMIT,
    USER_SESSION_HEADER,
};
use crate::errors::{DomainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    #[default]
    Text,
    Picture,
    Video,
    Voice,
    File,
    Product,
    Vendor,
    Location,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentFile {
    pub id: i64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub files: Vec<AttachmentFile>,
}

/// Body of `POST /v2/message`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub chat_id: i64,
    pub message_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_metadata: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_id: Option<i64>,
}

impl MessageRequest {
    /// A plain text message.
    #[must_use]
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_type: MessageType::Text,
            message: Some(MessageContent { text: Some(text.into()), entity_id: None }),
            attachment: None,
            replied_message_id: None,
            message_metadata: None,
            temp_id: None,
        }
    }

    /// A message carrying uploaded files.
    #[must_use]
    pub const fn with_files(
        chat_id: i64,
        message_type: MessageType,
        files: Vec<AttachmentFile>,
    ) -> Self {
        Self {
            chat_id,
            message_type,
            message: None,
            attachment: Some(Attachment { files }),
            replied_message_id: None,
            message_metadata: None,
            temp_id: None,
        }
    }

    #[must_use]
    pub const fn replying_to(mut self, message_id: i64) -> Self {
        self.replied_message_id = Some(message_id);
        self
    }

    #[must_use]
    pub const fn with_temp_id(mut self, temp_id: i64) -> Self {
        self.temp_id = Some(temp_id);
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a message with neither
    /// content nor attachment.
    pub fn validate(&self) -> Result<()> {
        let has_content = self.message.as_ref().is_some_and(|m| {
            m.text.as_deref().is_some_and(|t| !t.is_empty()) || m.entity_id.is_some()
        });
        let has_files = self.attachment.as_ref().is_some_and(|a| !a.files.is_empty());
        if has_content || has_files {
            Ok(())
        } else {
            Err(DomainError::invalid("message", "needs content or an attachment"))
        }
    }
}

/// Optional headers accepted by the chat endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatHeaders {
    pub client_info: Option<String>,
    pub admin_token: Option<String>,
    pub creation_tags: Option<String>,
    pub user_session: Option<String>,
}

impl ChatHeaders {
    #[must_use]
    pub fn with_client_info(mut self, value: impl Into<String>) -> Self {
        self.client_info = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_admin_token(mut self, value: impl Into<String>) -> Self {
        self.admin_token = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_creation_tags(mut self, value: impl Into<String>) -> Self {
        self.creation_tags = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_user_session(mut self, value: impl Into<String>) -> Self {
        self.user_session = Some(value.into());
        self
    }

    #[must_use]
    pub fn to_headers(&self) -> Vec<(String, String)> {
        [
            (CLIENT_INFO_HEADER, &self.client_info),
            (ADMIN_TOKEN_HEADER, &self.admin_token),
            (CREATION_TAGS_HEADER, &self.creation_tags),
            (USER_SESSION_HEADER, &self.user_session),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_ref().map(|v| (name.to_string(), v.clone())))
        .collect()
    }
}

/// Body of `POST /v2/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub user_id: i64,
    pub chat_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl CreateChatRequest {
    /// A private chat with `user_id`.
    #[must_use]
    pub fn private(user_id: i64) -> Self {
        Self { user_id, chat_type: "PRIVATE".to_string(), chat_metadata: None }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.chat_metadata.get_or_insert_with(BTreeMap::new).insert(key.into(), value);
        self
    }

    /// # Errors
    /// Returns [`DomainError::InvalidInput`] for a non-positive user id.
    pub fn validate(&self) -> Result<()> {
        if self.user_id <= 0 {
            return Err(DomainError::invalid("user_id", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query of `GET /v2/chat/{chat_id}/messages`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagesQuery {
    pub msg_id: Option<i64>,
    pub limit: u32,
    pub chat_type: String,
    pub order: SortOrder,
    pub op: String,
    pub temp_id: Option<i64>,
}

impl Default for MessagesQuery {
    fn default() -> Self {
        Self {
            msg_id: None,
            limit: DEFAULT_MESSAGES_LIMIT,
            chat_type: "ALL".to_string(),
            order: SortOrder::Desc,
            op: "<".to_string(),
            temp_id: None,
        }
    }
}

impl MessagesQuery {
    /// Messages older than `msg_id`.
    #[must_use]
    pub fn before(msg_id: i64) -> Self {
        Self { msg_id: Some(msg_id), ..Self::default() }
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    #[must_use]
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("chatType".to_string(), self.chat_type.clone()),
            ("order".to_string(), self.order.as_str().to_string()),
            ("op".to_string(), self.op.clone()),
        ];
        super::push_opt(&mut query, "msgId", self.msg_id.as_ref());
        super::push_opt(&mut query, "temp_id", self.temp_id.as_ref());
        query
    }
}
