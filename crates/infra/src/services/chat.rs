//! Chat service client

use basalam_common::http::HttpMethod;
use basalam_domain::types::chat::{ChatHeaders, CreateChatRequest, MessageRequest, MessagesQuery};
use serde_json::Value;
use tracing::instrument;

use crate::api::service::{to_body, ServiceClient};
use crate::api::ApiResult;

/// Client for `conversation.basalam.com`
#[derive(Debug, Clone)]
pub struct ChatService {
    client: ServiceClient,
}

impl ChatService {
    /// Wrap a client bound to the chat service.
    pub const fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    /// The underlying request core, for endpoints without a typed method
    #[must_use]
    pub const fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Post a message to a chat.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// empty message; otherwise any error of the request.
    #[instrument(skip(self, message, headers), fields(chat_id = message.chat_id))]
    pub async fn create_message(
        &self,
        message: &MessageRequest,
        headers: &ChatHeaders,
    ) -> ApiResult<Value> {
        message.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, "/v2/message")?
            .headers(headers.to_headers())
            .json(to_body(message)?);
        self.client.send(request).await
    }

    /// Open a chat with another user.
    ///
    /// # Errors
    /// [`ApiError::InvalidInput`](crate::api::ApiError::InvalidInput) for an
    /// invalid user id; otherwise any error of the request.
    #[instrument(skip(self, chat, headers), fields(user_id = chat.user_id))]
    pub async fn create_chat(
        &self,
        chat: &CreateChatRequest,
        headers: &ChatHeaders,
    ) -> ApiResult<Value> {
        chat.validate()?;
        let request = self
            .client
            .request(HttpMethod::Post, "/v2/chat")?
            .headers(headers.to_headers())
            .json(to_body(chat)?);
        self.client.send(request).await
    }

    /// A page of messages of a chat.
    ///
    /// # Errors
    /// Any [`ApiError`](crate::api::ApiError) of the request.
    #[instrument(skip(self, query))]
    pub async fn get_messages(&self, chat_id: i64, query: &MessagesQuery) -> ApiResult<Value> {
        let request = self
            .client
            .request(HttpMethod::Get, &format!("/v2/chat/{chat_id}/messages"))?
            .query_pairs(query.to_query());
        self.client.send(request).await
    }
}
