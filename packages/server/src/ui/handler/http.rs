//! HTTP API endpoint handlers.
//!
//! Authentication happens upstream; the authenticated user id arrives in the
//! `x-user-id` header and is extracted with [`CurrentUser`].

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, State, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use crate::{
    domain::{RepositoryError, UserId},
    infrastructure::dto::{
        http::{
            ConversationsResponse, ErrorResponse, MarkReadResponse, MessagesResponse,
            PresenceDto, SendMessageRequest, SendMessageResponse, UsersResponse,
        },
        websocket::MessageDto,
    },
    ui::state::AppState,
    usecase::{ConversationError, PostMessageError, PostMessageInput},
};
use neighborly_shared::time::timestamp_to_rfc3339;

/// Header carrying the authenticated user id
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user of the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;
        let user_id = UserId::new(value.to_string())
            .map_err(|_| ApiError::Unauthorized("Not authenticated".to_string()))?;
        Ok(Self(user_id))
    }
}

/// Error response with a `{"error": "..."}` body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            Self::Unauthorized(error) => (StatusCode::UNAUTHORIZED, error),
            Self::NotFound(error) => (StatusCode::NOT_FOUND, error),
            Self::Internal(error) => (StatusCode::INTERNAL_SERVER_ERROR, error),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// `Json` whose rejection is answered as [`ApiError::BadRequest`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

fn conversation_error(e: ConversationError, context: &str) -> ApiError {
    match e {
        ConversationError::InvalidUserId(e) => ApiError::BadRequest(e.to_string()),
        ConversationError::Repository(e) => {
            tracing::error!("{}: {}", context, e);
            ApiError::Internal(context.to_string())
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// `POST /api/messages/send`
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    CurrentUser(sender_id): CurrentUser,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<(StatusCode, Json<SendMessageResponse>), ApiError> {
    let input = PostMessageInput {
        recipient_id: request.recipient_id,
        message_type: request.message_type,
        content: request.content,
        image_url: request.image_url,
    };

    match state.post_message_usecase.execute(sender_id, input).await {
        Ok(message) => Ok((
            StatusCode::CREATED,
            Json(SendMessageResponse {
                message: "Message sent".to_string(),
                data: MessageDto::from(&message),
            }),
        )),
        Err(PostMessageError::RecipientNotFound) => {
            Err(ApiError::NotFound("Receiver not found".to_string()))
        }
        Err(PostMessageError::Repository(e)) => {
            tracing::error!("Failed to send message: {}", e);
            Err(ApiError::Internal("Failed to send message".to_string()))
        }
        Err(e) => Err(ApiError::BadRequest(e.to_string())),
    }
}

/// `GET /api/messages/conversations`
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
) -> Result<Json<ConversationsResponse>, ApiError> {
    let conversations = state
        .list_conversations_usecase
        .execute(&user_id)
        .await
        .map_err(|e| conversation_error(e, "Failed to fetch conversations"))?;

    Ok(Json(ConversationsResponse {
        conversations: conversations.iter().map(Into::into).collect(),
    }))
}

/// `GET /api/messages/users`
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state
        .list_users_usecase
        .execute()
        .await
        .map_err(|e: RepositoryError| {
            tracing::error!("Failed to fetch users: {}", e);
            ApiError::Internal("Failed to fetch users".to_string())
        })?;

    Ok(Json(UsersResponse {
        users: users.iter().map(Into::into).collect(),
    }))
}

/// `GET /api/messages/{user_id}`
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(peer_id): Path<String>,
) -> Result<Json<MessagesResponse>, ApiError> {
    let messages = state
        .get_history_usecase
        .execute(&user_id, peer_id)
        .await
        .map_err(|e| conversation_error(e, "Failed to fetch messages"))?;

    Ok(Json(MessagesResponse {
        messages: messages.iter().map(Into::into).collect(),
    }))
}

/// `PUT /api/messages/read/{user_id}`
pub async fn mark_as_read(
    State(state): State<Arc<AppState>>,
    CurrentUser(user_id): CurrentUser,
    Path(peer_id): Path<String>,
) -> Result<Json<MarkReadResponse>, ApiError> {
    let updated = state
        .mark_as_read_usecase
        .execute(&user_id, peer_id)
        .await
        .map_err(|e| conversation_error(e, "Failed to mark messages as read"))?;

    Ok(Json(MarkReadResponse {
        message: "Messages marked as read".to_string(),
        updated,
    }))
}

/// `GET /api/presence/{user_id}`
pub async fn get_presence(
    State(state): State<Arc<AppState>>,
    CurrentUser(_): CurrentUser,
    Path(user_id): Path<String>,
) -> Result<Json<PresenceDto>, ApiError> {
    let user_id = UserId::new(user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let presence = state.presence_tracker.presence_of(&user_id).await;

    Ok(Json(PresenceDto {
        user_id: user_id.into_string(),
        online: presence.online,
        last_seen: presence.last_seen.map(|t| timestamp_to_rfc3339(t.value())),
    }))
}
