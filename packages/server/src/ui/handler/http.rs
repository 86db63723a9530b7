//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    infrastructure::dto::http::{
        ApiResponse, CreateRoomRequest, CreateRoomResponse, JoinRoomRequest, LeaveRoomResponse,
        MessageDto, MessagesQuery, RoomDetailDto, SendMessageRequest,
    },
    ui::state::AppState,
    usecase::{
        CreateRoomUseCase, DeleteRoomUseCase, GetMessagesUseCase, GetRoomUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, SendMessageUseCase, UseCaseError,
    },
};

/// Largest page the history endpoint serves
pub const MAX_PAGE_SIZE: i64 = 100;

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Create a room
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, UseCaseError> {
    let usecase = CreateRoomUseCase::new(state.rooms.clone());
    let metadata = usecase
        .execute(request.room_name.unwrap_or_default())
        .await?;
    Ok(Json(CreateRoomResponse::new(metadata.name.as_str())))
}

/// Get room detail by name
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomDetailDto>, UseCaseError> {
    let usecase = GetRoomUseCase::new(state.rooms.clone(), state.messages.clone());
    let detail = usecase.execute(&room).await?;
    Ok(Json(RoomDetailDto::new(
        &detail.metadata,
        detail.participants,
        detail.message_count,
    )))
}

/// Delete a room with its membership and history
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<ApiResponse>, UseCaseError> {
    let usecase = DeleteRoomUseCase::new(state.rooms.clone());
    usecase.execute(&room).await?;
    Ok(Json(ApiResponse::success(format!(
        "Room '{room}' deleted successfully"
    ))))
}

/// `DELETE` on the collection itself
pub async fn delete_without_room_id() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error("Room ID is required for deletion")),
    )
        .into_response()
}

/// Join a room
pub async fn join_room(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Json(request): Json<JoinRoomRequest>,
) -> Result<Json<ApiResponse>, UseCaseError> {
    let usecase = JoinRoomUseCase::new(state.rooms.clone());
    let participant = usecase
        .execute(&room, request.participant.unwrap_or_default())
        .await?;
    Ok(Json(ApiResponse::success(format!(
        "User {participant} Join {room} Room Successfully"
    ))))
}

/// Remove a participant from a room
pub async fn leave_room(
    State(state): State<Arc<AppState>>,
    Path((room, participant)): Path<(String, String)>,
) -> Result<Json<LeaveRoomResponse>, UseCaseError> {
    let usecase = LeaveRoomUseCase::new(state.rooms.clone());
    let removed = usecase.execute(&room, participant).await?;
    Ok(Json(LeaveRoomResponse {
        removed,
        status: "Success".to_string(),
    }))
}

/// Send a message to a room
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ApiResponse>, UseCaseError> {
    let usecase = SendMessageUseCase::new(
        state.rooms.clone(),
        state.messages.clone(),
        state.publisher.clone(),
    );
    usecase
        .execute(
            &room,
            request.participant.unwrap_or_default(),
            request.message.unwrap_or_default(),
            request.timestamp,
        )
        .await?;
    Ok(Json(ApiResponse::success("Message sent successfully")))
}

/// Get message history, oldest first
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageDto>>, UseCaseError> {
    let (limit, offset) = validate_page(&query)?;
    let usecase = GetMessagesUseCase::new(state.rooms.clone(), state.messages.clone());
    let messages = usecase.execute(&room, limit, offset).await?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

fn validate_page(query: &MessagesQuery) -> Result<(Option<i64>, i64), UseCaseError> {
    if let Some(limit) = query.limit {
        if limit < 1 {
            return Err(UseCaseError::InvalidInput(
                "Limit must be at least 1".to_string(),
            ));
        }
        if limit > MAX_PAGE_SIZE {
            return Err(UseCaseError::InvalidInput(format!(
                "Limit cannot exceed {MAX_PAGE_SIZE}"
            )));
        }
    }
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(UseCaseError::InvalidInput(
            "Offset must be non-negative".to_string(),
        ));
    }
    Ok((query.limit, offset))
}
