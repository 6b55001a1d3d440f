use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;

use board_db::models::MessageRow;
use board_types::api::{CreateMessageRequest, DeleteMessageResponse, Message, UpdateMessageRequest};

use crate::error::{FIELDS_REQUIRED, ServerError};
use crate::state::AppState;

/// GET /messages
pub async fn list_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let rows = state.with_db(|db| db.list_messages()).await?;
    let messages: Vec<Message> = rows.into_iter().map(to_message).collect();
    Ok(Json(messages))
}

/// GET /messages/{id}
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServerError> {
    let row = state
        .with_db(move |db| db.get_message(id))
        .await?
        .ok_or_else(ServerError::message_not_found)?;

    Ok(Json(to_message(row)))
}

/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    // A field of the wrong type is reported like a missing one.
    let Json(req) = payload.map_err(|rejection| match rejection {
        JsonRejection::JsonDataError(_) => ServerError::Validation(FIELDS_REQUIRED.to_owned()),
        other => other.into(),
    })?;
    let (body, username) = req
        .into_required()
        .ok_or_else(|| ServerError::Validation(FIELDS_REQUIRED.to_owned()))?;

    let row = state
        .with_db(move |db| db.insert_message(&body, &username))
        .await?;
    debug!(id = row.id, "Message created");

    Ok((StatusCode::CREATED, Json(to_message(row))))
}

/// PATCH /messages/{id}
///
/// `updated_at` is refreshed on every call, even when the payload carries no
/// `body`. A missing id wins over a malformed payload.
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ServerError> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let exists = state
                .with_db(move |db| db.get_message(id))
                .await?
                .is_some();
            return Err(if exists {
                rejection.into()
            } else {
                ServerError::message_not_found()
            });
        }
    };

    let row = state
        .with_db(move |db| db.update_message(id, req.body.as_deref()))
        .await?
        .ok_or_else(ServerError::message_not_found)?;
    debug!(id, "Message updated");

    Ok(Json(to_message(row)))
}

/// DELETE /messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ServerError> {
    let deleted = state.with_db(move |db| db.delete_message(id)).await?;
    if !deleted {
        return Err(ServerError::message_not_found());
    }
    debug!(id, "Message deleted");

    Ok(Json(DeleteMessageResponse {
        message: "Message deleted successfully".to_owned(),
    }))
}

/// Timestamps go out exactly as SQLite stores them.
fn to_message(row: MessageRow) -> Message {
    Message {
        id: row.id,
        body: row.body,
        username: row.username,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
