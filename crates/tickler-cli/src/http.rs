//! HTTP - axum router
//!
//! 入力の形だけをここで確認し、業務ルールは service に任せます。
//! エラーは `ErrorKind` でステータスに変換します（500 は詳細を返さずログのみ）。

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use tickler_core::app::{App, CreateTodo, TodoService, UserService};
use tickler_core::domain::{ErrorKind, RemindAtInput, Todo, TodoError, TodoId, User, UserId};
use tracing::error;

#[derive(Clone)]
struct HttpState {
    todos: Arc<TodoService>,
    users: Arc<UserService>,
}

pub fn router(app: &App) -> Router {
    let state = HttpState {
        todos: Arc::clone(&app.todos),
        users: Arc::clone(&app.users),
    };

    Router::new()
        .route("/", get(health))
        .route("/users", post(create_user).get(list_users))
        .route("/todos", post(create_todo).get(list_todos))
        .route("/todos/{id}/complete", patch(complete_todo))
        .with_state(state)
}

/// Error response body: `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::bad_request(err.to_string()),
            ErrorKind::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            ErrorKind::Internal => {
                error!(error = %err, "request failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Internal Server Error".to_string(),
                }
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

/// Treat an empty string the same as an absent field.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "Todo Reminder Service is running.")
}

#[derive(Deserialize)]
struct CreateUserBody {
    email: Option<String>,
    name: Option<String>,
}

async fn create_user(
    State(state): State<HttpState>,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(body) = body?;
    let (Some(email), Some(name)) = (present(body.email), present(body.name)) else {
        return Err(ApiError::bad_request("Email and name are required"));
    };

    let user = state.users.register_user(email, name).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn list_users(State(state): State<HttpState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users().await?))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTodoBody {
    user_id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    remind_at: Option<RemindAtInput>,
}

async fn create_todo(
    State(state): State<HttpState>,
    body: Result<Json<CreateTodoBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let Json(body) = body?;
    let (Some(raw_user_id), Some(title)) = (present(body.user_id), present(body.title)) else {
        return Err(ApiError::bad_request("userId and title are required"));
    };

    // an id that does not parse can never resolve, but a blank title still wins
    let user_id = match raw_user_id.parse::<UserId>() {
        Ok(id) => id,
        Err(_) if title.trim().is_empty() => return Err(TodoError::EmptyTitle.into()),
        Err(_) => return Err(TodoError::UserNotFound(raw_user_id).into()),
    };

    let todo = state
        .todos
        .create_todo(CreateTodo {
            user_id,
            title,
            description: body.description,
            remind_at: body.remind_at,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

#[derive(Deserialize)]
struct TodosQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
}

async fn list_todos(
    State(state): State<HttpState>,
    Query(query): Query<TodosQuery>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Some(raw_user_id) = present(query.user_id) else {
        return Err(ApiError::bad_request("userId query parameter is required"));
    };
    let Ok(user_id) = raw_user_id.parse::<UserId>() else {
        return Ok(Json(Vec::new()));
    };

    Ok(Json(state.todos.get_todos_by_user(user_id).await?))
}

async fn complete_todo(
    State(state): State<HttpState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let Ok(id) = raw_id.parse::<TodoId>() else {
        return Err(TodoError::TodoNotFound(raw_id).into());
    };

    Ok(Json(state.todos.complete_todo(id).await?))
}
