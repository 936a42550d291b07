use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::todo::{Todo, TodoListPage};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{
    AppState,
    error::ApiError,
    extract::{JsonBody, QueryParams},
    validation,
};

pub async fn list_todos(
    State(state): State<AppState>,
    QueryParams(params): QueryParams,
) -> Result<ResponseJson<ApiResponse<TodoListPage>>, ApiError> {
    let query = validation::validate_list_query(&params)
        .map_err(|errors| ApiError::invalid_query(errors.into_map()))?;
    let page = Todo::find_all(&state.db().pool, &query).await?;
    Ok(ResponseJson(ApiResponse::success(page)))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ResponseJson<ApiResponse<Todo>>, ApiError> {
    // Ids are opaque; a string that is not a UUID cannot name a stored row.
    let Ok(id) = id.parse::<Uuid>() else {
        return Err(ApiError::todo_not_found());
    };

    match Todo::find_by_id(&state.db().pool, id).await? {
        Some(todo) => Ok(ResponseJson(ApiResponse::success(todo))),
        None => Err(ApiError::todo_not_found()),
    }
}

pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<(StatusCode, ResponseJson<ApiResponse<Todo>>), ApiError> {
    let data = validation::validate_create(&body)
        .map_err(|errors| ApiError::invalid_body(errors.into_map()))?;

    tracing::debug!("creating todo '{}'", data.title);
    let todo = Todo::create(&state.db().pool, &data).await?;

    Ok((StatusCode::CREATED, ResponseJson(ApiResponse::success(todo))))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<ResponseJson<ApiResponse<Todo>>, ApiError> {
    // Input validation comes before any addressing outcome, so a bad body
    // answers 400 even when the id would never match.
    let data = validation::validate_update(&body)
        .map_err(|errors| ApiError::invalid_body(errors.into_map()))?;
    let Ok(id) = id.parse::<Uuid>() else {
        return Err(ApiError::todo_not_found());
    };

    match Todo::update(&state.db().pool, id, &data).await? {
        Some(todo) => Ok(ResponseJson(ApiResponse::success(todo))),
        None => Err(ApiError::todo_not_found()),
    }
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let Ok(id) = id.parse::<Uuid>() else {
        return Err(ApiError::todo_not_found());
    };

    if Todo::delete(&state.db().pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::todo_not_found())
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}
