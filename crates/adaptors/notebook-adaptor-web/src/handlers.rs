//! Route handlers and error mapping

use crate::ApiState;
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use notebook_core::{
    with_deadline, CancellationToken, ChatAnswer, ChatRequest, DocumentListing, HealthReport,
    IndexReport, IndexRequest, ListQuery, NotebookError,
};
use tracing::{error, info, warn};

/// API error
#[derive(Debug)]
pub enum ApiError {
    /// 400
    BadRequest(String),
    /// 502: the backend failed or answered garbage
    BadGateway(String),
    /// 503: the request was abandoned
    Unavailable(String),
    /// 504: the backend did not answer in time
    GatewayTimeout(String),
    /// 500
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::GatewayTimeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "success": false,
            "error": message,
            "code": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

impl From<NotebookError> for ApiError {
    fn from(err: NotebookError) -> Self {
        match err {
            NotebookError::Validation(_) | NotebookError::Config(_) => {
                warn!("Rejected request: {}", err);
                ApiError::BadRequest(err.to_string())
            }
            NotebookError::Timeout(_) => {
                warn!("Backend timed out: {}", err);
                ApiError::GatewayTimeout(err.to_string())
            }
            NotebookError::Cancelled(_) => ApiError::Unavailable(err.to_string()),
            e if e.is_upstream() => {
                error!("Backend failure: {}", e);
                ApiError::BadGateway(e.to_string())
            }
            e => {
                error!("NotebookError: {}", e);
                ApiError::Internal(e.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest(rejection.body_text())
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

/// `GET /api/v1/health`
pub async fn health_handler(State(state): State<ApiState>) -> ApiResult<HealthReport> {
    let cancel = CancellationToken::new();
    let report = with_deadline(
        state.request_timeout,
        &cancel,
        state.backend.health(cancel.clone()),
    )
    .await?;
    Ok(Json(report))
}

/// `GET /api/v1/documents/list?limit=N`
pub async fn list_documents_handler(
    State(state): State<ApiState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<DocumentListing> {
    let cancel = CancellationToken::new();
    let listing = with_deadline(
        state.request_timeout,
        &cancel,
        state.backend.list_documents(query.limit, cancel.clone()),
    )
    .await?;
    Ok(Json(listing))
}

/// `POST /api/v1/documents/index`
pub async fn index_handler(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<IndexRequest>, JsonRejection>,
) -> ApiResult<IndexReport> {
    let Json(request) = payload?;
    info!("Index request for '{}'", request.folder_path);
    let cancel = CancellationToken::new();
    let report = with_deadline(
        state.request_timeout,
        &cancel,
        state.backend.index_folder(request, cancel.clone()),
    )
    .await?;
    Ok(Json(report))
}

/// `POST /api/v1/chat/message`
pub async fn chat_handler(
    State(state): State<ApiState>,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<ChatAnswer> {
    let Json(request) = payload?;
    if request.stream {
        return Err(ApiError::BadRequest(
            "Streaming responses are not supported".to_string(),
        ));
    }
    let cancel = CancellationToken::new();
    let answer = with_deadline(
        state.request_timeout,
        &cancel,
        state.backend.chat(request, cancel.clone()),
    )
    .await?;
    Ok(Json(answer))
}
