use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};

use crate::{
    repository::FeedbackRepository,
    storage::Storage,
    types::{FeedbackError, FeedbackId, Score},
};

use super::{
    models::{
        CreateFeedbackRequest, DeletedResponse, ErrorResponse, FeedbackResponse, FieldError,
        HealthResponse, UpdateFeedbackRequest, ValidationErrorResponse,
    },
    AppState,
};

pub const FEEDBACK_NOT_FOUND: &str = "Feedback not found";
pub const FEEDBACK_DELETED: &str = "Feedback deleted successfully";

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn create_feedback<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    payload: Result<Json<CreateFeedbackRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return body_rejected(rejection),
    };
    let score = match Score::try_from(request.score) {
        Ok(score) => score,
        Err(err) => return invalid_score(err),
    };

    log::debug!("POST /feedback/ score={}", score);
    match with_repository(&state, move |repo| repo.create(score)).await {
        Ok(feedback) => Json(FeedbackResponse::from(feedback)).into_response(),
        Err(err) => storage_fault("create feedback", err),
    }
}

pub async fn get_feedback<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    id: Result<Path<FeedbackId>, PathRejection>,
) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return path_rejected(rejection),
    };

    log::debug!("GET /feedback/{}", id);
    match with_repository(&state, move |repo| repo.get(id)).await {
        Ok(Some(feedback)) => Json(FeedbackResponse::from(feedback)).into_response(),
        Ok(None) => feedback_not_found(),
        Err(err) => storage_fault("load feedback", err),
    }
}

pub async fn list_feedbacks<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> Response {
    log::debug!("GET /feedbacks/");
    match with_repository(&state, |repo| repo.get_all()).await {
        Ok(feedbacks) => {
            let feedbacks: Vec<FeedbackResponse> =
                feedbacks.into_iter().map(FeedbackResponse::from).collect();
            Json(feedbacks).into_response()
        }
        Err(err) => storage_fault("list feedbacks", err),
    }
}

pub async fn update_feedback<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    id: Result<Path<FeedbackId>, PathRejection>,
    payload: Result<Json<UpdateFeedbackRequest>, JsonRejection>,
) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return path_rejected(rejection),
    };
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return body_rejected(rejection),
    };
    let score = match request.score.map(Score::try_from).transpose() {
        Ok(score) => score,
        Err(err) => return invalid_score(err),
    };

    log::debug!("PUT /feedback/{} score={:?}", id, score);
    match with_repository(&state, move |repo| repo.update(id, score)).await {
        Ok(Some(feedback)) => Json(FeedbackResponse::from(feedback)).into_response(),
        Ok(None) => feedback_not_found(),
        Err(err) => storage_fault("update feedback", err),
    }
}

pub async fn delete_feedback<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    id: Result<Path<FeedbackId>, PathRejection>,
) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return path_rejected(rejection),
    };

    log::debug!("DELETE /feedback/{}", id);
    match with_repository(&state, move |repo| repo.delete(id)).await {
        Ok(true) => Json(DeletedResponse {
            message: FEEDBACK_DELETED.to_string(),
        })
        .into_response(),
        Ok(false) => feedback_not_found(),
        Err(err) => storage_fault("delete feedback", err),
    }
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: "Not Found".to_string(),
        }),
    )
}

/// Sends slashless collection paths to their canonical `/`-terminated route.
pub async fn add_trailing_slash(uri: Uri) -> Redirect {
    let target = match uri.query() {
        Some(query) => format!("{}/?{}", uri.path(), query),
        None => format!("{}/", uri.path()),
    };
    Redirect::temporary(&target)
}

/// Runs a repository call on the blocking pool; SQLite access is synchronous.
async fn with_repository<S, T, F>(state: &AppState<S>, op: F) -> anyhow::Result<T>
where
    S: Storage + Clone + Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&FeedbackRepository<S>) -> anyhow::Result<T> + Send + 'static,
{
    let repository = state.repository.clone();
    tokio::task::spawn_blocking(move || op(&repository)).await?
}

fn feedback_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            detail: FEEDBACK_NOT_FOUND.to_string(),
        }),
    )
        .into_response()
}

fn validation_error(status: StatusCode, loc: &[&str], msg: String) -> Response {
    (
        status,
        Json(ValidationErrorResponse {
            detail: vec![FieldError {
                loc: loc.iter().map(|part| part.to_string()).collect(),
                msg,
            }],
        }),
    )
        .into_response()
}

fn invalid_score(err: FeedbackError) -> Response {
    log::warn!("Rejected feedback payload: {}", err);
    validation_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        &["body", "score"],
        err.to_string(),
    )
}

fn body_rejected(rejection: JsonRejection) -> Response {
    log::warn!("Rejected request body: {}", rejection.body_text());
    let status = match &rejection {
        JsonRejection::MissingJsonContentType(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => rejection.status(),
    };
    validation_error(status, &["body"], rejection.body_text())
}

fn path_rejected(rejection: PathRejection) -> Response {
    log::warn!("Rejected feedback id: {}", rejection.body_text());
    validation_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        &["path", "feedback_id"],
        rejection.body_text(),
    )
}

fn storage_fault(action: &str, err: anyhow::Error) -> Response {
    log::error!("Failed to {}: {:?}", action, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: "Internal server error".to_string(),
        }),
    )
        .into_response()
}
