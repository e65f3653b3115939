use std::net::SocketAddr;

use axum::{
    routing::{any, get, post},
    Router,
};

use crate::{repository::FeedbackRepository, storage::Storage};

mod handlers;
mod models;

use handlers::{
    add_trailing_slash, create_feedback, delete_feedback, get_feedback, health, list_feedbacks,
    not_found, update_feedback,
};

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub repository: FeedbackRepository<S>,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(storage: S) -> Router {
    let state = AppState {
        repository: FeedbackRepository::new(storage),
        started_at: std::time::SystemTime::now(),
    };

    Router::new()
        .route("/health", get(health::<S>))
        .route("/feedback/", post(create_feedback::<S>))
        .route(
            "/feedback/:id",
            get(get_feedback::<S>)
                .put(update_feedback::<S>)
                .delete(delete_feedback::<S>),
        )
        .route("/feedbacks/", get(list_feedbacks::<S>))
        .route("/feedback", any(add_trailing_slash))
        .route("/feedbacks", any(add_trailing_slash))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let app = router(storage);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST service on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
