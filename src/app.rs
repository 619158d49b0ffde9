use crate::api::NewsApi;
use crate::controller::PageController;
use crate::handlers;
use axum::{routing::{get, post}, Router};
use std::sync::Arc;

pub struct AppState<A> {
    pub controller: Arc<PageController<A>>,
}

impl<A> AppState<A> {
    pub fn new(api: A) -> Self {
        Self::from_controller(Arc::new(PageController::new(api)))
    }

    pub fn from_controller(controller: Arc<PageController<A>>) -> Self {
        Self { controller }
    }
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
        }
    }
}

pub fn router<A: NewsApi>(state: AppState<A>) -> Router {
    Router::new()
        .route("/", get(handlers::index::<A>))
        .route("/fetch-news", post(handlers::fetch_news::<A>))
        .route("/search", post(handlers::search::<A>))
        .route("/ask", post(handlers::ask::<A>))
        .route("/api/stats", get(handlers::get_stats::<A>))
        .route("/api/state", get(handlers::get_state::<A>))
        .with_state(state)
}
