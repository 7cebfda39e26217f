use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::context::AppContext;
use crate::server::handlers::{
    commit, health, latest_diff, push, quiz_results, stage, stash, submit_quiz_result, unstage,
};

pub fn routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/health", get(health))
        .route("/diffs/latest", get(latest_diff))
        .route("/git/stage", post(stage))
        .route("/git/unstage", post(unstage))
        .route("/git/commit", post(commit))
        .route("/git/push", post(push))
        .route("/git/stash", post(stash))
        .route("/quiz/results", get(quiz_results).post(submit_quiz_result))
}
