use axum::extract::{Json, State};
use std::sync::Arc;
use tracing::error;

use crate::context::{AppContext, RepoContext};
use crate::error::AppError;
use crate::hash;
use crate::quiz::QuizResult;
use crate::server::types::{
    CommitRequest, LatestDiffResponse, OkResponse, PushRequest, QuizResultsResponse, StageRequest,
    SubmitQuizResponse,
};

/// GET /health
pub async fn health() -> Json<OkResponse> {
    Json(OkResponse::new())
}

/// GET /diffs/latest
pub async fn latest_diff(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<LatestDiffResponse>, AppError> {
    let repo = ctx.repo()?;
    let snapshot = repo.watcher.latest().await;
    let diff_hash = hash::diff_hash(&snapshot.combined());
    Ok(Json(LatestDiffResponse {
        unstaged_patch: snapshot.unstaged_patch,
        staged_patch: snapshot.staged_patch,
        updated_at: snapshot.updated_at,
        diff_hash,
    }))
}

fn required_file_path(req: StageRequest) -> Result<String, AppError> {
    req.file_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("filePath is required".to_string()))
}

fn git_error(err: anyhow::Error) -> AppError {
    error!("git operation failed: {err:#}");
    AppError::Git(format!("{err:#}"))
}

/// POST /git/stage
pub async fn stage(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<StageRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let repo = ctx.repo()?;
    let file_path = required_file_path(req)?;
    repo.git.stage_file(&file_path).await.map_err(git_error)?;
    repo.watcher.trigger_refresh().await;
    Ok(Json(OkResponse::new()))
}

/// POST /git/unstage
pub async fn unstage(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<StageRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let repo = ctx.repo()?;
    let file_path = required_file_path(req)?;
    repo.git.unstage_file(&file_path).await.map_err(git_error)?;
    repo.watcher.trigger_refresh().await;
    Ok(Json(OkResponse::new()))
}

/// Strict mode: the current snapshot's fingerprint must match a stored quiz
/// record. The store is re-read at decision time; a cached copy could admit
/// a commit against stale validation history.
async fn check_gate(repo: &RepoContext) -> Result<(), AppError> {
    let snapshot = repo.watcher.latest().await;
    let fingerprint = hash::diff_hash(&snapshot.combined());
    if repo.quiz.is_satisfied(&fingerprint)? {
        Ok(())
    } else {
        Err(AppError::GateViolation)
    }
}

/// POST /git/commit
pub async fn commit(
    State(ctx): State<Arc<AppContext>>,
    Json(req): Json<CommitRequest>,
) -> Result<Json<OkResponse>, AppError> {
    let repo = ctx.repo()?;
    let message = req
        .message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| AppError::Validation("Commit message is required".to_string()))?;

    if req.strict_mode {
        check_gate(repo).await?;
    }
    repo.git.commit(&message).await.map_err(git_error)?;
    repo.watcher.trigger_refresh().await;
    Ok(Json(OkResponse::new()))
}

/// POST /git/push
pub async fn push(
    State(ctx): State<Arc<AppContext>>,
    body: Option<Json<PushRequest>>,
) -> Result<Json<OkResponse>, AppError> {
    let repo = ctx.repo()?;
    let strict_mode = body.map(|Json(b)| b.strict_mode).unwrap_or(false);

    if strict_mode {
        check_gate(repo).await?;
    }
    repo.git.push().await.map_err(git_error)?;
    Ok(Json(OkResponse::new()))
}

/// POST /git/stash
pub async fn stash(State(ctx): State<Arc<AppContext>>) -> Result<Json<OkResponse>, AppError> {
    let repo = ctx.repo()?;
    repo.git.stash().await.map_err(git_error)?;
    repo.watcher.trigger_refresh().await;
    Ok(Json(OkResponse::new()))
}

/// Quiz routes report a missing repository as a 400, not a 503.
fn selected_repo(ctx: &AppContext) -> Result<&RepoContext, AppError> {
    ctx.repo
        .as_ref()
        .ok_or_else(|| AppError::Validation("Repo not selected".to_string()))
}

/// GET /quiz/results
pub async fn quiz_results(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<QuizResultsResponse>, AppError> {
    let repo = selected_repo(&ctx)?;
    let results = repo.quiz.read()?;
    Ok(Json(QuizResultsResponse { results }))
}

/// POST /quiz/results
///
/// The payload is decoded manually so a malformed result is a 400 validation
/// error rather than a generic body rejection.
pub async fn submit_quiz_result(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SubmitQuizResponse>, AppError> {
    let repo = selected_repo(&ctx)?;
    let result = body
        .get("result")
        .cloned()
        .ok_or_else(|| AppError::Validation("result is required".to_string()))?;
    let result: QuizResult = serde_json::from_value(result)
        .map_err(|e| AppError::Validation(format!("invalid quiz result: {e}")))?;

    let stored = repo.quiz.append(result)?;
    Ok(Json(SubmitQuizResponse { result: stored }))
}
