use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quiz::QuizResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRequest {
    #[serde(default)]
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub strict_mode: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushRequest {
    #[serde(default)]
    pub strict_mode: bool,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub fn new() -> Self {
        Self { ok: true }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestDiffResponse {
    pub unstaged_patch: String,
    pub staged_patch: String,
    pub updated_at: DateTime<Utc>,
    pub diff_hash: String,
}

#[derive(Debug, Serialize)]
pub struct QuizResultsResponse {
    pub results: Vec<QuizResult>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub result: QuizResult,
}
