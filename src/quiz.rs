use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const STORE_DIR: &str = ".diffgate";
const STORE_FILE: &str = "quiz_results.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_index: Option<u32>,
}

/// One completed validation run, bound at creation time to the fingerprint
/// of the diff the quiz was generated against.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    /// Time-derived identifier supplied by the client (epoch milliseconds).
    pub id: u64,
    pub score: u32,
    pub total: u32,
    pub answered: u32,
    pub completed_at: DateTime<Utc>,
    pub questions: Vec<QuizQuestion>,
    /// Chosen option index per question id; None for unanswered.
    pub answers: HashMap<String, Option<u32>>,
    pub diff_hash: String,
}

/// Append-only audit log of validation records, one JSON file per
/// repository, newest first. Records are never mutated or deleted.
pub struct QuizStore {
    repo_path: PathBuf,
}

impl QuizStore {
    pub fn new(repo_path: &Path) -> Self {
        Self {
            repo_path: repo_path.to_path_buf(),
        }
    }

    fn store_dir(&self) -> PathBuf {
        self.repo_path.join(STORE_DIR)
    }

    fn store_file(&self) -> PathBuf {
        self.store_dir().join(STORE_FILE)
    }

    /// Read the full record sequence. A store that does not exist yet is an
    /// empty sequence, not an error; any other failure propagates.
    pub fn read(&self) -> Result<Vec<QuizResult>, AppError> {
        let path = self.store_file();
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Persistence(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_str(&data).map_err(|e| {
            AppError::Persistence(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// Prepend `result` to the persisted sequence, creating the store
    /// location on first write.
    pub fn append(&self, result: QuizResult) -> Result<QuizResult, AppError> {
        fs::create_dir_all(self.store_dir()).map_err(|e| {
            AppError::Persistence(format!("failed to create store directory: {e}"))
        })?;
        ensure_gitignore(&self.repo_path);

        let mut records = self.read()?;
        records.insert(0, result.clone());

        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| AppError::Persistence(format!("failed to encode records: {e}")))?;
        fs::write(self.store_file(), json).map_err(|e| {
            AppError::Persistence(format!(
                "failed to write {}: {e}",
                self.store_file().display()
            ))
        })?;
        Ok(result)
    }

    /// True iff any stored record was taken against `fingerprint`. Re-reads
    /// the store so a gate decision never runs against cached history.
    pub fn is_satisfied(&self, fingerprint: &str) -> Result<bool, AppError> {
        Ok(self.read()?.iter().any(|r| r.diff_hash == fingerprint))
    }
}

/// Ensure the store directory is listed in the repository's `.gitignore`.
fn ensure_gitignore(repo_path: &Path) {
    let gitignore_path = repo_path.join(".gitignore");
    let entry = format!("{STORE_DIR}/");

    if let Ok(contents) = fs::read_to_string(&gitignore_path) {
        if contents.lines().any(|line| line.trim() == entry) {
            return;
        }
        if let Ok(mut f) = fs::OpenOptions::new().append(true).open(&gitignore_path) {
            if !contents.ends_with('\n') {
                let _ = writeln!(f);
            }
            let _ = writeln!(f, "{entry}");
        }
    } else {
        let _ = fs::write(&gitignore_path, format!("{entry}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{combined_diff, diff_hash};
    use tempfile::TempDir;

    fn result_with(id: u64, diff_hash: &str) -> QuizResult {
        QuizResult {
            id,
            score: 2,
            total: 3,
            answered: 3,
            completed_at: Utc::now(),
            questions: vec![QuizQuestion {
                id: "q1".to_string(),
                prompt: "What does this change do?".to_string(),
                options: vec!["adds logging".to_string(), "removes logging".to_string()],
                answer_index: Some(0),
            }],
            answers: HashMap::from([("q1".to_string(), Some(0))]),
            diff_hash: diff_hash.to_string(),
        }
    }

    #[test]
    fn test_missing_store_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());
        assert!(store.read().unwrap().is_empty());
        assert!(!store.is_satisfied("anything").unwrap());
    }

    #[test]
    fn test_append_is_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());
        store.append(result_with(1, "hash-a")).unwrap();
        store.append(result_with(2, "hash-b")).unwrap();

        let records = store.read().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 2);
        assert_eq!(records[1].id, 1);
    }

    #[test]
    fn test_append_preserves_existing_records() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());
        store.append(result_with(1, "hash-a")).unwrap();
        store.append(result_with(2, "hash-b")).unwrap();
        store.append(result_with(3, "hash-c")).unwrap();

        let records = store.read().unwrap();
        let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, [3, 2, 1]);
        assert_eq!(records[2].diff_hash, "hash-a");
    }

    #[test]
    fn test_gate_matches_exact_fingerprint_only() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());

        let quizzed = diff_hash(&combined_diff("diff --git a/x b/x\n+1", ""));
        store.append(result_with(1, &quizzed)).unwrap();

        assert!(store.is_satisfied(&quizzed).unwrap());

        // One byte of further change after the quiz flips the gate.
        let drifted = diff_hash(&combined_diff("diff --git a/x b/x\n+2", ""));
        assert!(!store.is_satisfied(&drifted).unwrap());
    }

    #[test]
    fn test_no_changes_baseline_gates_like_any_other_diff() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());
        let baseline = diff_hash(&combined_diff("", ""));

        assert!(!store.is_satisfied(&baseline).unwrap());
        store.append(result_with(1, &baseline)).unwrap();
        assert!(store.is_satisfied(&baseline).unwrap());
    }

    #[test]
    fn test_corrupt_store_is_an_error_not_empty() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());
        fs::create_dir_all(dir.path().join(STORE_DIR)).unwrap();
        fs::write(dir.path().join(STORE_DIR).join(STORE_FILE), "not json").unwrap();

        assert!(matches!(store.read(), Err(AppError::Persistence(_))));
        assert!(matches!(
            store.is_satisfied("x"),
            Err(AppError::Persistence(_))
        ));
    }

    #[test]
    fn test_store_dir_added_to_gitignore() {
        let dir = TempDir::new().unwrap();
        let store = QuizStore::new(dir.path());
        store.append(result_with(1, "h")).unwrap();

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert!(gitignore.lines().any(|l| l == ".diffgate/"));

        // Appending again must not duplicate the entry.
        store.append(result_with(2, "h")).unwrap();
        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(
            gitignore.lines().filter(|l| *l == ".diffgate/").count(),
            1
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let json = serde_json::to_value(result_with(7, "abc")).unwrap();
        assert!(json.get("completedAt").is_some());
        assert!(json.get("diffHash").is_some());
        assert!(json.get("completed_at").is_none());
    }
}
