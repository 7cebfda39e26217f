use sha2::{Digest, Sha256};

/// Section markers for the combined diff representation. The quiz generator
/// and the commit gate must hash the exact same text, so this is the only
/// place the combined form is built.
const UNSTAGED_MARKER: &str = "--- UNSTAGED ---";
const STAGED_MARKER: &str = "--- STAGED ---";

/// Build the fixed combined representation of a snapshot's two patches.
/// Empty sections are rendered as `(none)` so the no-changes baseline still
/// produces a stable, well-defined fingerprint.
pub fn combined_diff(unstaged: &str, staged: &str) -> String {
    let unstaged = if unstaged.trim().is_empty() {
        "(none)"
    } else {
        unstaged
    };
    let staged = if staged.trim().is_empty() {
        "(none)"
    } else {
        staged
    };

    format!("{UNSTAGED_MARKER}\n{unstaged}\n\n{STAGED_MARKER}\n{staged}")
}

/// Deterministic fingerprint of a combined diff text: lowercase hex SHA-256
/// of the exact byte content.
pub fn diff_hash(combined: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(combined.as_bytes());
    format!("{:x}", hasher.finalize())
}
