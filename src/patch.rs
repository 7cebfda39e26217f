/// Per-file summary of a raw `git diff` patch: path plus addition/deletion
/// counts, in patch order. This is the only diff parsing the reconciler
/// needs; hunk-level structure stays with the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub path: String,
    pub additions: usize,
    pub deletions: usize,
}

/// Split a patch on `diff --git` headers and count changed lines per file.
/// `+++`/`---` file markers are not counted as changes.
pub fn parse_file_summaries(patch: &str) -> Vec<FileSummary> {
    let mut files: Vec<FileSummary> = Vec::new();

    for line in patch.lines() {
        if let Some(header) = line.strip_prefix("diff --git ") {
            files.push(FileSummary {
                path: header_path(header),
                additions: 0,
                deletions: 0,
            });
        } else if let Some(current) = files.last_mut() {
            if line.starts_with("+++") || line.starts_with("---") {
                continue;
            }
            if line.starts_with('+') {
                current.additions += 1;
            } else if line.starts_with('-') {
                current.deletions += 1;
            }
        }
    }

    files
}

/// Extract the b-side path from an `a/old b/new` header tail. Paths
/// containing spaces are not resolved exactly, matching `git diff`'s own
/// ambiguity in the unquoted header form.
fn header_path(header: &str) -> String {
    let b_side = header.split(' ').next_back().unwrap_or(header);
    b_side.strip_prefix("b/").unwrap_or(b_side).to_string()
}
