use std::collections::BTreeSet;

use crate::patch::FileSummary;

/// One row of a displayed file list. `pending` is true while the placement
/// reflects optimistic intent not yet confirmed by a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayEntry {
    pub path: String,
    pub additions: usize,
    pub deletions: usize,
    pub pending: bool,
}

impl DisplayEntry {
    fn from_summary(file: &FileSummary, pending: bool) -> Self {
        Self {
            path: file.path.clone(),
            additions: file.additions,
            deletions: file.deletions,
            pending,
        }
    }
}

/// The two ordered lists the UI renders for one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLists {
    pub staged: Vec<DisplayEntry>,
    pub unstaged: Vec<DisplayEntry>,
}

/// Merges authoritative poll data with in-flight optimistic stage/unstage
/// intent, so a user action is visible immediately and the view converges to
/// the polled truth without flicker.
///
/// Per-path life cycle: authoritative (no intent) -> pending (action issued,
/// shown in the target column) -> authoritative again once a poll confirms
/// the move, or pruned if the path vanishes from both columns.
#[derive(Debug, Default)]
pub struct Reconciler {
    pending_stage: BTreeSet<String>,
    pending_unstage: BTreeSet<String>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record optimistic intent to stage `path`. A path is pending in at
    /// most one direction; the newer action wins.
    pub fn note_stage(&mut self, path: &str) {
        self.pending_unstage.remove(path);
        self.pending_stage.insert(path.to_string());
    }

    /// Record optimistic intent to unstage `path`.
    pub fn note_unstage(&mut self, path: &str) {
        self.pending_stage.remove(path);
        self.pending_unstage.insert(path.to_string());
    }

    pub fn pending_stage(&self) -> &BTreeSet<String> {
        &self.pending_stage
    }

    pub fn pending_unstage(&self) -> &BTreeSet<String> {
        &self.pending_unstage
    }

    /// Merge one poll's authoritative per-file lists with the pending sets
    /// and produce the two displayed lists.
    ///
    /// Pending entries are pruned when the poll already shows the path in
    /// the target column (move confirmed) or when the path has vanished from
    /// both columns (change reverted on disk). Surviving pending entries are
    /// shown in their target column, inserted at the lexicographic path
    /// position.
    pub fn reconcile(&mut self, staged: &[FileSummary], unstaged: &[FileSummary]) -> DisplayLists {
        let staged_paths: BTreeSet<&str> = staged.iter().map(|f| f.path.as_str()).collect();
        let unstaged_paths: BTreeSet<&str> = unstaged.iter().map(|f| f.path.as_str()).collect();

        self.pending_stage
            .retain(|p| !staged_paths.contains(p.as_str()) && unstaged_paths.contains(p.as_str()));
        self.pending_unstage
            .retain(|p| !unstaged_paths.contains(p.as_str()) && staged_paths.contains(p.as_str()));

        let staged_base: Vec<DisplayEntry> = staged
            .iter()
            .filter(|f| !self.pending_unstage.contains(&f.path))
            .map(|f| DisplayEntry::from_summary(f, false))
            .collect();
        let moved_in: Vec<DisplayEntry> = unstaged
            .iter()
            .filter(|f| self.pending_stage.contains(&f.path))
            .map(|f| DisplayEntry::from_summary(f, true))
            .collect();
        let staged_list = insert_by_path(staged_base, moved_in);

        let unstaged_base: Vec<DisplayEntry> = unstaged
            .iter()
            .filter(|f| !self.pending_stage.contains(&f.path))
            .map(|f| DisplayEntry::from_summary(f, false))
            .collect();
        let moved_out: Vec<DisplayEntry> = staged
            .iter()
            .filter(|f| self.pending_unstage.contains(&f.path))
            .map(|f| DisplayEntry::from_summary(f, true))
            .collect();
        let unstaged_list = insert_by_path(unstaged_base, moved_out);

        DisplayLists {
            staged: staged_list,
            unstaged: unstaged_list,
        }
    }
}

/// Insert moved entries into `base` at the position given by lexicographic
/// path comparison: before the first existing entry whose path sorts after
/// the moved one, appended otherwise.
fn insert_by_path(base: Vec<DisplayEntry>, moved: Vec<DisplayEntry>) -> Vec<DisplayEntry> {
    if moved.is_empty() {
        return base;
    }
    let mut ordered = base;
    let mut moved = moved;
    moved.sort_by(|a, b| a.path.cmp(&b.path));
    for entry in moved {
        match ordered.iter().position(|e| e.path > entry.path) {
            Some(i) => ordered.insert(i, entry),
            None => ordered.push(entry),
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str) -> FileSummary {
        FileSummary {
            path: path.to_string(),
            additions: 1,
            deletions: 0,
        }
    }

    fn paths(list: &[DisplayEntry]) -> Vec<&str> {
        list.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_no_pending_passes_lists_through() {
        let mut rec = Reconciler::new();
        let lists = rec.reconcile(&[file("s.rs")], &[file("u.rs")]);
        assert_eq!(paths(&lists.staged), ["s.rs"]);
        assert_eq!(paths(&lists.unstaged), ["u.rs"]);
        assert!(!lists.staged[0].pending);
    }

    #[test]
    fn test_optimistic_stage_is_visible_before_any_poll_confirms() {
        // Unstaged patch touches a.ts and b.ts; the user stages a.ts.
        let mut rec = Reconciler::new();
        rec.note_stage("a.ts");

        let lists = rec.reconcile(&[], &[file("a.ts"), file("b.ts")]);
        assert_eq!(paths(&lists.staged), ["a.ts"]);
        assert!(lists.staged[0].pending);
        assert_eq!(paths(&lists.unstaged), ["b.ts"]);
    }

    #[test]
    fn test_confirming_poll_prunes_pending_and_keeps_lists_stable() {
        let mut rec = Reconciler::new();
        rec.note_stage("a.ts");
        let before = rec.reconcile(&[], &[file("a.ts"), file("b.ts")]);

        // Next poll: git now reports a.ts staged, b.ts unstaged.
        let after = rec.reconcile(&[file("a.ts")], &[file("b.ts")]);
        assert!(rec.pending_stage().is_empty());
        assert_eq!(paths(&after.staged), paths(&before.staged));
        assert_eq!(paths(&after.unstaged), paths(&before.unstaged));
        assert!(!after.staged[0].pending);
    }

    #[test]
    fn test_optimistic_unstage_is_symmetric() {
        let mut rec = Reconciler::new();
        rec.note_unstage("s.rs");

        let lists = rec.reconcile(&[file("s.rs")], &[file("u.rs")]);
        assert!(lists.staged.is_empty());
        assert_eq!(paths(&lists.unstaged), ["s.rs", "u.rs"]);
        assert!(lists.unstaged[0].pending);

        let confirmed = rec.reconcile(&[], &[file("s.rs"), file("u.rs")]);
        assert!(rec.pending_unstage().is_empty());
        assert_eq!(paths(&confirmed.unstaged), ["s.rs", "u.rs"]);
    }

    #[test]
    fn test_reverted_path_is_pruned_from_pending() {
        let mut rec = Reconciler::new();
        rec.note_stage("gone.rs");

        // gone.rs no longer appears in either authoritative list.
        let lists = rec.reconcile(&[], &[file("other.rs")]);
        assert!(rec.pending_stage().is_empty());
        assert_eq!(paths(&lists.unstaged), ["other.rs"]);
        assert!(lists.staged.is_empty());
    }

    #[test]
    fn test_second_action_on_pending_path_switches_sets() {
        let mut rec = Reconciler::new();
        rec.note_stage("f.rs");
        rec.note_unstage("f.rs");
        assert!(rec.pending_stage().is_empty());
        assert_eq!(rec.pending_unstage().len(), 1);

        rec.note_stage("f.rs");
        assert_eq!(rec.pending_stage().len(), 1);
        assert!(rec.pending_unstage().is_empty());
    }

    #[test]
    fn test_moved_entry_inserted_at_lexicographic_position() {
        let mut rec = Reconciler::new();
        rec.note_stage("f.rs");
        let lists = rec.reconcile(&[file("a.rs"), file("m.rs")], &[file("f.rs")]);
        assert_eq!(paths(&lists.staged), ["a.rs", "f.rs", "m.rs"]);
    }

    #[test]
    fn test_moved_entry_appended_when_it_sorts_last() {
        let mut rec = Reconciler::new();
        rec.note_stage("z.rs");
        let lists = rec.reconcile(&[file("a.rs"), file("m.rs")], &[file("z.rs")]);
        assert_eq!(paths(&lists.staged), ["a.rs", "m.rs", "z.rs"]);
    }

    #[test]
    fn test_multiple_moves_keep_order_and_no_duplicates() {
        let mut rec = Reconciler::new();
        rec.note_stage("b.rs");
        rec.note_stage("d.rs");
        let lists = rec.reconcile(&[file("a.rs"), file("c.rs")], &[file("d.rs"), file("b.rs")]);
        assert_eq!(paths(&lists.staged), ["a.rs", "b.rs", "c.rs", "d.rs"]);
        assert!(lists.unstaged.is_empty());

        let mut seen = std::collections::BTreeSet::new();
        for entry in lists.staged.iter().chain(lists.unstaged.iter()) {
            assert!(seen.insert(&entry.path), "duplicate path {}", entry.path);
        }
    }

    #[test]
    fn test_reconciles_parsed_patch_texts() {
        // End to end over one poll payload: parse both patch texts, then
        // merge with a pending stage of b.txt.
        let unstaged_patch = "\
diff --git a/b.txt b/b.txt
+++ b/b.txt
+new line
diff --git a/d.txt b/d.txt
+++ b/d.txt
+another
";
        let staged_patch = "\
diff --git a/a.txt b/a.txt
+++ b/a.txt
+staged line
";
        let staged = crate::patch::parse_file_summaries(staged_patch);
        let unstaged = crate::patch::parse_file_summaries(unstaged_patch);

        let mut rec = Reconciler::new();
        rec.note_stage("b.txt");
        let lists = rec.reconcile(&staged, &unstaged);

        assert_eq!(paths(&lists.staged), ["a.txt", "b.txt"]);
        assert_eq!(paths(&lists.unstaged), ["d.txt"]);
        assert_eq!(lists.staged[1].additions, 1);
        assert!(lists.staged[1].pending);
    }

    #[test]
    fn test_partially_staged_path_confirmed_by_target_column() {
        // A path can legitimately appear in both columns (partial staging).
        // Once the target column shows it, the pending entry is done.
        let mut rec = Reconciler::new();
        rec.note_stage("p.rs");
        rec.reconcile(&[file("p.rs")], &[file("p.rs")]);
        assert!(rec.pending_stage().is_empty());
    }
}
