//! The history-carrying container.
//!
//! [`Tracked`] owns a value and a newest-first list of commits. Every
//! mutation goes through a diff against the current value, so the history
//! always holds what is needed to walk the value back.
//!
//! Undo scans past a leading run of undo commits, skipping the change sets
//! they already reverted, and reverts the first remaining one by appending a
//! new undo commit. Redo only collapses the most recent undo commit: it rolls
//! that commit back and removes it from the history.

use serde::{Deserialize, Serialize};
use tc_crypto::fingerprint;
use tc_diff::{diff, rolled_back, DiffResult, Patchable};
use tc_types::{ChangeSet, ChangeSetId, Commit};
use tracing::debug;

use crate::config::HistoryConfig;
use crate::error::{TrackedError, TrackedResult};

/// A value with linear, undoable history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tracked<V> {
    wrapped: V,
    /// Newest first.
    history: Vec<Commit>,
    #[serde(skip)]
    config: HistoryConfig,
}

impl<V: Patchable + Clone> Tracked<V> {
    /// Start tracking `wrapped` with an empty history.
    pub fn new(wrapped: V) -> Self {
        Self::with_config(wrapped, HistoryConfig::default())
    }

    pub fn with_config(wrapped: V, config: HistoryConfig) -> Self {
        Self {
            wrapped,
            history: Vec::new(),
            config,
        }
    }

    /// Rehydrate a container from a persisted value and history.
    pub fn from_parts(wrapped: V, history: Vec<Commit>) -> Self {
        Self {
            wrapped,
            history,
            config: HistoryConfig::default(),
        }
    }

    pub fn into_parts(self) -> (V, Vec<Commit>) {
        (self.wrapped, self.history)
    }

    /// The current value.
    pub fn wrapped(&self) -> &V {
        &self.wrapped
    }

    /// All commits, most recent first.
    pub fn history(&self) -> &[Commit] {
        &self.history
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Replace the config. A tighter limit applies from the next commit.
    pub fn set_config(&mut self, config: HistoryConfig) {
        self.config = config;
    }

    /// Edit a copy of the current value and commit the result.
    pub fn change<F>(&mut self, message: Option<&str>, operation: F) -> DiffResult<&Commit>
    where
        F: FnOnce(&mut V),
    {
        let mut new_value = self.wrapped.clone();
        operation(&mut new_value);
        self.set(new_value, message)
    }

    /// Commit `new_value` as the current value.
    pub fn set(&mut self, new_value: V, message: Option<&str>) -> DiffResult<&Commit> {
        self.commit(new_value, message, None)
    }

    /// Returns `true` if [`undo`](Self::undo) would succeed.
    pub fn can_undo(&self) -> bool {
        self.first_undoable().is_some()
    }

    /// Revert the most recent change set that has not been undone yet.
    ///
    /// Appends an undo commit and returns it. On error the value and history
    /// are unchanged.
    pub fn undo(&mut self) -> TrackedResult<&Commit> {
        let target = self.first_undoable().ok_or(TrackedError::NothingToUndo)?;
        let undone = target.set().id();
        let new_value = rolled_back(&self.wrapped, target.set().changes())?;

        debug!(changeset = %undone.short_id(), "undo");
        Ok(self.commit(new_value, None, Some(undone))?)
    }

    /// Returns `true` if the most recent commit is an undo.
    pub fn can_redo(&self) -> bool {
        self.history.first().is_some_and(Commit::is_undo)
    }

    /// Collapse the most recent undo commit.
    ///
    /// Rolls back the undo commit's own changes, removes it from the history
    /// and returns it. On error the value and history are unchanged.
    pub fn redo(&mut self) -> TrackedResult<Commit> {
        let top = self
            .history
            .first()
            .filter(|commit| commit.is_undo())
            .ok_or(TrackedError::NothingToRedo)?;
        let new_value = rolled_back(&self.wrapped, top.set().changes())?;

        self.wrapped = new_value;
        let collapsed = self.history.remove(0);
        debug!(changeset = %collapsed.set().id().short_id(), "redo");
        Ok(collapsed)
    }

    fn first_undoable(&self) -> Option<&Commit> {
        let undone: Vec<ChangeSetId> = self.history.iter().map_while(Commit::undo_of).collect();
        self.history
            .iter()
            .skip(undone.len())
            .find(|commit| !undone.contains(&commit.set().id()))
    }

    fn commit(
        &mut self,
        new_value: V,
        message: Option<&str>,
        undo_of: Option<ChangeSetId>,
    ) -> DiffResult<&Commit> {
        let changes = diff(&new_value, &self.wrapped)?;
        let base_hash = fingerprint(&self.wrapped)?;
        let set = ChangeSet::new(message.map(str::to_owned), base_hash, changes);

        debug!(
            changeset = %set.id().short_id(),
            changes = set.len(),
            base = %set.base_hash().short_hex(),
            undo = undo_of.is_some(),
            "commit"
        );

        self.wrapped = new_value;
        self.history.insert(0, Commit::new(set, undo_of));
        self.enforce_limit();
        Ok(&self.history[0])
    }

    fn enforce_limit(&mut self) {
        let Some(limit) = self.config.max_entries else {
            return;
        };
        let limit = limit.max(1);
        if self.history.len() > limit {
            debug!(
                dropped = self.history.len() - limit,
                kept = limit,
                "truncating history"
            );
            self.history.truncate(limit);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use tc_diff::PatchError;
    use tc_types::{Change, Fingerprint};

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: i32,
    }

    tc_diff::diffable_record!(Counter { count });

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Board {
        title: String,
        cards: Vec<String>,
    }

    tc_diff::diffable_record!(Board { title, cards });

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Gauge {
        reading: f64,
        alias: Option<Option<String>>,
    }

    tc_diff::diffable_record!(Gauge { reading, alias });

    fn counter(count: i32) -> Counter {
        Counter { count }
    }

    /// Tracked counter after committing each of `values` in turn.
    fn counted(values: &[i32]) -> Tracked<Counter> {
        let mut tracked = Tracked::new(counter(0));
        for &value in values {
            tracked.set(counter(value), None).unwrap();
        }
        tracked
    }

    #[test]
    fn set_records_changes_and_base_hash() {
        init_tracing();
        let mut tracked = Tracked::new(counter(0));
        let commit = tracked.set(counter(1), Some("increment")).unwrap().clone();

        assert_eq!(commit.set().message(), Some("increment"));
        assert_eq!(commit.set().changes(), &[Change::set(["count"], json!(0))]);
        assert_eq!(
            commit.set().base_hash(),
            "b6589fc6ab0dc82cf12099d1c2d40ab994e8410c"
        );
        assert!(!commit.is_undo());
        assert_eq!(tracked.wrapped(), &counter(1));
        assert_eq!(tracked.history(), &[commit]);
    }

    #[test]
    fn change_applies_operation_to_copy() {
        let mut tracked = Tracked::new(Board::default());
        tracked
            .change(Some("add card"), |board| board.cards.push("todo".into()))
            .unwrap();

        assert_eq!(tracked.wrapped().cards, vec!["todo"]);
        assert_eq!(tracked.history().len(), 1);
        assert_eq!(tracked.history()[0].set().message(), Some("add card"));
    }

    #[test]
    fn undo_redo_round_trip() {
        init_tracing();
        let mut tracked = counted(&[1]);

        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(0));
        assert!(tracked.can_redo());

        tracked.redo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(1));
        assert!(!tracked.can_redo());
        assert!(tracked.can_undo());
    }

    #[test]
    fn empty_history_has_nothing_to_undo_or_redo() {
        let mut tracked = Tracked::new(counter(0));
        assert!(!tracked.can_undo());
        assert!(!tracked.can_redo());
        assert_eq!(tracked.undo().err(), Some(TrackedError::NothingToUndo));
        assert_eq!(tracked.redo().err(), Some(TrackedError::NothingToRedo));
    }

    #[test]
    fn redo_requires_undo_on_top() {
        let mut tracked = counted(&[1]);
        assert!(!tracked.can_redo());
        assert_eq!(tracked.redo().err(), Some(TrackedError::NothingToRedo));
        assert_eq!(tracked.wrapped(), &counter(1));
    }

    #[test]
    fn undo_commit_references_reverted_change_set() {
        let mut tracked = counted(&[1]);
        let reverted = tracked.history()[0].set().id();

        let undo = tracked.undo().unwrap();
        assert_eq!(undo.undo_of(), Some(reverted));
        assert_eq!(undo.set().base_hash(), "356a192b7913b04c54574d18c28d46e6395428ab");
        assert_eq!(tracked.history().len(), 2);
    }

    #[test]
    fn repeated_undo_walks_back() {
        let mut tracked = counted(&[1, 2, 3]);

        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(2));
        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(1));
        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(0));

        assert!(!tracked.can_undo());
        assert_eq!(tracked.undo().err(), Some(TrackedError::NothingToUndo));
        assert_eq!(tracked.history().len(), 6);
    }

    #[test]
    fn redo_unwinds_one_undo_at_a_time() {
        let mut tracked = counted(&[1, 2, 3]);
        tracked.undo().unwrap();
        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(1));

        let collapsed = tracked.redo().unwrap();
        assert!(collapsed.is_undo());
        assert_eq!(tracked.wrapped(), &counter(2));
        assert!(tracked.can_redo());

        tracked.redo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(3));
        assert!(!tracked.can_redo());
        assert_eq!(tracked.history().len(), 3);
    }

    #[test]
    fn undo_after_redo_continues_from_remaining_history() {
        let mut tracked = counted(&[1, 2, 3]);
        tracked.undo().unwrap();
        tracked.undo().unwrap();
        tracked.redo().unwrap();

        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(1));
    }

    #[test]
    fn new_change_after_undo_disables_redo() {
        let mut tracked = counted(&[1]);
        tracked.undo().unwrap();
        tracked.set(counter(5), None).unwrap();

        assert!(!tracked.can_redo());
        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(0));
    }

    #[test]
    fn undo_restores_collection_edits() {
        let mut tracked = Tracked::new(Board {
            title: "Sprint".into(),
            cards: vec!["a".into(), "b".into(), "c".into()],
        });
        tracked
            .change(None, |board| {
                board.cards.remove(0);
                board.cards.push("d".into());
                board.title = "Sprint 2".into();
            })
            .unwrap();

        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped().cards, vec!["a", "b", "c"]);
        assert_eq!(tracked.wrapped().title, "Sprint");

        tracked.redo().unwrap();
        assert_eq!(tracked.wrapped().cards, vec!["b", "c", "d"]);
    }

    #[test]
    fn every_commit_prepends_one_entry() {
        let mut tracked = Tracked::new(counter(0));
        for expected in 1..=3 {
            tracked.set(counter(expected as i32), None).unwrap();
            assert_eq!(tracked.history().len(), expected);
        }
        tracked.undo().unwrap();
        assert_eq!(tracked.history().len(), 4);
        tracked.redo().unwrap();
        assert_eq!(tracked.history().len(), 3);
    }

    #[test]
    fn unchanged_value_still_commits() {
        let mut tracked = counted(&[1]);
        let commit = tracked.set(counter(1), None).unwrap();
        assert!(commit.set().is_empty());
        assert_eq!(tracked.history().len(), 2);
    }

    #[test]
    fn failed_undo_leaves_state_untouched() {
        let bogus = Commit::new(
            ChangeSet::new(
                None,
                Fingerprint::from_digest([0; Fingerprint::LEN]),
                vec![Change::insert(["count"], 0)],
            ),
            None,
        );
        let mut tracked = Tracked::from_parts(counter(7), vec![bogus.clone()]);

        let err = tracked.undo().unwrap_err();
        assert!(matches!(
            err,
            TrackedError::Patch(PatchError::InvalidAction { .. })
        ));
        assert_eq!(tracked.wrapped(), &counter(7));
        assert_eq!(tracked.history(), &[bogus]);
    }

    #[test]
    fn history_limit_drops_oldest() {
        init_tracing();
        let mut tracked = Tracked::with_config(counter(0), HistoryConfig::bounded(2));
        for value in 1..=3 {
            tracked.set(counter(value), None).unwrap();
        }

        assert_eq!(tracked.history().len(), 2);
        assert_eq!(
            tracked.history()[1].set().base_hash(),
            "356a192b7913b04c54574d18c28d46e6395428ab"
        );

        // The undo commit pushes the 1 -> 2 change set out of the history.
        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &counter(2));
        assert_eq!(tracked.history().len(), 2);
        assert!(!tracked.can_undo());
    }

    #[test]
    fn serde_roundtrip_preserves_value_and_history() {
        let mut tracked = counted(&[1, 2]);
        tracked.undo().unwrap();

        let json = serde_json::to_string(&tracked).unwrap();
        let restored: Tracked<Counter> = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.wrapped(), tracked.wrapped());
        assert_eq!(restored.history(), tracked.history());
        assert!(restored.can_redo());
    }

    #[test]
    fn parts_roundtrip() {
        let tracked = counted(&[4]);
        let history = tracked.history().to_vec();
        let (wrapped, parts_history) = tracked.into_parts();

        assert_eq!(wrapped, counter(4));
        assert_eq!(parts_history, history);

        let mut rehydrated = Tracked::from_parts(wrapped, parts_history);
        rehydrated.undo().unwrap();
        assert_eq!(rehydrated.wrapped(), &counter(0));
    }

    #[test]
    fn non_finite_reading_is_never_committed() {
        let start = Gauge {
            reading: f64::INFINITY,
            alias: None,
        };
        let mut tracked = Tracked::new(start.clone());

        let err = tracked
            .set(
                Gauge {
                    reading: 2.0,
                    ..start.clone()
                },
                None,
            )
            .unwrap_err();
        assert!(matches!(err, tc_diff::DiffError::Snapshot(_)));
        assert_eq!(tracked.wrapped(), &start);
        assert!(tracked.history().is_empty());
        assert!(!tracked.can_undo());
    }

    #[test]
    fn undo_restores_inner_none_of_nested_option() {
        let start = Gauge {
            reading: 1.0,
            alias: Some(None),
        };
        let mut tracked = Tracked::new(start.clone());
        tracked.change(None, |g| g.alias = None).unwrap();

        tracked.undo().unwrap();
        assert_eq!(tracked.wrapped(), &start);

        tracked.redo().unwrap();
        assert_eq!(tracked.wrapped().alias, None);
    }
}
