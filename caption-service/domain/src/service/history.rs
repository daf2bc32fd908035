use std::sync::Arc;

use uuid::Uuid;

use crate::{
    DomainError, HistoryEntrySummary, HistoryMetadata, HistoryState, HistoryStats,
    SubtitleSegment, SubtitleStyle,
};

pub const DEFAULT_GROUPABLE_ACTIONS: [&str; 5] = [
    "text-edit",
    "style-change",
    "position-drag",
    "slider-change",
    "color-pick",
];

pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryConfig {
    pub max_history_size: usize,
    pub grouping_delay_ms: u64,
    pub enable_grouping: bool,
    pub groupable_actions: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_history_size: 50,
            grouping_delay_ms: 1_000,
            enable_grouping: true,
            groupable_actions: DEFAULT_GROUPABLE_ACTIONS
                .iter()
                .map(|action| action.to_string())
                .collect(),
        }
    }
}

impl HistoryConfig {
    fn is_groupable(&self, action: &str) -> bool {
        self.groupable_actions.iter().any(|candidate| candidate == action)
    }
}

/// Linear undo/redo over `(segments, style)` snapshots.
///
/// Rapid edits of the same groupable kind collapse into the current entry
/// while the grouping window is open. The window is measured from the last
/// write and closes on any navigation.
pub struct HistoryManager {
    config: HistoryConfig,
    clock: Arc<dyn Clock>,
    entries: Vec<HistoryState>,
    current_index: Option<usize>,
    last_write_ms: Option<i64>,
}

impl HistoryManager {
    pub fn new(config: HistoryConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(mut config: HistoryConfig, clock: Arc<dyn Clock>) -> Self {
        config.max_history_size = config.max_history_size.max(1);
        Self {
            config,
            clock,
            entries: Vec::new(),
            current_index: None,
            last_write_ms: None,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Records a snapshot. Segments and style are copied, so later changes to
    /// the live editor model never reach stored entries.
    pub fn save_state(
        &mut self,
        segments: &[SubtitleSegment],
        style: &SubtitleStyle,
        description: impl Into<String>,
        metadata: Option<HistoryMetadata>,
    ) -> &HistoryState {
        let now = self.clock.now_ms();
        let state = HistoryState {
            id: Uuid::new_v4().to_string(),
            timestamp: now,
            description: description.into(),
            segments: segments.to_vec(),
            style: style.clone(),
            metadata,
        };
        let grouped_index = self
            .current_index
            .filter(|_| self.should_group(&state, now));
        self.last_write_ms = Some(now);

        if let Some(index) = grouped_index {
            tracing::trace!(
                index,
                action = state.action().unwrap_or_default(),
                "grouped history write"
            );
            self.entries[index] = state;
            return &self.entries[index];
        }

        let next = self.current_index.map_or(0, |index| index + 1);
        self.entries.truncate(next);
        self.entries.push(state);
        let mut index = next;

        if self.entries.len() > self.config.max_history_size {
            self.entries.remove(0);
            index -= 1;
        }
        self.current_index = Some(index);

        tracing::debug!(
            index,
            total_states = self.entries.len(),
            description = %self.entries[index].description,
            "history state saved"
        );
        &self.entries[index]
    }

    pub fn undo(&mut self) -> Option<&HistoryState> {
        match self.current_index {
            Some(index) if index > 0 => {
                self.current_index = Some(index - 1);
                self.last_write_ms = None;
                self.entries.get(index - 1)
            }
            _ => {
                tracing::debug!("nothing to undo");
                None
            }
        }
    }

    pub fn redo(&mut self) -> Option<&HistoryState> {
        match self.current_index {
            Some(index) if index + 1 < self.entries.len() => {
                self.current_index = Some(index + 1);
                self.last_write_ms = None;
                self.entries.get(index + 1)
            }
            _ => {
                tracing::debug!("nothing to redo");
                None
            }
        }
    }

    pub fn go_to_state(&mut self, id: &str) -> Result<&HistoryState, DomainError> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| DomainError::not_found("history state", id))?;
        self.current_index = Some(index);
        self.last_write_ms = None;
        Ok(&self.entries[index])
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.current_index = None;
        self.last_write_ms = None;
    }

    pub fn current(&self) -> Option<&HistoryState> {
        self.current_index.and_then(|index| self.entries.get(index))
    }

    pub fn entries(&self) -> &[HistoryState] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        self.current_index.is_some_and(|index| index > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current_index
            .is_some_and(|index| index + 1 < self.entries.len())
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            total_states: self.entries.len(),
            current_index: self.current_index.map_or(-1, |index| index as isize),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    pub fn timeline(&self) -> Vec<HistoryEntrySummary> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| HistoryEntrySummary {
                id: entry.id.clone(),
                timestamp: entry.timestamp,
                description: entry.description.clone(),
                action: entry.action().map(str::to_string),
                is_current: Some(index) == self.current_index,
            })
            .collect()
    }

    fn should_group(&self, state: &HistoryState, now: i64) -> bool {
        if !self.config.enable_grouping {
            return false;
        }
        let Some(action) = state.action() else {
            return false;
        };
        if !self.config.is_groupable(action) {
            return false;
        }
        if self.current().and_then(HistoryState::action) != Some(action) {
            return false;
        }
        let delay_ms = i64::try_from(self.config.grouping_delay_ms).unwrap_or(i64::MAX);
        self.last_write_ms
            .is_some_and(|last| now.saturating_sub(last) < delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};

    use super::*;
    use crate::Subtitle;

    #[derive(Default)]
    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn manager(config: HistoryConfig) -> (HistoryManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (HistoryManager::with_clock(config, clock.clone()), clock)
    }

    fn segments(text: &str) -> Vec<SubtitleSegment> {
        vec![SubtitleSegment::from(Subtitle {
            id: "c0".to_string(),
            text: text.to_string(),
            start: 0.0,
            end: 1.0,
            words: None,
        })]
    }

    fn save(history: &mut HistoryManager, text: &str, action: Option<&str>) -> String {
        history
            .save_state(
                &segments(text),
                &SubtitleStyle::default(),
                text,
                action.map(HistoryMetadata::new),
            )
            .id
            .clone()
    }

    #[test]
    fn empty_history_reports_nothing_to_do() {
        let (mut history, _) = manager(HistoryConfig::default());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(
            history.stats(),
            HistoryStats {
                total_states: 0,
                current_index: -1,
                can_undo: false,
                can_redo: false,
            }
        );
    }

    #[test]
    fn undo_and_redo_round_trip() {
        let (mut history, clock) = manager(HistoryConfig::default());
        save(&mut history, "A", None);
        clock.advance(10);
        save(&mut history, "B", None);

        let undone = history.undo().expect("can undo");
        assert_eq!(undone.segments, segments("A"));
        let redone = history.redo().expect("can redo");
        assert_eq!(redone.segments, segments("B"));
        assert!(history.redo().is_none());
    }

    #[test]
    fn new_edit_after_undo_discards_redo_branch() {
        let (mut history, clock) = manager(HistoryConfig::default());
        save(&mut history, "A", None);
        save(&mut history, "B", None);
        history.undo().expect("can undo");
        clock.advance(5);
        save(&mut history, "C", None);

        assert!(history.redo().is_none());
        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.current().map(|s| s.description.as_str()), Some("C"));
    }

    #[test]
    fn same_action_within_window_is_grouped() {
        let (mut history, clock) = manager(HistoryConfig::default());
        save(&mut history, "base", None);
        save(&mut history, "size 20", Some("slider-change"));
        clock.advance(200);
        save(&mut history, "size 24", Some("slider-change"));

        assert_eq!(history.entries().len(), 2);
        let current = history.current().expect("current");
        assert_eq!(current.description, "size 24");
        assert_eq!(current.segments, segments("size 24"));
    }

    #[test]
    fn grouping_window_slides_with_each_write() {
        let (mut history, clock) = manager(HistoryConfig::default());
        save(&mut history, "drag 1", Some("position-drag"));
        for step in 2..=5 {
            clock.advance(800);
            save(&mut history, &format!("drag {step}"), Some("position-drag"));
        }
        assert_eq!(history.entries().len(), 1);

        clock.advance(1_000);
        save(&mut history, "drag 6", Some("position-drag"));
        assert_eq!(history.entries().len(), 2);
    }

    #[test]
    fn different_or_ungroupable_actions_append() {
        let (mut history, clock) = manager(HistoryConfig::default());
        save(&mut history, "a", Some("slider-change"));
        clock.advance(10);
        save(&mut history, "b", Some("color-pick"));
        clock.advance(10);
        save(&mut history, "c", Some("delete-segment"));
        clock.advance(10);
        save(&mut history, "d", Some("delete-segment"));
        assert_eq!(history.entries().len(), 4);
    }

    #[test]
    fn oversized_grouping_delay_keeps_the_window_open() {
        let config = HistoryConfig {
            grouping_delay_ms: u64::MAX,
            ..HistoryConfig::default()
        };
        let (mut history, clock) = manager(config);
        save(&mut history, "size 20", Some("slider-change"));
        clock.advance(86_400_000);
        save(&mut history, "size 24", Some("slider-change"));

        assert_eq!(history.entries().len(), 1);
        assert_eq!(
            history.current().map(|s| s.description.as_str()),
            Some("size 24")
        );
    }

    #[test]
    fn grouping_can_be_disabled() {
        let config = HistoryConfig {
            enable_grouping: false,
            ..HistoryConfig::default()
        };
        let (mut history, _) = manager(config);
        save(&mut history, "a", Some("text-edit"));
        save(&mut history, "b", Some("text-edit"));
        assert_eq!(history.entries().len(), 2);
    }

    #[test]
    fn undo_closes_the_grouping_window() {
        let (mut history, clock) = manager(HistoryConfig::default());
        save(&mut history, "typed a", Some("text-edit"));
        clock.advance(10);
        save(&mut history, "bold", Some("style-change"));
        history.undo().expect("can undo");
        clock.advance(10);
        save(&mut history, "typed b", Some("text-edit"));

        assert_eq!(history.entries().len(), 2);
        assert_eq!(history.entries()[0].description, "typed a");
        assert_eq!(history.entries()[1].description, "typed b");
    }

    #[test]
    fn oldest_entries_are_evicted_past_the_bound() {
        let config = HistoryConfig {
            max_history_size: 10,
            ..HistoryConfig::default()
        };
        let (mut history, clock) = manager(config);
        for step in 0..15 {
            clock.advance(5_000);
            save(&mut history, &format!("state {step}"), None);
        }

        assert_eq!(history.entries().len(), 10);
        assert_eq!(history.entries()[0].description, "state 5");
        assert_eq!(history.entries()[9].description, "state 14");
        assert_eq!(history.stats().current_index, 9);
    }

    #[test]
    fn go_to_state_jumps_and_rejects_unknown_ids() {
        let (mut history, _) = manager(HistoryConfig::default());
        let first = save(&mut history, "A", None);
        save(&mut history, "B", None);
        save(&mut history, "C", None);

        let state = history.go_to_state(&first).expect("known id");
        assert_eq!(state.description, "A");
        assert!(history.can_redo());
        assert!(!history.can_undo());

        let error = history.go_to_state("missing").expect_err("unknown id");
        assert!(matches!(error, DomainError::NotFound { .. }));
    }

    #[test]
    fn clear_resets_everything() {
        let (mut history, _) = manager(HistoryConfig::default());
        save(&mut history, "A", Some("text-edit"));
        history.clear();
        assert!(history.entries().is_empty());
        assert!(history.current().is_none());
        save(&mut history, "B", Some("text-edit"));
        assert_eq!(history.entries().len(), 1);
    }

    #[test]
    fn snapshots_are_isolated_from_live_state() {
        let (mut history, _) = manager(HistoryConfig::default());
        let mut live = segments("original");
        let mut style = SubtitleStyle::default();
        history.save_state(&live, &style, "initial", None);

        live[0].text = "mutated".to_string();
        style.font_size = 99;

        let stored = history.current().expect("current");
        assert_eq!(stored.segments[0].text, "original");
        assert_eq!(stored.style.font_size, 48);
    }

    #[test]
    fn timeline_marks_current_entry() {
        let (mut history, _) = manager(HistoryConfig::default());
        save(&mut history, "A", Some("text-edit"));
        save(&mut history, "B", None);
        history.undo();

        let timeline = history.timeline();
        assert_eq!(timeline.len(), 2);
        assert!(timeline[0].is_current);
        assert_eq!(timeline[0].action.as_deref(), Some("text-edit"));
        assert!(!timeline[1].is_current);
    }
}
