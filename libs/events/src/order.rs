//! Causal and temporal ordering checks.
//!
//! Both checks scan events in document order and never stop early: every
//! violation in a document is reported.

use std::collections::HashMap;

use crate::types::Issue;

/// Enforces non-decreasing `ts_ms` across a document's events.
#[derive(Debug, Default)]
pub struct TimestampOrder {
    previous: Option<i128>,
}

impl TimestampOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe the next valid timestamp. Events without a valid `ts_ms` must
    /// not be passed here.
    pub fn observe(&mut self, label: &str, ts_ms: i128) -> Option<Issue> {
        let issue = match self.previous {
            Some(previous) if ts_ms < previous => Some(Issue::order(format!(
                "{label} has ts_ms {ts_ms} earlier than previous ts_ms {previous}; \
                 timestamps must be non-decreasing"
            ))),
            _ => None,
        };
        self.previous = Some(ts_ms);
        issue
    }
}

/// Event ids observed so far, keyed to the events-array index where each
/// first appeared.
#[derive(Debug, Default)]
pub struct SeenEvents {
    index_of: HashMap<String, usize>,
}

impl SeenEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event_id: &str) -> bool {
        self.index_of.contains_key(event_id)
    }

    /// Position of `event_id` in the events array, if seen.
    pub fn index_of(&self, event_id: &str) -> Option<usize> {
        self.index_of.get(event_id).copied()
    }

    /// Record an id at its events-array index. Returns `false` if the id was
    /// already recorded; the first occurrence is kept.
    pub fn record(&mut self, event_id: &str, index: usize) -> bool {
        if self.contains(event_id) {
            return false;
        }
        self.index_of.insert(event_id.to_string(), index);
        true
    }

    /// Check that every dependency has already been recorded.
    pub fn check_dependencies(&self, label: &str, depends_on: &[&str]) -> Option<Issue> {
        let missing: Vec<&str> = depends_on
            .iter()
            .copied()
            .filter(|dep| !self.contains(dep))
            .collect();
        if missing.is_empty() {
            return None;
        }
        Some(Issue::order(format!(
            "{label} depends on events not seen earlier: {}",
            missing.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn test_equal_timestamps_are_allowed() {
        let mut order = TimestampOrder::new();
        assert!(order.observe("event 'a'", 5).is_none());
        assert!(order.observe("event 'b'", 5).is_none());
        assert!(order.observe("event 'c'", 6).is_none());
    }

    #[test]
    fn test_regression_reports_both_values_and_moves_on() {
        let mut order = TimestampOrder::new();
        assert!(order.observe("event 'a'", 10).is_none());

        let issue = order.observe("event 'b'", 5).unwrap();
        assert_eq!(issue.severity, Severity::Order);
        assert!(issue.message.contains("5"));
        assert!(issue.message.contains("10"));
        assert!(issue.message.contains("non-decreasing"));

        // The reference moves to the regressed value.
        assert!(order.observe("event 'c'", 7).is_none());
    }

    #[test]
    fn test_seen_events_keep_first_index() {
        let mut seen = SeenEvents::new();
        assert!(!seen.contains("evt-1"));
        assert!(seen.record("evt-1", 0));
        assert!(seen.record("evt-2", 1));
        assert!(!seen.record("evt-1", 2));
        assert_eq!(seen.index_of("evt-1"), Some(0));
        assert_eq!(seen.index_of("evt-2"), Some(1));
    }

    #[test]
    fn test_missing_dependencies_are_named_in_order() {
        let mut seen = SeenEvents::new();
        seen.record("evt-1", 0);

        assert!(seen.check_dependencies("event 'evt-2'", &["evt-1"]).is_none());

        let issue = seen
            .check_dependencies("event 'evt-2'", &["evt-9", "evt-1", "evt-3"])
            .unwrap();
        assert_eq!(issue.severity, Severity::Order);
        assert!(issue.message.ends_with("evt-9, evt-3"));
    }
}
