//! Authoritative store of task identity, status, result, and timestamps.
//!
//! The registry is the one structure mutated by multiple producers (workers
//! performing terminal transitions) and read by multiple consumers (status
//! pollers, stats, date scans) concurrently. `DashMap` gives per-entry
//! atomicity: a reader never observes a half-initialized or torn record, and
//! each terminal transition happens under the entry's shard lock.
//! Enumeration reflects a per-shard snapshot (snapshot isolation, not strict
//! linearizability).

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use mnemon_types::error::TaskError;
use mnemon_types::task::{TaskRecord, TaskStats, TaskStatus};

/// Concurrent registry of tracked background tasks.
///
/// Records are created in `Running` state and transition exactly once into a
/// terminal state. Records are never evicted by the registry itself;
/// retention is an external policy.
pub struct TaskRegistry {
    tasks: DashMap<Uuid, TaskRecord>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: DashMap::new(),
        }
    }

    /// Allocate a fresh submit id and store a `Running` record.
    ///
    /// UUID v7 identifiers are collision-free across concurrent submissions,
    /// and the record is inserted fully initialized, so a concurrent `all`
    /// scan sees either nothing or the complete record.
    pub fn register(&self) -> Uuid {
        let submit_id = Uuid::now_v7();
        self.tasks.insert(submit_id, TaskRecord::new(submit_id));
        submit_id
    }

    /// Transition a task to `Completed` with its result payload.
    ///
    /// Returns [`TaskError::AlreadyTerminal`] if the task already reached a
    /// terminal state; the existing state is left untouched. The runner is
    /// the single writer and calls this at most once per task.
    pub fn complete(&self, submit_id: Uuid, result: serde_json::Value) -> Result<(), TaskError> {
        self.transition(submit_id, |record| {
            record.status = TaskStatus::Completed;
            record.result = Some(result);
        })
    }

    /// Transition a task to `Failed` with a descriptive error.
    pub fn fail(&self, submit_id: Uuid, error: String) -> Result<(), TaskError> {
        self.transition(submit_id, |record| {
            record.status = TaskStatus::Failed;
            record.error = Some(error);
        })
    }

    fn transition(
        &self,
        submit_id: Uuid,
        apply: impl FnOnce(&mut TaskRecord),
    ) -> Result<(), TaskError> {
        let mut entry = self.tasks.get_mut(&submit_id).ok_or(TaskError::NotFound)?;
        if entry.status.is_terminal() {
            return Err(TaskError::AlreadyTerminal(submit_id));
        }
        apply(&mut entry);
        entry.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Point lookup by submit id.
    pub fn get(&self, submit_id: Uuid) -> Result<TaskRecord, TaskError> {
        self.tasks
            .get(&submit_id)
            .map(|entry| entry.clone())
            .ok_or(TaskError::NotFound)
    }

    /// Unordered snapshot of every tracked task.
    pub fn all(&self) -> HashMap<Uuid, TaskRecord> {
        self.tasks
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Tasks created on the given UTC calendar date, ordered by creation time.
    pub fn by_date(&self, date: NaiveDate) -> Vec<TaskRecord> {
        self.collect_sorted(|record| record.created_at.date_naive() == date)
    }

    /// Tasks created within `[start, end]` (inclusive on both ends), ordered
    /// by creation time. Fails with [`TaskError::InvalidRange`] when
    /// `start > end`.
    pub fn by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TaskRecord>, TaskError> {
        if start > end {
            return Err(TaskError::InvalidRange { start, end });
        }
        Ok(self.collect_sorted(|record| {
            let date = record.created_at.date_naive();
            date >= start && date <= end
        }))
    }

    fn collect_sorted(&self, keep: impl Fn(&TaskRecord) -> bool) -> Vec<TaskRecord> {
        let mut records: Vec<TaskRecord> = self
            .tasks
            .iter()
            .filter(|entry| keep(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.created_at);
        records
    }

    /// Aggregate counts over a single-iteration snapshot.
    ///
    /// `total` is the sum of the three status counts from the same pass, so
    /// the partition invariant holds at any snapshot the iteration observed.
    pub fn stats(&self) -> TaskStats {
        let mut completed = 0u64;
        let mut failed = 0u64;
        let mut running = 0u64;
        for entry in self.tasks.iter() {
            match entry.status {
                TaskStatus::Completed => completed += 1,
                TaskStatus::Failed => failed += 1,
                TaskStatus::Running => running += 1,
            }
        }
        let total = completed + failed + running;
        TaskStats {
            total,
            completed,
            failed,
            running,
            storage_size: total,
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn register_creates_running_record() {
        let registry = TaskRegistry::new();
        let id = registry.register();
        let record = registry.get(id).unwrap();
        assert_eq!(record.submit_id, id);
        assert_eq!(record.status, TaskStatus::Running);
        assert!(record.completed_at.is_none());
    }

    #[test]
    fn complete_sets_result_and_completed_at() {
        let registry = TaskRegistry::new();
        let id = registry.register();
        registry.complete(id, json!({"added": 2})).unwrap();

        let record = registry.get(id).unwrap();
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(record.result, Some(json!({"added": 2})));
        assert!(record.error.is_none());
        assert!(record.completed_at.is_some());
    }

    #[test]
    fn fail_sets_error() {
        let registry = TaskRegistry::new();
        let id = registry.register();
        registry.fail(id, "engine unavailable".to_string()).unwrap();

        let record = registry.get(id).unwrap();
        assert_eq!(record.status, TaskStatus::Failed);
        assert_eq!(record.error.as_deref(), Some("engine unavailable"));
        assert!(record.completed_at.is_some());
    }

    #[test]
    fn second_terminal_transition_is_rejected() {
        let registry = TaskRegistry::new();
        let id = registry.register();
        registry.complete(id, json!(1)).unwrap();

        let err = registry.fail(id, "late".to_string()).unwrap_err();
        assert!(matches!(err, TaskError::AlreadyTerminal(_)));

        // The original terminal state is untouched.
        let record = registry.get(id).unwrap();
        assert_eq!(record.status, TaskStatus::Completed);
        assert_eq!(record.result, Some(json!(1)));
        assert!(record.error.is_none());
    }

    #[test]
    fn transition_on_unknown_id_is_not_found() {
        let registry = TaskRegistry::new();
        let err = registry.complete(Uuid::now_v7(), json!(null)).unwrap_err();
        assert!(matches!(err, TaskError::NotFound));
        assert!(matches!(registry.get(Uuid::now_v7()), Err(TaskError::NotFound)));
    }

    #[test]
    fn stats_partition_total_exactly() {
        let registry = TaskRegistry::new();
        let a = registry.register();
        let b = registry.register();
        let _c = registry.register();
        registry.complete(a, json!(null)).unwrap();
        registry.fail(b, "x".to_string()).unwrap();

        let stats = registry.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.completed + stats.failed + stats.running, stats.total);
        assert_eq!(stats.storage_size, 3);
    }

    #[test]
    fn by_date_filters_on_utc_calendar_date() {
        let registry = TaskRegistry::new();
        let id = registry.register();
        let today = Utc::now().date_naive();

        let todays = registry.by_date(today);
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].submit_id, id);

        let yesterday = today - Duration::days(1);
        assert!(registry.by_date(yesterday).is_empty());
    }

    #[test]
    fn by_date_range_is_inclusive_and_ordered() {
        let registry = TaskRegistry::new();
        // Backdate records directly through the map to cover multiple days.
        for (days_ago, _) in [(2i64, ()), (1, ()), (0, ())] {
            let id = Uuid::now_v7();
            let mut record = TaskRecord::new(id);
            record.created_at = Utc::now() - Duration::days(days_ago);
            registry.tasks.insert(id, record);
        }
        let today = Utc::now().date_naive();
        let two_days_ago = today - Duration::days(2);
        let one_day_ago = today - Duration::days(1);

        let full = registry.by_date_range(two_days_ago, today).unwrap();
        assert_eq!(full.len(), 3);
        assert!(full.windows(2).all(|w| w[0].created_at <= w[1].created_at));

        let partial = registry.by_date_range(two_days_ago, one_day_ago).unwrap();
        assert_eq!(partial.len(), 2);
    }

    #[test]
    fn by_date_range_matches_all_subset() {
        let registry = TaskRegistry::new();
        for _ in 0..5 {
            registry.register();
        }
        let today = Utc::now().date_naive();
        let ranged = registry.by_date_range(today, today).unwrap();
        let all = registry.all();
        assert_eq!(ranged.len(), all.len());
        for record in &ranged {
            assert!(all.contains_key(&record.submit_id));
        }
    }

    #[test]
    fn inverted_range_is_invalid() {
        let registry = TaskRegistry::new();
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap().date_naive();
        let end = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap().date_naive();
        let err = registry.by_date_range(start, end).unwrap_err();
        assert!(matches!(err, TaskError::InvalidRange { .. }));
    }

    #[tokio::test]
    async fn concurrent_registration_yields_unique_ids() {
        let registry = Arc::new(TaskRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                (0..50).map(|_| registry.register()).collect::<Vec<_>>()
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            ids.extend(handle.await.unwrap());
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 16 * 50);
        assert_eq!(registry.all().len(), 16 * 50);
    }
}
