use chrono::{NaiveTime, Timelike};

/// A time-of-day banded schedule: a sorted set of `(start, value)` entries
/// that wrap around midnight. Reused for target range, sensitivity, and
/// basal-rate schedules per §3.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySchedule<T> {
    /// Sorted by `start`; must contain at least one entry.
    entries: Vec<(NaiveTime, T)>,
}

impl<T: Clone> DailySchedule<T> {
    /// Builds a schedule from `entries`, sorting them by start time.
    ///
    /// Panics if `entries` is empty — a schedule with no bands cannot
    /// answer `value_at`, and an empty schedule should be represented as
    /// "configuration absent" one level up, not constructed here.
    pub fn new(mut entries: Vec<(NaiveTime, T)>) -> Self {
        assert!(!entries.is_empty(), "a schedule needs at least one band");
        entries.sort_by_key(|(t, _)| *t);
        Self { entries }
    }

    /// A schedule with a single band covering the whole day.
    pub fn constant(value: T) -> Self {
        Self {
            entries: vec![(NaiveTime::from_hms_opt(0, 0, 0).unwrap(), value)],
        }
    }

    /// The value in effect at `time`, picking the latest band whose start
    /// is at or before `time`, wrapping to the last band of the prior day
    /// when `time` precedes every band's start.
    pub fn value_at(&self, time: NaiveTime) -> &T {
        let seconds = time.num_seconds_from_midnight();
        self.entries
            .iter()
            .rev()
            .find(|(start, _)| start.num_seconds_from_midnight() <= seconds)
            .or_else(|| self.entries.last())
            .map(|(_, v)| v)
            .expect("schedule is non-empty by construction")
    }
}

/// A glucose target range in effect at some time of day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseTargetRange {
    pub min_mg_dl: f64,
    pub max_mg_dl: f64,
}
