use chrono::{DateTime, Duration, Utc};
use std::cmp::Ordering;
use std::sync::Arc;

use crate::state::data::PictureRecord;
use crate::state::library::WorkingSet;
use crate::state::sort::{SortKey, SortState};

/// Builds the working set out of the full record list.
///
/// The only configurable part is the NEW window; without one every record
/// is eligible for every key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortFilterEngine {
    new_window: Option<Duration>,
}

impl SortFilterEngine {
    pub fn new(new_window: Option<Duration>) -> Self {
        Self { new_window }
    }

    pub fn new_window(&self) -> Option<Duration> {
        self.new_window
    }

    /// Ordered, filtered view of `records` for `sort`.
    ///
    /// `now` anchors the NEW window. Equal keys keep their input order in
    /// both directions.
    pub fn apply(
        &self,
        records: &[Arc<PictureRecord>],
        sort: SortState,
        now: DateTime<Utc>,
    ) -> WorkingSet {
        // A window reaching past the earliest representable date keeps everything
        let since = match (sort.key, self.new_window) {
            (SortKey::New, Some(window)) => now.checked_sub_signed(window),
            _ => None,
        };
        let mut set: WorkingSet = match since {
            Some(since) => records
                .iter()
                .filter(|record| record.date > since)
                .cloned()
                .collect(),
            None => records.to_vec(),
        };

        // slice::sort_by is stable
        set.sort_by(|a, b| {
            let ord = compare(sort.key, a, b);
            if sort.ascending { ord } else { ord.reverse() }
        });

        set
    }
}

#[inline]
fn compare(key: SortKey, a: &PictureRecord, b: &PictureRecord) -> Ordering {
    match key {
        SortKey::Popular => a.likes.cmp(&b.likes),
        SortKey::New => a.date.cmp(&b.date),
        SortKey::Discussed => a.comments.cmp(&b.comments),
    }
}
