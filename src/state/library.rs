use chrono::{DateTime, Utc};
use std::ops::Range;
use std::sync::Arc;

use super::data::PictureRecord;
use super::sort::SortState;
use crate::engine::SortFilterEngine;

/// Sorted and filtered records eligible for rendering
pub type WorkingSet = Vec<Arc<PictureRecord>>;

/// How far rendering has progressed through the working set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderCursor {
    /// Records appended to the view so far
    pub rendered_count: usize,
    /// Page units accounted for
    pub page_count: usize,
}

/// The Library holds the session's picture data.
/// It owns the loaded records, the active sort, the working set built from
/// them and the render cursor into that working set.
pub struct Library {
    records: Vec<Arc<PictureRecord>>,
    sort: SortState,
    working_set: WorkingSet,
    cursor: RenderCursor,
    generation: u64,
}

impl Library {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            sort: SortState::default(),
            working_set: Vec::new(),
            cursor: RenderCursor::default(),
            generation: 0,
        }
    }

    /// Replace all records and go back to the default sort.
    /// The working set is left empty until the next rebuild.
    pub fn replace_records(&mut self, records: Vec<PictureRecord>) {
        self.records = records.into_iter().map(Arc::new).collect();
        self.sort.reset();
        self.working_set.clear();
        self.cursor = RenderCursor::default();
    }

    /// Build a fresh working set for `sort` and rewind the cursor.
    /// Returns the new generation number.
    pub fn rebuild(&mut self, engine: &SortFilterEngine, sort: SortState, now: DateTime<Utc>) -> u64 {
        self.sort = sort;
        self.working_set = engine.apply(&self.records, sort, now);
        self.cursor = RenderCursor::default();
        self.generation += 1;
        self.generation
    }

    /// Move the cursor forward. `rendered_count` never goes back and never
    /// passes the end of the working set.
    pub fn advance(&mut self, cursor: RenderCursor) {
        self.cursor.rendered_count = cursor
            .rendered_count
            .clamp(self.cursor.rendered_count, self.working_set.len());
        self.cursor.page_count = self.cursor.page_count.max(cursor.page_count);
    }

    /// Records in `range` of the working set, clamped to its bounds
    pub fn slice(&self, range: Range<usize>) -> &[Arc<PictureRecord>] {
        let end = range.end.min(self.working_set.len());
        let start = range.start.min(end);
        &self.working_set[start..end]
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.working_set
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn cursor(&self) -> RenderCursor {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

// Implement Debug without dumping every record
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("records", &self.records.len())
            .field("working_set", &self.working_set.len())
            .field("sort", &self.sort)
            .field("cursor", &self.cursor)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::sort::SortKey;
    use chrono::TimeZone;

    fn records(likes: &[u64]) -> Vec<PictureRecord> {
        likes
            .iter()
            .map(|&likes| PictureRecord {
                image_url: format!("{likes}.jpg"),
                preview_url: None,
                likes,
                comments: 0,
                date: Utc.with_ymd_and_hms(2016, 1, 1, 0, 0, 0).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_rebuild_resets_cursor() {
        let mut library = Library::new();
        library.replace_records(records(&[1, 2, 3, 4]));
        library.rebuild(&SortFilterEngine::default(), SortState::default(), Utc::now());
        library.advance(RenderCursor { rendered_count: 3, page_count: 1 });

        let generation = library.rebuild(
            &SortFilterEngine::default(),
            SortState::new(SortKey::Popular, true),
            Utc::now(),
        );

        assert_eq!(generation, 2);
        assert_eq!(library.cursor(), RenderCursor::default());
        assert_eq!(library.working_set()[0].likes, 1);
    }

    #[test]
    fn test_advance_is_monotonic_and_bounded() {
        let mut library = Library::new();
        library.replace_records(records(&[1, 2, 3]));
        library.rebuild(&SortFilterEngine::default(), SortState::default(), Utc::now());

        library.advance(RenderCursor { rendered_count: 2, page_count: 1 });
        library.advance(RenderCursor { rendered_count: 1, page_count: 0 });
        assert_eq!(library.cursor(), RenderCursor { rendered_count: 2, page_count: 1 });

        library.advance(RenderCursor { rendered_count: 10, page_count: 2 });
        assert_eq!(library.cursor().rendered_count, 3);
    }

    #[test]
    fn test_replace_records_restores_default_sort() {
        let mut library = Library::new();
        library.replace_records(records(&[1]));
        library.rebuild(&SortFilterEngine::default(), SortState::new(SortKey::New, true), Utc::now());

        library.replace_records(records(&[5, 6]));

        assert_eq!(library.sort(), SortState::default());
        assert!(library.working_set().is_empty());
        assert_eq!(library.record_count(), 2);
    }

    #[test]
    fn test_slice_clamps() {
        let mut library = Library::new();
        library.replace_records(records(&[1, 2, 3]));
        library.rebuild(&SortFilterEngine::default(), SortState::default(), Utc::now());

        assert_eq!(library.slice(1..10).len(), 2);
        assert!(library.slice(5..9).is_empty());
    }
}
