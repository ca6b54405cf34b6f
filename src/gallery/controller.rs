use chrono::Utc;
use std::ops::Range;
use tokio::time::Instant;

use super::timer::TimerSlot;
use crate::config::GalleryConfig;
use crate::engine::pagination::{self, OccluderInfo, ViewportInfo};
use crate::engine::SortFilterEngine;
use crate::error::FetchError;
use crate::source::DataSource;
use crate::state::data::PictureRecord;
use crate::state::library::{Library, RenderCursor, WorkingSet};
use crate::state::sort::{SortKey, SortState};
use crate::ui::TileRenderer;

/// Where the gallery session is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryState {
    /// Nothing loaded (initially, and after a failure cooled down)
    Empty,
    /// Waiting for the data source
    Loading,
    Ready,
    /// Rebuilding the working set
    Filtering,
    /// Appending tiles
    Paginating,
    /// Fetch failed, failure indicator up
    Failed,
}

/// Scroll signal from the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Offset of the top of the window into the content
    pub scroll_top: u32,
    /// Full height of the scrollable content
    pub content_height: u32,
}

impl ScrollPosition {
    pub fn new(scroll_top: u32, content_height: u32) -> Self {
        Self {
            scroll_top,
            content_height,
        }
    }

    pub fn distance_to_bottom(&self, window_height: u32) -> u32 {
        self.content_height
            .saturating_sub(self.scroll_top.saturating_add(window_height))
    }

    pub fn is_near_bottom(&self, window_height: u32, threshold: u32) -> bool {
        self.distance_to_bottom(window_height) <= threshold
    }
}

/// Drives one gallery: owns the session state and decides which records
/// reach the renderer and when.
///
/// All methods run on the caller's event loop. The engine calls are
/// synchronous; only `load` and `settle_timers` suspend.
pub struct GalleryController<S: DataSource, R: TileRenderer> {
    config: GalleryConfig,
    source: S,
    renderer: R,
    engine: SortFilterEngine,
    library: Library,
    state: GalleryState,
    viewport: ViewportInfo,
    occluder: OccluderInfo,
    scroll_debounce: TimerSlot<ScrollPosition>,
    resize_debounce: TimerSlot<ViewportInfo>,
    failure_cooldown: TimerSlot<()>,
    loading_linger: TimerSlot<()>,
}

impl<S: DataSource, R: TileRenderer> GalleryController<S, R> {
    pub fn new(config: GalleryConfig, source: S, renderer: R, viewport: ViewportInfo) -> Self {
        Self {
            engine: SortFilterEngine::new(config.new_window()),
            scroll_debounce: TimerSlot::new(config.scroll_debounce()),
            resize_debounce: TimerSlot::new(config.resize_debounce()),
            failure_cooldown: TimerSlot::new(config.failure_cooldown()),
            loading_linger: TimerSlot::new(config.loading_linger()),
            config,
            source,
            renderer,
            library: Library::new(),
            state: GalleryState::Empty,
            viewport,
            occluder: OccluderInfo::default(),
        }
    }

    /// Fetch the picture list and show its first page.
    /// Returns how many records were loaded.
    pub async fn load(&mut self) -> Result<usize, FetchError> {
        self.transition(GalleryState::Loading);
        if self.failure_cooldown.cancel().is_some() {
            self.renderer.set_failure(false);
        }
        self.renderer.set_loading(true);

        let timeout = self.config.fetch_timeout();
        let result = match tokio::time::timeout(timeout, self.source.fetch(&self.config.data_url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(timeout)),
        };

        match result {
            Ok(records) => {
                let count = records.len();
                self.on_data_loaded(records);
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("❌ Failed to load {}: {}", self.config.data_url, e);
                self.on_data_load_failed();
                Err(e)
            }
        }
    }

    /// Take a fresh record list: default sort, new working set, first page.
    pub fn on_data_loaded(&mut self, records: Vec<PictureRecord>) {
        tracing::info!("📷 Loaded {} pictures", records.len());

        self.library.replace_records(records);
        self.rebuild(SortState::default());
        self.transition(GalleryState::Ready);

        // The loading indicator lingers briefly after the first render
        self.loading_linger.schedule(Instant::now(), ());
    }

    /// Show the failure indicator until the cooldown passes. No retry.
    pub fn on_data_load_failed(&mut self) {
        self.loading_linger.cancel();
        self.renderer.set_loading(false);
        self.renderer.set_failure(true);
        self.failure_cooldown.schedule(Instant::now(), ());
        self.transition(GalleryState::Failed);
    }

    /// User picked `key` in the sort selector. Picking the active key flips
    /// the direction, any other key starts descending.
    pub fn on_sort_changed(&mut self, key: SortKey) {
        if !self.accepts_input() {
            tracing::debug!("ignoring sort {} while {:?}", key, self.state);
            return;
        }

        let sort = self.library.sort().select(key);
        self.rebuild(sort);
        self.transition(GalleryState::Ready);
    }

    /// Append the next page if there is anything left.
    /// Returns whether tiles were appended.
    pub fn on_scroll_near_bottom(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let cursor = self.library.cursor();
        if !pagination::has_more_pages(cursor.rendered_count, self.library.working_set().len()) {
            return false;
        }

        self.transition(GalleryState::Paginating);
        let appended = self.render_next_page();
        self.transition(GalleryState::Ready);
        appended > 0
    }

    /// Adopt new viewport geometry and fill any room it revealed.
    /// Already rendered tiles are never rendered again.
    pub fn on_viewport_resized(&mut self, viewport: ViewportInfo) {
        self.viewport = viewport;
        self.replan();
    }

    /// Geometry of the element covering the top of the gallery.
    /// Room it frees is filled right away, like a resize.
    pub fn set_occluder(&mut self, occluder: OccluderInfo) {
        self.occluder = occluder;
        self.replan();
    }

    /// Re-walk the pages under the current geometry and append what fits
    fn replan(&mut self) {
        if !self.accepts_input() {
            return;
        }

        let plan = pagination::recompute_cursor_after_resize(
            self.library.cursor(),
            self.library.working_set().len(),
            &self.viewport,
            &self.occluder,
        );
        if plan.reveal.is_empty() {
            self.library.advance(plan.cursor);
            return;
        }

        self.transition(GalleryState::Paginating);
        tracing::debug!("geometry change revealed tiles {:?}", plan.reveal);
        self.append_range(plan.reveal);
        self.library.advance(plan.cursor);
        self.transition(GalleryState::Ready);
    }

    /// Debounced scroll entry point: replaces any pending scroll signal
    pub fn notify_scroll(&mut self, position: ScrollPosition) {
        self.scroll_debounce.schedule(Instant::now(), position);
    }

    /// Debounced resize entry point: replaces any pending resize signal
    pub fn notify_resize(&mut self, viewport: ViewportInfo) {
        self.resize_debounce.schedule(Instant::now(), viewport);
    }

    /// Earliest pending timer, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        [
            self.failure_cooldown.deadline(),
            self.loading_linger.deadline(),
            self.resize_debounce.deadline(),
            self.scroll_debounce.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Run every timer whose deadline is at or before `now`
    pub fn fire_due(&mut self, now: Instant) {
        if self.failure_cooldown.take_due(now).is_some() {
            self.renderer.set_failure(false);
            if self.state == GalleryState::Failed {
                let next = if self.library.working_set().is_empty() {
                    GalleryState::Empty
                } else {
                    GalleryState::Ready
                };
                self.transition(next);
            }
        }

        if self.loading_linger.take_due(now).is_some() {
            self.renderer.set_loading(false);
        }

        // Geometry first, so a coalesced scroll sees the new viewport
        if let Some(viewport) = self.resize_debounce.take_due(now) {
            self.on_viewport_resized(viewport);
        }

        if let Some(position) = self.scroll_debounce.take_due(now) {
            if position.is_near_bottom(self.viewport.window_height, self.config.scroll_threshold_px) {
                self.on_scroll_near_bottom();
            }
        }
    }

    /// Sleep through pending timers, firing each, until none is left
    pub async fn settle_timers(&mut self) {
        while let Some(deadline) = self.next_deadline() {
            tokio::time::sleep_until(deadline).await;
            self.fire_due(Instant::now());
        }
    }

    pub fn state(&self) -> GalleryState {
        self.state
    }

    pub fn sort(&self) -> SortState {
        self.library.sort()
    }

    pub fn cursor(&self) -> RenderCursor {
        self.library.cursor()
    }

    pub fn working_set(&self) -> &WorkingSet {
        self.library.working_set()
    }

    pub fn generation(&self) -> u64 {
        self.library.generation()
    }

    pub fn viewport(&self) -> ViewportInfo {
        self.viewport
    }

    pub fn occluder(&self) -> OccluderInfo {
        self.occluder
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    fn accepts_input(&self) -> bool {
        matches!(self.state, GalleryState::Ready)
    }

    /// New working set for `sort`, cursor rewound, first page rendered.
    /// A pending scroll refers to the old working set and is dropped.
    fn rebuild(&mut self, sort: SortState) {
        self.transition(GalleryState::Filtering);
        self.scroll_debounce.cancel();

        let generation = self.library.rebuild(&self.engine, sort, Utc::now());
        tracing::debug!(
            "generation {}: {} of {} pictures by {} {}",
            generation,
            self.library.working_set().len(),
            self.library.record_count(),
            sort.key,
            if sort.ascending { "ascending" } else { "descending" }
        );

        // The selector stays hidden until the first page is in place
        self.renderer.set_filters_visible(false);
        self.renderer.clear_container();
        self.render_next_page();
        self.renderer.set_filters_visible(true);
    }

    /// Render `tiles_for_page(page_count)` records past the cursor
    fn render_next_page(&mut self) -> usize {
        let cursor = self.library.cursor();
        let count = pagination::tiles_for_page(cursor.page_count, &self.viewport, &self.occluder);
        let end = (cursor.rendered_count + count).min(self.library.working_set().len());

        self.append_range(cursor.rendered_count..end);
        self.library.advance(RenderCursor {
            rendered_count: end,
            page_count: cursor.page_count + 1,
        });
        end - cursor.rendered_count
    }

    fn append_range(&mut self, range: Range<usize>) {
        for record in self.library.slice(range) {
            let tile = self.renderer.render_tile(record);
            self.renderer.append_to_container(tile);
        }
    }

    fn transition(&mut self, next: GalleryState) {
        if self.state != next {
            tracing::trace!("gallery {:?} -> {:?}", self.state, next);
            self.state = next;
        }
    }
}

impl<S: DataSource, R: TileRenderer> std::fmt::Debug for GalleryController<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryController")
            .field("state", &self.state)
            .field("library", &self.library)
            .field("viewport", &self.viewport)
            .field("occluder", &self.occluder)
            .finish()
    }
}
