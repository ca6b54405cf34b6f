use std::ops::Range;

use crate::state::library::RenderCursor;

/// Geometry of the visible area and of one tile cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportInfo {
    pub container_width: u32,
    pub window_height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
}

impl ViewportInfo {
    pub fn new(container_width: u32, window_height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            container_width,
            window_height,
            tile_width,
            tile_height,
        }
    }

    /// Whole tile columns that fit the container
    pub fn columns(&self) -> u32 {
        if self.tile_width == 0 {
            return 0;
        }
        self.container_width / self.tile_width
    }

    /// Tile rows per screen, a partially visible row counts
    pub fn rows(&self) -> u32 {
        if self.tile_height == 0 {
            return 0;
        }
        self.window_height.div_ceil(self.tile_height)
    }

    /// Tiles per page before anything is occluded
    pub fn raw_capacity(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Height of one page: a full screen
    pub fn page_height(&self) -> u32 {
        self.window_height
    }
}

/// Page element that takes room away from the first tiles (the upload form)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OccluderInfo {
    pub total_height: u32,
    pub width: u32,
}

impl OccluderInfo {
    pub fn new(total_height: u32, width: u32) -> Self {
        Self { total_height, width }
    }

    /// Part of the occluder that falls onto page `page_index`
    pub fn visible_height(&self, page_index: usize, page_height: u32) -> u32 {
        let scrolled = u64::from(page_height).saturating_mul(page_index as u64);
        let remaining = u64::from(self.total_height).saturating_sub(scrolled);
        remaining.min(u64::from(page_height)) as u32
    }
}

/// Outcome of re-walking the pages after the viewport changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizePlan {
    pub cursor: RenderCursor,
    /// Working set indices that now have room and must be appended
    pub reveal: Range<usize>,
}

/// Tile count per page
pub fn tiles_for_page(page_index: usize, viewport: &ViewportInfo, occluder: &OccluderInfo) -> usize {
    let raw = viewport.raw_capacity();
    if raw == 0 {
        return 0;
    }

    let visible = occluder.visible_height(page_index, viewport.page_height());
    let occluded_rows = visible.div_ceil(viewport.tile_height) as usize;
    let occluded_cols = occluder.width.div_ceil(viewport.tile_width) as usize;

    raw.saturating_sub(occluded_rows * occluded_cols)
}

pub fn has_more_pages(rendered_count: usize, working_set_len: usize) -> bool {
    rendered_count < working_set_len
}

/// Walk pages from the top under the new geometry until they hold at least
/// what is already rendered, and report what the last page has room for.
///
/// Never shrinks the rendered count; tiles already on screen stay.
pub fn recompute_cursor_after_resize(
    cursor: RenderCursor,
    working_set_len: usize,
    viewport: &ViewportInfo,
    occluder: &OccluderInfo,
) -> ResizePlan {
    let rendered = cursor.rendered_count.min(working_set_len);
    let unchanged = ResizePlan {
        cursor,
        reveal: rendered..rendered,
    };

    if working_set_len == 0 || viewport.raw_capacity() == 0 {
        return unchanged;
    }

    // Terminates: past the occluder every page holds the raw capacity.
    let mut capacity = 0usize;
    let mut pages = 0usize;
    loop {
        capacity += tiles_for_page(pages, viewport, occluder);
        pages += 1;
        if capacity >= rendered {
            break;
        }
    }

    let filled = capacity.clamp(rendered, working_set_len);
    ResizePlan {
        cursor: RenderCursor {
            rendered_count: filled,
            page_count: pages.max(cursor.page_count),
        },
        reveal: rendered..filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(width: u32, height: u32) -> ViewportInfo {
        ViewportInfo::new(width, height, 196, 196)
    }

    #[test]
    fn test_reference_capacity() {
        let view = viewport(600, 800);
        assert_eq!(view.columns(), 3);
        assert_eq!(view.rows(), 5);
        assert_eq!(view.raw_capacity(), 15);
        assert_eq!(tiles_for_page(0, &view, &OccluderInfo::default()), 15);
    }

    #[test]
    fn test_zero_occluder_is_raw_capacity_everywhere() {
        let view = viewport(1000, 700);
        for page in 0..20 {
            assert_eq!(tiles_for_page(page, &view, &OccluderInfo::default()), view.raw_capacity());
        }
    }

    #[test]
    fn test_occluder_reduces_early_pages() {
        // 3 columns x 5 rows, form 400px high and 300px wide
        let view = viewport(600, 800);
        let form = OccluderInfo::new(400, 300);

        // ceil(400 / 196) = 3 rows, ceil(300 / 196) = 2 columns
        assert_eq!(tiles_for_page(0, &view, &form), 15 - 6);
        assert_eq!(tiles_for_page(1, &view, &form), 15);
    }

    #[test]
    fn test_tall_occluder_spans_pages() {
        let view = viewport(600, 800);
        let form = OccluderInfo::new(1000, 600);

        assert_eq!(form.visible_height(0, 800), 800);
        assert_eq!(form.visible_height(1, 800), 200);
        assert_eq!(form.visible_height(2, 800), 0);

        // page 0: 5 rows x 4 cols occluded, more than the page holds
        assert_eq!(tiles_for_page(0, &view, &form), 0);
        // page 1: ceil(200 / 196) = 2 rows x 4 cols
        assert_eq!(tiles_for_page(1, &view, &form), 7);
        assert_eq!(tiles_for_page(2, &view, &form), 15);
    }

    #[test]
    fn test_degenerate_viewport() {
        let narrow = viewport(150, 800);
        assert_eq!(tiles_for_page(0, &narrow, &OccluderInfo::default()), 0);

        let zero_tile = ViewportInfo::new(600, 800, 0, 0);
        assert_eq!(tiles_for_page(3, &zero_tile, &OccluderInfo::new(100, 100)), 0);
    }

    #[test]
    fn test_has_more_pages() {
        assert!(has_more_pages(0, 1));
        assert!(has_more_pages(14, 15));
        assert!(!has_more_pages(15, 15));
        assert!(!has_more_pages(0, 0));
    }

    #[test]
    fn test_resize_reveals_extra_room() {
        // 15 rendered on a 3x5 screen, widened to 5x5
        let cursor = RenderCursor { rendered_count: 15, page_count: 1 };
        let plan = recompute_cursor_after_resize(cursor, 100, &viewport(1000, 800), &OccluderInfo::default());

        assert_eq!(plan.reveal, 15..25);
        assert_eq!(plan.cursor, RenderCursor { rendered_count: 25, page_count: 1 });
    }

    #[test]
    fn test_resize_to_smaller_fills_last_page() {
        // 25 rendered, shrunk to 3x5: two pages hold 30 and the second is partly empty
        let cursor = RenderCursor { rendered_count: 25, page_count: 1 };
        let plan = recompute_cursor_after_resize(cursor, 100, &viewport(600, 800), &OccluderInfo::default());

        assert_eq!(plan.cursor.page_count, 2);
        assert_eq!(plan.cursor.rendered_count, 30);
        assert_eq!(plan.reveal, 25..30);
    }

    #[test]
    fn test_resize_exact_fit_reveals_nothing() {
        let cursor = RenderCursor { rendered_count: 30, page_count: 2 };
        let plan = recompute_cursor_after_resize(cursor, 100, &viewport(600, 800), &OccluderInfo::default());

        assert!(plan.reveal.is_empty());
        assert_eq!(plan.cursor, cursor);
    }

    #[test]
    fn test_resize_capped_by_working_set() {
        let cursor = RenderCursor { rendered_count: 6, page_count: 1 };
        let plan = recompute_cursor_after_resize(cursor, 10, &viewport(1000, 800), &OccluderInfo::default());

        assert_eq!(plan.reveal, 6..10);
        assert_eq!(plan.cursor.rendered_count, 10);
    }

    #[test]
    fn test_resize_fills_first_page_when_nothing_fit_before() {
        let cursor = RenderCursor { rendered_count: 0, page_count: 1 };
        let plan = recompute_cursor_after_resize(cursor, 50, &viewport(600, 800), &OccluderInfo::default());

        assert_eq!(plan.reveal, 0..15);
    }

    #[test]
    fn test_resize_with_occluder_on_first_page() {
        // 3x5 with the form taking 3x2 cells: 9 rendered. Widened to 5x5 the
        // first page holds 25 - 6 = 19.
        let form = OccluderInfo::new(400, 300);
        let cursor = RenderCursor { rendered_count: 9, page_count: 1 };
        let plan = recompute_cursor_after_resize(cursor, 100, &viewport(1000, 800), &form);

        assert_eq!(plan.reveal, 9..19);
        assert_eq!(plan.cursor, RenderCursor { rendered_count: 19, page_count: 1 });
    }

    #[test]
    fn test_resize_walks_past_occluded_page() {
        // 3x5 with a 1000px form: page 0 holds nothing, page 1 holds 7
        let form = OccluderInfo::new(1000, 600);
        let cursor = RenderCursor { rendered_count: 7, page_count: 2 };

        // 5x5 with the form over 4 columns: page 0 holds 25 - 20 = 5,
        // page 1 holds 25 - 8 = 17
        let plan = recompute_cursor_after_resize(cursor, 100, &viewport(1000, 800), &form);

        assert_eq!(plan.reveal, 7..22);
        assert_eq!(plan.cursor, RenderCursor { rendered_count: 22, page_count: 2 });
    }

    #[test]
    fn test_resize_with_nothing_to_show() {
        let cursor = RenderCursor::default();
        let empty = recompute_cursor_after_resize(cursor, 0, &viewport(600, 800), &OccluderInfo::default());
        assert!(empty.reveal.is_empty());

        let cursor = RenderCursor { rendered_count: 4, page_count: 1 };
        let narrow = recompute_cursor_after_resize(cursor, 50, &viewport(100, 800), &OccluderInfo::default());
        assert_eq!(narrow.cursor, cursor);
        assert!(narrow.reveal.is_empty());
    }
}
