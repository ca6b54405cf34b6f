/// Render collaborator
///
/// The controller decides which records are shown and in what order; a
/// renderer turns them into tiles. Element creation and image loading are
/// entirely the renderer's business.

pub mod console;

use std::sync::Arc;

use crate::state::data::PictureRecord;

pub trait TileRenderer {
    /// Rendered tile, owned by the container once appended
    type Tile;

    fn render_tile(&mut self, record: &Arc<PictureRecord>) -> Self::Tile;

    fn append_to_container(&mut self, tile: Self::Tile);

    fn clear_container(&mut self);

    /// Data fetch in progress
    fn set_loading(&mut self, _visible: bool) {}

    /// Data fetch failed
    fn set_failure(&mut self, _visible: bool) {}

    /// Sort selector visibility; hidden while the first page is rebuilt
    fn set_filters_visible(&mut self, _visible: bool) {}
}
