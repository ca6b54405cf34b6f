use std::sync::Arc;
use std::time::Duration;

use super::TileRenderer;
use crate::state::data::PictureRecord;
use crate::tile::{ImageLoader, TileHandle, TileState};

/// Headless renderer: keeps the tiles in memory and logs what a page would show
pub struct ConsoleRenderer<L: ImageLoader + ?Sized> {
    loader: Arc<L>,
    load_timeout: Duration,
    tiles: Vec<TileHandle>,
    loading: bool,
    failure: bool,
    filters_visible: bool,
}

/// Tile counts by state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileSummary {
    pub hidden: usize,
    pub loaded: usize,
    pub failed: usize,
}

impl<L: ImageLoader + ?Sized> ConsoleRenderer<L> {
    pub fn new(loader: Arc<L>, load_timeout: Duration) -> Self {
        Self {
            loader,
            load_timeout,
            tiles: Vec::new(),
            loading: false,
            failure: false,
            filters_visible: false,
        }
    }

    pub fn tiles(&self) -> &[TileHandle] {
        &self.tiles
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_failure(&self) -> bool {
        self.failure
    }

    pub fn filters_visible(&self) -> bool {
        self.filters_visible
    }

    /// Wait for every tile in the container to leave `Hidden`
    pub async fn settle_tiles(&self) -> TileSummary {
        for tile in &self.tiles {
            tile.settled().await;
        }
        self.summary()
    }

    pub fn summary(&self) -> TileSummary {
        let mut summary = TileSummary::default();
        for tile in &self.tiles {
            match tile.state() {
                TileState::Hidden => summary.hidden += 1,
                TileState::Loaded => summary.loaded += 1,
                TileState::LoadFailed => summary.failed += 1,
            }
        }
        summary
    }
}

impl<L: ImageLoader + ?Sized> TileRenderer for ConsoleRenderer<L> {
    type Tile = TileHandle;

    fn render_tile(&mut self, record: &Arc<PictureRecord>) -> TileHandle {
        TileHandle::spawn(record, Arc::clone(&self.loader), self.load_timeout)
    }

    fn append_to_container(&mut self, tile: TileHandle) {
        tracing::debug!(
            "#{:<4} {} ♥ {} 💬 {}",
            self.tiles.len(),
            tile.source(),
            tile.likes(),
            tile.comments()
        );
        self.tiles.push(tile);
    }

    fn clear_container(&mut self) {
        // Dropping the handles aborts their pending loads
        self.tiles.clear();
    }

    fn set_loading(&mut self, visible: bool) {
        self.loading = visible;
    }

    fn set_failure(&mut self, visible: bool) {
        if visible {
            tracing::warn!("❌ Pictures failed to load");
        }
        self.failure = visible;
    }

    fn set_filters_visible(&mut self, visible: bool) {
        self.filters_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::FsImageLoader;
    use chrono::Utc;

    fn record(url: &str) -> Arc<PictureRecord> {
        Arc::new(PictureRecord {
            image_url: url.to_string(),
            preview_url: None,
            likes: 1,
            comments: 1,
            date: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_missing_images_settle_as_failed() {
        let loader = Arc::new(FsImageLoader::new("/definitely/not/here", 182));
        let mut renderer = ConsoleRenderer::new(loader, Duration::from_secs(5));

        for url in ["photos/1.jpg", "photos/2.jpg"] {
            let tile = renderer.render_tile(&record(url));
            renderer.append_to_container(tile);
        }

        renderer.set_loading(true);
        renderer.set_filters_visible(true);
        assert!(renderer.is_loading());
        assert!(renderer.filters_visible());
        assert!(!renderer.is_failure());

        let summary = renderer.settle_tiles().await;
        assert_eq!(summary, TileSummary { hidden: 0, loaded: 0, failed: 2 });

        renderer.clear_container();
        assert!(renderer.tiles().is_empty());
    }
}
