use std::path::PathBuf;
use std::sync::Arc;

use tile_gallery::ui::console::ConsoleRenderer;
use tile_gallery::{
    FileDataSource, FsImageLoader, GalleryConfig, GalleryController, ScrollPosition, SortKey,
};
use tracing_subscriber::EnvFilter;

/// Window the demo pretends to render into
const CONTAINER_WIDTH: u32 = 1000;
const WINDOW_HEIGHT: u32 = 800;

/// Usage: tile-gallery [PICTURES_ROOT] [CONFIG]
///
/// PICTURES_ROOT holds the feed (at the config's `data_url`) and the images
/// it points to. Defaults to the current directory.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let root = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let config_path = args.next().map(PathBuf::from);

    let config = match GalleryConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    let loader = Arc::new(FsImageLoader::new(&root, config.thumbnail_size));
    let renderer = ConsoleRenderer::new(loader, config.image_load_timeout());
    let viewport = config.viewport(CONTAINER_WIDTH, WINDOW_HEIGHT);
    let mut gallery = GalleryController::new(config, FileDataSource::new(&root), renderer, viewport);

    tracing::info!("🎨 Tile gallery on {}", root.display());

    if gallery.load().await.is_err() {
        // Let the failure indicator run its course, as a page would
        gallery.settle_timers().await;
        std::process::exit(1);
    }
    gallery.settle_timers().await;
    report(&gallery).await;

    // Scroll to the bottom until everything is on screen
    while gallery.cursor().rendered_count < gallery.working_set().len() {
        let before = gallery.cursor().rendered_count;
        let content_height = rows_height(before, &gallery.viewport());
        gallery.notify_scroll(ScrollPosition::new(
            content_height.saturating_sub(WINDOW_HEIGHT),
            content_height,
        ));
        gallery.settle_timers().await;
        if gallery.cursor().rendered_count == before {
            break;
        }
    }
    report(&gallery).await;

    for key in [SortKey::New, SortKey::Discussed, SortKey::Discussed] {
        gallery.on_sort_changed(key);
        tracing::info!("↕️  Sorted by {} ({})", key, if gallery.sort().ascending { "ascending" } else { "descending" });
        report(&gallery).await;
    }
}

/// Height of the content holding `count` tiles
fn rows_height(count: usize, viewport: &tile_gallery::ViewportInfo) -> u32 {
    let columns = viewport.columns().max(1) as usize;
    (count.div_ceil(columns) as u32).saturating_mul(viewport.tile_height)
}

async fn report<S: tile_gallery::DataSource>(
    gallery: &GalleryController<S, ConsoleRenderer<FsImageLoader>>,
) {
    let summary = gallery.renderer().settle_tiles().await;
    let cursor = gallery.cursor();
    tracing::info!(
        "📊 {} of {} tiles on {} pages: {} loaded, {} failed",
        cursor.rendered_count,
        gallery.working_set().len(),
        cursor.page_count,
        summary.loaded,
        summary.failed
    );
}
