/// Tile thumbnail loader
///
/// Loads the picture behind a tile and downscales it to the tile size.
/// Decoding is CPU-bound, so it runs on tokio's blocking pool.
use image::imageops::FilterType;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use tokio::task;

use crate::error::LoadError;

/// Decoded thumbnail, RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub type LoadFuture = Pin<Box<dyn Future<Output = Result<Thumbnail, LoadError>> + Send>>;

/// Something that can fetch a tile's image.
///
/// The returned future owns everything it needs so it can run on its own task.
pub trait ImageLoader: Send + Sync + 'static {
    fn load(&self, source: &str) -> LoadFuture;
}

/// Loads thumbnails from files under a root directory
#[derive(Debug, Clone)]
pub struct FsImageLoader {
    root: PathBuf,
    size: u32,
}

impl FsImageLoader {
    /// `size` bounds both edges of the produced thumbnail
    pub fn new(root: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            root: root.into(),
            size,
        }
    }

    /// Map a feed URL like `/photos/1.jpg` onto the root directory.
    /// URLs that climb out of the root resolve to nothing.
    pub fn resolve(&self, source: &str) -> Option<PathBuf> {
        let relative = Path::new(source.trim_start_matches('/'));
        if relative.as_os_str().is_empty() {
            return None;
        }
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, source: &str) -> LoadFuture {
        let path = self.resolve(source);
        let source = source.to_string();
        let size = self.size;

        Box::pin(async move {
            let path = path.ok_or_else(|| LoadError::MissingSource(source.clone()))?;
            // Spawn blocking because decoding is CPU-intensive
            task::spawn_blocking(move || load_thumbnail_blocking(&path, size)).await?
        })
    }
}

/// Blocking implementation of thumbnail loading
fn load_thumbnail_blocking(path: &Path, size: u32) -> Result<Thumbnail, LoadError> {
    if !path.exists() {
        return Err(LoadError::MissingSource(path.display().to_string()));
    }

    let img = image::open(path)?;
    let thumbnail = img.resize(size, size, FilterType::Triangle).to_rgba8();

    tracing::trace!(
        "🖼️  Loaded {} ({}x{})",
        path.display(),
        thumbnail.width(),
        thumbnail.height()
    );

    Ok(Thumbnail {
        width: thumbnail.width(),
        height: thumbnail.height(),
        rgba: thumbnail.into_raw(),
    })
}
