/// Tile module
///
/// This module handles everything one tile needs beyond its record:
/// - Loading and downscaling the thumbnail (loader.rs)
/// - The per-tile load task, its timeout and cancellation (handle.rs)

pub mod handle;
pub mod loader;

pub use handle::{TileHandle, TileState};
pub use loader::{FsImageLoader, ImageLoader, LoadFuture, Thumbnail};
