//! Picture tile gallery engine.
//!
//! Takes a picture feed, orders and filters it by the selected sort, and
//! hands it to a renderer one screen-sized page at a time:
//! - `state` - records, sort selection, the session library
//! - `engine` - sorting/filtering and page sizing, pure and synchronous
//! - `tile` - per-tile thumbnail loads with timeouts
//! - `source` - where the feed comes from
//! - `ui` - the render collaborator
//! - `gallery` - the controller tying it together

pub mod config;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod source;
pub mod state;
pub mod tile;
pub mod ui;

pub use config::GalleryConfig;
pub use engine::{OccluderInfo, SortFilterEngine, ViewportInfo};
pub use error::{ConfigError, FetchError, LoadError};
pub use gallery::{GalleryController, GalleryState, ScrollPosition};
pub use source::{DataSource, FileDataSource, StaticDataSource};
pub use state::data::PictureRecord;
pub use state::library::{RenderCursor, WorkingSet};
pub use state::sort::{SortKey, SortState};
pub use tile::{FsImageLoader, ImageLoader, TileHandle, TileState};
pub use ui::TileRenderer;
