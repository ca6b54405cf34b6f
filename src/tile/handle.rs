use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::loader::{ImageLoader, Thumbnail};
use crate::state::data::PictureRecord;

/// Visual state of one tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    /// Image not there yet, the tile is kept hidden
    Hidden,
    Loaded,
    /// Load error or timeout
    LoadFailed,
}

impl TileState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TileState::Hidden)
    }
}

#[derive(Debug)]
struct Shared {
    state: watch::Sender<TileState>,
    thumbnail: OnceLock<Thumbnail>,
}

impl Shared {
    /// First terminal state wins, later ones are ignored
    fn settle(&self, next: TileState) -> bool {
        self.state.send_if_modified(|state| {
            if state.is_terminal() {
                false
            } else {
                *state = next;
                true
            }
        })
    }
}

/// One rendered tile and its image load.
///
/// The load runs on its own task, raced against a timeout. The handle is the
/// single owner of that task: cancelling or dropping it aborts the load.
#[derive(Debug)]
pub struct TileHandle {
    source: String,
    likes: u64,
    comments: u64,
    shared: Arc<Shared>,
    task: JoinHandle<()>,
}

impl TileHandle {
    /// Start loading `record`'s thumbnail. Must be called inside a tokio runtime.
    pub fn spawn<L: ImageLoader + ?Sized>(record: &PictureRecord, loader: Arc<L>, timeout: Duration) -> Self {
        let source = record.thumbnail_source().to_string();
        let (state, _) = watch::channel(TileState::Hidden);
        let shared = Arc::new(Shared {
            state,
            thumbnail: OnceLock::new(),
        });

        let task = {
            let shared = Arc::clone(&shared);
            let source = source.clone();
            tokio::spawn(async move {
                let next = match tokio::time::timeout(timeout, loader.load(&source)).await {
                    Ok(Ok(thumbnail)) => {
                        let _ = shared.thumbnail.set(thumbnail);
                        TileState::Loaded
                    }
                    Ok(Err(e)) => {
                        tracing::warn!("⚠️  Tile {} failed to load: {}", source, e);
                        TileState::LoadFailed
                    }
                    Err(_) => {
                        tracing::warn!("⏱️  Tile {} timed out after {:?}", source, timeout);
                        TileState::LoadFailed
                    }
                };
                shared.settle(next);
            })
        };

        Self {
            source,
            likes: record.likes,
            comments: record.comments,
            shared,
            task,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn likes(&self) -> u64 {
        self.likes
    }

    pub fn comments(&self) -> u64 {
        self.comments
    }

    pub fn state(&self) -> TileState {
        *self.shared.state.borrow()
    }

    /// Decoded image, once the tile is `Loaded`
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.shared.thumbnail.get()
    }

    /// Give up on the load. No effect if the tile already settled.
    pub fn cancel(&self) {
        self.task.abort();
        if self.shared.settle(TileState::LoadFailed) {
            tracing::debug!("tile {} cancelled", self.source);
        }
    }

    /// Wait until the tile leaves `Hidden`
    pub async fn settled(&self) -> TileState {
        let mut rx = self.shared.state.subscribe();
        loop {
            let state = *rx.borrow_and_update();
            if state.is_terminal() {
                return state;
            }
            // The sender lives in `shared`, which we hold; this cannot close.
            if rx.changed().await.is_err() {
                return self.state();
            }
        }
    }
}

impl Drop for TileHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
