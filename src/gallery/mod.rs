/// Gallery orchestration
///
/// - `controller.rs` - the session state machine tying data source, engine
///   and renderer together
/// - `timer.rs` - single-slot cancellable timers for debouncing and cooldowns

pub mod controller;
pub mod timer;

pub use controller::{GalleryController, GalleryState, ScrollPosition};
pub use timer::TimerSlot;
