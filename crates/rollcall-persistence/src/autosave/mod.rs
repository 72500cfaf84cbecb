//! Auto-save functionality for rosters.
//!
//! Provides:
//! - `DirtyTracker` - Clean/Dirty state with debounce timing
//! - `AutoSaveConfig` - User settings for auto-save behavior
//! - `AutosaveController` - Holds the active roster and persists it

mod config;
mod controller;
mod tracker;

pub use config::AutoSaveConfig;
pub use controller::AutosaveController;
pub use tracker::{DirtyTracker, SaveState};
