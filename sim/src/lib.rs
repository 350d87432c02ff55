//! Host-side model of the console for running tilebrawl without hardware.
//!
//! [`SimDevice`] implements [`Device`](tilebrawl_hal::Device) on plain
//! memory and keeps score of how the game uses it: flushes per frame,
//! flushes outside vblank, copies that overrun their region. Feed it
//! input from an [`InputScript`] or a seeded button masher, then drive a
//! [`Game`](tilebrawl::Game) with [`run_frames`].

pub mod device;
pub mod runner;
pub mod script;

pub use device::{SimDevice, SimStats};
pub use runner::{FighterState, RunSummary, run_frames};
pub use script::{InputScript, InputSource, ScriptError};
