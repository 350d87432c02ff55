//! # tilebrawl HAL
//!
//! Narrow hardware surface for the tilebrawl handheld game.
//!
//! Game code never touches raw addresses. It talks to a [`Device`]:
//!
//! ```ignore
//! use tilebrawl_hal::{Device, Register, Region};
//!
//! fn frame(device: &mut impl Device, oam: &[u16]) {
//!     let buttons = device.poll_input();
//!     // ... simulate ...
//!     device.wait_vblank();
//!     device.write_register(Register::BgHScroll(0), 12);
//!     device.bulk_copy(Region::Oam, oam);
//! }
//! ```
//!
//! On the console the device is [`console::Console`], which maps every
//! call onto memory-mapped I/O. On a host the same trait is implemented
//! by an in-memory model, so the whole frame loop runs under `cargo test`.
//!
//! ## Hardware Overview
//!
//! | Feature | Detail |
//! |---------|------|
//! | Display | 240×160, 4 tiled layers in mode 0 |
//! | Sprites | 128 attribute entries (OAM) |
//! | Tiles | 8×8, 256-color |
//! | Maps | 32×32 tile screen blocks, up to 64×64 per layer |
//! | Copy engine | DMA channel 3, 16-bit words |

#![cfg_attr(not(test), no_std)]

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod boot;
pub mod console;
pub mod device;
pub mod display;
pub mod dma;
pub mod input;
pub mod memory;

pub use device::{Device, Register};
pub use display::{BgControl, DisplayControl, MapSize, SCREEN_HEIGHT, SCREEN_WIDTH, VBLANK_LINE};
pub use input::{Buttons, Gamepad};
pub use memory::{OAM_ENTRIES, Region};
