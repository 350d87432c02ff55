//! # tilebrawl
//!
//! A side-scrolling brawl for a handheld with tiled backgrounds and 128
//! hardware sprites. The player walks and jumps over a wrapped tile map,
//! the enemy paces between the screen edges, and whoever runs out of
//! health first ends the round.
//!
//! ## The Frame Loop
//!
//! ```ignore
//! let mut game = Game::new(&DEMO_ASSETS, GameConfig::default());
//! game.setup(&mut device);
//! loop {
//!     // physics, input, combat, round-over
//!     // then: wait for vblank, commit scroll, flush sprites, pace
//!     game.tick(&mut device);
//! }
//! ```
//!
//! Nothing here touches hardware directly; everything goes through a
//! [`Device`](tilebrawl_hal::Device).

#![cfg_attr(not(test), no_std)]

pub mod assets;
pub mod config;
pub mod entity;
pub mod game;
pub mod sprite;
pub mod tilemap;

pub use assets::{Assets, DEMO_ASSETS};
pub use config::{GameConfig, SolidTiles};
pub use entity::{Enemy, Entity, Facing, Motion, Player, Step, damage, is_over};
pub use game::{Game, Phase, RoundOutcome, Scroll, TickReport};
pub use sprite::{PoolExhausted, SpriteAttributes, SpriteRef, SpriteSize, SpriteTable};
pub use tilemap::{TileMap, lookup_tile};
