//! Cartridge entry point. Build for the bare-metal ARM target with
//! `--features rom`.

#![no_std]
#![no_main]

use tilebrawl::{DEMO_ASSETS, Game, GameConfig};
use tilebrawl_hal::console::Console;

#[unsafe(no_mangle)]
fn main(console: &mut Console) -> ! {
    let mut game = Game::new(&DEMO_ASSETS, GameConfig::default());
    game.setup(console);
    game.run(console)
}
