//! # Assets
//!
//! Immutable palettes, tile images and maps, uploaded once by
//! [`Game::setup`](crate::Game::setup).
//!
//! The built-in [`DEMO_ASSETS`] pack is generated at compile time. All
//! images are 256-color (one byte per pixel, two pixels per halfword, left
//! pixel in the low byte).
//!
//! ```text
//! BG tiles    0      sky (transparent, the backdrop color shows)
//!             1..=3  grass top            solid
//!             4..=6  dirt                 solid
//!             7..=11 cloud
//!             12..=17 brick               solid
//!             18..=21 hills (parallax layer)
//!
//! OBJ tiles   0   player, standing       32  enemy, standing
//!             16  player, stride         48  enemy, stride
//! ```

use tilebrawl_hal::{MapSize, memory::PALETTE_ENTRIES};

use crate::tilemap::{TileMap, page_index};

/// Halfwords in one 8×8 256-color tile.
pub const TILE_WORDS: usize = 32;

/// Everything the game uploads at startup.
#[derive(Copy, Clone, Debug)]
pub struct Assets<'a> {
    pub bg_palette: &'a [u16; PALETTE_ENTRIES],
    pub obj_palette: &'a [u16; PALETTE_ENTRIES],
    pub bg_tiles: &'a [u16],
    pub obj_tiles: &'a [u16],
    /// Layer 0 is the collision layer, layer 1 the parallax backdrop.
    pub layers: [TileMap<'a>; 2],
}

impl<'a> Assets<'a> {
    pub const fn collision_layer(&self) -> &TileMap<'a> {
        &self.layers[0]
    }

    /// Background tile images held, in 8×8 tiles.
    pub const fn bg_tile_count(&self) -> usize {
        self.bg_tiles.len() / TILE_WORDS
    }
}

/// 15-bit BGR color from 5-bit channels.
pub const fn rgb(r: u16, g: u16, b: u16) -> u16 {
    (r & 0x1F) | (g & 0x1F) << 5 | (b & 0x1F) << 10
}

const SKY: u8 = 0;
const GRASS: u8 = 1;
const GRASS_DARK: u8 = 2;
const DIRT: u8 = 3;
const DIRT_DARK: u8 = 4;
const CLOUD: u8 = 5;
const CLOUD_SHADE: u8 = 6;
const BRICK: u8 = 7;
const MORTAR: u8 = 8;
const HILL: u8 = 9;
const HILL_DARK: u8 = 10;

const fn bg_palette() -> [u16; PALETTE_ENTRIES] {
    let mut palette = [0; PALETTE_ENTRIES];
    palette[SKY as usize] = rgb(12, 20, 31);
    palette[GRASS as usize] = rgb(6, 24, 6);
    palette[GRASS_DARK as usize] = rgb(3, 16, 3);
    palette[DIRT as usize] = rgb(20, 12, 5);
    palette[DIRT_DARK as usize] = rgb(14, 8, 3);
    palette[CLOUD as usize] = rgb(31, 31, 31);
    palette[CLOUD_SHADE as usize] = rgb(24, 26, 29);
    palette[BRICK as usize] = rgb(22, 8, 4);
    palette[MORTAR as usize] = rgb(24, 22, 20);
    palette[HILL as usize] = rgb(8, 19, 12);
    palette[HILL_DARK as usize] = rgb(5, 14, 9);
    palette
}

const fn bg_pixel(tile: usize, x: usize, y: usize) -> u8 {
    match tile {
        1..=3 => {
            // blades of grass drift by one pixel per variant
            if y < 2 || (y < 4 && (x + tile) % 3 == 0) {
                GRASS
            } else if y < 4 {
                GRASS_DARK
            } else if (x * 3 + y + tile) % 7 == 0 {
                DIRT_DARK
            } else {
                DIRT
            }
        }
        4..=6 => {
            if (x + y * 5 + tile * 3) % 9 == 0 {
                DIRT_DARK
            } else {
                DIRT
            }
        }
        7..=11 => {
            // a puff whose radius varies across the five pieces
            let cx = 4i32;
            let cy = 5i32;
            let dx = x as i32 - cx;
            let dy = y as i32 - cy;
            let r = 3 + (tile as i32 % 2);
            if dx * dx + dy * dy <= r * r {
                if dy > 1 { CLOUD_SHADE } else { CLOUD }
            } else {
                SKY
            }
        }
        12..=17 => {
            let offset = if y < 4 { 0 } else { 4 };
            if y == 3 || y == 7 || (x + offset + tile) % 8 == 0 {
                MORTAR
            } else {
                BRICK
            }
        }
        18 => {
            if x + y >= 7 { HILL } else { SKY }
        }
        19 => {
            if y >= x { HILL } else { SKY }
        }
        20 => HILL,
        21 => {
            if (x + y) % 4 == 0 { HILL_DARK } else { HILL }
        }
        _ => SKY,
    }
}

pub const BG_TILE_COUNT: usize = 22;
const BG_TILE_WORDS: usize = BG_TILE_COUNT * TILE_WORDS;

const fn bg_tiles() -> [u16; BG_TILE_WORDS] {
    let mut out = [0; BG_TILE_WORDS];
    let mut word = 0;
    while word < BG_TILE_WORDS {
        let tile = word / TILE_WORDS;
        let pixel = (word % TILE_WORDS) * 2;
        let (x, y) = (pixel % 8, pixel / 8);
        out[word] = bg_pixel(tile, x, y) as u16 | (bg_pixel(tile, x + 1, y) as u16) << 8;
        word += 1;
    }
    out
}

/// Row of the grass surface on the collision layer.
pub const GROUND_ROW: usize = 17;
/// Row and columns of the floating brick platform.
pub const PLATFORM_ROW: usize = 13;
pub const PLATFORM_COLUMNS: core::ops::Range<usize> = 40..48;

const GROUND_WIDTH: usize = 64;
const GROUND_HEIGHT: usize = 32;

const fn ground_tile(x: usize, y: usize) -> u16 {
    if y == PLATFORM_ROW && x >= PLATFORM_COLUMNS.start && x < PLATFORM_COLUMNS.end {
        return 12 + (x % 6) as u16;
    }
    if y == GROUND_ROW {
        return 1 + (x % 3) as u16;
    }
    if y > GROUND_ROW {
        return 4 + ((x + y) % 3) as u16;
    }
    // clouds: five-tile strips at a few fixed spots
    let cloud_row = (y == 3 && x >= 6 && x < 11)
        || (y == 5 && x >= 26 && x < 31)
        || (y == 2 && x >= 52 && x < 57);
    if cloud_row {
        let start = if x < 11 { 6 } else if x < 31 { 26 } else { 52 };
        return 7 + (x - start) as u16;
    }
    0
}

const fn ground_map() -> [u16; GROUND_WIDTH * GROUND_HEIGHT] {
    let mut out = [0; GROUND_WIDTH * GROUND_HEIGHT];
    let mut y = 0;
    while y < GROUND_HEIGHT {
        let mut x = 0;
        while x < GROUND_WIDTH {
            out[page_index(x, y, GROUND_WIDTH, GROUND_HEIGHT)] = ground_tile(x, y);
            x += 1;
        }
        y += 1;
    }
    out
}

const HILLS_SIZE: usize = 32;

const fn hills_map() -> [u16; HILLS_SIZE * HILLS_SIZE] {
    let mut out = [0; HILLS_SIZE * HILLS_SIZE];
    let mut y = 0;
    while y < HILLS_SIZE {
        let mut x = 0;
        while x < HILLS_SIZE {
            let phase = x % 8;
            out[y * HILLS_SIZE + x] = match y {
                0..=13 => 0,
                14 if phase == 2 => 18,
                14 if phase == 3 => 19,
                14 => 0,
                15 if phase >= 1 && phase <= 4 => 20,
                15 => 0,
                _ => 20 + ((x + y) % 2) as u16,
            };
            x += 1;
        }
        y += 1;
    }
    out
}

const TRANSPARENT: u8 = 0;
const SKIN: u8 = 1;
const PLAYER_SHIRT: u8 = 2;
const OUTLINE: u8 = 3;
const ENEMY_SHIRT: u8 = 4;
const EYE: u8 = 5;
const BOOT: u8 = 6;
const TROUSERS: u8 = 7;

const fn obj_palette() -> [u16; PALETTE_ENTRIES] {
    let mut palette = [0; PALETTE_ENTRIES];
    palette[SKIN as usize] = rgb(31, 24, 18);
    palette[PLAYER_SHIRT as usize] = rgb(6, 10, 28);
    palette[OUTLINE as usize] = rgb(2, 2, 4);
    palette[ENEMY_SHIRT as usize] = rgb(28, 5, 5);
    palette[EYE as usize] = rgb(31, 31, 31);
    palette[BOOT as usize] = rgb(12, 6, 2);
    palette[TROUSERS as usize] = rgb(8, 8, 12);
    palette
}

/// One 16×32 fighter frame. `character` 0 is the player, 1 the enemy.
const fn obj_pixel(character: usize, frame: usize, x: usize, y: usize) -> u8 {
    let shirt = if character == 0 { PLAYER_SHIRT } else { ENEMY_SHIRT };
    match y {
        // head
        1..=9 if x >= 5 && x <= 11 => {
            if y == 1 || x == 5 || x == 11 {
                OUTLINE
            } else if y == 4 && x == 9 {
                EYE
            } else {
                SKIN
            }
        }
        // torso with arms
        10..=20 if x >= 3 && x <= 13 => {
            let arm = x == 3 || x == 13;
            // the stride frame swings the arms back
            if arm && ((frame == 0 && y > 17) || (frame == 1 && y < 13)) {
                TRANSPARENT
            } else if arm && y >= 16 {
                SKIN
            } else {
                shirt
            }
        }
        // legs
        21..=31 => {
            let (left, right) = if frame == 0 { (5, 9) } else { (3, 11) };
            let on_leg = (x >= left && x < left + 3) || (x >= right && x < right + 3);
            if !on_leg {
                TRANSPARENT
            } else if y >= 29 {
                BOOT
            } else {
                TROUSERS
            }
        }
        _ => TRANSPARENT,
    }
}

/// Bytes in one 16×32 256-color sprite frame (8 tiles of 64 bytes).
const FRAME_BYTES: usize = 16 * 32;
const OBJ_FRAMES: usize = 4;
const OBJ_TILE_WORDS: usize = OBJ_FRAMES * FRAME_BYTES / 2;

/// Frames are laid out for 1D sprite mapping: each frame is eight
/// consecutive tiles, two across and four down, row by row.
const fn obj_tiles() -> [u16; OBJ_TILE_WORDS] {
    let mut out = [0; OBJ_TILE_WORDS];
    let mut word = 0;
    while word < OBJ_TILE_WORDS {
        let byte = word * 2;
        let frame_index = byte / FRAME_BYTES;
        let within = byte % FRAME_BYTES;
        let tile = within / 64;
        let (px, py) = ((within % 64) % 8, (within % 64) / 8);
        let x = (tile % 2) * 8 + px;
        let y = (tile / 2) * 8 + py;

        let (character, frame) = (frame_index / 2, frame_index % 2);
        let lo = obj_pixel(character, frame, x, y) as u16;
        let hi = obj_pixel(character, frame, x + 1, y) as u16;
        out[word] = lo | hi << 8;
        word += 1;
    }
    out
}

const BG_PALETTE: [u16; PALETTE_ENTRIES] = bg_palette();
const OBJ_PALETTE: [u16; PALETTE_ENTRIES] = obj_palette();
const BG_TILES: [u16; BG_TILE_WORDS] = bg_tiles();
const OBJ_TILES: [u16; OBJ_TILE_WORDS] = obj_tiles();
const GROUND_MAP: [u16; GROUND_WIDTH * GROUND_HEIGHT] = ground_map();
const HILLS_MAP: [u16; HILLS_SIZE * HILLS_SIZE] = hills_map();

/// The asset pack the cartridge ships with.
pub static DEMO_ASSETS: Assets<'static> = Assets {
    bg_palette: &BG_PALETTE,
    obj_palette: &OBJ_PALETTE,
    bg_tiles: &BG_TILES,
    obj_tiles: &OBJ_TILES,
    layers: [
        TileMap::with_size(&GROUND_MAP, MapSize::S64x32),
        TileMap::with_size(&HILLS_MAP, MapSize::S32x32),
    ],
};
