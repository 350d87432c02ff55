//! # Display Control Words
//!
//! Two kinds of words configure the tiled display:
//!
//! | Register  | Type               | Effect                                  |
//! |-----------|--------------------|-----------------------------------------|
//! | `DISPCNT` | [`DisplayControl`] | Video mode, which layers/sprites render |
//! | `BGnCNT`  | [`BgControl`]      | Per-layer priority, tile and map bases  |
//!
//! ## BgControl layout
//!
//! ```text
//! 15 14 | 13 | 12 11 10 9 8 | 7 | 6 | 5 4 | 3 2 | 1 0
//!  size | wr |  screen blk  | c | m |  -  | chr | prio
//! ```

use bit_field::BitField;
use bitflags::bitflags;

pub const SCREEN_WIDTH: i32 = 240;
pub const SCREEN_HEIGHT: i32 = 160;

/// First scanline of the vertical blanking interval.
pub const VBLANK_LINE: u16 = 160;

bitflags! {
    /// Global display mode/enable word at `DISPCNT`.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
    pub struct DisplayControl: u16 {
        /// Tiled mode 0: four regular backgrounds.
        const MODE_0       = 0x0000;
        /// Sprite tiles are laid out linearly (1D) rather than in a 32×32 grid.
        const OBJ_MAP_1D   = 0x0040;
        const FORCED_BLANK = 0x0080;
        const BG0          = 0x0100;
        const BG1          = 0x0200;
        const BG2          = 0x0400;
        const BG3          = 0x0800;
        const OBJ          = 0x1000;
    }
}

impl DisplayControl {
    /// Enable flag for background `layer` (0-3).
    pub const fn bg(layer: u8) -> Self {
        Self::from_bits_truncate(Self::BG0.bits() << (layer & 0b11))
    }
}

/// Logical size of a background layer, in tiles.
///
/// Anything wider or taller than 32 tiles is stored as several 32×32
/// screen blocks placed one after another in video memory.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MapSize {
    S32x32,
    S64x32,
    S32x64,
    S64x64,
}

impl MapSize {
    pub const fn from_tiles(width: usize, height: usize) -> Option<Self> {
        match (width, height) {
            (32, 32) => Some(Self::S32x32),
            (64, 32) => Some(Self::S64x32),
            (32, 64) => Some(Self::S32x64),
            (64, 64) => Some(Self::S64x64),
            _ => None,
        }
    }

    pub const fn bits(self) -> u16 {
        match self {
            Self::S32x32 => 0,
            Self::S64x32 => 1,
            Self::S32x64 => 2,
            Self::S64x64 => 3,
        }
    }

    pub const fn from_bits(bits: u16) -> Self {
        match bits & 0b11 {
            0 => Self::S32x32,
            1 => Self::S64x32,
            2 => Self::S32x64,
            _ => Self::S64x64,
        }
    }

    pub const fn width_tiles(self) -> usize {
        match self {
            Self::S32x32 | Self::S32x64 => 32,
            Self::S64x32 | Self::S64x64 => 64,
        }
    }

    pub const fn height_tiles(self) -> usize {
        match self {
            Self::S32x32 | Self::S64x32 => 32,
            Self::S32x64 | Self::S64x64 => 64,
        }
    }

    /// Number of 32×32 screen blocks the layer occupies.
    pub const fn screen_blocks(self) -> usize {
        (self.width_tiles() / 32) * (self.height_tiles() / 32)
    }
}

/// Layer control word for `BGnCNT`.
///
/// ```ignore
/// let word = BgControl::new()
///     .priority(0)
///     .char_block(0)
///     .color_256(true)
///     .screen_block(16)
///     .wrap(true)
///     .size(MapSize::S64x32);
/// device.write_register(Register::BgControl(0), word.bits());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BgControl(pub u16);

impl BgControl {
    pub const fn new() -> Self {
        Self(0)
    }

    /// Draw order against other layers; 0 is drawn on top.
    pub fn priority(mut self, priority: u8) -> Self {
        self.0.set_bits(0..2, u16::from(priority & 0b11));
        self
    }

    /// Which 16 KiB character block holds the tile images (0-3).
    pub fn char_block(mut self, block: u8) -> Self {
        self.0.set_bits(2..4, u16::from(block & 0b11));
        self
    }

    /// 256-color (8bpp) tiles instead of 16-color (4bpp).
    pub fn color_256(mut self, enable: bool) -> Self {
        self.0.set_bit(7, enable);
        self
    }

    /// Which 2 KiB screen block holds the first page of the map (0-31).
    pub fn screen_block(mut self, block: u8) -> Self {
        self.0.set_bits(8..13, u16::from(block & 0b1_1111));
        self
    }

    pub fn wrap(mut self, enable: bool) -> Self {
        self.0.set_bit(13, enable);
        self
    }

    pub fn size(mut self, size: MapSize) -> Self {
        self.0.set_bits(14..16, size.bits());
        self
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn get_priority(self) -> u8 {
        self.0.get_bits(0..2) as u8
    }

    pub fn get_char_block(self) -> u8 {
        self.0.get_bits(2..4) as u8
    }

    pub fn get_screen_block(self) -> u8 {
        self.0.get_bits(8..13) as u8
    }

    pub fn get_size(self) -> MapSize {
        MapSize::from_bits(self.0.get_bits(14..16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_word_matches_hand_packed_value() {
        // 256 colors, screen block 16, wrapping, 32x32
        let word = BgControl::new()
            .priority(0)
            .char_block(0)
            .color_256(true)
            .screen_block(16)
            .wrap(true)
            .size(MapSize::S32x32);
        assert_eq!(word.bits(), (1 << 7) | (16 << 8) | (1 << 13));
    }

    #[test]
    fn layer_word_fields_are_independent() {
        let word = BgControl::new()
            .priority(3)
            .char_block(1)
            .screen_block(31)
            .size(MapSize::S64x64);
        assert_eq!(word.get_priority(), 3);
        assert_eq!(word.get_char_block(), 1);
        assert_eq!(word.get_screen_block(), 31);
        assert_eq!(word.get_size(), MapSize::S64x64);

        let word = word.priority(1);
        assert_eq!(word.get_screen_block(), 31);
        assert_eq!(word.get_size(), MapSize::S64x64);
    }

    #[test]
    fn map_sizes() {
        assert_eq!(MapSize::from_tiles(64, 32), Some(MapSize::S64x32));
        assert_eq!(MapSize::from_tiles(48, 32), None);
        assert_eq!(MapSize::S32x64.screen_blocks(), 2);
        assert_eq!(MapSize::S64x64.screen_blocks(), 4);
        assert_eq!(MapSize::from_bits(MapSize::S32x64.bits()), MapSize::S32x64);
    }

    #[test]
    fn layer_enable_flags() {
        assert_eq!(DisplayControl::bg(0), DisplayControl::BG0);
        assert_eq!(DisplayControl::bg(3), DisplayControl::BG3);
    }
}
