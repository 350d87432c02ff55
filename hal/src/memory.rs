//! # Memory Regions
//!
//! Destinations for [`Device::bulk_copy`](crate::Device::bulk_copy).
//!
//! ```text
//! 0x0500_0000  BG palette      256 colors
//! 0x0500_0200  OBJ palette     256 colors
//! 0x0600_0000  BG VRAM         64 KiB: char blocks (16 KiB) and
//!                              screen blocks (2 KiB) share this space
//! 0x0601_0000  OBJ tiles       32 KiB
//! 0x0700_0000  OAM             128 sprites × 4 halfwords
//! ```
//!
//! Char blocks and screen blocks alias the same 64 KiB, so a game must
//! keep its tile images below the screen blocks its maps use.

pub const PALETTE_BASE: u32 = 0x0500_0000;
pub const VRAM_BASE: u32 = 0x0600_0000;
pub const OBJ_TILES_BASE: u32 = 0x0601_0000;
pub const OAM_BASE: u32 = 0x0700_0000;

/// Bytes of background VRAM addressable by char and screen blocks.
pub const BG_VRAM_BYTES: u32 = 0x1_0000;
pub const OBJ_TILES_BYTES: u32 = 0x8000;

pub const CHAR_BLOCK_BYTES: u32 = 0x4000;
pub const SCREEN_BLOCK_BYTES: u32 = 0x800;

/// Hardware sprite attribute entries.
pub const OAM_ENTRIES: usize = 128;
/// Halfwords per sprite attribute entry.
pub const OAM_ENTRY_WORDS: usize = 4;

pub const PALETTE_ENTRIES: usize = 256;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    BgPalette,
    ObjPalette,
    /// 16 KiB tile image block (0-3).
    CharBlock(u8),
    /// 2 KiB map block (0-31).
    ScreenBlock(u8),
    ObjTiles,
    Oam,
}

impl Region {
    pub const fn address(self) -> u32 {
        match self {
            Region::BgPalette => PALETTE_BASE,
            Region::ObjPalette => PALETTE_BASE + 0x200,
            Region::CharBlock(block) => VRAM_BASE + (block as u32 & 0b11) * CHAR_BLOCK_BYTES,
            Region::ScreenBlock(block) => {
                VRAM_BASE + (block as u32 & 0b1_1111) * SCREEN_BLOCK_BYTES
            }
            Region::ObjTiles => OBJ_TILES_BASE,
            Region::Oam => OAM_BASE,
        }
    }

    /// Halfwords that fit between the start of the region and the end of
    /// the memory it lives in. Copies may run across block boundaries.
    pub const fn capacity_words(self) -> usize {
        let bytes = match self {
            Region::BgPalette | Region::ObjPalette => PALETTE_ENTRIES as u32 * 2,
            Region::CharBlock(_) | Region::ScreenBlock(_) => {
                VRAM_BASE + BG_VRAM_BYTES - self.address()
            }
            Region::ObjTiles => OBJ_TILES_BYTES,
            Region::Oam => (OAM_ENTRIES * OAM_ENTRY_WORDS * 2) as u32,
        };
        (bytes / 2) as usize
    }
}
