//! In-memory console.
//!
//! Copies land immediately. The line counter is modeled at frame
//! granularity only:
//!
//! ```text
//!   wait_vblank()          poll_input()             wait_vblank()
//!        │  VCOUNT = 160       │  VCOUNT = 0             │
//!   ─────┴─────────────────────┴─────────────────────────┴──────
//!        │◀──── blanking ─────▶│◀────── visible scan ───▶│
//! ```
//!
//! An OAM copy made while the counter says "visible" would tear on real
//! hardware; the simulator counts it in [`SimStats::tearing`] instead.

use log::{trace, warn};
use tilebrawl::SpriteAttributes;
use tilebrawl_hal::{
    Buttons, Device, OAM_ENTRIES, Region, Register, VBLANK_LINE,
    device::IO_BASE,
    memory::{OAM_ENTRY_WORDS, OBJ_TILES_BASE, PALETTE_ENTRIES, VRAM_BASE},
};

use crate::script::InputSource;

/// Halfwords of I/O space modeled, enough for every [`Register`].
const IO_WORDS: usize = 0x20;
/// Background VRAM (64 KiB) followed by sprite tiles (32 KiB).
pub const VRAM_WORDS: usize = 0xC000;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Vertical blanks waited for.
    pub vblanks: u64,
    pub polls: u64,
    pub copies: u64,
    pub words_copied: u64,
    pub oam_flushes: u64,
    /// OAM copies made during the visible scan.
    pub tearing: u64,
    /// OAM copies beyond the first in one frame.
    pub double_flushes: u64,
    /// Copies that did not fit their region and were cut short.
    pub overruns: u64,
    pub delay_units: u64,
}

pub struct SimDevice {
    io: [u16; IO_WORDS],
    bg_palette: [u16; PALETTE_ENTRIES],
    obj_palette: [u16; PALETTE_ENTRIES],
    vram: Vec<u16>,
    oam: [u16; OAM_ENTRIES * OAM_ENTRY_WORDS],

    vcount: u16,
    frame: u64,
    flushed_this_frame: bool,

    input: InputSource,
    stats: SimStats,
}

impl SimDevice {
    pub fn new(input: InputSource) -> Self {
        Self {
            io: [0; IO_WORDS],
            bg_palette: [0; PALETTE_ENTRIES],
            obj_palette: [0; PALETTE_ENTRIES],
            vram: vec![0; VRAM_WORDS],
            oam: [0; OAM_ENTRIES * OAM_ENTRY_WORDS],
            vcount: 0,
            frame: 0,
            flushed_this_frame: false,
            input,
            stats: SimStats::default(),
        }
    }

    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    pub fn in_vblank(&self) -> bool {
        self.vcount >= VBLANK_LINE
    }

    pub fn register(&self, register: Register) -> u16 {
        self.io[io_index(register)]
    }

    /// Last committed `(horizontal, vertical)` scroll of `layer`.
    pub fn scroll(&self, layer: u8) -> (u16, u16) {
        (
            self.register(Register::BgHScroll(layer)),
            self.register(Register::BgVScroll(layer)),
        )
    }

    pub fn bg_palette(&self) -> &[u16] {
        &self.bg_palette
    }

    pub fn obj_palette(&self) -> &[u16] {
        &self.obj_palette
    }

    /// Contents of `region` as last written.
    pub fn region(&self, region: Region) -> &[u16] {
        match region {
            Region::BgPalette => &self.bg_palette,
            Region::ObjPalette => &self.obj_palette,
            Region::Oam => &self.oam,
            Region::CharBlock(_) | Region::ScreenBlock(_) | Region::ObjTiles => {
                let start = vram_offset(region);
                &self.vram[start..start + region.capacity_words()]
            }
        }
    }

    pub fn oam(&self) -> &[u16] {
        &self.oam
    }

    /// Hardware sprite `index` as the display would read it.
    pub fn sprite(&self, index: usize) -> SpriteAttributes {
        let words = &self.oam[index * OAM_ENTRY_WORDS..][..OAM_ENTRY_WORDS];
        SpriteAttributes {
            attr0: words[0],
            attr1: words[1],
            attr2: words[2],
            attr3: words[3],
        }
    }

    pub fn visible_sprites(&self) -> usize {
        (0..OAM_ENTRIES).filter(|&i| self.sprite(i).is_visible()).count()
    }
}

fn io_index(register: Register) -> usize {
    (register.address() - IO_BASE) as usize / 2
}

/// Halfword offset of a VRAM region inside [`SimDevice::vram`].
fn vram_offset(region: Region) -> usize {
    match region {
        Region::ObjTiles => (OBJ_TILES_BASE - VRAM_BASE) as usize / 2,
        _ => (region.address() - VRAM_BASE) as usize / 2,
    }
}

impl Device for SimDevice {
    fn write_register(&mut self, register: Register, value: u16) {
        trace!("{register:?} <- {value:#06x}");
        self.io[io_index(register)] = value;
    }

    fn bulk_copy(&mut self, dest: Region, source: &[u16]) {
        let capacity = dest.capacity_words();
        let len = if source.len() > capacity {
            warn!(
                "copy of {} words overruns {:?} ({} words), truncated",
                source.len(),
                dest,
                capacity
            );
            self.stats.overruns += 1;
            capacity
        } else {
            source.len()
        };

        if dest == Region::Oam {
            self.stats.oam_flushes += 1;
            if !self.in_vblank() {
                warn!("sprite table flushed during the visible scan of frame {}", self.frame);
                self.stats.tearing += 1;
            }
            if self.flushed_this_frame {
                warn!("sprite table flushed twice in frame {}", self.frame);
                self.stats.double_flushes += 1;
            }
            self.flushed_this_frame = true;
        }

        let target: &mut [u16] = match dest {
            Region::BgPalette => &mut self.bg_palette,
            Region::ObjPalette => &mut self.obj_palette,
            Region::Oam => &mut self.oam,
            Region::CharBlock(_) | Region::ScreenBlock(_) | Region::ObjTiles => {
                let start = vram_offset(dest);
                &mut self.vram[start..start + capacity]
            }
        };
        target[..len].copy_from_slice(&source[..len]);

        self.stats.copies += 1;
        self.stats.words_copied += len as u64;
    }

    fn poll_input(&mut self) -> Buttons {
        if self.in_vblank() {
            // the game reads input at the top of the frame
            self.vcount = 0;
        }
        let buttons = self.input.sample(self.stats.polls);
        self.stats.polls += 1;
        buttons
    }

    fn wait_vblank(&mut self) {
        self.frame += 1;
        self.vcount = VBLANK_LINE;
        self.flushed_this_frame = false;
        self.stats.vblanks += 1;
    }

    fn delay(&mut self, amount: u32) {
        self.stats.delay_units += u64::from(amount);
    }
}

#[cfg(test)]
mod tests {
    use tilebrawl::{SpriteSize, SpriteTable};

    use super::*;

    fn device() -> SimDevice {
        SimDevice::new(InputSource::Idle)
    }

    #[test]
    fn registers_are_stored_by_address() {
        let mut dev = device();
        dev.write_register(Register::BgHScroll(1), 0x1FE);
        dev.write_register(Register::BgVScroll(1), 3);
        assert_eq!(dev.scroll(1), (0x1FE, 3));
        assert_eq!(dev.scroll(0), (0, 0));
    }

    #[test]
    fn vram_regions_alias() {
        let mut dev = device();
        dev.bulk_copy(Region::CharBlock(2), &[7; 4]);
        // char block 2 starts where screen block 16 does
        assert_eq!(&dev.region(Region::ScreenBlock(16))[..4], &[7; 4]);

        dev.bulk_copy(Region::ObjTiles, &[9, 9]);
        assert_eq!(&dev.region(Region::ObjTiles)[..3], &[9, 9, 0]);
        assert_eq!(dev.region(Region::ObjTiles).len(), 0x4000);
    }

    #[test]
    fn oversized_copies_are_truncated() {
        let mut dev = device();
        dev.bulk_copy(Region::BgPalette, &[1; 300]);
        assert_eq!(dev.stats().overruns, 1);
        assert_eq!(dev.stats().words_copied, 256);
        assert!(dev.bg_palette().iter().all(|&c| c == 1));
    }

    #[test]
    fn flush_outside_vblank_tears() {
        let mut dev = device();
        dev.bulk_copy(Region::Oam, &[0; 512]);
        assert_eq!(dev.stats().tearing, 1);

        dev.wait_vblank();
        dev.bulk_copy(Region::Oam, &[0; 512]);
        assert_eq!(dev.stats().tearing, 1);
        dev.bulk_copy(Region::Oam, &[0; 512]);
        assert_eq!(dev.stats().double_flushes, 1);

        // polling starts the visible part of the next frame
        dev.poll_input();
        assert!(!dev.in_vblank());
        dev.bulk_copy(Region::Oam, &[0; 512]);
        assert_eq!(dev.stats().tearing, 2);
    }

    #[test]
    fn sprites_decode_from_oam() {
        let mut dev = device();
        let mut table = SpriteTable::new();
        table.clear_all();
        let sprite = table.allocate(12, 34, SpriteSize::S16x32, true, false, 16, 0);
        dev.wait_vblank();
        table.flush(&mut dev);

        assert_eq!(dev.sprite(sprite.index()), *table.get(sprite));
        assert_eq!(dev.sprite(sprite.index()).x(), 12);
        assert_eq!(dev.visible_sprites(), 1);
    }

    #[test]
    fn cleared_table_shows_no_sprites() {
        let mut dev = device();
        let mut table = SpriteTable::new();
        table.clear_all();
        for i in 0..OAM_ENTRIES as i32 {
            table.allocate(i % 224, i % 128, SpriteSize::S8x8, false, false, 0, 0);
        }
        dev.wait_vblank();
        table.flush(&mut dev);
        assert_eq!(dev.visible_sprites(), OAM_ENTRIES);

        table.clear_all();
        dev.wait_vblank();
        table.flush(&mut dev);
        assert_eq!(dev.visible_sprites(), 0);
        assert_eq!(dev.stats().tearing, 0);
    }

    #[test]
    fn delays_accumulate() {
        let mut dev = device();
        dev.delay(300);
        dev.delay(5);
        assert_eq!(dev.stats().delay_units, 305);
    }
}
