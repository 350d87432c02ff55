//! # Sprite Table
//!
//! A RAM shadow of the 128-entry sprite attribute table (OAM). Entities
//! mutate their entry every tick; once per frame, inside vblank, the
//! whole table is copied to hardware with [`SpriteTable::flush`].
//!
//! ## Attribute layout
//!
//! ```text
//! attr0  15 14 | 13 | 12 | 11 10 | 9 8 | 7 .. 0
//!        shape | c  | m  | mode  | obj |   y
//!
//! attr1  15 14 | 13 | 12 | 11 10 9 | 8 .. 0
//!        size  | vf | hf |    -    |   x (9-bit, wraps)
//!
//! attr2  15 .. 12 | 11 10 | 9 .. 0
//!        palette  | prio  | tile index
//! ```
//!
//! Position fields are masked to their width on write. An `x` of -3
//! becomes 509, which the hardware reads back as -3; that wraparound is
//! how sprites slide off the left edge.

use core::fmt;

use bit_field::BitField;
use bytemuck::{Pod, Zeroable};
use log::trace;
use tilebrawl_hal::{Device, OAM_ENTRIES, Region, SCREEN_HEIGHT, SCREEN_WIDTH};

const Y_BITS: core::ops::Range<usize> = 0..8;
const X_BITS: core::ops::Range<usize> = 0..9;
const SHAPE_BITS: core::ops::Range<usize> = 14..16;
const SIZE_BITS: core::ops::Range<usize> = 14..16;
const TILE_BITS: core::ops::Range<usize> = 0..10;
const PRIORITY_BITS: core::ops::Range<usize> = 10..12;
const COLOR_256_BIT: usize = 13;
const HFLIP_BIT: usize = 12;
const VFLIP_BIT: usize = 13;

/// Sprite dimensions, as width × height in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpriteSize {
    S8x8,
    S16x16,
    S32x32,
    S64x64,
    S16x8,
    S32x8,
    S32x16,
    S64x32,
    S8x16,
    S8x32,
    S16x32,
    S32x64,
}

impl SpriteSize {
    pub const ALL: [SpriteSize; 12] = [
        Self::S8x8,
        Self::S16x16,
        Self::S32x32,
        Self::S64x64,
        Self::S16x8,
        Self::S32x8,
        Self::S32x16,
        Self::S64x32,
        Self::S8x16,
        Self::S8x32,
        Self::S16x32,
        Self::S32x64,
    ];

    /// `(shape, size)` codes for attr0 and attr1.
    pub const fn bits(self) -> (u16, u16) {
        match self {
            Self::S8x8 => (0, 0),
            Self::S16x16 => (0, 1),
            Self::S32x32 => (0, 2),
            Self::S64x64 => (0, 3),
            Self::S16x8 => (1, 0),
            Self::S32x8 => (1, 1),
            Self::S32x16 => (1, 2),
            Self::S64x32 => (1, 3),
            Self::S8x16 => (2, 0),
            Self::S8x32 => (2, 1),
            Self::S16x32 => (2, 2),
            Self::S32x64 => (2, 3),
        }
    }

    /// Shape 3 is prohibited by the hardware and has no size.
    pub const fn from_bits(shape: u16, size: u16) -> Option<Self> {
        let row = match shape {
            0 => [Self::S8x8, Self::S16x16, Self::S32x32, Self::S64x64],
            1 => [Self::S16x8, Self::S32x8, Self::S32x16, Self::S64x32],
            2 => [Self::S8x16, Self::S8x32, Self::S16x32, Self::S32x64],
            _ => return None,
        };
        Some(row[(size & 0b11) as usize])
    }

    pub const fn dimensions(self) -> (i32, i32) {
        match self {
            Self::S8x8 => (8, 8),
            Self::S16x16 => (16, 16),
            Self::S32x32 => (32, 32),
            Self::S64x64 => (64, 64),
            Self::S16x8 => (16, 8),
            Self::S32x8 => (32, 8),
            Self::S32x16 => (32, 16),
            Self::S64x32 => (64, 32),
            Self::S8x16 => (8, 16),
            Self::S8x32 => (8, 32),
            Self::S16x32 => (16, 32),
            Self::S32x64 => (32, 64),
        }
    }

    pub const fn width(self) -> i32 {
        self.dimensions().0
    }

    pub const fn height(self) -> i32 {
        self.dimensions().1
    }
}

/// One packed hardware sprite descriptor.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct SpriteAttributes {
    pub attr0: u16,
    pub attr1: u16,
    pub attr2: u16,
    /// Affine parameter slot; unused by regular sprites.
    pub attr3: u16,
}

impl SpriteAttributes {
    pub fn new(
        x: i32,
        y: i32,
        size: SpriteSize,
        horizontal_flip: bool,
        vertical_flip: bool,
        tile_index: u16,
        priority: u8,
    ) -> Self {
        let (shape, size) = size.bits();
        let mut attr = Self::default();
        attr.attr0.set_bit(COLOR_256_BIT, true);
        attr.attr0.set_bits(SHAPE_BITS, shape);
        attr.attr1.set_bits(SIZE_BITS, size);
        attr.set_position(x, y);
        attr.set_horizontal_flip(horizontal_flip);
        attr.set_vertical_flip(vertical_flip);
        attr.set_tile_index(tile_index);
        attr.attr2.set_bits(PRIORITY_BITS, u16::from(priority & 0b11));
        attr
    }

    /// Parked below and right of the screen, as [`SpriteTable::clear_all`] leaves every slot.
    pub const fn off_screen() -> Self {
        Self {
            attr0: SCREEN_HEIGHT as u16,
            attr1: SCREEN_WIDTH as u16,
            attr2: 0,
            attr3: 0,
        }
    }

    /// Horizontal position, sign-extended from 9 bits.
    pub fn x(&self) -> i32 {
        let raw = self.attr1.get_bits(X_BITS) as i32;
        if raw >= 256 { raw - 512 } else { raw }
    }

    pub fn y(&self) -> i32 {
        i32::from(self.attr0.get_bits(Y_BITS))
    }

    pub fn size(&self) -> Option<SpriteSize> {
        SpriteSize::from_bits(self.attr0.get_bits(SHAPE_BITS), self.attr1.get_bits(SIZE_BITS))
    }

    pub fn horizontal_flip(&self) -> bool {
        self.attr1.get_bit(HFLIP_BIT)
    }

    pub fn vertical_flip(&self) -> bool {
        self.attr1.get_bit(VFLIP_BIT)
    }

    pub fn tile_index(&self) -> u16 {
        self.attr2.get_bits(TILE_BITS)
    }

    pub fn priority(&self) -> u8 {
        self.attr2.get_bits(PRIORITY_BITS) as u8
    }

    pub fn color_256(&self) -> bool {
        self.attr0.get_bit(COLOR_256_BIT)
    }

    /// Rewrites only the position fields. Out-of-range values wrap to the
    /// field width.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.attr0.set_bits(Y_BITS, (y & 0xFF) as u16);
        self.attr1.set_bits(X_BITS, (x & 0x1FF) as u16);
    }

    pub fn set_horizontal_flip(&mut self, flip: bool) {
        self.attr1.set_bit(HFLIP_BIT, flip);
    }

    pub fn set_vertical_flip(&mut self, flip: bool) {
        self.attr1.set_bit(VFLIP_BIT, flip);
    }

    /// Rewrites the tile index, leaving priority and palette alone.
    pub fn set_tile_index(&mut self, tile_index: u16) {
        self.attr2.set_bits(TILE_BITS, tile_index & 0x3FF);
    }

    /// Whether any pixel of the sprite lands inside the 240×160 screen.
    pub fn is_visible(&self) -> bool {
        let Some(size) = self.size() else {
            return false;
        };
        let (width, height) = size.dimensions();
        let (x, y) = (self.x(), self.y());

        let x_visible = x < SCREEN_WIDTH && x + width > 0;
        // y is 8 bits, so tall sprites near 255 wrap onto the top rows
        let y_visible = y < SCREEN_HEIGHT || y + height > 256;
        x_visible && y_visible
    }
}

/// Non-owning handle to a slot of a [`SpriteTable`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpriteRef(u8);

impl SpriteRef {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolExhausted;

impl fmt::Display for PoolExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all {OAM_ENTRIES} sprite slots are allocated")
    }
}

impl core::error::Error for PoolExhausted {}

/// Fixed pool of hardware sprites with a bump allocator.
///
/// Slots are handed out in order and never freed one at a time; the pool
/// is emptied in bulk by [`clear_all`](SpriteTable::clear_all) between rounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteTable {
    slots: [SpriteAttributes; OAM_ENTRIES],
    next: usize,
}

impl Default for SpriteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteTable {
    pub fn new() -> Self {
        Self {
            slots: [SpriteAttributes::off_screen(); OAM_ENTRIES],
            next: 0,
        }
    }

    /// Take the next free slot.
    ///
    /// Running out of slots is a programming error: debug builds panic,
    /// release builds overwrite the last slot.
    #[allow(clippy::too_many_arguments)]
    pub fn allocate(
        &mut self,
        x: i32,
        y: i32,
        size: SpriteSize,
        horizontal_flip: bool,
        vertical_flip: bool,
        tile_index: u16,
        priority: u8,
    ) -> SpriteRef {
        debug_assert!(self.next < OAM_ENTRIES, "{}", PoolExhausted);

        let index = self.next.min(OAM_ENTRIES - 1);
        self.next = (self.next + 1).min(OAM_ENTRIES);
        self.slots[index] = SpriteAttributes::new(
            x,
            y,
            size,
            horizontal_flip,
            vertical_flip,
            tile_index,
            priority,
        );
        SpriteRef(index as u8)
    }

    /// [`allocate`](SpriteTable::allocate) that reports exhaustion instead of asserting.
    #[allow(clippy::too_many_arguments)]
    pub fn try_allocate(
        &mut self,
        x: i32,
        y: i32,
        size: SpriteSize,
        horizontal_flip: bool,
        vertical_flip: bool,
        tile_index: u16,
        priority: u8,
    ) -> Result<SpriteRef, PoolExhausted> {
        if self.next >= OAM_ENTRIES {
            return Err(PoolExhausted);
        }
        Ok(self.allocate(x, y, size, horizontal_flip, vertical_flip, tile_index, priority))
    }

    pub fn get(&self, sprite: SpriteRef) -> &SpriteAttributes {
        &self.slots[sprite.index()]
    }

    /// Slots handed out since the last clear.
    pub fn len(&self) -> usize {
        self.next
    }

    pub fn is_empty(&self) -> bool {
        self.next == 0
    }

    pub fn set_position(&mut self, sprite: SpriteRef, x: i32, y: i32) {
        self.slots[sprite.index()].set_position(x, y);
    }

    /// Move relative to the position stored in the descriptor.
    pub fn move_by(&mut self, sprite: SpriteRef, dx: i32, dy: i32) {
        let attr = &self.slots[sprite.index()];
        let (x, y) = (attr.x(), attr.y());
        self.set_position(sprite, x + dx, y + dy);
    }

    pub fn set_horizontal_flip(&mut self, sprite: SpriteRef, flip: bool) {
        self.slots[sprite.index()].set_horizontal_flip(flip);
    }

    pub fn set_vertical_flip(&mut self, sprite: SpriteRef, flip: bool) {
        self.slots[sprite.index()].set_vertical_flip(flip);
    }

    pub fn set_tile_offset(&mut self, sprite: SpriteRef, offset: u16) {
        self.slots[sprite.index()].set_tile_index(offset);
    }

    /// Empty the pool and park every slot off-screen.
    pub fn clear_all(&mut self) {
        self.next = 0;
        for slot in &mut self.slots {
            slot.attr0 = SCREEN_HEIGHT as u16;
            slot.attr1 = SCREEN_WIDTH as u16;
        }
    }

    /// The 512-halfword image copied to OAM.
    pub fn as_words(&self) -> &[u16] {
        bytemuck::cast_slice(&self.slots)
    }

    /// Copy the whole table to hardware.
    ///
    /// Call once per frame, after [`Device::wait_vblank`]; copying during
    /// the visible scan tears.
    pub fn flush<D: Device>(&self, device: &mut D) {
        trace!("flushing {} sprites", self.next);
        device.bulk_copy(Region::Oam, self.as_words());
    }
}
