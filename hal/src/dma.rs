//! # DMA Copy Engine
//!
//! Channel 3 is the general-purpose memory copy channel.
//!
//! | Address       | Name       | Description                            |
//! |---------------|------------|----------------------------------------|
//! | `0x0400_00D4` | DMA3SAD    | Source address                         |
//! | `0x0400_00D8` | DMA3DAD    | Destination address                    |
//! | `0x0400_00DC` | DMA3CNT    | Word count (low 16) and control (high) |
//!
//! Writing the control word with `ENABLE` set starts the transfer. The
//! engine clears `ENABLE` when it is done; [`DmaChannel::copy16`] spins on
//! that bit so callers never observe a half-written destination.

use bit_field::BitField;
use bitflags::bitflags;
use volatile_register::{RW, WO};

const DMA3: usize = 0x0400_00D4;

/// Largest count one transfer accepts.
pub const MAX_TRANSFER_WORDS: usize = 0xFFFF;

bitflags! {
    /// High half of `DMAxCNT`, pre-shifted into the full 32-bit word.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct DmaControl: u32 {
        /// Immediate start, 16-bit units, both addresses incrementing.
        const ENABLE = 1 << 31;
    }
}

#[repr(C)]
pub struct DmaChannel {
    pub source: WO<u32>,
    pub destination: WO<u32>,
    pub control: RW<u32>,
}

impl DmaChannel {
    /// Get a reference to channel 3 at `0x0400_00D4`.
    ///
    /// # Safety
    ///
    /// Only valid on the console, and only one reference may be live.
    #[inline(always)]
    pub unsafe fn channel3() -> &'static mut DmaChannel {
        unsafe { &mut *(DMA3 as *mut DmaChannel) }
    }

    #[inline(always)]
    pub fn is_busy(&self) -> bool {
        self.control.read().get_bit(31)
    }

    /// Spin until the current transfer has finished.
    #[inline(always)]
    pub fn wait_idle(&self) {
        while self.is_busy() {
            core::hint::spin_loop();
        }
    }

    /// Copy `count` halfwords and wait for completion.
    ///
    /// # Safety
    ///
    /// `source` and `dest` must be valid for `count` halfwords.
    #[inline(always)]
    pub unsafe fn copy16(&mut self, dest: *mut u16, source: *const u16, count: u16) {
        if count == 0 {
            // a zero count means 0x10000 to the hardware
            return;
        }
        self.wait_idle();
        unsafe {
            self.source.write(source as usize as u32);
            self.destination.write(dest as usize as u32);
            self.control.write(u32::from(count) | DmaControl::ENABLE.bits());
        }
        self.wait_idle();
    }
}
