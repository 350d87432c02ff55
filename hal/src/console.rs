//! # Console
//!
//! The memory-mapped [`Device`]. Every method is a handful of volatile
//! reads and writes:
//!
//! | Method           | Hardware                                        |
//! |------------------|-------------------------------------------------|
//! | `write_register` | 16-bit store into the I/O page                  |
//! | `bulk_copy`      | DMA channel 3, waited on until complete         |
//! | `poll_input`     | `KEYINPUT` at `0x0400_0130` (active-low)        |
//! | `wait_vblank`    | Spin on `VCOUNT` at `0x0400_0006`               |
//! | `delay`          | Empty counted loop                              |

use crate::{
    device::{Device, Register},
    display::VBLANK_LINE,
    dma::{DmaChannel, MAX_TRANSFER_WORDS},
    input::Buttons,
    memory::Region,
};

/// Read-only scanline counter.
const VCOUNT: *const u16 = 0x0400_0006 as *const u16;
/// Read-only keypad state.
const KEYINPUT: *const u16 = 0x0400_0130 as *const u16;

#[inline(always)]
fn read_vcount() -> u16 {
    unsafe { core::ptr::read_volatile(VCOUNT) }
}

pub struct Console {
    dma: &'static mut DmaChannel,
}

impl Console {
    /// # Safety
    ///
    /// Must run on the console itself, with no other `Console` alive.
    pub unsafe fn new() -> Console {
        Self {
            dma: unsafe { DmaChannel::channel3() },
        }
    }
}

impl Device for Console {
    #[inline(always)]
    fn write_register(&mut self, register: Register, value: u16) {
        unsafe { core::ptr::write_volatile(register.address() as usize as *mut u16, value) }
    }

    fn bulk_copy(&mut self, dest: Region, source: &[u16]) {
        debug_assert!(
            source.len() <= dest.capacity_words(),
            "copy of {} words overruns {:?}",
            source.len(),
            dest
        );
        let len = source.len().min(dest.capacity_words());
        let base = dest.address() as usize as *mut u16;

        let mut copied = 0;
        for chunk in source[..len].chunks(MAX_TRANSFER_WORDS) {
            unsafe {
                self.dma.copy16(base.add(copied), chunk.as_ptr(), chunk.len() as u16);
            }
            copied += chunk.len();
        }
    }

    #[inline(always)]
    fn poll_input(&mut self) -> Buttons {
        Buttons::from_keyinput(unsafe { core::ptr::read_volatile(KEYINPUT) })
    }

    fn wait_vblank(&mut self) {
        // finish any blanking period we are already in, so back-to-back
        // calls are always a whole frame apart
        while read_vcount() >= VBLANK_LINE {
            core::hint::spin_loop();
        }
        while read_vcount() < VBLANK_LINE {
            core::hint::spin_loop();
        }
    }

    fn delay(&mut self, amount: u32) {
        for i in 0..amount.saturating_mul(10) {
            core::hint::black_box(i);
        }
    }
}
