use crate::{input::Buttons, memory::Region};

pub const IO_BASE: u32 = 0x0400_0000;

/// Write-only display registers the game touches each frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Register {
    /// `DISPCNT`, see [`DisplayControl`](crate::DisplayControl).
    DisplayControl,
    /// `BGnCNT` for layer 0-3, see [`BgControl`](crate::BgControl).
    BgControl(u8),
    /// `BGnHOFS`, horizontal pixel scroll (9 bits used).
    BgHScroll(u8),
    /// `BGnVOFS`, vertical pixel scroll (9 bits used).
    BgVScroll(u8),
}

impl Register {
    pub const fn address(self) -> u32 {
        match self {
            Register::DisplayControl => IO_BASE,
            Register::BgControl(layer) => IO_BASE + 0x08 + 2 * (layer as u32 & 0b11),
            Register::BgHScroll(layer) => IO_BASE + 0x10 + 4 * (layer as u32 & 0b11),
            Register::BgVScroll(layer) => IO_BASE + 0x12 + 4 * (layer as u32 & 0b11),
        }
    }
}

/// Everything the frame loop needs from the console.
///
/// The game is generic over this trait. [`Console`](crate::console::Console)
/// maps it onto memory-mapped I/O; host builds substitute an in-memory model.
///
/// Single-threaded and cooperative: the only suspension point is
/// [`wait_vblank`](Device::wait_vblank).
pub trait Device {
    fn write_register(&mut self, register: Register, value: u16);

    /// Copy `source` into `dest` as 16-bit words.
    ///
    /// Returns only after the copy has landed, so the destination may be
    /// read back immediately.
    fn bulk_copy(&mut self, dest: Region, source: &[u16]);

    /// Sample the keypad.
    fn poll_input(&mut self) -> Buttons;

    /// Block until the display enters the vertical blanking interval.
    fn wait_vblank(&mut self);

    /// Busy-wait pacing. `amount` is in loop units, not a wall-clock time.
    fn delay(&mut self, amount: u32);
}

impl<D: Device + ?Sized> Device for &mut D {
    fn write_register(&mut self, register: Register, value: u16) {
        (**self).write_register(register, value)
    }

    fn bulk_copy(&mut self, dest: Region, source: &[u16]) {
        (**self).bulk_copy(dest, source)
    }

    fn poll_input(&mut self) -> Buttons {
        (**self).poll_input()
    }

    fn wait_vblank(&mut self) {
        (**self).wait_vblank()
    }

    fn delay(&mut self, amount: u32) {
        (**self).delay(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_addresses_are_distinct_halfwords() {
        let all = [
            Register::DisplayControl,
            Register::BgControl(0),
            Register::BgControl(3),
            Register::BgHScroll(0),
            Register::BgVScroll(0),
            Register::BgHScroll(1),
            Register::BgVScroll(3),
        ];
        for (i, a) in all.iter().enumerate() {
            assert_eq!(a.address() % 2, 0, "{a:?}");
            for b in &all[i + 1..] {
                assert_ne!(a.address(), b.address(), "{a:?} and {b:?}");
            }
        }
    }

    #[test]
    fn known_addresses() {
        assert_eq!(Register::BgControl(0).address(), 0x0400_0008);
        assert_eq!(Register::BgHScroll(0).address(), 0x0400_0010);
        assert_eq!(Register::BgVScroll(0).address(), 0x0400_0012);
        assert_eq!(Register::BgHScroll(1).address(), 0x0400_0014);
    }
}
