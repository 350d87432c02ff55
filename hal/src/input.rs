use bitflags::bitflags;

bitflags! {
    /// Keypad buttons, in `KEYINPUT` bit order.
    ///
    /// The hardware register is active-low; [`Buttons`] is always
    /// active-high. Convert with [`Buttons::from_keyinput`].
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u16 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
    }
}

impl Buttons {
    /// Decode a raw `KEYINPUT` sample (0 = pressed).
    #[inline(always)]
    pub const fn from_keyinput(raw: u16) -> Self {
        Self::from_bits_truncate(!raw)
    }

    /// Encode as the raw `KEYINPUT` value the hardware would report.
    #[inline(always)]
    pub const fn to_keyinput(self) -> u16 {
        !self.bits() & Self::all().bits()
    }

    /// Look a button up by name, ignoring case, as written in input scripts.
    pub fn parse_name(name: &str) -> Option<Self> {
        let mut buf = [0u8; 8];
        let bytes = name.as_bytes();
        if bytes.len() > buf.len() {
            return None;
        }
        for (dst, src) in buf.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }
        let upper = core::str::from_utf8(&buf[..bytes.len()]).ok()?;
        Self::from_name(upper)
    }
}

/// Keypad state with one frame of history.
///
/// Call [`Gamepad::update`] once per frame with a fresh sample, then query
/// levels with [`is_pressed`](Gamepad::is_pressed) or edges with
/// [`just_pressed`](Gamepad::just_pressed).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Gamepad {
    pub buttons: Buttons,
    pub buttons_last: Buttons,
}

impl Gamepad {
    pub const fn new() -> Self {
        Self {
            buttons: Buttons::empty(),
            buttons_last: Buttons::empty(),
        }
    }

    #[inline]
    pub fn update(&mut self, sample: Buttons) {
        self.buttons_last = self.buttons;
        self.buttons = sample;
    }

    /// True if any button in `mask` is held.
    #[inline]
    pub fn is_pressed(&self, mask: Buttons) -> bool {
        self.buttons.intersects(mask)
    }

    #[inline]
    pub fn was_pressed(&self, mask: Buttons) -> bool {
        self.buttons_last.intersects(mask)
    }

    /// Returns true only on the frame the button was first pressed (edge-trigger).
    #[inline]
    pub fn just_pressed(&self, mask: Buttons) -> bool {
        self.is_pressed(mask) && !self.was_pressed(mask)
    }
}
