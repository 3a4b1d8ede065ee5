use crate::{
    hw::Hardware,
    scr::{Buttons, REG_KEYINPUT},
};

/// What the survivor should do this frame. Exactly one per frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Intent {
    Right,
    Left,
    Up,
    Down,
    Stop,
}

/// Keypad state, sampled once per frame.
///
/// Keeps the previous sample too, for edge-triggered checks.
#[derive(Debug, Copy, Clone)]
pub struct Keypad {
    pub buttons: Buttons,
    pub buttons_last: Buttons,
}

impl Keypad {
    pub const fn new() -> Self {
        Self {
            buttons: Buttons::empty(),
            buttons_last: Buttons::empty(),
        }
    }

    /// Sample KEYINPUT.
    #[inline(always)]
    pub fn read<H: Hardware>(&mut self, hw: &mut H) {
        self.buttons_last = self.buttons;
        self.buttons = Buttons::from_keyinput(hw.read_u16(REG_KEYINPUT));
    }

    #[inline]
    pub fn is_pressed(&self, button: Buttons) -> bool {
        self.buttons.contains(button)
    }

    #[inline]
    pub fn was_pressed(&self, button: Buttons) -> bool {
        self.buttons_last.contains(button)
    }

    /// Returns true only on the frame the button was first pressed (edge-trigger).
    #[inline]
    pub fn just_pressed(&self, button: Buttons) -> bool {
        self.is_pressed(button) && !self.was_pressed(button)
    }

    /// Returns true only on the frame the button was released (edge-trigger).
    #[inline]
    pub fn just_released(&self, button: Buttons) -> bool {
        !self.is_pressed(button) && self.was_pressed(button)
    }

    /// Pick the single movement for this frame.
    ///
    /// Horizontal input wins outright: while right or left is held, up and
    /// down are ignored. Right beats left, up beats down.
    pub fn intent(&self) -> Intent {
        if self.is_pressed(Buttons::RIGHT) {
            Intent::Right
        } else if self.is_pressed(Buttons::LEFT) {
            Intent::Left
        } else if self.is_pressed(Buttons::UP) {
            Intent::Up
        } else if self.is_pressed(Buttons::DOWN) {
            Intent::Down
        } else {
            Intent::Stop
        }
    }
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new()
    }
}
