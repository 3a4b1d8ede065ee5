//! # Frame Synchronisation
//!
//! The display draws scanlines 0-159 and then idles through lines 160-227
//! (vertical blank). Writes to OAM and the scroll registers are only
//! guaranteed tear-free inside that window, so each frame starts with
//! [`FrameSync::wait`]:
//!
//! ```ignore
//! loop {
//!     let frame = console.sync.wait(&mut console.hw);
//!     // update state...
//!     oam.flush(&mut console, &frame)?;
//! }
//! ```
//!
//! The wait busy-polls VCOUNT. It has no timeout: if the display stops,
//! the loop stops with it.

use log::trace;

use crate::{
    hw::Hardware,
    scr::{HEIGHT, REG_VCOUNT},
};

const VBLANK_START: u16 = HEIGHT as u16;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SyncMode {
    /// Return as soon as VCOUNT is in the blank region, even if this vblank
    /// was already observed by the previous call.
    Level,
    /// Wait for the display to leave vblank, then enter it again, so every
    /// call sees a fresh vblank.
    Edge,
}

/// Proof that the caller is inside a vertical blank.
///
/// Only [`FrameSync::wait`] produces one.
#[must_use]
#[derive(Debug)]
pub struct Frame {
    pub(crate) number: u32,
}

impl Frame {
    pub fn number(&self) -> u32 {
        self.number
    }
}

#[derive(Debug)]
pub struct FrameSync {
    mode: SyncMode,
    frames: u32,
}

impl FrameSync {
    pub const fn new(mode: SyncMode) -> Self {
        Self { mode, frames: 0 }
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Frames waited for so far.
    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Block until the display is in vertical blank.
    pub fn wait<H: Hardware>(&mut self, hw: &mut H) -> Frame {
        if self.mode == SyncMode::Edge {
            while hw.read_u16(REG_VCOUNT) >= VBLANK_START {}
        }
        while hw.read_u16(REG_VCOUNT) < VBLANK_START {}

        self.frames = self.frames.wrapping_add(1);
        trace!("vblank {}", self.frames);
        Frame { number: self.frames }
    }

    /// End-of-frame busy delay.
    #[inline]
    pub fn pace<H: Hardware>(&self, hw: &mut H, ticks: u32) {
        hw.delay(ticks);
    }
}
