//! # shambles
//!
//! A survivor dodges falling zombies on a scrolling tile background.
//!
//! The crate splits into a thin hardware layer and the game on top of it:
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`scr`]       | Screen geometry, register addresses, register flag types   |
//! | [`hw`]        | The [`Hardware`](hw::Hardware) trait all access goes through |
//! | [`mmio`]      | Volatile implementation of `Hardware` for the real console |
//! | [`console`]   | Hardware plus shadow state (display, DMA, vsync, keypad)   |
//! | [`video_dma`] | Bulk transfers, vblank sync, sprite table, background      |
//! | [`input`]     | Keypad sampling and movement intent                        |
//! | [`game`]      | Survivor, zombies, collisions and the frame loop           |
//! | [`config`]    | Every tunable of the frame loop                            |
//!
//! Nothing here touches memory directly except [`mmio`], so the whole game
//! runs unchanged against a simulated bus.

#![no_std]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod hw;
pub mod input;
pub mod mmio;
pub mod scr;
pub mod video_dma;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
