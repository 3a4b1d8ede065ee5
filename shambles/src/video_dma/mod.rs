//! # Video Memory & Bulk Transfers
//!
//! Everything that reaches video memory goes through DMA channel 3, wrapped
//! by [`Channel`]. The channel never lets two transfers overlap: if one is
//! still running, it either waits for it or refuses, depending on
//! [`TransferPolicy`].
//!
//! ```ignore
//! console.dma.transfer(&mut console.hw, scr::BG_PALETTE, &PALETTE, TransferWidth::Half)?;
//! ```
//!
//! Submodules:
//! - [`vsync`]: waiting for vertical blank
//! - [`oam`]: the object attribute table (hardware sprites)
//! - [`background`]: tiled background setup and scrolling

pub mod background;
pub mod oam;
pub mod vsync;

use log::{trace, warn};

use crate::{
    error::{Error, Field, Result},
    hw::Hardware,
    scr::{DmaFlags, dma_control_word},
};

/// Largest element count the channel accepts in one transfer.
pub const MAX_TRANSFER: usize = 0x4000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransferWidth {
    /// 16-bit elements.
    Half,
    /// 32-bit elements; the source is read as pairs of half-words.
    Word,
}

impl TransferWidth {
    #[inline(always)]
    pub const fn bytes(self) -> u32 {
        match self {
            TransferWidth::Half => 2,
            TransferWidth::Word => 4,
        }
    }

    #[inline(always)]
    const fn flags(self) -> DmaFlags {
        match self {
            TransferWidth::Half => DmaFlags::ENABLE,
            TransferWidth::Word => DmaFlags::ENABLE.union(DmaFlags::WORD),
        }
    }
}

/// What to do when a transfer is requested while one is still running.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransferPolicy {
    /// Fail with [`Error::TransferInProgress`].
    Reject,
    /// Poll the channel until it is idle, then start.
    Wait,
}

/// The bulk transfer channel (DMA3).
#[derive(Debug)]
pub struct Channel {
    policy: TransferPolicy,
    issued: u32,
}

impl Channel {
    pub const fn new(policy: TransferPolicy) -> Self {
        Self { policy, issued: 0 }
    }

    pub fn policy(&self) -> TransferPolicy {
        self.policy
    }

    /// Number of transfers started since creation.
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Copy `source` to the memory-mapped `destination`.
    ///
    /// The element count is derived from `source` and `width`. On return the
    /// transfer has been started; completion is only observable through
    /// [`Hardware::transfer_busy`].
    pub fn transfer<H: Hardware>(
        &mut self,
        hw: &mut H,
        destination: u32,
        source: &[u16],
        width: TransferWidth,
    ) -> Result<()> {
        if source.is_empty() {
            return Err(Error::EmptyTransfer);
        }

        let align = width.bytes();
        if destination % align != 0 {
            return Err(Error::Misaligned { address: destination, align });
        }

        let count = match width {
            TransferWidth::Half => source.len(),
            TransferWidth::Word => {
                if source.len() % 2 != 0 {
                    return Err(Error::OddWordLength { len: source.len() });
                }
                let address = source.as_ptr() as usize as u32;
                if address % align != 0 {
                    return Err(Error::Misaligned { address, align });
                }
                source.len() / 2
            }
        };

        if count > MAX_TRANSFER {
            return Err(Error::ValueOutOfRange {
                field: Field::TransferCount,
                value: count as i32,
                max: MAX_TRANSFER as i32,
            });
        }

        if hw.transfer_busy() {
            match self.policy {
                TransferPolicy::Reject => return Err(Error::TransferInProgress),
                TransferPolicy::Wait => {
                    warn!("dma3 busy, waiting before transfer to {:#010X}", destination);
                    while hw.transfer_busy() {}
                }
            }
        }

        trace!(
            "dma3 {:?} x{} -> {:#010X}",
            width, count, destination
        );
        hw.start_transfer(destination, source, dma_control_word(count as u16, width.flags()));
        self.issued = self.issued.wrapping_add(1);
        Ok(())
    }
}
