//! # Hardware Capability Set
//!
//! Everything the core needs from the machine goes through [`Hardware`]:
//! register reads and writes, the DMA3 bulk copy, and a crude busy delay.
//! The cartridge build implements it over real memory-mapped I/O
//! ([`Mmio`](crate::mmio::Mmio)); host builds and tests implement it over
//! plain arrays.

/// Register-level access to the display hardware.
///
/// Addresses are absolute bus addresses (see [`scr`](crate::scr)).
pub trait Hardware {
    fn read_u16(&mut self, address: u32) -> u16;

    fn write_u16(&mut self, address: u32, value: u16);

    fn write_u32(&mut self, address: u32, value: u32);

    /// Program DMA3 with `source`, `destination` and the packed control word.
    ///
    /// The count in the low half of `control` is authoritative; `source` must
    /// hold at least that many elements.
    fn start_transfer(&mut self, destination: u32, source: &[u16], control: u32);

    /// True while a previously started transfer has not completed.
    fn transfer_busy(&mut self) -> bool {
        false
    }

    /// Busy-wait pacing, not tied to wall-clock time.
    fn delay(&mut self, ticks: u32) {
        for i in 0..ticks.saturating_mul(10) {
            core::hint::black_box(i);
        }
    }
}

impl<H: Hardware + ?Sized> Hardware for &mut H {
    #[inline(always)]
    fn read_u16(&mut self, address: u32) -> u16 {
        (**self).read_u16(address)
    }

    #[inline(always)]
    fn write_u16(&mut self, address: u32, value: u16) {
        (**self).write_u16(address, value)
    }

    #[inline(always)]
    fn write_u32(&mut self, address: u32, value: u32) {
        (**self).write_u32(address, value)
    }

    #[inline(always)]
    fn start_transfer(&mut self, destination: u32, source: &[u16], control: u32) {
        (**self).start_transfer(destination, source, control)
    }

    #[inline(always)]
    fn transfer_busy(&mut self) -> bool {
        (**self).transfer_busy()
    }

    #[inline(always)]
    fn delay(&mut self, ticks: u32) {
        (**self).delay(ticks)
    }
}
