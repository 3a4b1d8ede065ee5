//! # Console
//!
//! [`Console`] bundles the hardware with the state the SDK keeps beside it:
//! a shadow of the display control register, the bulk transfer channel, the
//! frame synchroniser and the keypad sampler.
//!
//! | Field     | Type               | Use For                                  |
//! |-----------|--------------------|------------------------------------------|
//! | `hw`      | `H: Hardware`      | Raw register access                      |
//! | `display` | [`DisplayControl`] | Shadow of DISPCNT                        |
//! | `dma`     | [`Channel`]        | Block copies into video memory           |
//! | `sync`    | [`FrameSync`]      | Waiting for vblank, frame pacing         |
//! | `keypad`  | [`Keypad`]         | Button state, sampled once per frame     |

use log::info;

use crate::{
    error::Result,
    hw::Hardware,
    input::Keypad,
    scr::{DisplayControl, REG_DISPCNT},
    video_dma::{
        Channel, TransferPolicy, TransferWidth,
        vsync::{Frame, FrameSync, SyncMode},
    },
};

pub struct Console<H: Hardware> {
    pub hw: H,
    /// Shadow copy of DISPCNT
    pub display: DisplayControl,
    pub dma: Channel,
    pub sync: FrameSync,
    pub keypad: Keypad,
}

impl<H: Hardware> Console<H> {
    /// Take over the hardware: mode 0, background 0 and sprites on,
    /// one-dimensional sprite tile mapping.
    pub fn init(hw: H, sync: SyncMode, transfers: TransferPolicy) -> Self {
        let display = DisplayControl::MODE0
            | DisplayControl::BG0_ENABLE
            | DisplayControl::OBJ_ENABLE
            | DisplayControl::OBJ_MAP_1D;

        let mut console = Self {
            hw,
            display,
            dma: Channel::new(transfers),
            sync: FrameSync::new(sync),
            keypad: Keypad::new(),
        };
        console.write_display_control();
        info!("console up, dispcnt={:#06X}, {:?} sync", display.bits(), sync);
        console
    }

    /// Write the current `display` shadow to hardware.
    ///
    /// DISPCNT is stored as a full word, which also clears the undocumented
    /// register above it.
    #[inline(always)]
    pub fn write_display_control(&mut self) {
        self.hw.write_u32(REG_DISPCNT, self.display.bits() as u32);
    }

    #[inline]
    pub fn wait_vblank(&mut self) -> Frame {
        self.sync.wait(&mut self.hw)
    }

    #[inline]
    pub fn transfer(&mut self, destination: u32, source: &[u16], width: TransferWidth) -> Result<()> {
        self.dma.transfer(&mut self.hw, destination, source, width)
    }

    #[inline]
    pub fn read_keypad(&mut self) -> &Keypad {
        self.keypad.read(&mut self.hw);
        &self.keypad
    }

    #[inline]
    pub fn pace(&mut self, ticks: u32) {
        self.sync.pace(&mut self.hw, ticks);
    }
}
