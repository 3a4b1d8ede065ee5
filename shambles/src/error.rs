use thiserror::Error;

/// Attribute or region a range check was applied to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Field {
    TileIndex,
    Priority,
    TransferCount,
    Palette,
    TileData,
    TileMap,
    CharBlock,
    ScreenBlock,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("all {capacity} sprite slots are allocated")]
    OutOfSlots { capacity: usize },

    #[error("sprite handle for slot {index} is stale")]
    StaleHandle { index: u8 },

    #[error("{field:?} value {value} exceeds {max}")]
    ValueOutOfRange { field: Field, value: i32, max: i32 },

    #[error("bulk transfer channel is busy")]
    TransferInProgress,

    #[error("address {address:#010X} is not aligned to {align} bytes")]
    Misaligned { address: u32, align: u32 },

    #[error("bulk transfer source is empty")]
    EmptyTransfer,

    #[error("word transfer source has an odd length of {len} half-words")]
    OddWordLength { len: usize },

    #[error("attribute table already flushed in frame {frame}")]
    AlreadyFlushed { frame: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
