//! Host-side tooling for shambles: a simulated bus the game runs against
//! unchanged, and placeholder art so it has something to upload.

pub mod assets;
pub mod bus;

pub use assets::PlaceholderAssets;
pub use bus::SimBus;
