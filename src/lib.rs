// TourBox Elite Linux Driver - Shared Library
// Settings compilation, device protocol, and key injection

pub mod config;
pub mod controls;
pub mod decoder;
pub mod focus;
pub mod inject;
pub mod keycodes;
pub mod playback;
pub mod profile;
pub mod session;
pub mod setup_frame;
pub mod transport;

pub use config::{compile, CompileOutput, Diagnostic};
pub use controls::{Control, MomentaryControl, RotaryWidget, TurnDirection};
pub use decoder::{Decoded, InputDecoder, Trigger};
pub use profile::{Profile, ProfileId, ProfileStore};
pub use session::Session;
