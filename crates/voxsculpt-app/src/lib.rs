//! The sculpting session and the pieces the interactive shell drives it with.

pub mod platform;
pub mod script;
pub mod sculpt_tick;
pub mod session;

pub use sculpt_tick::SculptTicker;
pub use session::{SculptReport, SculptSession, SessionError, TextureBuffers};
