//! Streaming Module
//!
//! Incremental consumption of the translation event stream:
//! - UTF-8 safe chunk decoding
//! - `"\n\n"` frame reassembly across read boundaries
//! - frame parsing into `TranslationStreamEvent`s
//! - sessions, sinks and stale-session suppression

mod decoder;
mod events;
mod frame;
mod session;
mod utf8_decoder;

pub use decoder::*;
pub use events::*;
pub use frame::*;
pub use session::*;
pub use utf8_decoder::*;
