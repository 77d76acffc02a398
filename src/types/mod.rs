//! Wire types for the translation and history services.

pub mod health;
pub mod history;
pub mod translation;

pub use health::*;
pub use history::*;
pub use translation::*;
