//! View model
//!
//! Plain-Rust state for a translation front end: the input form, the
//! displayed result with its status, and the controller that runs
//! translations against it.

mod form;
mod state;
mod translator;

pub use form::TranslationForm;
pub use state::{TranslationStatus, TranslationView, ViewSink};
pub use translator::Translator;
