//! Digital sensor implementations
//!
//! - Endstops: touch or light-gate boundary sensors on a GPIO input
//! - Abort panel: operator buttons and the abort colour marker

pub mod abort_panel;
pub mod endstop;

pub use abort_panel::AbortPanel;
pub use endstop::Endstop;
