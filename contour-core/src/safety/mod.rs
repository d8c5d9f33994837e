//! Safety supervision
//!
//! Two shared flags and the two watchers that set them. The user-abort
//! watcher requests a graceful early stop; the tilt watcher latches a
//! fault, stops every motor and ends the scan.

pub mod flags;
pub mod tilt;
pub mod watchers;

pub use flags::AbortFlags;
pub use tilt::TiltEnvelope;
pub use watchers::{TiltWatcher, UserAbortWatcher};
