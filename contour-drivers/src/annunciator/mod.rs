//! Annunciator implementations
//!
//! - Buzzer: PWM piezo chime, one beep per audible event
//! - Channel: fans events from several tasks into one consumer

pub mod buzzer;
pub mod channel;

pub use buzzer::{beep_count, Buzzer, BuzzerConfig};
pub use channel::{forward, ChannelAnnunciator};
