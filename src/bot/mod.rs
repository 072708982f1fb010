//! Bot module - Core bot functionality.

pub mod actions;
pub mod dispatcher;
mod runtime;
pub mod webhook;

use teloxide::adaptors::Throttle;
use teloxide::prelude::*;

pub use actions::{TelegramActions, UpdateProcessor};
pub use runtime::run;

/// Bot type with Throttle adaptor for automatic rate limiting.
pub type ThrottledBot = Throttle<Bot>;
