//! Test utilities for voice effect testing
//!
//! Signal generators producing `AudioBuffer`s at any channel count, plus the
//! few level measurements the tests compare renders with.

pub mod analysis;
pub mod signals;

pub use analysis::*;
pub use signals::*;
