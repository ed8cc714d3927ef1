//! Q-value triage math utilities.

pub mod math;

pub use math::beta::*;
pub use math::posterior::*;
pub use math::stable::*;
