//! Core math modules.

pub mod beta;
pub mod posterior;
pub mod stable;
