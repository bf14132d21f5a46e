//! Output formatting helpers

pub mod json;
pub mod table;
