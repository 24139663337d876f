//! Row models and DTOs for the readings table.

pub mod measure;
