//! Request handlers.
//!
//! Handlers own the measure lifecycle orchestration (validate → duplicate
//! guard → extract → store image → insert row) and delegate persistence to
//! `meterflow_db` repositories, mapping errors via [`crate::error::AppError`].

pub mod measures;
