//! Pure domain logic for the meterflow reading service.
//!
//! Everything here is side-effect free: measure types and submission
//! validation, the duplicate-detection month window, the numeric-token
//! extraction rule, and the stored-image filename convention. Database and
//! network access live in `meterflow-db` and `meterflow-vision`.

pub mod error;
pub mod extraction;
pub mod measure;
pub mod naming;
pub mod types;
