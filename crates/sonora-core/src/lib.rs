//! sonora-core
//!
//! Pure domain types for the audiology practice: patients, clinical exam
//! records, the age resolver and the pure-tone average calculator, plus the
//! object key layout. No AWS SDK dependency.

pub mod age;
pub mod error;
pub mod keys;
pub mod models;
pub mod pta;
pub mod validation;
