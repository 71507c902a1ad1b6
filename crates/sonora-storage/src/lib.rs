//! sonora-storage
//!
//! Persistence for patient charts. JSON documents in S3 (or an in-memory map
//! for tests and local runs), with RUT uniqueness and cascading deletes.

pub mod client;
pub mod documents;
pub mod error;
pub mod objects;
pub mod records;
