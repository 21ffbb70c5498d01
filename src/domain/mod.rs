//! Domain layer - Core dice logic with no I/O
//!
//! This layer contains:
//! - Entities: Roll
//! - Value Objects: dice buckets and identifiers
//! - Domain Services: result distribution and roll merging

pub mod entities;
pub mod services;
pub mod value_objects;
