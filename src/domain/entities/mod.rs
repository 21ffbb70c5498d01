//! Domain entities - Core objects with identity

mod roll;

pub use roll::{parse_modifier, Roll};
