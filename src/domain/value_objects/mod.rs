//! Value objects - Immutable objects defined by their attributes

mod dice;
mod ids;

pub use dice::{face_value, DiceBlock, DiceSet, NeedsOverflow};
pub use ids::*;
