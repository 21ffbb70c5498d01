//! Domain services - Pure operations over dice and rolls

mod dice_distribution;

pub use dice_distribution::{add_to_latest, compute_results, distribute, merge_rolls};
