//! Distributing random bytes into dice buckets, and merging rolls

use crate::domain::entities::Roll;
use crate::domain::value_objects::{DiceSet, NeedsOverflow};

/// One reduction step: hand `byte` to the first bucket still short of its needs.
///
/// Buckets are scanned in label order. A byte lands in at most one bucket;
/// when every bucket is satisfied the byte is dropped.
pub fn compute_results(mut acc: DiceSet, byte: u8) -> DiceSet {
    if let Some((_, block)) = acc.iter_mut().find(|(_, block)| !block.is_satisfied()) {
        block.results.push(byte);
    }
    acc
}

/// Fold a whole byte slice through [`compute_results`].
///
/// Callers are expected to request exactly `dice.total_needs()` bytes; any
/// shortfall leaves buckets short and any surplus is ignored.
pub fn distribute(dice: DiceSet, bytes: &[u8]) -> DiceSet {
    bytes.iter().fold(dice, |acc, &byte| compute_results(acc, byte))
}

/// Merge `incoming` into the roll in `rolls` carrying the same id.
///
/// Returns a new list; when no roll matches, `incoming` is prepended.
pub fn merge_rolls(rolls: &[Roll], incoming: &Roll) -> Result<Vec<Roll>, NeedsOverflow> {
    let mut merged = rolls.to_vec();
    match merged.iter_mut().find(|roll| roll.id == incoming.id) {
        Some(target) => target.merge(incoming)?,
        None => merged.insert(0, incoming.clone()),
    }
    Ok(merged)
}

/// "Add to current roll": merge into the most recent roll (the list head).
pub fn add_to_latest(rolls: &[Roll], incoming: &Roll) -> Result<Vec<Roll>, NeedsOverflow> {
    match rolls.first() {
        Some(latest) => {
            let mut retargeted = incoming.clone();
            retargeted.id = latest.id;
            merge_rolls(rolls, &retargeted)
        }
        None => Ok(vec![incoming.clone()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DiceBlock;
    use proptest::prelude::*;

    fn needs(pairs: &[(&str, u32, u32)]) -> DiceSet {
        pairs
            .iter()
            .map(|&(label, sides, needs)| (label.to_string(), DiceBlock::new(sides, needs)))
            .collect()
    }

    #[test]
    fn test_fills_buckets_in_key_order() {
        let dice = needs(&[("d20", 20, 1), ("d6", 6, 2)]);
        let result = distribute(dice, &[10, 20, 30]);

        assert_eq!(result.get("d20").unwrap().results, vec![10]);
        assert_eq!(result.get("d6").unwrap().results, vec![20, 30]);
    }

    #[test]
    fn test_short_supply_leaves_later_buckets_short() {
        let dice = needs(&[("d4", 4, 2), ("d8", 8, 2)]);
        let result = distribute(dice, &[1, 2, 3]);

        assert_eq!(result.get("d4").unwrap().results, vec![1, 2]);
        assert_eq!(result.get("d8").unwrap().results, vec![3]);
        assert!(!result.is_satisfied());
    }

    #[test]
    fn test_surplus_bytes_are_dropped() {
        let dice = needs(&[("d6", 6, 1)]);
        let result = distribute(dice, &[1, 2, 3]);

        assert_eq!(result.get("d6").unwrap().results, vec![1]);
        assert!(result.is_satisfied());
    }

    #[test]
    fn test_single_step_assigns_one_bucket() {
        let dice = needs(&[("d6", 6, 1), ("d8", 8, 1)]);
        let result = compute_results(dice, 42);

        assert_eq!(result.get("d6").unwrap().results, vec![42]);
        assert!(result.get("d8").unwrap().results.is_empty());
    }

    #[test]
    fn test_partially_filled_bucket_is_topped_up_first() {
        let mut dice = needs(&[("d6", 6, 2), ("d8", 8, 1)]);
        dice.get_mut("d6").unwrap().results.push(7);

        let result = distribute(dice, &[1, 2]);

        assert_eq!(result.get("d6").unwrap().results, vec![7, 1]);
        assert_eq!(result.get("d8").unwrap().results, vec![2]);
    }

    fn roll(pairs: &[(&str, u32, Vec<u8>)]) -> Roll {
        let dice = pairs
            .iter()
            .map(|(label, sides, results)| {
                let block = DiceBlock::new(*sides, results.len() as u32).with_results(results.clone());
                (label.to_string(), block)
            })
            .collect();
        Roll::new(dice, "alice")
    }

    #[test]
    fn test_merge_rolls_into_matching_id() {
        let older = roll(&[("d6", 6, vec![1])]);
        let latest = roll(&[("d6", 6, vec![2]), ("d4", 4, vec![3])]);
        let mut incoming = roll(&[("d6", 6, vec![9])]);
        incoming.id = latest.id;

        let rolls = vec![latest.clone(), older.clone()];
        let merged = merge_rolls(&rolls, &incoming).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].dice.get("d6").unwrap().results, vec![2, 9]);
        assert_eq!(merged[0].dice.get("d6").unwrap().needs, 2);
        assert_eq!(merged[0].dice.get("d4").unwrap().results, vec![3]);
        assert_eq!(merged[1], older);
        // input untouched
        assert_eq!(rolls[0], latest);
    }

    #[test]
    fn test_merge_rolls_prepends_unknown_id() {
        let existing = roll(&[("d6", 6, vec![1])]);
        let incoming = roll(&[("d20", 20, vec![5])]);

        let merged = merge_rolls(&[existing.clone()], &incoming).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0], incoming);
        assert_eq!(merged[1], existing);
    }

    #[test]
    fn test_add_to_latest_targets_head() {
        let latest = roll(&[("d6", 6, vec![1])]);
        let older = roll(&[("d6", 6, vec![4])]);
        let incoming = roll(&[("d6", 6, vec![2])]);

        let merged = add_to_latest(&[latest.clone(), older.clone()], &incoming).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, latest.id);
        assert_eq!(merged[0].dice.get("d6").unwrap().results, vec![1, 2]);
        assert_eq!(merged[1], older);
    }

    #[test]
    fn test_add_to_latest_on_empty_history() {
        let incoming = roll(&[("d6", 6, vec![2])]);
        assert_eq!(add_to_latest(&[], &incoming).unwrap(), vec![incoming]);
    }

    #[test]
    fn test_merge_rolls_reports_needs_overflow() {
        let mut base = roll(&[("d6", 6, vec![1])]);
        base.dice.get_mut("d6").unwrap().needs = u32::MAX;
        let mut incoming = roll(&[("d6", 6, vec![2])]);
        incoming.id = base.id;

        let err = merge_rolls(&[base], &incoming).unwrap_err();
        assert_eq!(err.label, "d6");
    }

    fn needs_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec((2u32..=100, 0u32..=8), 0..6)
    }

    fn dice_from(spec: &[(u32, u32)]) -> DiceSet {
        spec.iter()
            .enumerate()
            .map(|(i, &(sides, needs))| (format!("k{}", i), DiceBlock::new(sides, needs)))
            .collect()
    }

    proptest! {
        #[test]
        fn distributed_count_is_min_of_supply_and_needs(
            spec in needs_strategy(),
            bytes in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let dice = dice_from(&spec);
            let total_needs = dice.total_needs();
            let result = distribute(dice, &bytes);
            prop_assert_eq!(result.total_results(), bytes.len().min(total_needs));
        }

        #[test]
        fn every_byte_lands_once_in_order(
            spec in needs_strategy(),
            bytes in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let result = distribute(dice_from(&spec), &bytes);
            let flattened: Vec<u8> = result
                .iter()
                .flat_map(|(_, block)| block.results.iter().copied())
                .collect();
            let used = flattened.len();
            prop_assert_eq!(&flattened[..], &bytes[..used]);
            for (_, block) in result.iter() {
                prop_assert!(block.results.len() <= block.needs as usize);
            }
        }

        #[test]
        fn merge_concatenates_shared_keys(
            a in prop::collection::vec(any::<u8>(), 0..10),
            b in prop::collection::vec(any::<u8>(), 0..10),
            kept in prop::collection::vec(any::<u8>(), 0..10),
        ) {
            let base = roll(&[("d6", 6, a.clone()), ("d10", 10, kept.clone())]);
            let mut incoming = roll(&[("d6", 6, b.clone())]);
            incoming.id = base.id;

            let merged = merge_rolls(&[base], &incoming).unwrap();

            let mut expected = a.clone();
            expected.extend_from_slice(&b);
            prop_assert_eq!(&merged[0].dice.get("d6").unwrap().results, &expected);
            prop_assert_eq!(merged[0].dice.get("d6").unwrap().needs as usize, expected.len());
            prop_assert_eq!(&merged[0].dice.get("d10").unwrap().results, &kept);
        }
    }
}
