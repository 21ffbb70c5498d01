//! Dice buckets - raw random values grouped by die type

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Map a raw random byte onto a 1-indexed die face.
///
/// Plain modulo: faces are slightly biased when `sides` does not divide 256.
pub fn face_value(byte: u8, sides: u32) -> u32 {
    u32::from(byte) % sides + 1
}

/// A bucket's `needs` would exceed `u32::MAX`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Too many {label} dice")]
pub struct NeedsOverflow {
    pub label: String,
}

/// Raw random values collected for one die type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceBlock {
    #[serde(default)]
    pub results: Vec<u8>,
    /// Number of values this bucket is waiting for
    #[serde(default)]
    pub needs: u32,
    pub sides: u32,
}

impl DiceBlock {
    pub fn new(sides: u32, needs: u32) -> Self {
        Self {
            results: Vec::new(),
            needs,
            sides,
        }
    }

    #[cfg(test)]
    pub fn with_results(mut self, results: Vec<u8>) -> Self {
        self.results = results;
        self
    }

    pub fn is_satisfied(&self) -> bool {
        self.results.len() >= self.needs as usize
    }

    pub fn remaining(&self) -> usize {
        (self.needs as usize).saturating_sub(self.results.len())
    }

    /// Face values for the collected results. Empty when `sides` is zero.
    pub fn faces(&self) -> Vec<u32> {
        if self.sides == 0 {
            return Vec::new();
        }
        self.results
            .iter()
            .map(|&byte| face_value(byte, self.sides))
            .collect()
    }

    pub fn subtotal(&self) -> i64 {
        self.faces().iter().map(|&f| i64::from(f)).sum()
    }
}

/// Die-type label to bucket mapping.
///
/// Labels keep their insertion order, which decides which bucket is filled
/// first. The JSON form is an object whose key order is kept both ways.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiceSet {
    blocks: Vec<(String, DiceBlock)>,
}

impl DiceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conventional label for a die with `sides` faces, e.g. `d20`
    pub fn label_for(sides: u32) -> String {
        format!("d{}", sides)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&DiceBlock> {
        self.position(label).map(|i| &self.blocks[i].1)
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut DiceBlock> {
        match self.position(label) {
            Some(i) => Some(&mut self.blocks[i].1),
            None => None,
        }
    }

    /// Insert a bucket. An existing label is replaced in place and keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, block: DiceBlock) -> Option<DiceBlock> {
        let label = label.into();
        match self.position(&label) {
            Some(i) => Some(std::mem::replace(&mut self.blocks[i].1, block)),
            None => {
                self.blocks.push((label, block));
                None
            }
        }
    }

    pub fn remove(&mut self, label: &str) -> Option<DiceBlock> {
        self.position(label).map(|i| self.blocks.remove(i).1)
    }

    /// Queue `count` more dice of `sides` under the conventional label
    pub fn add_dice(&mut self, sides: u32, count: u32) -> Result<(), NeedsOverflow> {
        let label = Self::label_for(sides);
        match self.get_mut(&label) {
            Some(block) => {
                block.needs = block
                    .needs
                    .checked_add(count)
                    .ok_or(NeedsOverflow { label })?;
            }
            None => {
                self.blocks.push((label, DiceBlock::new(sides, count)));
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DiceBlock)> {
        self.blocks.iter().map(|(label, block)| (label.as_str(), block))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut DiceBlock)> {
        self.blocks
            .iter_mut()
            .map(|(label, block)| (label.as_str(), block))
    }

    #[cfg(test)]
    pub fn labels(&self) -> Vec<&str> {
        self.blocks.iter().map(|(label, _)| label.as_str()).collect()
    }

    /// Total number of random values the set is waiting for
    pub fn total_needs(&self) -> usize {
        self.blocks.iter().map(|(_, b)| b.needs as usize).sum()
    }

    #[cfg(test)]
    pub fn total_results(&self) -> usize {
        self.blocks.iter().map(|(_, b)| b.results.len()).sum()
    }

    pub fn is_satisfied(&self) -> bool {
        self.blocks.iter().all(|(_, b)| b.is_satisfied())
    }

    /// Drop every collected result, keeping labels and needs
    pub fn clear_results(&mut self) {
        for (_, block) in &mut self.blocks {
            block.results.clear();
        }
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.blocks.iter().position(|(l, _)| l == label)
    }
}

impl FromIterator<(String, DiceBlock)> for DiceSet {
    fn from_iter<I: IntoIterator<Item = (String, DiceBlock)>>(iter: I) -> Self {
        let mut set = DiceSet::new();
        for (label, block) in iter {
            set.insert(label, block);
        }
        set
    }
}

impl Serialize for DiceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.blocks.len()))?;
        for (label, block) in &self.blocks {
            map.serialize_entry(label, block)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for DiceSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DiceSetVisitor;

        impl<'de> Visitor<'de> for DiceSetVisitor {
            type Value = DiceSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of die labels to dice blocks")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<DiceSet, A::Error> {
                let mut set = DiceSet::new();
                while let Some((label, block)) = access.next_entry::<String, DiceBlock>()? {
                    set.insert(label, block);
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(DiceSetVisitor)
    }
}
