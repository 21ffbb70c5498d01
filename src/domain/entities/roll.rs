//! Roll entity - one completed dice roll shared with the room

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DiceSet, NeedsOverflow, RollId};

/// A finished roll as it is relayed between room members
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roll {
    pub id: RollId,
    pub dice: DiceSet,
    /// Username of whoever rolled
    #[serde(default)]
    pub roller: String,
    /// Optional label for the roll, e.g. "Attack"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form modifier text as typed by the roller, e.g. "+2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
}

impl Roll {
    pub fn new(dice: DiceSet, roller: impl Into<String>) -> Self {
        Self {
            id: RollId::new(),
            dice,
            roller: roller.into(),
            name: None,
            modifier: None,
        }
    }

    #[cfg(test)]
    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    /// Numeric value of the modifier; 0 when absent or unparseable
    pub fn modifier_value(&self) -> i64 {
        self.modifier.as_deref().map(parse_modifier).unwrap_or(0)
    }

    /// Sum of every die face plus the modifier
    pub fn total(&self) -> i64 {
        let dice_total: i64 = self
            .dice
            .iter()
            .filter(|(_, block)| !block.results.is_empty())
            .map(|(_, block)| block.subtotal())
            .sum();
        dice_total.saturating_add(self.modifier_value())
    }

    /// Fold another roll's buckets into this one.
    ///
    /// Shared labels get the other roll's results appended and needs summed.
    /// Labels only present in `other` are appended in its order. Nothing is
    /// changed when a summed `needs` would overflow.
    pub fn merge(&mut self, other: &Roll) -> Result<(), NeedsOverflow> {
        for (label, incoming) in other.dice.iter() {
            if let Some(block) = self.dice.get(label) {
                if block.needs.checked_add(incoming.needs).is_none() {
                    return Err(NeedsOverflow {
                        label: label.to_string(),
                    });
                }
            }
        }

        for (label, incoming) in other.dice.iter() {
            match self.dice.get_mut(label) {
                Some(block) => {
                    block.results.extend_from_slice(&incoming.results);
                    block.needs = block.needs.saturating_add(incoming.needs);
                }
                None => {
                    self.dice.insert(label, incoming.clone());
                }
            }
        }
        Ok(())
    }
}

/// Leading-integer parse: optional whitespace and sign, then digits.
/// Anything after the digits is ignored; no digits yields 0.
pub fn parse_modifier(text: &str) -> i64 {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    if negative {
        digits.fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_sub(i64::from(d - b'0'))
        })
    } else {
        digits.fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d - b'0'))
        })
    }
}
