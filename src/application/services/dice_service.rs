//! Dice state - the roll lifecycle as a reducer
//!
//! A roll moves `pending` → `rolling` → `finished`. While rolling, random
//! bytes are distributed into the pending dice; once every bucket is full a
//! `Roll` is recorded at the head of the history (or merged into it when
//! adding to the current roll).

use serde::{Deserialize, Serialize};

use crate::domain::entities::Roll;
use crate::domain::services::{add_to_latest, distribute, merge_rolls};
use crate::domain::value_objects::{DiceSet, NeedsOverflow};

/// Where a roll is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollPhase {
    #[default]
    Pending,
    Rolling,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("Must add dice before rolling")]
    NoDice,
    #[error("Dice need at least 2 sides, got {0}")]
    InvalidSides(u32),
    #[error("Dice count must be at least 1")]
    InvalidCount,
    #[error("No {0} dice to remove")]
    UnknownDie(String),
    #[error("A roll is already in progress")]
    AlreadyRolling,
    #[error("No roll in progress")]
    NotRolling,
    #[error("Too many {0} dice")]
    TooManyDice(String),
    #[error("Roll needs {requested} random values, at most {max} allowed")]
    RollTooLarge { requested: usize, max: usize },
}

impl From<NeedsOverflow> for DiceError {
    fn from(err: NeedsOverflow) -> Self {
        DiceError::TooManyDice(err.label)
    }
}

/// Inputs to [`DiceState::reduce`]
#[derive(Debug, Clone, PartialEq)]
pub enum DiceAction {
    AddDie { sides: u32, count: u32 },
    RemoveDie { label: String },
    SetModifier(Option<String>),
    SetRollName(Option<String>),
    SetAddToCurrent(bool),
    StartRoll,
    ApplyRandom(Vec<u8>),
    /// A roll relayed from another member of the room
    ReceiveRoll(Roll),
    ClearDice,
    ClearHistory,
}

/// Dice being configured plus the room's roll history (newest first)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiceState {
    pub dice: DiceSet,
    pub phase: RollPhase,
    pub rolls: Vec<Roll>,
    pub roller: String,
    pub roll_name: Option<String>,
    pub modifier: Option<String>,
    pub add_to_current: bool,
}

impl DiceState {
    pub fn new(roller: impl Into<String>) -> Self {
        Self {
            roller: roller.into(),
            ..Self::default()
        }
    }

    /// Random bytes still required to finish the roll in progress
    pub fn bytes_needed(&self) -> usize {
        self.dice
            .iter()
            .map(|(_, block)| block.remaining())
            .sum()
    }

    pub fn latest_roll(&self) -> Option<&Roll> {
        self.rolls.first()
    }

    pub fn reduce(mut self, action: DiceAction) -> Result<Self, DiceError> {
        match action {
            DiceAction::AddDie { sides, count } => {
                if sides < 2 {
                    return Err(DiceError::InvalidSides(sides));
                }
                if count == 0 {
                    return Err(DiceError::InvalidCount);
                }
                self.ensure_not_rolling()?;
                self.dice.add_dice(sides, count)?;
            }
            DiceAction::RemoveDie { label } => {
                self.ensure_not_rolling()?;
                let block = self
                    .dice
                    .get_mut(&label)
                    .ok_or_else(|| DiceError::UnknownDie(label.clone()))?;
                block.needs = block.needs.saturating_sub(1);
                if block.needs == 0 {
                    self.dice.remove(&label);
                }
            }
            DiceAction::SetModifier(modifier) => self.modifier = modifier,
            DiceAction::SetRollName(name) => self.roll_name = name,
            DiceAction::SetAddToCurrent(add) => self.add_to_current = add,
            DiceAction::StartRoll => {
                self.ensure_not_rolling()?;
                if self.dice.is_empty() || self.dice.total_needs() == 0 {
                    return Err(DiceError::NoDice);
                }
                self.dice.clear_results();
                self.phase = RollPhase::Rolling;
            }
            DiceAction::ApplyRandom(bytes) => {
                if self.phase != RollPhase::Rolling {
                    return Err(DiceError::NotRolling);
                }
                self.dice = distribute(std::mem::take(&mut self.dice), &bytes);
                if self.dice.is_satisfied() {
                    self.finish_roll()?;
                }
            }
            DiceAction::ReceiveRoll(roll) => {
                self.rolls = merge_rolls(&self.rolls, &roll)?;
            }
            DiceAction::ClearDice => {
                self.ensure_not_rolling()?;
                self.dice = DiceSet::new();
                self.phase = RollPhase::Pending;
            }
            DiceAction::ClearHistory => self.rolls.clear(),
        }
        Ok(self)
    }

    fn ensure_not_rolling(&self) -> Result<(), DiceError> {
        if self.phase == RollPhase::Rolling {
            return Err(DiceError::AlreadyRolling);
        }
        Ok(())
    }

    fn finish_roll(&mut self) -> Result<(), DiceError> {
        let mut roll = Roll::new(self.dice.clone(), self.roller.clone());
        roll.name = self.roll_name.clone();
        roll.modifier = self.modifier.clone();

        self.rolls = if self.add_to_current {
            add_to_latest(&self.rolls, &roll)?
        } else {
            merge_rolls(&self.rolls, &roll)?
        };
        self.phase = RollPhase::Finished;
        Ok(())
    }
}
