//! Roll Service - server-side rolls driven by the dice reducer

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::ports::outbound::RandomPort;
use crate::application::services::dice_service::{DiceAction, DiceError, DiceState};
use crate::domain::entities::Roll;

/// Dice of one type to include in a roll
#[derive(Debug, Clone, Deserialize)]
pub struct DieRequest {
    pub sides: u32,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

/// Request to roll a set of dice
#[derive(Debug, Clone, Deserialize)]
pub struct RollRequest {
    pub dice: Vec<DieRequest>,
    #[serde(default)]
    pub roller: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub modifier: Option<String>,
}

/// Rolls dice using the configured random source
#[derive(Clone)]
pub struct RollService {
    random: Arc<dyn RandomPort>,
    /// Upper bound on random values drawn for a single roll
    max_bytes: usize,
}

impl RollService {
    pub fn new(random: Arc<dyn RandomPort>, max_bytes: usize) -> Self {
        Self { random, max_bytes }
    }

    /// Request exactly as many bytes as the dice need and record the roll
    #[instrument(skip(self, request), fields(roller = %request.roller))]
    pub fn roll(&self, request: RollRequest) -> Result<Roll, DiceError> {
        let mut state = DiceState::new(request.roller)
            .reduce(DiceAction::SetModifier(request.modifier))?
            .reduce(DiceAction::SetRollName(request.name))?;
        for die in request.dice {
            state = state.reduce(DiceAction::AddDie {
                sides: die.sides,
                count: die.count,
            })?;
        }

        let state = state.reduce(DiceAction::StartRoll)?;
        let requested = state.bytes_needed();
        if requested > self.max_bytes {
            return Err(DiceError::RollTooLarge {
                requested,
                max: self.max_bytes,
            });
        }
        let bytes = self.random.random_bytes(requested);
        debug!(count = bytes.len(), "Drew random bytes for roll");

        let state = state.reduce(DiceAction::ApplyRandom(bytes))?;
        // The reducer records the roll at the head once every bucket is full
        state.latest_roll().cloned().ok_or(DiceError::NotRolling)
    }
}
