//! Dice expression parsing and rolling.
//!
//! Supports the strict chat notation `NdM`: a dice count, a literal `d`
//! or `D`, and a die size. Nothing else: no modifiers, no signs, no
//! surrounding text.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Upper bound on the dice count in one expression.
///
/// The notation grammar has no inherent limit, so the evaluator caps the
/// count to keep a single chat command from allocating unbounded memory.
pub const MAX_DICE: u32 = 10_000;

/// Upper bound on the die size. Same rationale as [`MAX_DICE`].
pub const MAX_SIDES: u32 = 10_000;

/// Error type for dice parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Invalid dice expression {0:?} (expected something like 4D20)")]
    InvalidExpression(String),
    #[error("Cannot roll {0} dice at once (limit {MAX_DICE})")]
    TooManyDice(u32),
    #[error("A die cannot have {0} sides (limit {MAX_SIDES})")]
    TooManySides(u32),
}

/// A parsed dice expression (e.g. `4d20`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceExpression {
    number: u32,
    sides: u32,
}

impl DiceExpression {
    /// Parse the strict `NdM` notation.
    ///
    /// Both groups are required: `d6`, `6`, and `6d` are all rejected, as
    /// are zero counts, zero-sided dice, signs, and embedded whitespace.
    /// The input is trimmed before matching.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let notation = notation.trim();
        let invalid = || DiceError::InvalidExpression(notation.to_string());

        let (count, sides) = notation.split_once(['d', 'D']).ok_or_else(invalid)?;

        if count.is_empty()
            || sides.is_empty()
            || !count.bytes().all(|b| b.is_ascii_digit())
            || !sides.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let number: u32 = count.parse().map_err(|_| invalid())?;
        let sides: u32 = sides.parse().map_err(|_| invalid())?;

        if number == 0 || sides == 0 {
            return Err(invalid());
        }
        if number > MAX_DICE {
            return Err(DiceError::TooManyDice(number));
        }
        if sides > MAX_SIDES {
            return Err(DiceError::TooManySides(sides));
        }

        Ok(Self { number, sides })
    }

    /// How many dice the expression rolls.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// How many sides each die has.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Roll the expression with the thread-local RNG.
    pub fn roll(&self) -> DiceRoll {
        self.roll_with_rng(&mut rand::thread_rng())
    }

    /// Roll with a specific RNG (useful for deterministic tests).
    pub fn roll_with_rng<R: Rng>(&self, rng: &mut R) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.number)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();
        let total = rolls.iter().map(|&r| u64::from(r)).sum();

        DiceRoll {
            number: self.number,
            sides: self.sides,
            rolls,
            total,
        }
    }
}

impl FromStr for DiceExpression {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceExpression::parse(s)
    }
}

impl fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.number, self.sides)
    }
}

/// The outcome of rolling a dice expression.
///
/// Fields are read-only: `rolls.len() == number`, every roll lies in
/// `1..=sides`, and `total` is the sum of the rolls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    number: u32,
    sides: u32,
    rolls: Vec<u32>,
    total: u64,
}

impl DiceRoll {
    /// How many dice were rolled.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// How many sides each die had.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// The individual die results, in roll order.
    pub fn rolls(&self) -> &[u32] {
        &self.rolls
    }

    /// The sum of all die results.
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}d{}: {:?} = {}",
            self.number, self.sides, self.rolls, self.total
        )
    }
}

/// Convenience function to parse and roll in one step.
pub fn roll(notation: &str) -> Result<DiceRoll, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll())
}

/// Parse and roll with a specific RNG.
pub fn roll_with_rng<R: Rng>(notation: &str, rng: &mut R) -> Result<DiceRoll, DiceError> {
    Ok(DiceExpression::parse(notation)?.roll_with_rng(rng))
}
