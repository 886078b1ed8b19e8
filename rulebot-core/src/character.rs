//! Character sheet types and reply parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::chat::UserId;

/// Errors from character sheet input validation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SheetError {
    #[error("Unknown class: {0}")]
    UnknownClass(String),
    #[error("Expected 7 numbers (level plus six ability scores), got {0}")]
    WrongStatCount(usize),
    #[error("{0:?} is not a whole number")]
    NotAnInteger(String),
}

/// The playable classes a stored character may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

impl CharacterClass {
    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "Barbarian",
            CharacterClass::Bard => "Bard",
            CharacterClass::Cleric => "Cleric",
            CharacterClass::Druid => "Druid",
            CharacterClass::Fighter => "Fighter",
            CharacterClass::Monk => "Monk",
            CharacterClass::Paladin => "Paladin",
            CharacterClass::Ranger => "Ranger",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Sorcerer => "Sorcerer",
            CharacterClass::Warlock => "Warlock",
            CharacterClass::Wizard => "Wizard",
        }
    }

    pub fn all() -> [CharacterClass; 12] {
        [
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }
}

impl FromStr for CharacterClass {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let class = match s.trim().to_lowercase().as_str() {
            "barbarian" => CharacterClass::Barbarian,
            "bard" => CharacterClass::Bard,
            "cleric" => CharacterClass::Cleric,
            "druid" => CharacterClass::Druid,
            "fighter" => CharacterClass::Fighter,
            "monk" => CharacterClass::Monk,
            "paladin" => CharacterClass::Paladin,
            "ranger" => CharacterClass::Ranger,
            "rogue" => CharacterClass::Rogue,
            "sorcerer" => CharacterClass::Sorcerer,
            "warlock" => CharacterClass::Warlock,
            "wizard" => CharacterClass::Wizard,
            _ => return Err(SheetError::UnknownClass(s.trim().to_string())),
        };
        Ok(class)
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ability scores container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: i64,
    pub dexterity: i64,
    pub constitution: i64,
    pub intelligence: i64,
    pub wisdom: i64,
    pub charisma: i64,
}

impl AbilityScores {
    pub fn new(str: i64, dex: i64, con: i64, int: i64, wis: i64, cha: i64) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }
}

/// A persisted character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub owner: UserId,
    pub name: String,
    pub class: CharacterClass,
    pub level: i64,
    pub abilities: AbilityScores,
}

/// Parse a character-creation stats reply.
///
/// The reply must contain exactly seven whitespace-separated integers:
/// the level followed by STR DEX CON INT WIS CHA. Anything else fails
/// without partial results.
pub fn parse_stats(reply: &str) -> Result<(i64, AbilityScores), SheetError> {
    let tokens: Vec<&str> = reply.split_whitespace().collect();
    if tokens.len() != 7 {
        return Err(SheetError::WrongStatCount(tokens.len()));
    }

    let mut values = [0_i64; 7];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        *slot = token
            .parse()
            .map_err(|_| SheetError::NotAnInteger(token.to_string()))?;
    }

    let [level, str, dex, con, int, wis, cha] = values;
    Ok((level, AbilityScores::new(str, dex, con, int, wis, cha)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_parse_is_case_insensitive() {
        assert_eq!("fighter".parse::<CharacterClass>(), Ok(CharacterClass::Fighter));
        assert_eq!("WIZARD".parse::<CharacterClass>(), Ok(CharacterClass::Wizard));
        assert_eq!(" Rogue ".parse::<CharacterClass>(), Ok(CharacterClass::Rogue));
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        assert_eq!(
            "jester".parse::<CharacterClass>(),
            Err(SheetError::UnknownClass("jester".to_string()))
        );
    }

    #[test]
    fn test_every_class_round_trips_through_its_name() {
        for class in CharacterClass::all() {
            assert_eq!(class.name().parse::<CharacterClass>(), Ok(class));
        }
    }

    #[test]
    fn test_parse_stats() {
        let (level, abilities) = parse_stats("3 16 14 13 12 10 8").unwrap();
        assert_eq!(level, 3);
        assert_eq!(abilities, AbilityScores::new(16, 14, 13, 12, 10, 8));
    }

    #[test]
    fn test_parse_stats_wrong_count() {
        assert_eq!(parse_stats("1 2 3"), Err(SheetError::WrongStatCount(3)));
        assert_eq!(
            parse_stats("1 2 3 4 5 6 7 8"),
            Err(SheetError::WrongStatCount(8))
        );
        assert_eq!(parse_stats(""), Err(SheetError::WrongStatCount(0)));
    }

    #[test]
    fn test_parse_stats_rejects_non_integers() {
        assert_eq!(
            parse_stats("3 16 14 thirteen 12 10 8"),
            Err(SheetError::NotAnInteger("thirteen".to_string()))
        );
        assert_eq!(
            parse_stats("3.5 16 14 13 12 10 8"),
            Err(SheetError::NotAnInteger("3.5".to_string()))
        );
    }
}
