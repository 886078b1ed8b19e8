//! SQLite-backed character sheet storage.

use sqlx::{Row, SqlitePool};
use thiserror::Error;

use crate::character::{AbilityScores, CharacterClass, CharacterSheet};
use crate::chat::UserId;

/// Errors from character storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Stored class {0:?} is not a known class")]
    UnknownStoredClass(String),
}

/// Character sheet store over a single SQLite database.
///
/// All writes go through one pool; the embedding front-end runs one
/// command at a time per user, so no additional serialization is needed.
#[derive(Debug, Clone)]
pub struct CharacterStore {
    pool: SqlitePool,
}

impl CharacterStore {
    /// Open the database at `path`, creating the file and the
    /// `characters` table if they do not exist yet.
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{path}?mode=rwc")).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                class_name TEXT NOT NULL,
                level INTEGER NOT NULL,
                strength INTEGER NOT NULL,
                dexterity INTEGER NOT NULL,
                constitution INTEGER NOT NULL,
                intelligence INTEGER NOT NULL,
                wisdom INTEGER NOT NULL,
                charisma INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Insert a new character sheet.
    pub async fn create(&self, sheet: &CharacterSheet) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO characters (
                owner_id, name, class_name, level,
                strength, dexterity, constitution, intelligence, wisdom, charisma
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sheet.owner.0 as i64)
        .bind(&sheet.name)
        .bind(sheet.class.name())
        .bind(sheet.level)
        .bind(sheet.abilities.strength)
        .bind(sheet.abilities.dexterity)
        .bind(sheet.abilities.constitution)
        .bind(sheet.abilities.intelligence)
        .bind(sheet.abilities.wisdom)
        .bind(sheet.abilities.charisma)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete every character matching (owner, exact name).
    ///
    /// Returns whether any row was removed.
    pub async fn delete(&self, owner: UserId, name: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM characters WHERE owner_id = ? AND name = ?")
            .bind(owner.0 as i64)
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Fetch a character by (owner, exact name), if present.
    pub async fn get(&self, owner: UserId, name: &str) -> Result<Option<CharacterSheet>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT owner_id, name, class_name, level,
                   strength, dexterity, constitution, intelligence, wisdom, charisma
            FROM characters
            WHERE owner_id = ? AND name = ?
            "#,
        )
        .bind(owner.0 as i64)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let class_name: String = row.get("class_name");
            let class: CharacterClass = class_name
                .parse()
                .map_err(|_| StoreError::UnknownStoredClass(class_name))?;

            Ok(CharacterSheet {
                owner: UserId(row.get::<i64, _>("owner_id") as u64),
                name: row.get("name"),
                class,
                level: row.get("level"),
                abilities: AbilityScores::new(
                    row.get("strength"),
                    row.get("dexterity"),
                    row.get("constitution"),
                    row.get("intelligence"),
                    row.get("wisdom"),
                    row.get("charisma"),
                ),
            })
        })
        .transpose()
    }
}
