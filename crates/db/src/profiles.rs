use rusqlite::{OptionalExtension, params};
use subtrack_core::Profile;

use crate::Db;
use crate::error::Result;
use crate::helpers::row_to_profile;

const PROFILE_COLUMNS: &str = "user_id, name, email, currency, created_at, updated_at";

impl Db {
    pub fn upsert_profile(
        &self,
        user_id: &str,
        name: &str,
        email: &str,
        currency: &str,
        now: &str,
    ) -> Result<Profile> {
        self.conn.execute(
            r#"
            INSERT INTO profile (user_id, name, email, currency, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
              name = excluded.name,
              email = excluded.email,
              currency = excluded.currency,
              updated_at = excluded.updated_at
            "#,
            params![user_id, name, email, currency, now],
        )?;
        self.get_profile(user_id)?
            .ok_or_else(|| crate::error::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_profile(&self, user_id: &str) -> Result<Option<Profile>> {
        self.conn
            .query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM profile WHERE user_id = ?1"),
                params![user_id],
                row_to_profile,
            )
            .optional()
            .map_err(crate::error::DbError::from)
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profile ORDER BY user_id ASC"
        ))?;
        let rows = stmt
            .query_map([], row_to_profile)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
