use rusqlite::Connection;

use crate::Db;
use crate::error::Result;

const MIGRATION_0001: &str = include_str!("../migrations/0001_init.sql");
const MIGRATION_0002: &str = include_str!("../migrations/0002_add_rate_history.sql");
const MIGRATION_0003: &str = include_str!("../migrations/0003_add_cycle_days.sql");

const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_init", MIGRATION_0001),
    ("0002_add_rate_history", MIGRATION_0002),
    ("0003_add_cycle_days", MIGRATION_0003),
];

impl Db {
    pub fn migrate(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        for (name, sql) in MIGRATIONS {
            if *name == "0003_add_cycle_days" && table_has_column(&tx, "subscription", "cycle_days")?
            {
                continue;
            }
            tx.execute_batch(sql)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}
