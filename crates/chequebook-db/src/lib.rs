// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use chequebook_app::validation::{format_iso_date, parse_stored_date, parse_stored_optional_date};
use chequebook_app::{
    Cheque, ChequeBackend, ChequeDetails, ChequeId, ChequeStatus, ChequeType, NewCheque, UserId,
};
use log::{debug, info, warn};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "chequebook";
pub const DB_PATH_ENV: &str = "CHEQUEBOOK_DB_PATH";

const CHEQUE_COLUMNS: &str = "
  id, user_id, type, cheque_number, cheque_date, amount_paise, bank_name,
  status, bank_transaction_id, bounce_charges_paise, mahajan_id,
  firm_account_id, party_name, notes, cleared_date
";

const REQUIRED_SCHEMA: &[(&str, &[&str])] = &[(
    "cheques",
    &[
        "id",
        "user_id",
        "type",
        "cheque_number",
        "cheque_date",
        "amount_paise",
        "bank_name",
        "status",
        "bank_transaction_id",
        "bounce_charges_paise",
        "mahajan_id",
        "firm_account_id",
        "party_name",
        "notes",
        "cleared_date",
        "created_at",
        "updated_at",
    ],
)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RequiredIndex {
    name: &'static str,
    create_sql: &'static str,
}

const REQUIRED_INDEXES: &[RequiredIndex] = &[
    RequiredIndex {
        name: "idx_cheques_user_date",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_cheques_user_date ON cheques (user_id, cheque_date DESC);",
    },
    RequiredIndex {
        name: "idx_cheques_user_type",
        create_sql: "CREATE INDEX IF NOT EXISTS idx_cheques_user_type ON cheques (user_id, type);",
    },
];

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_db_path(&printable)?;
        let conn = Connection::open(path)
            .with_context(|| format!("open database at {}", path.display()))?;
        configure_connection(&conn)?;
        info!("opened cheque database at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_user_tables(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create schema")?;
        }

        ensure_required_indexes(&self.conn)?;
        Ok(())
    }

    pub fn list_cheques(&self, user: &UserId) -> Result<Vec<Cheque>> {
        let sql = format!(
            "
            SELECT {CHEQUE_COLUMNS}
            FROM cheques
            WHERE user_id = ?
            ORDER BY cheque_date DESC, id DESC
            "
        );
        let mut stmt = self.conn.prepare(&sql).context("prepare cheques query")?;
        let rows = stmt
            .query_map(params![user.as_str()], cheque_from_row)
            .context("query cheques")?;

        let cheques = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("collect cheques")?;
        debug!("fetched {} cheques for user {user}", cheques.len());
        Ok(cheques)
    }

    pub fn get_cheque(&self, user: &UserId, id: &ChequeId) -> Result<Option<Cheque>> {
        let sql = format!(
            "
            SELECT {CHEQUE_COLUMNS}
            FROM cheques
            WHERE id = ? AND user_id = ?
            "
        );
        self.conn
            .query_row(&sql, params![id.as_str(), user.as_str()], cheque_from_row)
            .optional()
            .with_context(|| format!("load cheque {id}"))
    }

    pub fn insert_cheque(&self, user: &UserId, cheque: &NewCheque) -> Result<ChequeId> {
        require_user(user)?;
        let details = &cheque.details;
        let now = now_rfc3339()?;
        let id: String = self
            .conn
            .query_row(
                "
                INSERT INTO cheques (
                  id, user_id, type, cheque_number, cheque_date, amount_paise,
                  bank_name, status, bank_transaction_id, bounce_charges_paise,
                  mahajan_id, firm_account_id, party_name, notes, cleared_date,
                  created_at, updated_at
                ) VALUES (
                  lower(hex(randomblob(16))), ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
                )
                RETURNING id
                ",
                params![
                    user.as_str(),
                    cheque.cheque_type.as_str(),
                    details.cheque_number,
                    format_iso_date(details.cheque_date),
                    details.amount_paise,
                    details.bank_name,
                    details.status.as_str(),
                    details.bank_transaction_id,
                    details.bounce_charges_paise,
                    details.mahajan_id,
                    details.firm_account_id,
                    details.party_name,
                    details.notes,
                    details.cleared_date.map(format_iso_date),
                    now,
                    now,
                ],
                |row| row.get(0),
            )
            .context("insert cheque")?;

        info!(
            "inserted {} cheque {id} for user {user}",
            cheque.cheque_type.as_str()
        );
        Ok(ChequeId::new(id))
    }

    pub fn update_cheque(
        &self,
        user: &UserId,
        id: &ChequeId,
        details: &ChequeDetails,
    ) -> Result<()> {
        let now = now_rfc3339()?;
        let rows_affected = self
            .conn
            .execute(
                "
                UPDATE cheques
                SET
                  cheque_number = ?,
                  cheque_date = ?,
                  amount_paise = ?,
                  bank_name = ?,
                  status = ?,
                  bank_transaction_id = ?,
                  bounce_charges_paise = ?,
                  mahajan_id = ?,
                  firm_account_id = ?,
                  party_name = ?,
                  notes = ?,
                  cleared_date = ?,
                  updated_at = ?
                WHERE id = ? AND user_id = ?
                ",
                params![
                    details.cheque_number,
                    format_iso_date(details.cheque_date),
                    details.amount_paise,
                    details.bank_name,
                    details.status.as_str(),
                    details.bank_transaction_id,
                    details.bounce_charges_paise,
                    details.mahajan_id,
                    details.firm_account_id,
                    details.party_name,
                    details.notes,
                    details.cleared_date.map(format_iso_date),
                    now,
                    id.as_str(),
                    user.as_str(),
                ],
            )
            .context("update cheque")?;
        if rows_affected == 0 {
            bail!("cheque {id} not found -- refresh the list and retry");
        }
        info!("updated cheque {id} for user {user}");
        Ok(())
    }

    pub fn delete_cheque(&self, user: &UserId, id: &ChequeId) -> Result<()> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM cheques WHERE id = ? AND user_id = ? AND status != 'cleared'",
                params![id.as_str(), user.as_str()],
            )
            .context("delete cheque")?;
        if rows_affected == 1 {
            info!("deleted cheque {id} for user {user}");
            return Ok(());
        }

        match self.get_cheque(user, id)? {
            Some(cheque) if cheque.status.is_terminal() => {
                warn!("refused to delete cleared cheque {id}");
                bail!("cheque {id} is cleared and cannot be deleted")
            }
            Some(_) => Err(anyhow!("cheque {id} was not deleted")),
            None => bail!("cheque {id} not found -- refresh the list and retry"),
        }
    }
}

impl ChequeBackend for Store {
    fn list_cheques(&self, user: &UserId) -> Result<Vec<Cheque>> {
        Store::list_cheques(self, user)
    }

    fn insert_cheque(&self, user: &UserId, cheque: &NewCheque) -> Result<ChequeId> {
        Store::insert_cheque(self, user, cheque)
    }

    fn update_cheque(&self, user: &UserId, id: &ChequeId, details: &ChequeDetails) -> Result<()> {
        Store::update_cheque(self, user, id, details)
    }

    fn delete_cheque(&self, user: &UserId, id: &ChequeId) -> Result<()> {
        Store::delete_cheque(self, user, id)
    }
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os(DB_PATH_ENV) {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set {DB_PATH_ENV} to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("chequebook.db"))
}

pub fn validate_db_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("database path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "database path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("database path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "database path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn cheque_from_row(row: &Row<'_>) -> rusqlite::Result<Cheque> {
    let type_raw: String = row.get(2)?;
    let cheque_type = ChequeType::parse(&type_raw)
        .ok_or_else(|| invalid_column(2, format!("unknown cheque type {type_raw}")))?;
    let status_raw: String = row.get(7)?;
    let status = ChequeStatus::parse(&status_raw)
        .ok_or_else(|| invalid_column(7, format!("unknown cheque status {status_raw}")))?;

    let cheque_date_raw: String = row.get(4)?;
    let cleared_date_raw: Option<String> = row.get(14)?;

    Ok(Cheque {
        id: ChequeId::new(row.get::<_, String>(0)?),
        user_id: UserId::new(row.get::<_, String>(1)?),
        cheque_type,
        cheque_number: row.get(3)?,
        cheque_date: parse_stored_date(&cheque_date_raw)
            .map_err(|error| invalid_column(4, format!("cheque_date {cheque_date_raw:?}: {error}")))?,
        amount_paise: row.get(5)?,
        bank_name: row.get(6)?,
        status,
        bank_transaction_id: row.get(8)?,
        bounce_charges_paise: row.get(9)?,
        mahajan_id: row.get(10)?,
        firm_account_id: row.get(11)?,
        party_name: row.get(12)?,
        notes: row.get(13)?,
        cleared_date: parse_stored_optional_date(cleared_date_raw.as_deref()).map_err(|error| {
            invalid_column(14, format!("cleared_date {cleared_date_raw:?}: {error}"))
        })?,
    })
}

fn require_user(user: &UserId) -> Result<()> {
    if user.is_blank() {
        bail!("user id is required -- set [session].user_id and retry");
    }
    Ok(())
}

fn has_user_tables(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "
            SELECT COUNT(*)
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ",
            [],
            |row| row.get(0),
        )
        .context("count user tables")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    for (table, required_columns) in REQUIRED_SCHEMA {
        if !table_exists(conn, table)? {
            bail!(
                "database is missing required table `{table}`; use a chequebook-compatible database"
            );
        }

        let columns = table_columns(conn, table)?;
        let missing: Vec<&str> = required_columns
            .iter()
            .copied()
            .filter(|column| !columns.contains(*column))
            .collect();

        if !missing.is_empty() {
            bail!(
                "table `{table}` is missing required columns: {}; run migration before launching",
                missing.join(", ")
            );
        }
    }

    Ok(())
}

fn ensure_required_indexes(conn: &Connection) -> Result<()> {
    for index in REQUIRED_INDEXES {
        conn.execute_batch(index.create_sql)
            .with_context(|| format!("ensure required index `{}`", index.name))?;
    }

    let existing_indexes = index_names(conn)?;
    let missing = REQUIRED_INDEXES
        .iter()
        .filter(|index| !existing_indexes.contains(index.name))
        .map(|index| index.name)
        .collect::<Vec<_>>();
    if !missing.is_empty() {
        bail!(
            "database is missing required indexes: {}; run migration before launching",
            missing.join(", ")
        );
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists = conn
        .query_row(
            "
            SELECT EXISTS(
              SELECT 1
              FROM sqlite_master
              WHERE type = 'table' AND name = ?
            )
            ",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .with_context(|| format!("check table existence for {table}"))?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({table})"))
        .with_context(|| format!("inspect columns for {table}"))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .with_context(|| format!("query column info for {table}"))?;

    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .with_context(|| format!("collect columns for {table}"))
}

fn index_names(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare(
            "
            SELECT name
            FROM sqlite_master
            WHERE type = 'index'
              AND name NOT LIKE 'sqlite_%'
            ORDER BY name ASC
            ",
        )
        .context("prepare index names query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query index names")?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .context("collect index names")
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA foreign_keys = ON;
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

fn invalid_column(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            message,
        )),
    )
}

#[cfg(test)]
mod tests {
    use super::Store;
    use anyhow::Result;
    use chequebook_app::{ChequeStatus, UserId};
    use time::{Date, Month};

    #[test]
    fn bootstrap_is_idempotent() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.bootstrap()?;
        assert!(store.list_cheques(&UserId::new("u1"))?.is_empty());
        Ok(())
    }

    #[test]
    fn timestamp_dates_in_storage_keep_their_calendar_day() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.raw_connection().execute_batch(
            "
            INSERT INTO cheques (
              id, user_id, type, cheque_number, cheque_date, amount_paise,
              bank_name, status, cleared_date, created_at, updated_at
            ) VALUES (
              'x1', 'u1', 'received', '1', '2026-01-15T09:00:00Z', 100,
              'SBI', 'cleared', '2026-01-20T10:00:00+00:00',
              '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z'
            );
            ",
        )?;

        let rows = store.list_cheques(&UserId::new("u1"))?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, ChequeStatus::Cleared);
        assert_eq!(
            rows[0].cheque_date,
            Date::from_calendar_date(2026, Month::January, 15)?
        );
        assert_eq!(
            rows[0].cleared_date,
            Some(Date::from_calendar_date(2026, Month::January, 20)?)
        );
        Ok(())
    }

    #[test]
    fn unknown_status_in_storage_is_reported() -> Result<()> {
        let store = Store::open_memory()?;
        store.bootstrap()?;
        store.raw_connection().execute_batch(
            "
            PRAGMA ignore_check_constraints = ON;
            INSERT INTO cheques (
              id, user_id, type, cheque_number, cheque_date, amount_paise,
              bank_name, status, created_at, updated_at
            ) VALUES (
              'x1', 'u1', 'received', '1', '2026-01-01', 100,
              'SBI', 'lost', '2026-01-01T00:00:00Z', '2026-01-01T00:00:00Z'
            );
            ",
        )?;

        let error = store
            .list_cheques(&UserId::new("u1"))
            .expect_err("unknown status should fail");
        assert!(format!("{error:#}").contains("unknown cheque status lost"));
        Ok(())
    }
}
