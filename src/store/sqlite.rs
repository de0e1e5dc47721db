//! [`ConfigStore`] implementation backed by SQLite.
//!
//! The database is opened **read-only**: the launcher never writes to its
//! configuration.  Operators edit the `desktops`, `desktopCommands` and
//! `variables` tables with whatever SQLite tool they like.

use crate::command::{Desktop, DesktopProgram};
use crate::traits::ConfigStore;
use log::debug;
use rusqlite::{params, Connection, OpenFlags, Row};
use std::path::Path;

/// SQLite-backed configuration store.
///
/// Holds a single connection for the whole run; it is released by
/// [`close`](ConfigStore::close).
pub struct SqliteStore {
    conn: Connection,
}

/// Errors that can occur when reading the configuration database.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        source: rusqlite::Error,
    },
    #[error("integrity error: {0}")]
    Integrity(String),
    #[error("foreign key error: {0} row(s) in desktopCommands reference a missing desktop")]
    ForeignKey(usize),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
}

//  Queries

const SELECT_DESKTOPS: &str = "
    SELECT   name
    ,        value
    ,        waitSeconds
    FROM     desktops
    WHERE    isActive = 'T'
    ORDER BY indexNo
";

const SELECT_ONE_DESKTOP: &str = "
    SELECT   name
    ,        value
    ,        waitSeconds
    FROM     desktops
    WHERE    isActive = 'T'
         AND name = ?1
";

const SELECT_PROGRAMS: &str = "
    SELECT   command
    ,        logDir
    ,        workDir
    FROM     desktopCommands
    WHERE    name = ?1
         AND isActive = 'T'
    ORDER BY indexNo
";

const SELECT_VARIABLE: &str = "
    SELECT  value
    FROM    variables
    WHERE   name = ?1
";

impl SqliteStore {
    /// Open the database at `path` read-only.
    ///
    /// A missing file is an error; nothing is created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
        debug!("opened {}", path.display());
        Ok(Self::from_connection(conn))
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    fn query_desktops(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Desktop>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, desktop_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn desktop_from_row(row: &Row<'_>) -> rusqlite::Result<Desktop> {
    let wait: i64 = row.get(2)?;
    let wait_seconds =
        u64::try_from(wait).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(2, wait))?;
    Ok(Desktop {
        name: row.get(0)?,
        value: row.get(1)?,
        wait_seconds,
    })
}

//  ConfigStore implementation

impl ConfigStore for SqliteStore {
    type Error = StoreError;

    fn check_integrity(&self) -> Result<(), Self::Error> {
        self.conn.pragma_update(None, "foreign_keys", true)?;

        let status: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(StoreError::Integrity(status));
        }

        let mut stmt = self.conn.prepare("PRAGMA foreign_key_check")?;
        let violations = stmt.query_map([], |_| Ok(()))?.count();
        if violations != 0 {
            return Err(StoreError::ForeignKey(violations));
        }
        Ok(())
    }

    fn active_desktops(&self) -> Result<Vec<Desktop>, Self::Error> {
        self.query_desktops(SELECT_DESKTOPS, [])
    }

    fn desktop(&self, name: &str) -> Result<Vec<Desktop>, Self::Error> {
        self.query_desktops(SELECT_ONE_DESKTOP, params![name])
    }

    fn active_programs(&self, desktop: &str) -> Result<Vec<DesktopProgram>, Self::Error> {
        let mut stmt = self.conn.prepare(SELECT_PROGRAMS)?;
        let rows = stmt.query_map(params![desktop], |row| {
            Ok(DesktopProgram {
                command: row.get(0)?,
                log_dir: row.get(1)?,
                work_dir: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn variable(&self, name: &str) -> Result<Vec<String>, Self::Error> {
        let mut stmt = self.conn.prepare(SELECT_VARIABLE)?;
        let rows = stmt.query_map(params![name], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn close(self) -> Result<(), Self::Error> {
        self.conn.close().map_err(|(_, e)| StoreError::Sql(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixture::{store, THREE_DESKTOPS};

    fn names(desktops: &[Desktop]) -> Vec<&str> {
        desktops.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn active_desktops_ordered_by_index() {
        let s = store(THREE_DESKTOPS);
        let desktops = s.active_desktops().unwrap();
        assert_eq!(names(&desktops), vec!["web", "mail", "chat"]);
        assert_eq!(
            desktops[1],
            Desktop {
                name: "mail".into(),
                value: "1".into(),
                wait_seconds: 7,
            }
        );
    }

    #[test]
    fn repeated_reads_are_identical() {
        let s = store(THREE_DESKTOPS);
        assert_eq!(s.active_desktops().unwrap(), s.active_desktops().unwrap());
        assert_eq!(
            s.active_programs("web").unwrap(),
            s.active_programs("web").unwrap()
        );
    }

    #[test]
    fn desktop_lookup_ignores_inactive() {
        let s = store(THREE_DESKTOPS);
        assert_eq!(names(&s.desktop("chat").unwrap()), vec!["chat"]);
        assert!(s.desktop("old").unwrap().is_empty());
        assert!(s.desktop("nope").unwrap().is_empty());
    }

    #[test]
    fn programs_active_and_ordered() {
        let s = store(THREE_DESKTOPS);
        let programs = s.active_programs("web").unwrap();
        let commands: Vec<&str> = programs.iter().map(|p| p.command.as_str()).collect();
        assert_eq!(commands, vec!["xterm -e htop", "firefox"]);
        assert_eq!(programs[0].log_dir.as_deref(), Some("/tmp/htop-%T.log"));
        assert_eq!(programs[0].work_dir.as_deref(), Some("/tmp"));
        assert_eq!(programs[1].log_dir, None);
    }

    #[test]
    fn variable_lookup() {
        let s = store(THREE_DESKTOPS);
        assert_eq!(s.variable("switchDesktop").unwrap(), vec!["wmctrl -s "]);
        assert!(s.variable("waitBeforeSwitchDesktop").unwrap().is_empty());
    }

    #[test]
    fn healthy_store_passes_integrity_check() {
        let s = store(THREE_DESKTOPS);
        s.check_integrity().unwrap();
    }

    #[test]
    fn dangling_program_fails_foreign_key_check() {
        // The fixture loads rows with foreign keys off.
        let s = store(
            "INSERT INTO desktopCommands VALUES ('ghost', 'T', 'xterm', 1, NULL, NULL);",
        );
        match s.check_integrity() {
            Err(StoreError::ForeignKey(1)) => {}
            other => panic!("expected foreign key error, got {:?}", other),
        }
    }

    #[test]
    fn negative_wait_is_rejected() {
        let s = store("INSERT INTO desktops VALUES ('web', 'T', 1, '0', -3);");
        assert!(matches!(s.active_desktops(), Err(StoreError::Sql(_))));
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.sqlite");
        assert!(matches!(
            SqliteStore::open(&path),
            Err(StoreError::Open { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn open_reads_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("general.sqlite");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(crate::store::fixture::SCHEMA).unwrap();
            conn.execute_batch(THREE_DESKTOPS).unwrap();
        }
        let s = SqliteStore::open(&path).unwrap();
        s.check_integrity().unwrap();
        assert_eq!(s.active_desktops().unwrap().len(), 3);
        s.close().unwrap();
    }
}
