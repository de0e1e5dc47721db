//! Store-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`ConfigStore`](crate::traits::ConfigStore) trait, powered by SQLite.
//!
//! Nothing outside this module should reference SQLite directly.

pub mod sqlite;

#[cfg(test)]
pub(crate) mod fixture {
    //! In-memory stores for tests.

    use super::sqlite::SqliteStore;
    use rusqlite::Connection;

    /// The schema operators provision the store with.
    pub const SCHEMA: &str = "
        CREATE TABLE desktops(
            name        TEXT    NOT NULL,
            isActive    TEXT    NOT NULL DEFAULT 'T',
            indexNo     INTEGER NOT NULL UNIQUE,
            value       TEXT    NOT NULL UNIQUE,
            waitSeconds INTEGER NOT NULL,
            CONSTRAINT isActive CHECK(isActive IN ('T', 'F')),
            PRIMARY KEY(name)
        );
        CREATE TABLE desktopCommands(
            name        TEXT    NOT NULL,
            isActive    TEXT    NOT NULL DEFAULT 'T',
            command     TEXT    NOT NULL,
            indexNo     INTEGER NOT NULL,
            logDir      TEXT,
            workDir     TEXT,
            CONSTRAINT isActive CHECK(isActive IN ('T', 'F')),
            FOREIGN KEY(name) REFERENCES desktops(name),
            PRIMARY KEY(name, command)
        );
        CREATE TABLE variables(
            name  TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY(name)
        );
    ";

    /// A store with the schema applied and `rows` (SQL statements) executed.
    ///
    /// Foreign keys are switched off while loading so tests can seed
    /// dangling rows; [`check_integrity`] switches them back on.
    ///
    /// [`check_integrity`]: crate::traits::ConfigStore::check_integrity
    pub fn store(rows: &str) -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "foreign_keys", false).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        conn.execute_batch(rows).unwrap();
        SqliteStore::from_connection(conn)
    }

    /// Three active desktops (`web`, `mail`, `chat` in that order), one
    /// inactive desktop, and a handful of programs.
    pub const THREE_DESKTOPS: &str = "
        INSERT INTO desktops VALUES ('mail', 'T', 2, '1', 7);
        INSERT INTO desktops VALUES ('web',  'T', 1, '0', 0);
        INSERT INTO desktops VALUES ('chat', 'T', 3, '2', 0);
        INSERT INTO desktops VALUES ('old',  'F', 4, '3', 0);
        INSERT INTO desktopCommands VALUES ('web',  'T', 'firefox',          2, NULL, NULL);
        INSERT INTO desktopCommands VALUES ('web',  'T', 'xterm -e htop',    1, '/tmp/htop-%T.log', '/tmp');
        INSERT INTO desktopCommands VALUES ('web',  'F', 'chromium',         3, NULL, NULL);
        INSERT INTO desktopCommands VALUES ('mail', 'T', 'thunderbird',      1, '', NULL);
        INSERT INTO desktopCommands VALUES ('chat', 'T', 'signal-desktop',   1, NULL, NULL);
        INSERT INTO desktopCommands VALUES ('old',  'T', 'xclock',           1, NULL, NULL);
        INSERT INTO variables VALUES ('switchDesktop', 'wmctrl -s ');
    ";
}
