//! SQL schema for the Marquee SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per provider subject. user_id is issued by the identity provider
-- and never generated locally. Uniqueness is the primary key; there is no
-- secondary uniqueness check.
CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,
    email       TEXT,                     -- NULL until the provider resolves one
    name        TEXT NOT NULL,
    image       TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL,            -- ISO 8601 UTC; store-assigned
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS users_created_idx ON users(created_at);

PRAGMA user_version = 1;
";
