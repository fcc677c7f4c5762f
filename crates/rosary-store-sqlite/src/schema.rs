//! SQL schema for the Rosary SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS rose_groups (
    group_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT    NOT NULL,
    created_at  TEXT    NOT NULL,
    generation  INTEGER NOT NULL DEFAULT 0 CHECK (generation >= 0)
);

-- rose_pos is dense per group (1..=N). Closing up a seat briefly negates the
-- positions behind it so the unique index never sees a collision.
CREATE TABLE IF NOT EXISTS profiles (
    profile_id  TEXT PRIMARY KEY,
    full_name   TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    role        TEXT NOT NULL DEFAULT 'user',   -- 'admin' | 'user'
    group_id    INTEGER REFERENCES rose_groups(group_id) ON DELETE RESTRICT,
    rose_pos    INTEGER,
    seating     INTEGER NOT NULL DEFAULT 0,   -- bumped on every seat change
    CHECK ((group_id IS NULL) = (rose_pos IS NULL))
);

-- Append-only. The window columns (group_id, generation, seating, period)
-- pin each row to the assignment it acknowledged; period is NULL under the
-- manual schedule. group_id carries no foreign key: ledger history outlives
-- the group it was written in.
CREATE TABLE IF NOT EXISTS acknowledgments (
    ack_id      TEXT PRIMARY KEY,
    user_id     TEXT    NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    mystery_id  INTEGER NOT NULL CHECK (mystery_id BETWEEN 1 AND 20),
    group_id    INTEGER NOT NULL,
    generation  INTEGER NOT NULL,
    seating     INTEGER NOT NULL,
    period      TEXT,
    created_at  TEXT    NOT NULL
);

-- Append-only audit trail, one row per rotation. Like acknowledgments it
-- keeps no foreign key on group_id and survives the group's deletion.
CREATE TABLE IF NOT EXISTS rotations (
    rotation_id   TEXT PRIMARY KEY,
    group_id      INTEGER NOT NULL,
    performed_by  TEXT    NOT NULL,
    generation    INTEGER NOT NULL,
    recorded_at   TEXT    NOT NULL,
    UNIQUE (group_id, generation)
);

CREATE TABLE IF NOT EXISTS intentions (
    year        INTEGER NOT NULL,
    month       INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    title       TEXT    NOT NULL,
    content     TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL,
    PRIMARY KEY (year, month)
);

CREATE UNIQUE INDEX IF NOT EXISTS profiles_seat_idx ON profiles(group_id, rose_pos);
CREATE INDEX IF NOT EXISTS acks_user_idx      ON acknowledgments(user_id, mystery_id);
CREATE INDEX IF NOT EXISTS rotations_group_idx ON rotations(group_id);

PRAGMA user_version = 1;
";
