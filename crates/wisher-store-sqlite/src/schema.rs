//! SQL schema for the Wisher SQLite store.
//!
//! Executed once at connection startup. Every table carries the same soft
//! delete columns: `enabled` (1 = live) and `disabled_at`, stamped on the one
//! transition to disabled. No row is ever deleted.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    email         TEXT    NOT NULL,
    password_hash TEXT    NOT NULL,
    first_name    TEXT    NOT NULL,
    last_name     TEXT    NOT NULL,
    admin         INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT    NOT NULL,
    enabled       INTEGER NOT NULL DEFAULT 1,
    disabled_at   TEXT
);

-- Codes are never reissued, even after the invite is disabled.
CREATE TABLE IF NOT EXISTS invites (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    code        TEXT    NOT NULL UNIQUE,
    used        INTEGER NOT NULL DEFAULT 0,
    used_by     INTEGER REFERENCES users(id),
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

-- `groups` is a keyword in SQLite.
CREATE TABLE IF NOT EXISTS user_groups (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    INTEGER NOT NULL REFERENCES users(id),
    name        TEXT    NOT NULL,
    description TEXT    NOT NULL DEFAULT '',
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

CREATE TABLE IF NOT EXISTS group_memberships (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    group_id    INTEGER NOT NULL REFERENCES user_groups(id),
    user_id     INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

CREATE TABLE IF NOT EXISTS wishlists (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    INTEGER NOT NULL REFERENCES users(id),
    name        TEXT    NOT NULL,
    description TEXT    NOT NULL DEFAULT '',
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

CREATE TABLE IF NOT EXISTS wishlist_memberships (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    wishlist_id INTEGER NOT NULL REFERENCES wishlists(id),
    group_id    INTEGER NOT NULL REFERENCES user_groups(id),
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

CREATE TABLE IF NOT EXISTS wishes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    wishlist_id INTEGER NOT NULL REFERENCES wishlists(id),
    owner_id    INTEGER NOT NULL REFERENCES users(id),
    name        TEXT    NOT NULL,
    note        TEXT    NOT NULL DEFAULT '',
    url         TEXT    NOT NULL DEFAULT '',
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

CREATE TABLE IF NOT EXISTS wish_claims (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    wish_id     INTEGER NOT NULL REFERENCES wishes(id),
    user_id     INTEGER NOT NULL REFERENCES users(id),
    created_at  TEXT    NOT NULL,
    enabled     INTEGER NOT NULL DEFAULT 1,
    disabled_at TEXT
);

-- Uniqueness holds among live rows only; disabled rows never block a key.
CREATE UNIQUE INDEX IF NOT EXISTS users_live_email_idx
    ON users(email) WHERE enabled = 1;
CREATE UNIQUE INDEX IF NOT EXISTS wishlists_live_name_idx
    ON wishlists(owner_id, name) WHERE enabled = 1;
CREATE UNIQUE INDEX IF NOT EXISTS wishes_live_name_idx
    ON wishes(wishlist_id, name) WHERE enabled = 1;
CREATE UNIQUE INDEX IF NOT EXISTS wish_claims_live_wish_idx
    ON wish_claims(wish_id) WHERE enabled = 1;

CREATE INDEX IF NOT EXISTS group_memberships_pair_idx
    ON group_memberships(group_id, user_id);
CREATE INDEX IF NOT EXISTS group_memberships_user_idx
    ON group_memberships(user_id);
CREATE INDEX IF NOT EXISTS wishlist_memberships_pair_idx
    ON wishlist_memberships(wishlist_id, group_id);
CREATE INDEX IF NOT EXISTS wishlist_memberships_group_idx
    ON wishlist_memberships(group_id);
CREATE INDEX IF NOT EXISTS wishes_wishlist_idx ON wishes(wishlist_id);

PRAGMA user_version = 1;
";
