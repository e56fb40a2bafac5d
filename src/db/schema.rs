pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS snapshots (
    name        TEXT PRIMARY KEY,
    next_id     INTEGER NOT NULL DEFAULT 1,
    written_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    position    INTEGER NOT NULL,
    id          INTEGER NOT NULL UNIQUE,
    amount      TEXT NOT NULL,
    category    TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_expenses_position ON expenses(position);

CREATE TABLE IF NOT EXISTS budgets (
    position      INTEGER NOT NULL,
    category      TEXT NOT NULL,
    month         TEXT NOT NULL,
    limit_amount  TEXT NOT NULL,
    UNIQUE(category, month)
);

"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

pub(crate) const EXPENSES: &str = "expenses";
pub(crate) const BUDGETS: &str = "budgets";
