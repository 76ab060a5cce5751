//! SQL Identifier Module
//!
//! Table and column names cannot be bound as statement parameters, so they are
//! validated against an allow-list and quoted before being spliced into SQL.

use std::fmt;

use super::{DEFAULT_EXPIRY_COLUMN, MAX_IDENTIFIER_LENGTH};
use crate::error::{Result, SweeperError};

// == Identifier ==
/// A validated SQL identifier.
///
/// Accepts an ASCII letter or underscore followed by ASCII alphanumerics or
/// underscores, up to [`MAX_IDENTIFIER_LENGTH`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates `name` and wraps it.
    pub fn parse(name: &str) -> Result<Self> {
        if name.is_empty() {
            return Err(SweeperError::InvalidIdentifier(
                "identifier cannot be empty".to_string(),
            ));
        }
        if name.len() > MAX_IDENTIFIER_LENGTH {
            return Err(SweeperError::InvalidIdentifier(format!(
                "identifier exceeds maximum length of {} bytes",
                MAX_IDENTIFIER_LENGTH
            )));
        }

        let mut chars = name.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(SweeperError::InvalidIdentifier(format!(
                "{:?} is not a plain SQL identifier",
                name
            )));
        }

        Ok(Self(name.to_string()))
    }

    /// The raw, unquoted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name wrapped in double quotes, ready to splice into a statement.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0.replace('"', "\"\""))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Sweep Target ==
/// The table to sweep and the column holding each row's expiration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepTarget {
    pub table: Identifier,
    pub expiry_column: Identifier,
}

impl SweepTarget {
    /// Targets `table` using the default `expires_on` column.
    pub fn new(table: &str) -> Result<Self> {
        Self::with_column(table, DEFAULT_EXPIRY_COLUMN)
    }

    /// Targets `table` using a custom expiration column.
    pub fn with_column(table: &str, expiry_column: &str) -> Result<Self> {
        Ok(Self {
            table: Identifier::parse(table)?,
            expiry_column: Identifier::parse(expiry_column)?,
        })
    }

    /// Builds the delete statement for this target.
    ///
    /// Expiry is compared against SQLite's `datetime('now')`, evaluated when
    /// the statement runs.
    pub fn delete_expired_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE {} < datetime('now')",
            self.table.quoted(),
            self.expiry_column.quoted()
        )
    }
}
