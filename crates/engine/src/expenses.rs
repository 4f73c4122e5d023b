//! The module contains the `Expense` type, one recorded spending.
//!
//! An expense points at its category by **name**, not by id.
use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, stats::format_amount};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Expense {
    /// Build an expense with a fresh id, rejecting amounts that are not positive.
    pub fn new(
        amount: f64,
        category: String,
        date: DateTime<Utc>,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            amount: validate_amount(amount)?,
            category,
            date,
            note,
        })
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_amount(self.amount), self.category)?;
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Accept only finite amounts strictly greater than zero.
pub fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidAmount(
            "please enter a valid positive number".to_string(),
        ));
    }
    Ok(amount)
}

/// Parse an amount typed by the user.
pub fn parse_amount(raw: &str) -> ResultEngine<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::MissingField("amount".to_string()));
    }
    let value: f64 = trimmed
        .parse()
        .map_err(|_| EngineError::InvalidAmount(format!("'{trimmed}' is not a number")))?;
    validate_amount(value)
}
