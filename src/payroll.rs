//! Payroll engine.
//!
//! A payroll record covers one staff member for one month. It starts out
//! `not_generated`, is `generated` from a validated [`GenerateCommand`] and
//! becomes `paid` once a [`Payment`] is recorded. Reverts move exactly one
//! step back.
//!
//! Nothing in here touches the database; the HTTP layer loads a
//! [`PayrollState`], applies a transition and writes the result back.

use std::fmt;

use thiserror::Error;

use crate::entity::sea_orm_active_enums::PayrollStatus;

pub use record::*;
pub use status::*;

mod record;
mod status;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayrollError {
    #[error("{field}: {reason}")]
    Validation {
        field: &'static str,
        reason: String,
    },
    #[error("cannot {action} a payroll that is `{from}`")]
    State {
        from: PayrollStatus,
        action: PayrollAction,
    },
}

impl PayrollError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation { field, reason: reason.into() }
    }
}

/// The transition that was attempted when a [`PayrollError::State`] occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayrollAction {
    Generate,
    Pay,
    RevertTo(PayrollStatus),
}

impl fmt::Display for PayrollAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayrollAction::Generate => f.write_str("generate"),
            PayrollAction::Pay => f.write_str("pay"),
            PayrollAction::RevertTo(target) => write!(f, "revert to `{target}`"),
        }
    }
}
