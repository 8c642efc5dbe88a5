use std::{fmt, str::FromStr};

use crate::{attendance::AttendanceAggregate, entity::sea_orm_active_enums::{PaymentMode, PayrollStatus}};

use super::{GenerateCommand, Payment, PayrollAction, PayrollError, PayrollSnapshot};

impl PayrollStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PayrollStatus::NotGenerated => "not_generated",
            PayrollStatus::Generated => "generated",
            PayrollStatus::Paid => "paid",
        }
    }

    /// The only status a revert from `self` may land on.
    pub const fn predecessor(&self) -> Option<PayrollStatus> {
        match self {
            PayrollStatus::NotGenerated => None,
            PayrollStatus::Generated => Some(PayrollStatus::NotGenerated),
            PayrollStatus::Paid => Some(PayrollStatus::Generated),
        }
    }
}

impl fmt::Display for PayrollStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PaymentMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Cheque => "cheque",
            PaymentMode::BankTransfer => "bank_transfer",
            PaymentMode::Online => "online",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cash" => Ok(PaymentMode::Cash),
            "cheque" => Ok(PaymentMode::Cheque),
            "bank_transfer" => Ok(PaymentMode::BankTransfer),
            "online" => Ok(PaymentMode::Online),
            other => Err(PayrollError::validation(
                "payment_mode",
                format!("`{other}` is not one of cash, cheque, bank_transfer, online"),
            )),
        }
    }
}

/// Lifecycle of a single payroll record.
///
/// The snapshot only exists once generated and the payment only once paid,
/// so a record can never be paid without the figures it was paid against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayrollState {
    NotGenerated,
    Generated(PayrollSnapshot),
    Paid(PayrollSnapshot, Payment),
}

impl PayrollState {
    pub fn status(&self) -> PayrollStatus {
        match self {
            PayrollState::NotGenerated => PayrollStatus::NotGenerated,
            PayrollState::Generated(_) => PayrollStatus::Generated,
            PayrollState::Paid(_, _) => PayrollStatus::Paid,
        }
    }

    pub fn snapshot(&self) -> Option<&PayrollSnapshot> {
        match self {
            PayrollState::NotGenerated => None,
            PayrollState::Generated(snapshot) | PayrollState::Paid(snapshot, _) => Some(snapshot),
        }
    }

    pub fn payment(&self) -> Option<&Payment> {
        match self {
            PayrollState::Paid(_, payment) => Some(payment),
            _ => None,
        }
    }

    /// `not_generated -> generated`
    pub fn generate(self, command: &GenerateCommand, attendance: Option<AttendanceAggregate>) -> Result<Self, PayrollError> {
        match self {
            PayrollState::NotGenerated => Ok(PayrollState::Generated(PayrollSnapshot::compute(command, attendance))),
            other => Err(PayrollError::State { from: other.status(), action: PayrollAction::Generate }),
        }
    }

    /// `generated -> paid`
    pub fn pay(self, payment: Payment) -> Result<Self, PayrollError> {
        match self {
            PayrollState::Generated(snapshot) => Ok(PayrollState::Paid(snapshot, payment)),
            other => Err(PayrollError::State { from: other.status(), action: PayrollAction::Pay }),
        }
    }

    /// `paid -> generated` keeps the snapshot and drops the payment;
    /// `generated -> not_generated` drops the snapshot.
    pub fn revert(self, target: PayrollStatus) -> Result<Self, PayrollError> {
        if self.status().predecessor() != Some(target) {
            return Err(PayrollError::State { from: self.status(), action: PayrollAction::RevertTo(target) });
        }

        Ok(match self {
            PayrollState::Paid(snapshot, _) => PayrollState::Generated(snapshot),
            PayrollState::Generated(_) | PayrollState::NotGenerated => PayrollState::NotGenerated,
        })
    }
}
