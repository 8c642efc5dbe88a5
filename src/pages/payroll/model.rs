use rust_decimal::Decimal;

use crate::attendance::AttendanceAggregate;

use super::*;

#[derive(Debug, Deserialize)]
pub(super) struct PeriodQuery {
    pub(super) month: i16,
    pub(super) year: i32,
    pub(super) role_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RevertRequest {
    pub(super) target_status: PayrollStatus,
}

/// One line of the monthly payroll sheet. Staff without a stored record show
/// up as `not_generated` with no `payroll_id`.
#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayrollSheetRow {
    pub(super) staff_id: i32,
    pub(super) staff_code: String,
    pub(super) first_name: String,
    pub(super) last_name: Option<String>,
    pub(super) role_id: i32,
    pub(super) basic_salary: Option<Decimal>,
    pub(super) attendance: AttendanceAggregate,
    pub(super) payroll_id: Option<Uuid>,
    pub(super) status: PayrollStatus,
    pub(super) net_salary: Option<Decimal>,
}
