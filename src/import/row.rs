use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{parse_headers, parse_import_date, CanonicalField, Cell, Grid, ImportError};

/// Canonical staff-creation payload.
///
/// Rows coming out of [`normalize_row`] always carry `staff_id`, `role_id`
/// and `first_name`; the bulk create endpoint checks again for payloads
/// that were assembled elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaffImportRow {
    pub staff_id: Option<String>,
    pub role_id: Option<i32>,
    pub department_id: Option<i32>,
    pub designation_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub marital_status: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_joining: Option<NaiveDate>,
    pub phone: Option<String>,
    pub emergency_phone: Option<String>,
    pub current_address: Option<String>,
    pub permanent_address: Option<String>,
    pub qualification: Option<String>,
    pub work_experience: Option<String>,
    pub note: Option<String>,
    pub epf_no: Option<String>,
    pub basic_salary: Option<Decimal>,
    pub contract_type: Option<String>,
    pub work_shift: Option<String>,
    pub work_location: Option<String>,
    pub number_of_leaves: Option<i32>,
    pub bank_account_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_name: Option<String>,
    pub ifsc_code: Option<String>,
    pub bank_branch: Option<String>,
    pub facebook_url: Option<String>,
    pub twitter_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
}

impl StaffImportRow {
    /// Name of the first required field that is absent or blank.
    pub fn missing_required(&self) -> Option<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());

        if blank(&self.staff_id) {
            Some("staff_id")
        } else if self.role_id.is_none() {
            Some("role_id")
        } else if blank(&self.first_name) {
            Some("first_name")
        } else {
            None
        }
    }

    fn assign(&mut self, field: CanonicalField, cell: &Cell) {
        match field {
            CanonicalField::DateOfBirth => self.date_of_birth = parse_import_date(cell),
            CanonicalField::DateOfJoining => self.date_of_joining = parse_import_date(cell),
            CanonicalField::RoleId => self.role_id = parse_integer(cell),
            CanonicalField::DepartmentId => self.department_id = parse_integer(cell),
            CanonicalField::DesignationId => self.designation_id = parse_integer(cell),
            CanonicalField::BasicSalary => self.basic_salary = Some(parse_amount(cell).unwrap_or_default()),
            CanonicalField::NumberOfLeaves => self.number_of_leaves = Some(parse_count(cell).unwrap_or_default()),
            text_field => {
                if let Some(slot) = self.text_slot(text_field) {
                    *slot = cell.text();
                }
            },
        }
    }

    fn text_slot(&mut self, field: CanonicalField) -> Option<&mut Option<String>> {
        let slot = match field {
            CanonicalField::StaffId => &mut self.staff_id,
            CanonicalField::FirstName => &mut self.first_name,
            CanonicalField::LastName => &mut self.last_name,
            CanonicalField::FatherName => &mut self.father_name,
            CanonicalField::MotherName => &mut self.mother_name,
            CanonicalField::Email => &mut self.email,
            CanonicalField::Gender => &mut self.gender,
            CanonicalField::MaritalStatus => &mut self.marital_status,
            CanonicalField::Phone => &mut self.phone,
            CanonicalField::EmergencyPhone => &mut self.emergency_phone,
            CanonicalField::CurrentAddress => &mut self.current_address,
            CanonicalField::PermanentAddress => &mut self.permanent_address,
            CanonicalField::Qualification => &mut self.qualification,
            CanonicalField::WorkExperience => &mut self.work_experience,
            CanonicalField::Note => &mut self.note,
            CanonicalField::EpfNo => &mut self.epf_no,
            CanonicalField::ContractType => &mut self.contract_type,
            CanonicalField::WorkShift => &mut self.work_shift,
            CanonicalField::WorkLocation => &mut self.work_location,
            CanonicalField::BankAccountName => &mut self.bank_account_name,
            CanonicalField::BankAccountNumber => &mut self.bank_account_number,
            CanonicalField::BankName => &mut self.bank_name,
            CanonicalField::IfscCode => &mut self.ifsc_code,
            CanonicalField::BankBranch => &mut self.bank_branch,
            CanonicalField::FacebookUrl => &mut self.facebook_url,
            CanonicalField::TwitterUrl => &mut self.twitter_url,
            CanonicalField::LinkedinUrl => &mut self.linkedin_url,
            CanonicalField::InstagramUrl => &mut self.instagram_url,
            CanonicalField::RoleId
            | CanonicalField::DepartmentId
            | CanonicalField::DesignationId
            | CanonicalField::DateOfBirth
            | CanonicalField::DateOfJoining
            | CanonicalField::BasicSalary
            | CanonicalField::NumberOfLeaves => return None,
        };

        Some(slot)
    }
}

/// Whole numbers only; `3` and `3.0` are fine, `3.5` and `abc` are not.
fn parse_integer(cell: &Cell) -> Option<i32> {
    let value = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => {
            let text = text.trim();
            if let Ok(value) = text.parse::<i32>() {
                return Some(value);
            }
            text.parse::<f64>().ok()?
        },
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) => return None,
    };

    (value.is_finite() && value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX))
        .then_some(value as i32)
}

fn parse_amount(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Number(value) => Decimal::try_from(*value).ok(),
        Cell::Text(text) => {
            let text = text.trim();
            text.parse::<Decimal>().ok().or_else(|| Decimal::from_scientific(text).ok())
        },
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) => None,
    }
}

/// Fractional counts are truncated towards zero.
fn parse_count(cell: &Cell) -> Option<i32> {
    let value = match cell {
        Cell::Number(value) => *value,
        Cell::Text(text) => text.trim().parse::<f64>().ok()?,
        Cell::Empty | Cell::Bool(_) | Cell::Date(_) => return None,
    };

    (value.is_finite() && value.abs() <= f64::from(i32::MAX)).then_some(value.trunc() as i32)
}

/// Builds one payload from a data row. `headers` is the output of
/// [`parse_headers`] for the sheet's header row; cells past the last header
/// are ignored and missing trailing cells count as blank.
pub fn normalize_row(row: &[Cell], headers: &[Option<CanonicalField>]) -> Option<StaffImportRow> {
    let mut staff = StaffImportRow::default();

    for (cell, field) in row.iter().zip(headers) {
        let Some(field) = field else {
            continue;
        };
        if cell.is_blank() {
            continue;
        }

        staff.assign(*field, cell);
    }

    staff.missing_required().is_none().then_some(staff)
}

/// Normalizes every data row of `grid`, keeping sheet order. Rows without a
/// staff id, role id or first name are dropped.
pub fn normalize_sheet(grid: &Grid) -> Result<Vec<StaffImportRow>, ImportError> {
    let Some((header_row, data_rows)) = grid.split_first().filter(|(_, rows)| !rows.is_empty()) else {
        return Err(ImportError::Parse {
            reason: "the sheet must contain a header row and at least one data row".to_owned(),
        });
    };

    let headers = parse_headers(header_row);
    let batch = data_rows.iter()
        .filter_map(|row| normalize_row(row, &headers))
        .collect::<Vec<_>>();

    debug!(data_rows = data_rows.len(), accepted = batch.len(), "normalized staff sheet");

    Ok(batch)
}
