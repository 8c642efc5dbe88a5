use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{attendance::AttendanceAggregate, entity::sea_orm_active_enums::PaymentMode};

use super::PayrollError;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Amounts are stored as `NUMERIC(14,2)`.
pub const AMOUNT_SCALE: u32 = 2;
/// 10^12, exclusive.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// One labelled earning or deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub amount: Decimal,
}

/// A line item as it arrives from the payroll form; either half may be blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemInput {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub amount: Option<Decimal>,
}

impl LineItemInput {
    fn complete(self) -> Option<LineItem> {
        let item_type = self.item_type?.trim().to_owned();
        if item_type.is_empty() {
            return None;
        }

        Some(LineItem { item_type, amount: self.amount? })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    pub staff_id: Option<i32>,
    pub month: Option<i16>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub basic_salary: Option<Decimal>,
    #[serde(default)]
    pub earnings: Vec<LineItemInput>,
    #[serde(default)]
    pub deductions: Vec<LineItemInput>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub tax: Option<Decimal>,
}

/// A `(staff, month, year)` payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayrollPeriod {
    pub staff_id: i32,
    pub month: i16,
    pub year: i32,
}

pub fn validate_month_year(month: i16, year: i32) -> Result<(), PayrollError> {
    if !(1..=12).contains(&month) {
        return Err(PayrollError::validation("month", format!("{month} is not a month between 1 and 12")));
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(PayrollError::validation("year", format!("{year} is outside {MIN_YEAR}..={MAX_YEAR}")));
    }

    Ok(())
}

/// Validated, immutable input of a generate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCommand {
    period: PayrollPeriod,
    basic_salary: Decimal,
    earnings: Vec<LineItem>,
    deductions: Vec<LineItem>,
    tax: Decimal,
    totals: PayrollTotals,
}

impl GenerateCommand {
    pub fn new(request: GenerateRequest) -> Result<Self, PayrollError> {
        let staff_id = request.staff_id.ok_or_else(|| PayrollError::validation("staff_id", "is required"))?;
        let month = request.month.ok_or_else(|| PayrollError::validation("month", "is required"))?;
        let year = request.year.ok_or_else(|| PayrollError::validation("year", "is required"))?;
        validate_month_year(month, year)?;

        let basic_salary = request.basic_salary.ok_or_else(|| PayrollError::validation("basic_salary", "is required"))?;
        if basic_salary < Decimal::ZERO {
            return Err(PayrollError::validation("basic_salary", "must not be negative"));
        }
        validate_amount("basic_salary", basic_salary)?;

        let tax = request.tax.unwrap_or_default();
        if tax < Decimal::ZERO {
            return Err(PayrollError::validation("tax", "must not be negative"));
        }
        validate_amount("tax", tax)?;

        let earnings: Vec<_> = request.earnings.into_iter().filter_map(LineItemInput::complete).collect();
        let deductions: Vec<_> = request.deductions.into_iter().filter_map(LineItemInput::complete).collect();
        for item in &earnings {
            validate_amount("earnings", item.amount)?;
        }
        for item in &deductions {
            validate_amount("deductions", item.amount)?;
        }

        let totals = PayrollTotals::compute(basic_salary, &earnings, &deductions, tax)?;

        Ok(Self {
            period: PayrollPeriod { staff_id, month, year },
            basic_salary,
            earnings,
            deductions,
            tax,
            totals,
        })
    }

    pub fn period(&self) -> PayrollPeriod {
        self.period
    }

    pub fn earnings(&self) -> &[LineItem] {
        &self.earnings
    }

    pub fn deductions(&self) -> &[LineItem] {
        &self.deductions
    }
}

/// Rejects amounts the `NUMERIC(14,2)` columns would round or overflow.
fn validate_amount(field: &'static str, amount: Decimal) -> Result<(), PayrollError> {
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(PayrollError::validation(field, format!("{amount} has more than {AMOUNT_SCALE} decimal places")));
    }
    if amount.abs() >= AMOUNT_LIMIT {
        return Err(PayrollError::validation(field, format!("{amount} is not below {AMOUNT_LIMIT}")));
    }

    Ok(())
}

fn checked_total(field: &'static str, total: Option<Decimal>) -> Result<Decimal, PayrollError> {
    total
        .filter(|total| total.abs() < AMOUNT_LIMIT)
        .ok_or_else(|| PayrollError::validation(field, format!("total is not below {AMOUNT_LIMIT}")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayrollTotals {
    pub total_earnings: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

impl PayrollTotals {
    /// `net = basic + Σ earnings − Σ deductions − tax`, unclamped.
    ///
    /// Each total must stay below [`AMOUNT_LIMIT`].
    pub fn compute(basic_salary: Decimal, earnings: &[LineItem], deductions: &[LineItem], tax: Decimal) -> Result<Self, PayrollError> {
        let total_earnings = checked_total("total_earnings", earnings.iter()
            .try_fold(basic_salary, |sum, item| sum.checked_add(item.amount)))?;
        let total_deductions = checked_total("total_deductions", deductions.iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount)))?;
        let net_salary = checked_total("net_salary", total_earnings
            .checked_sub(total_deductions)
            .and_then(|net| net.checked_sub(tax)))?;

        Ok(Self { total_earnings, total_deductions, net_salary })
    }
}

/// Figures captured when a payroll is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollSnapshot {
    pub basic_salary: Decimal,
    pub earnings: Vec<LineItem>,
    pub deductions: Vec<LineItem>,
    pub tax: Decimal,
    pub totals: PayrollTotals,
    pub attendance: Option<AttendanceAggregate>,
}

impl PayrollSnapshot {
    pub fn compute(command: &GenerateCommand, attendance: Option<AttendanceAggregate>) -> Self {
        Self {
            basic_salary: command.basic_salary,
            earnings: command.earnings().to_vec(),
            deductions: command.deductions().to_vec(),
            tax: command.tax,
            totals: command.totals,
            attendance,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayRequest {
    pub payment_date: Option<NaiveDate>,
    pub payment_mode: Option<String>,
    pub payment_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub date: NaiveDate,
    pub mode: PaymentMode,
    pub note: Option<String>,
}

impl Payment {
    /// `today` is the caller's local calendar date; a payment dated after it
    /// is rejected.
    pub fn new(request: PayRequest, today: NaiveDate) -> Result<Self, PayrollError> {
        let date = request.payment_date.ok_or_else(|| PayrollError::validation("payment_date", "is required"))?;
        if date > today {
            return Err(PayrollError::validation("payment_date", format!("{date} is in the future")));
        }

        let mode = request.payment_mode
            .ok_or_else(|| PayrollError::validation("payment_mode", "is required"))?
            .parse()?;

        let note = request.payment_note
            .map(|note| note.trim().to_owned())
            .filter(|note| !note.is_empty());

        Ok(Self { date, mode, note })
    }
}

/// Form fields come through as `""` when left empty.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Amount(Decimal),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Amount(amount)) => Ok(Some(amount)),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(de::Error::custom),
    }
}
