//! Monthly attendance aggregates consumed by payroll generation.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::{entity::{prelude::*, sea_orm_active_enums::AttendanceType, staff_attendance}, utils};

/// How much a late day counts towards the present percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendancePolicy {
    pub late_weight: Decimal,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self { late_weight: Decimal::ONE }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceAggregate {
    pub present: u32,
    pub late: u32,
    pub absent: u32,
    pub half_day: u32,
    pub holiday: u32,
    pub total_days: u32,
    pub gross_present_percentage: Decimal,
}

impl AttendanceAggregate {
    pub fn from_marks(marks: impl IntoIterator<Item = AttendanceType>, policy: &AttendancePolicy) -> Self {
        let mut aggregate = Self::default();

        for mark in marks {
            match mark {
                AttendanceType::Present => aggregate.present += 1,
                AttendanceType::Late => aggregate.late += 1,
                AttendanceType::Absent => aggregate.absent += 1,
                AttendanceType::HalfDay => aggregate.half_day += 1,
                AttendanceType::Holiday => aggregate.holiday += 1,
            }
            aggregate.total_days += 1;
        }

        if aggregate.total_days > 0 {
            let attended = Decimal::from(aggregate.present)
                + Decimal::from(aggregate.late) * policy.late_weight
                + Decimal::from(aggregate.half_day) * Decimal::new(5, 1);

            aggregate.gross_present_percentage = (attended / Decimal::from(aggregate.total_days) * Decimal::ONE_HUNDRED).round_dp(2);
        }

        aggregate
    }
}

/// Aggregates for every staff member in `staff_ids`. Staff without any
/// marks in the month get an all-zero aggregate.
pub async fn monthly_aggregates<C: ConnectionTrait>(
    db: &C,
    staff_ids: &[i32],
    month: i16,
    year: i32,
    policy: &AttendancePolicy,
) -> Result<HashMap<i32, AttendanceAggregate>, DbErr> {
    let mut marks: HashMap<i32, Vec<AttendanceType>> = staff_ids.iter().map(|id| (*id, Vec::new())).collect();

    let Some((first_day, last_day)) = utils::month_bounds(year, month) else {
        return Ok(HashMap::new());
    };

    if !staff_ids.is_empty() {
        let rows = StaffAttendance::find()
            .filter(staff_attendance::Column::StaffId.is_in(staff_ids.iter().copied()))
            .filter(staff_attendance::Column::Date.between(first_day, last_day))
            .all(db).await?;

        for row in rows {
            marks.entry(row.staff_id).or_default().push(row.kind);
        }
    }

    Ok(marks.into_iter()
        .map(|(staff_id, marks)| (staff_id, AttendanceAggregate::from_marks(marks, policy)))
        .collect())
}

pub async fn monthly_aggregate<C: ConnectionTrait>(
    db: &C,
    staff_id: i32,
    month: i16,
    year: i32,
    policy: &AttendancePolicy,
) -> Result<AttendanceAggregate, DbErr> {
    Ok(monthly_aggregates(db, &[staff_id], month, year, policy).await?
        .remove(&staff_id)
        .unwrap_or_default())
}
