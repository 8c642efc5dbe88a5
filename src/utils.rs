use chrono::{Months, NaiveDate};

/// First and last calendar day of `month` in `year`.
pub fn month_bounds(year: i32, month: i16) -> Option<(NaiveDate, NaiveDate)> {
    let month = u32::try_from(month).ok()?;
    let first_day = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last_day = first_day.checked_add_months(Months::new(1))?.pred_opt()?;

    Some((first_day, last_day))
}
