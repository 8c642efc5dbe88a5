use chrono::{Local, NaiveDate};
use rust_decimal_macros::dec;
use serde_json::json;
use uuid::Uuid;

use crate::entity::{payroll, sea_orm_active_enums::{PaymentMode, PayrollStatus}, staff};

pub(crate) fn staff(id: i32, staff_id: &str, first_name: &str) -> staff::Model {
    staff::Model {
        id,
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        staff_id: staff_id.to_owned(),
        role_id: 2,
        department_id: None,
        designation_id: None,
        first_name: first_name.to_owned(),
        last_name: Some("Verma".to_owned()),
        father_name: None,
        mother_name: None,
        email: None,
        gender: None,
        marital_status: None,
        date_of_birth: NaiveDate::from_ymd_opt(1990, 8, 14),
        date_of_joining: None,
        phone: None,
        emergency_phone: None,
        current_address: None,
        permanent_address: None,
        qualification: None,
        work_experience: None,
        note: None,
        epf_no: None,
        basic_salary: Some(dec!(50000)),
        contract_type: None,
        work_shift: None,
        work_location: None,
        number_of_leaves: Some(12),
        bank_account_name: None,
        bank_account_number: None,
        bank_name: None,
        ifsc_code: None,
        bank_branch: None,
        facebook_url: None,
        twitter_url: None,
        linkedin_url: None,
        instagram_url: None,
    }
}

/// A March 2024 payroll for `staff_id`: 50000 + 2000 - 1800 - 500.
pub(crate) fn generated_payroll(staff_id: i32) -> payroll::Model {
    payroll::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        staff_id,
        month: 3,
        year: 2024,
        status: PayrollStatus::Generated,
        basic_salary: Some(dec!(50000)),
        earnings: Some(json!([{ "type": "Bonus", "amount": "2000" }])),
        deductions: Some(json!([{ "type": "PF", "amount": "1800" }])),
        tax: Some(dec!(500)),
        total_earnings: Some(dec!(52000)),
        total_deductions: Some(dec!(1800)),
        net_salary: Some(dec!(49700)),
        attendance: None,
        payment_date: None,
        payment_mode: None,
        payment_note: None,
    }
}

pub(crate) fn paid_payroll(staff_id: i32) -> payroll::Model {
    payroll::Model {
        status: PayrollStatus::Paid,
        payment_date: NaiveDate::from_ymd_opt(2024, 4, 1),
        payment_mode: Some(PaymentMode::BankTransfer),
        payment_note: Some("April run".to_owned()),
        ..generated_payroll(staff_id)
    }
}
