use std::{collections::HashMap, str::FromStr};

use actix_web::{dev, get, post, web, FromRequest, HttpRequest, HttpResponse, Responder};
use chrono::Local;
use futures_util::future::LocalBoxFuture;
use sea_orm::{ActiveValue::{Set, Unchanged}, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Select, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    attendance::{self, AttendanceAggregate, AttendancePolicy},
    entity::{payroll, prelude::*, sea_orm_active_enums::PayrollStatus, staff},
    error::AppError,
    payroll::{validate_month_year, GenerateCommand, GenerateRequest, PayRequest, Payment, PayrollAction, PayrollError, PayrollSnapshot, PayrollState, PayrollTotals},
};

use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(list_payroll)
        .service(get_payroll)
        .service(generate_payroll)
        .service(pay_payroll)
        .service(revert_payroll);
}

#[get("")]
async fn list_payroll(db: web::Data<DatabaseConnection>, policy: web::Data<AttendancePolicy>, query: web::Query<PeriodQuery>) -> Result<impl Responder, AppError> {
    let PeriodQuery { month, year, role_id } = query.into_inner();
    validate_month_year(month, year)?;

    let mut staff_query = Staff::find().order_by_asc(staff::Column::Id);
    if let Some(role_id) = role_id {
        staff_query = staff_query.filter(staff::Column::RoleId.eq(role_id));
    }
    let members = staff_query.all(db.as_ref()).await?;
    let staff_ids = members.iter().map(|member| member.id).collect::<Vec<_>>();

    let mut payrolls = HashMap::new();
    if !staff_ids.is_empty() {
        payrolls = Payroll::find()
            .filter(payroll::Column::StaffId.is_in(staff_ids.iter().copied()))
            .filter(payroll::Column::Month.eq(month))
            .filter(payroll::Column::Year.eq(year))
            .all(db.as_ref()).await?
            .into_iter()
            .map(|record| (record.staff_id, record))
            .collect();
    }

    let mut aggregates = attendance::monthly_aggregates(db.as_ref(), &staff_ids, month, year, &policy).await?;

    let rows = members.into_iter().map(|member| {
        let record = payrolls.remove(&member.id);

        PayrollSheetRow {
            staff_id: member.id,
            staff_code: member.staff_id,
            first_name: member.first_name,
            last_name: member.last_name,
            role_id: member.role_id,
            basic_salary: member.basic_salary,
            attendance: aggregates.remove(&member.id).unwrap_or_default(),
            payroll_id: record.as_ref().map(|record| record.id),
            status: record.as_ref().map_or(PayrollStatus::NotGenerated, |record| record.status),
            net_salary: record.and_then(|record| record.net_salary),
        }
    }).collect::<Vec<_>>();

    Ok(web::Json(rows))
}

#[get("/{payroll_id}")]
async fn get_payroll(record: payroll::Model) -> impl Responder {
    web::Json(record)
}

#[post("")]
async fn generate_payroll(db: web::Data<DatabaseConnection>, policy: web::Data<AttendancePolicy>, payload: web::Json<GenerateRequest>) -> Result<impl Responder, AppError> {
    let command = GenerateCommand::new(payload.into_inner())?;
    let period = command.period();

    if Staff::find_by_id(period.staff_id).one(db.as_ref()).await?.is_none() {
        return Err(AppError::NotFound("staff"));
    }

    let existing = Payroll::find()
        .filter(payroll::Column::StaffId.eq(period.staff_id))
        .filter(payroll::Column::Month.eq(period.month))
        .filter(payroll::Column::Year.eq(period.year))
        .one(db.as_ref()).await?;

    let state = match &existing {
        Some(record) => stored_state(record)?,
        None => PayrollState::NotGenerated,
    };

    let aggregate = attendance::monthly_aggregate(db.as_ref(), period.staff_id, period.month, period.year, &policy).await?;
    let next = state.generate(&command, Some(aggregate))?;

    let response = match existing {
        Some(record) => HttpResponse::Ok().json(save_transition(&db, record, &next, PayrollAction::Generate).await?),
        None => {
            let now = Local::now().fixed_offset();

            let mut model = state_columns(&next)?;
            model.id = Set(Uuid::new_v4());
            model.created_at = Set(now);
            model.updated_at = Set(now);
            model.staff_id = Set(period.staff_id);
            model.month = Set(period.month);
            model.year = Set(period.year);

            let inserted = match Payroll::insert(model).exec_with_returning(db.as_ref()).await {
                Ok(inserted) => inserted,
                Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    warn!(staff_id = period.staff_id, month = period.month, year = period.year, "payroll generated concurrently");

                    let current = Payroll::find()
                        .filter(payroll::Column::StaffId.eq(period.staff_id))
                        .filter(payroll::Column::Month.eq(period.month))
                        .filter(payroll::Column::Year.eq(period.year));
                    return Err(conflict(&db, current, PayrollAction::Generate).await);
                },
                Err(err) => return Err(err.into()),
            };

            HttpResponse::Created().json(inserted)
        },
    };

    info!(
        staff_id = period.staff_id,
        month = period.month,
        year = period.year,
        net_salary = ?next.snapshot().map(|snapshot| snapshot.totals.net_salary),
        "payroll generated"
    );

    Ok(response)
}

#[post("/{payroll_id}/pay")]
async fn pay_payroll(db: web::Data<DatabaseConnection>, record: payroll::Model, payload: web::Json<PayRequest>) -> Result<impl Responder, AppError> {
    let payment = Payment::new(payload.into_inner(), Local::now().date_naive())?;
    let next = stored_state(&record)?.pay(payment)?;

    let record = save_transition(&db, record, &next, PayrollAction::Pay).await?;
    info!(payroll_id = %record.id, payment_mode = ?record.payment_mode, "payroll paid");

    Ok(web::Json(record))
}

#[post("/{payroll_id}/revert")]
async fn revert_payroll(db: web::Data<DatabaseConnection>, record: payroll::Model, payload: web::Json<RevertRequest>) -> Result<impl Responder, AppError> {
    let target = payload.target_status;
    let from = record.status;
    let next = stored_state(&record)?.revert(target)?;

    let record = save_transition(&db, record, &next, PayrollAction::RevertTo(target)).await?;
    info!(payroll_id = %record.id, %from, to = %target, "payroll reverted");

    Ok(web::Json(record))
}

/// Writes `next` over `record`, provided nobody moved the record on since
/// it was read.
async fn save_transition(db: &DatabaseConnection, record: payroll::Model, next: &PayrollState, action: PayrollAction) -> Result<payroll::Model, AppError> {
    let mut model = state_columns(next)?;
    model.id = Unchanged(record.id);
    model.updated_at = Set(Local::now().fixed_offset());

    match Payroll::update(model)
        .filter(payroll::Column::Status.eq(record.status))
        .exec(db).await
    {
        Ok(updated) => Ok(updated),
        Err(DbErr::RecordNotUpdated) => {
            warn!(payroll_id = %record.id, %action, "payroll changed concurrently");
            Err(conflict(db, Payroll::find_by_id(record.id), action).await)
        },
        Err(err) => Err(err.into()),
    }
}

/// Reports the status `current` holds now as the reason `action` failed.
async fn conflict(db: &DatabaseConnection, current: Select<Payroll>, action: PayrollAction) -> AppError {
    match current.one(db).await {
        Ok(Some(record)) => PayrollError::State { from: record.status, action }.into(),
        Ok(None) => AppError::NotFound("payroll"),
        Err(err) => err.into(),
    }
}

/// Rebuilds the lifecycle state from a stored row.
fn stored_state(record: &payroll::Model) -> Result<PayrollState, AppError> {
    let corrupt = |what| AppError::Corrupt(record.id, what);

    let snapshot = || -> Result<PayrollSnapshot, AppError> {
        let list = |value: &Option<serde_json::Value>, what| match value {
            None => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value.clone()).map_err(|_| corrupt(what)),
        };

        Ok(PayrollSnapshot {
            basic_salary: record.basic_salary.ok_or_else(|| corrupt("missing basic_salary"))?,
            earnings: list(&record.earnings, "unreadable earnings")?,
            deductions: list(&record.deductions, "unreadable deductions")?,
            tax: record.tax.ok_or_else(|| corrupt("missing tax"))?,
            totals: PayrollTotals {
                total_earnings: record.total_earnings.ok_or_else(|| corrupt("missing total_earnings"))?,
                total_deductions: record.total_deductions.ok_or_else(|| corrupt("missing total_deductions"))?,
                net_salary: record.net_salary.ok_or_else(|| corrupt("missing net_salary"))?,
            },
            attendance: match &record.attendance {
                None => None,
                Some(value) => Some(serde_json::from_value::<AttendanceAggregate>(value.clone())
                    .map_err(|_| corrupt("unreadable attendance"))?),
            },
        })
    };

    Ok(match record.status {
        PayrollStatus::NotGenerated => PayrollState::NotGenerated,
        PayrollStatus::Generated => PayrollState::Generated(snapshot()?),
        PayrollStatus::Paid => PayrollState::Paid(snapshot()?, Payment {
            date: record.payment_date.ok_or_else(|| corrupt("paid without payment_date"))?,
            mode: record.payment_mode.ok_or_else(|| corrupt("paid without payment_mode"))?,
            note: record.payment_note.clone(),
        }),
    })
}

/// Status, snapshot and payment columns for `state`; everything a state does
/// not carry is cleared.
fn state_columns(state: &PayrollState) -> Result<payroll::ActiveModel, AppError> {
    let snapshot = state.snapshot();
    let payment = state.payment();

    Ok(payroll::ActiveModel {
        status: Set(state.status()),
        basic_salary: Set(snapshot.map(|s| s.basic_salary)),
        earnings: Set(snapshot.map(|s| to_json(&s.earnings)).transpose()?),
        deductions: Set(snapshot.map(|s| to_json(&s.deductions)).transpose()?),
        tax: Set(snapshot.map(|s| s.tax)),
        total_earnings: Set(snapshot.map(|s| s.totals.total_earnings)),
        total_deductions: Set(snapshot.map(|s| s.totals.total_deductions)),
        net_salary: Set(snapshot.map(|s| s.totals.net_salary)),
        attendance: Set(snapshot.and_then(|s| s.attendance.as_ref()).map(to_json).transpose()?),
        payment_date: Set(payment.map(|p| p.date)),
        payment_mode: Set(payment.map(|p| p.mode)),
        payment_note: Set(payment.and_then(|p| p.note.clone())),
        ..Default::default()
    })
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, DbErr> {
    serde_json::to_value(value).map_err(|err| DbErr::Json(err.to_string()))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    use crate::{entity::{sea_orm_active_enums::{AttendanceType, PaymentMode}, staff_attendance}, pages::fixtures};

    use super::*;

    macro_rules! payroll_app {
        ($db:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.into_connection()))
                    .app_data(web::Data::new(AttendancePolicy::default()))
                    .service(web::scope("/payroll").configure(config))
            )
        };
    }

    fn generate_body() -> serde_json::Value {
        json!({
            "staff_id": 7,
            "month": 3,
            "year": 2024,
            "basic_salary": 50000,
            "earnings": [{ "type": "Bonus", "amount": 2000 }, { "type": "", "amount": 100 }],
            "deductions": [{ "type": "PF", "amount": "1800" }],
            "tax": "500",
        })
    }

    #[actix_web::test]
    async fn test_generate_payroll() {
        let inserted = fixtures::generated_payroll(7);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ fixtures::staff(7, "STF-7", "Asha") ] ])
            .append_query_results([ Vec::<payroll::Model>::new() ])
            .append_query_results([ Vec::<staff_attendance::Model>::new() ])
            .append_query_results([ vec![ inserted.clone() ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/payroll")
            .set_json(generate_body())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let returned: payroll::Model = test::read_body_json(response).await;
        assert_eq!(returned, inserted);
    }

    #[actix_web::test]
    async fn test_generate_updates_not_generated_record() {
        let pending = payroll::Model {
            status: PayrollStatus::NotGenerated,
            basic_salary: None,
            earnings: None,
            deductions: None,
            tax: None,
            total_earnings: None,
            total_deductions: None,
            net_salary: None,
            ..fixtures::generated_payroll(7)
        };
        let generated = payroll::Model { id: pending.id, ..fixtures::generated_payroll(7) };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ fixtures::staff(7, "STF-7", "Asha") ] ])
            .append_query_results([ vec![ pending ] ])
            .append_query_results([ Vec::<staff_attendance::Model>::new() ])
            .append_query_results([ vec![ generated.clone() ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/payroll")
            .set_json(generate_body())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::OK);

        let returned: payroll::Model = test::read_body_json(response).await;
        assert_eq!(returned, generated);
    }

    #[actix_web::test]
    async fn test_generate_twice_conflicts() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ fixtures::staff(7, "STF-7", "Asha") ] ])
            .append_query_results([ vec![ fixtures::generated_payroll(7) ] ])
            .append_query_results([ Vec::<staff_attendance::Model>::new() ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/payroll")
            .set_json(generate_body())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = test::read_body(response).await;
        assert_eq!(body, "cannot generate a payroll that is `generated`");
    }

    #[actix_web::test]
    async fn test_generate_for_unknown_staff() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ Vec::<staff::Model>::new() ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri("/payroll")
            .set_json(generate_body())
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_generate_rejects_invalid_input() {
        let app = payroll_app!(MockDatabase::new(DatabaseBackend::Postgres)).await;

        for body in [
            json!({ "staff_id": 7, "month": 13, "year": 2024, "basic_salary": 50000 }),
            json!({ "staff_id": 7, "month": 3, "year": 2024 }),
            json!({ "staff_id": 7, "month": 3, "year": 2024, "basic_salary": 50000, "tax": -1 }),
            json!({ "staff_id": 7, "month": 3, "year": 2024, "basic_salary": "1000.005" }),
            json!({
                "staff_id": 7, "month": 3, "year": 2024,
                "basic_salary": "79228162514264337593543950335",
                "earnings": [{ "type": "Bonus", "amount": 1 }],
            }),
        ] {
            let req = test::TestRequest::post()
                .uri("/payroll")
                .set_json(&body)
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        }
    }

    #[actix_web::test]
    async fn test_pay_payroll() {
        let generated = fixtures::generated_payroll(7);
        let paid = payroll::Model { id: generated.id, ..fixtures::paid_payroll(7) };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ generated.clone() ] ])
            .append_query_results([ vec![ paid.clone() ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri(&format!("/payroll/{}/pay", generated.id))
            .set_json(json!({ "payment_date": "2024-04-01", "payment_mode": "bank_transfer", "payment_note": " April run " }))
            .to_request();

        let returned: payroll::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned.status, PayrollStatus::Paid);
        assert_eq!(returned.payment_mode, Some(PaymentMode::BankTransfer));
        assert_eq!(returned.net_salary, Some(dec!(49700)));
    }

    #[actix_web::test]
    async fn test_pay_rejects_future_date_and_unknown_mode() {
        let generated = fixtures::generated_payroll(7);
        let tomorrow = Local::now().date_naive().succ_opt().unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ generated.clone() ] ])
            .append_query_results([ vec![ generated.clone() ] ]);
        let app = payroll_app!(db).await;

        for body in [
            json!({ "payment_date": tomorrow, "payment_mode": "cash" }),
            json!({ "payment_date": "2024-04-01", "payment_mode": "barter" }),
        ] {
            let req = test::TestRequest::post()
                .uri(&format!("/payroll/{}/pay", generated.id))
                .set_json(&body)
                .to_request();

            let response = test::call_service(&app, req).await;
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
        }
    }

    #[actix_web::test]
    async fn test_pay_twice_conflicts() {
        let paid = fixtures::paid_payroll(7);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ paid.clone() ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri(&format!("/payroll/{}/pay", paid.id))
            .set_json(json!({ "payment_date": "2024-04-01", "payment_mode": "cash" }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn test_pay_after_concurrent_change() {
        let generated = fixtures::generated_payroll(7);
        let paid = payroll::Model { id: generated.id, ..fixtures::paid_payroll(7) };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ generated.clone() ] ])
            .append_query_results([ Vec::<payroll::Model>::new() ])
            .append_query_results([ vec![ paid ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri(&format!("/payroll/{}/pay", generated.id))
            .set_json(json!({ "payment_date": "2024-04-01", "payment_mode": "cash" }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = test::read_body(response).await;
        assert_eq!(body, "cannot pay a payroll that is `paid`");
    }

    #[actix_web::test]
    async fn test_revert_payroll() {
        let paid = fixtures::paid_payroll(7);
        let generated = payroll::Model { id: paid.id, ..fixtures::generated_payroll(7) };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ paid.clone() ] ])
            .append_query_results([ vec![ paid.clone() ] ])
            .append_query_results([ vec![ generated.clone() ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri(&format!("/payroll/{}/revert", paid.id))
            .set_json(json!({ "target_status": "not_generated" }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri(&format!("/payroll/{}/revert", paid.id))
            .set_json(json!({ "target_status": "generated" }))
            .to_request();

        let returned: payroll::Model = test::call_and_read_body_json(&app, req).await;
        assert_eq!(returned, generated);
    }

    #[actix_web::test]
    async fn test_inconsistent_record_is_reported() {
        let broken = payroll::Model { basic_salary: None, ..fixtures::generated_payroll(7) };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ broken.clone() ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::post()
            .uri(&format!("/payroll/{}/pay", broken.id))
            .set_json(json!({ "payment_date": "2024-04-01", "payment_mode": "cash" }))
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_list_payroll() {
        let generated = fixtures::generated_payroll(1);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ fixtures::staff(1, "STF-1", "Asha"), fixtures::staff(2, "STF-2", "Ravi") ] ])
            .append_query_results([ vec![ generated.clone() ] ])
            .append_query_results([ vec![ staff_attendance::Model {
                id: Uuid::new_v4(),
                created_at: Local::now().into(),
                updated_at: Local::now().into(),
                staff_id: 2,
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                kind: AttendanceType::Present,
            } ] ]);
        let app = payroll_app!(db).await;

        let req = test::TestRequest::get()
            .uri("/payroll?month=3&year=2024&role_id=2")
            .to_request();

        let rows: Vec<PayrollSheetRow> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].payroll_id, Some(generated.id));
        assert_eq!(rows[0].status, PayrollStatus::Generated);
        assert_eq!(rows[0].net_salary, Some(dec!(49700)));
        assert_eq!(rows[1].staff_code, "STF-2");
        assert_eq!(rows[1].payroll_id, None);
        assert_eq!(rows[1].status, PayrollStatus::NotGenerated);
        assert_eq!(rows[1].attendance.present, 1);
        assert_eq!(rows[1].attendance.gross_present_percentage, dec!(100));
    }

    #[actix_web::test]
    async fn test_list_payroll_rejects_invalid_period() {
        let app = payroll_app!(MockDatabase::new(DatabaseBackend::Postgres)).await;

        let req = test::TestRequest::get()
            .uri("/payroll?month=0&year=2024")
            .to_request();

        let response = test::call_service(&app, req).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
