use std::collections::HashSet;

use actix_web::{get, http::header::{ContentDisposition, DispositionParam, DispositionType}, post, web, HttpResponse, Responder};
use chrono::Local;
use sea_orm::{ActiveValue::{NotSet, Set}, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, SqlErr};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    entity::{prelude::*, staff},
    error::AppError,
    import::{normalize_sheet, read_csv, read_grid, template_csv, Grid, ImportError, StaffImportRow},
};

use model::*;

mod model;

const TEMPLATE_FILE_NAME: &str = "staff_import_template.csv";

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(bulk_create_staff)
        .service(import_staff)
        .service(import_staff_csv)
        .service(preview_import)
        .service(download_template);
}

#[post("/bulk")]
async fn bulk_create_staff(db: web::Data<DatabaseConnection>, payload: web::Json<Vec<StaffImportRow>>) -> Result<impl Responder, AppError> {
    Ok(web::Json(create_staff(&db, payload.into_inner()).await?))
}

#[post("/import")]
async fn import_staff(db: web::Data<DatabaseConnection>, payload: web::Json<ImportGrid>) -> Result<impl Responder, AppError> {
    let grid = read_grid(payload.into_inner().rows)?;

    Ok(web::Json(import_grid(&db, grid).await?))
}

#[post("/import/csv")]
async fn import_staff_csv(db: web::Data<DatabaseConnection>, body: web::Bytes) -> Result<impl Responder, AppError> {
    let grid = read_csv(&body)?;

    Ok(web::Json(import_grid(&db, grid).await?))
}

#[post("/import/preview")]
async fn preview_import(payload: web::Json<ImportGrid>) -> Result<impl Responder, AppError> {
    let grid = read_grid(payload.into_inner().rows)?;
    let rows = normalize_sheet(&grid)?;
    let data_rows = grid.len() - 1;

    Ok(web::Json(ImportPreview {
        skipped: data_rows - rows.len(),
        data_rows,
        rows,
    }))
}

#[get("/import/template")]
async fn download_template() -> Result<impl Responder, AppError> {
    let body = template_csv()?;

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(TEMPLATE_FILE_NAME.to_owned())],
        })
        .body(body))
}

async fn import_grid(db: &DatabaseConnection, grid: Grid) -> Result<BulkCreateReport, AppError> {
    let batch = normalize_sheet(&grid)?;
    if batch.is_empty() {
        return Err(ImportError::Parse { reason: "no row has a staff id, role id and first name".to_owned() }.into());
    }

    let report = create_staff(db, batch).await?;
    info!(
        data_rows = grid.len() - 1,
        created = report.success.len(),
        failed = report.failed.len(),
        "staff import finished"
    );

    Ok(report)
}

/// Inserts every row it can. Rows that fail are reported next to the ones
/// that were stored; stored rows are not rolled back.
async fn create_staff(db: &DatabaseConnection, rows: Vec<StaffImportRow>) -> Result<BulkCreateReport, DbErr> {
    let total = rows.len();

    let codes = rows.iter()
        .filter_map(|row| row.staff_id.as_deref())
        .map(|code| code.trim().to_owned())
        .collect::<Vec<_>>();

    let mut stored = HashSet::new();
    if !codes.is_empty() {
        stored = Staff::find()
            .filter(staff::Column::StaffId.is_in(codes))
            .all(db).await?
            .into_iter()
            .map(|member| member.staff_id)
            .collect();
    }

    let mut seen = HashSet::new();
    let mut report = BulkCreateReport { success: Vec::new(), failed: Vec::new(), total };

    for (idx, row) in rows.into_iter().enumerate() {
        let staff_id = row.staff_id.clone();
        let first_name = row.first_name.clone();

        match insert_row(db, row, &stored, &mut seen).await {
            Ok(member) => report.success.push(member),
            Err(error) => {
                warn!(row = idx + 1, staff_id = ?staff_id, %error, "staff row rejected");

                report.failed.push(FailedRow {
                    row: idx + 1,
                    staff_id,
                    first_name,
                    error: error.to_string(),
                });
            },
        }
    }

    Ok(report)
}

async fn insert_row(db: &DatabaseConnection, row: StaffImportRow, stored: &HashSet<String>, seen: &mut HashSet<String>) -> Result<staff::Model, RowError> {
    let (code, model) = new_staff(row)?;

    if !seen.insert(code.clone()) {
        return Err(RowError::DuplicateInBatch(code));
    }
    if stored.contains(&code) {
        return Err(RowError::AlreadyExists(code));
    }

    Staff::insert(model).exec_with_returning(db).await.map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RowError::AlreadyExists(code),
        _ => RowError::Database(err.to_string()),
    })
}

/// The trimmed staff id alongside the row to insert.
fn new_staff(row: StaffImportRow) -> Result<(String, staff::ActiveModel), RowError> {
    let required = |value: Option<String>, field| value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .ok_or(RowError::MissingField(field));

    let staff_id = required(row.staff_id, "staff_id")?;
    let role_id = row.role_id.ok_or(RowError::MissingField("role_id"))?;
    let first_name = required(row.first_name, "first_name")?;

    let now = Local::now().fixed_offset();

    Ok((staff_id.clone(), staff::ActiveModel {
        id: NotSet,
        created_at: Set(now),
        updated_at: Set(now),
        staff_id: Set(staff_id),
        role_id: Set(role_id),
        department_id: Set(row.department_id),
        designation_id: Set(row.designation_id),
        first_name: Set(first_name),
        last_name: Set(row.last_name),
        father_name: Set(row.father_name),
        mother_name: Set(row.mother_name),
        email: Set(row.email),
        gender: Set(row.gender),
        marital_status: Set(row.marital_status),
        date_of_birth: Set(row.date_of_birth),
        date_of_joining: Set(row.date_of_joining),
        phone: Set(row.phone),
        emergency_phone: Set(row.emergency_phone),
        current_address: Set(row.current_address),
        permanent_address: Set(row.permanent_address),
        qualification: Set(row.qualification),
        work_experience: Set(row.work_experience),
        note: Set(row.note),
        epf_no: Set(row.epf_no),
        basic_salary: Set(row.basic_salary),
        contract_type: Set(row.contract_type),
        work_shift: Set(row.work_shift),
        work_location: Set(row.work_location),
        number_of_leaves: Set(row.number_of_leaves),
        bank_account_name: Set(row.bank_account_name),
        bank_account_number: Set(row.bank_account_number),
        bank_name: Set(row.bank_name),
        ifsc_code: Set(row.ifsc_code),
        bank_branch: Set(row.bank_branch),
        facebook_url: Set(row.facebook_url),
        twitter_url: Set(row.twitter_url),
        linkedin_url: Set(row.linkedin_url),
        instagram_url: Set(row.instagram_url),
    }))
}
