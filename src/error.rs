use actix_web::{body, http::{self, header::ContentType, StatusCode}, HttpResponse};
use sea_orm::DbErr;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::{import::ImportError, payroll::PayrollError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Payroll(#[from] PayrollError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error("{0} not found")]
    NotFound(&'static str),
    /// A stored payroll row whose columns do not match its status.
    #[error("payroll {0} is inconsistent: {1}")]
    Corrupt(Uuid, &'static str),
    #[error("database error")]
    Database(#[from] DbErr),
}

impl actix_web::error::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        if let AppError::Database(err) = self {
            error!(error = %err, "database failure");
        }

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(self.to_string())
    }

    fn status_code(&self) -> http::StatusCode {
        match self {
            AppError::Payroll(PayrollError::Validation { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Payroll(PayrollError::State { .. }) => StatusCode::CONFLICT,
            AppError::Import(ImportError::Parse { .. }) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Corrupt(..) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
