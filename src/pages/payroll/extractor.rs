use super::*;

impl FromRequest for payroll::Model {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let Some(payroll_id) = req.match_info().get("payroll_id") else {
                return Err(actix_web::error::ErrorInternalServerError("route has no `payroll_id` segment"));
            };
            let Ok(payroll_id) = Uuid::from_str(payroll_id) else {
                return Err(actix_web::error::ErrorBadRequest("invalid `payroll_id`"));
            };

            let Some(db) = req.app_data::<web::Data<DatabaseConnection>>() else {
                return Err(actix_web::error::ErrorInternalServerError("database is not attached"));
            };

            let record = Payroll::find_by_id(payroll_id)
                .one(db.as_ref()).await
                .map_err(AppError::from)?
                .ok_or(AppError::NotFound("payroll"))?;

            Ok(record)
        })
    }
}
