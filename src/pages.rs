use actix_web::web;

mod payroll;
mod staff;

#[cfg(test)]
mod fixtures;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(web::scope("/payroll")
            .configure(payroll::config))
        .service(web::scope("/staff")
            .configure(staff::config));
}
