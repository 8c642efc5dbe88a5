use sea_orm_migration::prelude::*;

use crate::m20250701_090000_init::{Staff, StaffAttendance};

const FIRST_NAMES: [&str; 10] = ["Asha", "Ravi", "Meera", "Kabir", "Nisha", "Arjun", "Farah", "Vikram", "Leela", "Imran"];
const LAST_NAMES: [&str; 5] = ["Verma", "Iyer", "Khan", "Das", "Rao"];

/// Attendance is seeded for the weekdays of this month.
const SEED_YEAR: i32 = 2025;
const SEED_MONTH: u32 = 6;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn demo_staff_id(i: usize) -> String {
    format!("DEMO-{i:03}")
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 20 demo staff across three roles
        for i in 1..=20 {
            let salary: i32 = rand::random_range(25_000..=90_000);

            manager
                .exec_stmt(Query::insert()
                    .into_table(Staff::Table)
                    .columns([Staff::StaffId, Staff::RoleId, Staff::FirstName, Staff::LastName, Staff::BasicSalary, Staff::NumberOfLeaves])
                    .values_panic([
                        demo_staff_id(i).into(),
                        ((i % 3) as i32 + 1).into(),
                        FIRST_NAMES[i % FIRST_NAMES.len()].into(),
                        LAST_NAMES[i % LAST_NAMES.len()].into(),
                        salary.into(),
                        12.into(),
                    ])
                    .to_owned()
            ).await?;

            for day in 1..=30 {
                let date = format!("{SEED_YEAR}-{SEED_MONTH:02}-{day:02}");
                let weekday = (day + 5) % 7; // 2025-06-01 is a Sunday
                if weekday >= 5 {
                    continue;
                }

                let kind = match rand::random_range(0..20) {
                    0 => "absent",
                    1 | 2 => "late",
                    3 => "half_day",
                    _ => "present",
                };

                manager
                    .exec_stmt(Query::insert()
                        .into_table(StaffAttendance::Table)
                        .columns([StaffAttendance::StaffId, StaffAttendance::Date, StaffAttendance::Kind])
                        .values_panic([
                            Expr::cust_with_values("(SELECT id FROM staff WHERE staff_id = ?)", [demo_staff_id(i)]),
                            Expr::val(date).cast_as("date"),
                            Expr::val(kind).cast_as("attendance_type"),
                        ])
                        .to_owned()
                ).await?;
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Attendance rows go with the staff rows through the cascading key
        manager
            .exec_stmt(Query::delete()
                .from_table(Staff::Table)
                .and_where(Expr::col(Staff::StaffId).like("DEMO-%"))
                .to_owned()
        ).await?;

        Ok(())
    }
}
