use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::util::{default_table_statement, serial_table_statement, staff_foreign_key};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager.create_type(schema.create_enum_from_active_enum::<AttendanceType>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<PaymentMode>()).await?;
        manager.create_type(schema.create_enum_from_active_enum::<PayrollStatus>()).await?;

        let mut staff = serial_table_statement();
        staff
            .table(Staff::Table)
            .col(ColumnDef::new(Staff::StaffId)
                .text()
                .unique_key()
                .not_null())
            .col(ColumnDef::new(Staff::RoleId)
                .integer()
                .not_null())
            .col(ColumnDef::new(Staff::DepartmentId)
                .integer())
            .col(ColumnDef::new(Staff::DesignationId)
                .integer())
            .col(ColumnDef::new(Staff::FirstName)
                .text()
                .not_null())
            .col(ColumnDef::new(Staff::DateOfBirth)
                .date())
            .col(ColumnDef::new(Staff::DateOfJoining)
                .date())
            .col(ColumnDef::new(Staff::BasicSalary)
                .decimal_len(14, 2))
            .col(ColumnDef::new(Staff::NumberOfLeaves)
                .integer());
        for column in Staff::TEXT_COLUMNS {
            staff.col(ColumnDef::new(column).text());
        }
        manager.create_table(staff).await?;

        manager
            .create_table(default_table_statement()
                .table(StaffAttendance::Table)
                .col(ColumnDef::new(StaffAttendance::StaffId)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(StaffAttendance::Date)
                    .date()
                    .not_null())
                .col(ColumnDef::new(StaffAttendance::Kind)
                    .custom(AttendanceType::name())
                    .not_null())
                .take()
            ).await?;
        manager.create_foreign_key(staff_foreign_key("fk_staff_attendance_staff", StaffAttendance::Table)).await?;

        // One mark per staff member per day
        manager
            .create_index(Index::create()
                .name("staff_attendance_staff_id_date_key")
                .table(StaffAttendance::Table)
                .col(StaffAttendance::StaffId)
                .col(StaffAttendance::Date)
                .unique()
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(Payroll::Table)
                .col(ColumnDef::new(Payroll::StaffId)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Month)
                    .small_integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Year)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(Payroll::Status)
                    .custom(PayrollStatus::name())
                    .not_null()
                    .default(Expr::val("not_generated").cast_as(PayrollStatus::name())))
                .col(ColumnDef::new(Payroll::BasicSalary)
                    .decimal_len(14, 2))
                .col(ColumnDef::new(Payroll::Earnings)
                    .json_binary())
                .col(ColumnDef::new(Payroll::Deductions)
                    .json_binary())
                .col(ColumnDef::new(Payroll::Tax)
                    .decimal_len(14, 2))
                .col(ColumnDef::new(Payroll::TotalEarnings)
                    .decimal_len(14, 2))
                .col(ColumnDef::new(Payroll::TotalDeductions)
                    .decimal_len(14, 2))
                .col(ColumnDef::new(Payroll::NetSalary)
                    .decimal_len(14, 2))
                .col(ColumnDef::new(Payroll::Attendance)
                    .json_binary())
                .col(ColumnDef::new(Payroll::PaymentDate)
                    .date())
                .col(ColumnDef::new(Payroll::PaymentMode)
                    .custom(PaymentMode::name()))
                .col(ColumnDef::new(Payroll::PaymentNote)
                    .text())
                .take()
            ).await?;
        manager.create_foreign_key(staff_foreign_key("fk_payroll_staff", Payroll::Table)).await?;

        // A racing second generate for the same period fails here
        manager
            .create_index(Index::create()
                .name("payroll_staff_id_month_year_key")
                .table(Payroll::Table)
                .col(Payroll::StaffId)
                .col(Payroll::Month)
                .col(Payroll::Year)
                .unique()
                .take()
            ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(TableDropStatement::new().table(Payroll::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(StaffAttendance::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Staff::Table).take()).await?;

        for name in [PayrollStatus::name(), PaymentMode::name(), AttendanceType::name()] {
            manager.drop_type(TypeDropStatement::new().name(name).to_owned()).await?;
        }

        Ok(())
    }
}

#[derive(DeriveIden, Clone, Copy)]
pub(crate) enum Staff {
    Table,
    StaffId,
    RoleId,
    DepartmentId,
    DesignationId,
    FirstName,
    LastName,
    FatherName,
    MotherName,
    Email,
    Gender,
    MaritalStatus,
    DateOfBirth,
    DateOfJoining,
    Phone,
    EmergencyPhone,
    CurrentAddress,
    PermanentAddress,
    Qualification,
    WorkExperience,
    Note,
    EpfNo,
    BasicSalary,
    ContractType,
    WorkShift,
    WorkLocation,
    NumberOfLeaves,
    BankAccountName,
    BankAccountNumber,
    BankName,
    IfscCode,
    BankBranch,
    FacebookUrl,
    TwitterUrl,
    LinkedinUrl,
    InstagramUrl,
}

impl Staff {
    /// Optional free-text columns.
    const TEXT_COLUMNS: [Staff; 26] = [
        Staff::LastName,
        Staff::FatherName,
        Staff::MotherName,
        Staff::Email,
        Staff::Gender,
        Staff::MaritalStatus,
        Staff::Phone,
        Staff::EmergencyPhone,
        Staff::CurrentAddress,
        Staff::PermanentAddress,
        Staff::Qualification,
        Staff::WorkExperience,
        Staff::Note,
        Staff::EpfNo,
        Staff::ContractType,
        Staff::WorkShift,
        Staff::WorkLocation,
        Staff::BankAccountName,
        Staff::BankAccountNumber,
        Staff::BankName,
        Staff::IfscCode,
        Staff::BankBranch,
        Staff::FacebookUrl,
        Staff::TwitterUrl,
        Staff::LinkedinUrl,
        Staff::InstagramUrl,
    ];
}

#[derive(DeriveIden)]
pub(crate) enum StaffAttendance {
    Table,
    StaffId,
    Date,
    Kind,
}

#[derive(DeriveIden)]
enum Payroll {
    Table,
    StaffId,
    Month,
    Year,
    Status,
    BasicSalary,
    Earnings,
    Deductions,
    Tax,
    TotalEarnings,
    TotalDeductions,
    NetSalary,
    Attendance,
    PaymentDate,
    PaymentMode,
    PaymentNote,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_type")]
enum AttendanceType {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "half_day")]
    HalfDay,
    #[sea_orm(string_value = "holiday")]
    Holiday,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_mode")]
enum PaymentMode {
    #[sea_orm(string_value = "cash")]
    Cash,
    #[sea_orm(string_value = "cheque")]
    Cheque,
    #[sea_orm(string_value = "bank_transfer")]
    BankTransfer,
    #[sea_orm(string_value = "online")]
    Online,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payroll_status")]
enum PayrollStatus {
    #[sea_orm(string_value = "not_generated")]
    NotGenerated,
    #[sea_orm(string_value = "generated")]
    Generated,
    #[sea_orm(string_value = "paid")]
    Paid,
}
