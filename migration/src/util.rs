use sea_orm_migration::prelude::*;

/// Table with a random UUID primary key and the two timestamps.
pub(crate) fn default_table_statement() -> TableCreateStatement {
    timestamped(ColumnDef::new(DefaultColumn::Id)
        .uuid()
        .primary_key()
        .default(Expr::cust("GEN_RANDOM_UUID()"))
        .take())
}

/// Same as [`default_table_statement`] but keyed by a serial integer, for
/// tables other records point at by number.
pub(crate) fn serial_table_statement() -> TableCreateStatement {
    timestamped(ColumnDef::new(DefaultColumn::Id)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .take())
}

fn timestamped(id: ColumnDef) -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(id)
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// Foreign key to `staff.id` that follows the staff row on update and delete.
pub(crate) fn staff_foreign_key(name: &str, table: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKeyCreateStatement::new()
        .name(name)
        .from(table, Alias::new("staff_id"))
        .to(Alias::new("staff"), DefaultColumn::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .take()
}
