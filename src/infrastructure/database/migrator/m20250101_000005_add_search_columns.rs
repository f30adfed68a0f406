//! Add lowercased search columns to patients and users
//!
//! Rows that already exist are backfilled from their source columns, folded
//! in Rust.

use sea_orm::{ConnectionTrait, Statement};
use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000002_create_patients::Patients;
use crate::infrastructure::database::query::fold_case;

const PATIENT_FIELDS: [&str; 4] = ["first_name", "last_name", "phone", "email"];
const USER_FIELDS: [&str; 3] = ["email", "first_name", "last_name"];

#[derive(DeriveMigrationName)]
pub struct Migration;

fn search_column(field: &str) -> Alias {
    Alias::new(format!("search_{}", field))
}

async fn add_columns<T>(manager: &SchemaManager<'_>, table: T, fields: &[&str]) -> Result<(), DbErr>
where
    T: Iden + Copy + Send + Sync + 'static,
{
    // SQLite takes one column per ALTER TABLE
    for field in fields {
        manager
            .alter_table(
                Table::alter()
                    .table(table)
                    .add_column(
                        ColumnDef::new(search_column(field))
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;
    }
    Ok(())
}

async fn drop_columns<T>(manager: &SchemaManager<'_>, table: T, fields: &[&str]) -> Result<(), DbErr>
where
    T: Iden + Copy + Send + Sync + 'static,
{
    for field in fields {
        manager
            .alter_table(
                Table::alter()
                    .table(table)
                    .drop_column(search_column(field))
                    .to_owned(),
            )
            .await?;
    }
    Ok(())
}

async fn backfill<T>(manager: &SchemaManager<'_>, table: T, fields: &[&str]) -> Result<(), DbErr>
where
    T: Iden + Copy + Send + Sync + 'static,
{
    let db = manager.get_connection();
    let backend = manager.get_database_backend();

    let select = Query::select()
        .column(Alias::new("id"))
        .columns(fields.iter().map(|f| Alias::new(*f)))
        .from(table)
        .to_owned();
    let rows = db.query_all(backend.build(&select)).await?;

    for row in rows {
        let id: String = row.try_get("", "id")?;
        let mut update = Query::update();
        update
            .table(table)
            .and_where(Expr::col(Alias::new("id")).eq(id));
        for field in fields {
            let value: String = row.try_get("", field)?;
            update.value(search_column(field), fold_case(&value));
        }
        let stmt: Statement = backend.build(&update);
        db.execute(stmt).await?;
    }
    Ok(())
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        add_columns(manager, Patients::Table, &PATIENT_FIELDS).await?;
        add_columns(manager, Users::Table, &USER_FIELDS).await?;

        backfill(manager, Patients::Table, &PATIENT_FIELDS).await?;
        backfill(manager, Users::Table, &USER_FIELDS).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_columns(manager, Patients::Table, &PATIENT_FIELDS).await?;
        drop_columns(manager, Users::Table, &USER_FIELDS).await?;

        Ok(())
    }
}
