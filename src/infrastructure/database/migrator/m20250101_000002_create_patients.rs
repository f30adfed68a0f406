//! Migration to create patients table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Patients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Patients::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Patients::FirstName).string_len(100).not_null())
                    .col(ColumnDef::new(Patients::LastName).string_len(100).not_null())
                    .col(ColumnDef::new(Patients::Gender).string_len(10).not_null())
                    .col(ColumnDef::new(Patients::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Patients::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Patients::Notes).text().null())
                    .col(
                        ColumnDef::new(Patients::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Patients::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patients_created_at")
                    .table(Patients::Table)
                    .col(Patients::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_patients_gender")
                    .table(Patients::Table)
                    .col(Patients::Gender)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Patients::Table).to_owned())
            .await
    }
}

#[derive(Iden, Clone, Copy)]
pub enum Patients {
    Table,
    Id,
    FirstName,
    LastName,
    Gender,
    Phone,
    Email,
    Notes,
    CreatedAt,
    UpdatedAt,
}
