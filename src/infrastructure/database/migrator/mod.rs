//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users;
mod m20250101_000002_create_patients;
mod m20250101_000003_create_appointments;
mod m20250101_000004_create_medical_records;
mod m20250101_000005_add_search_columns;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users::Migration),
            Box::new(m20250101_000002_create_patients::Migration),
            Box::new(m20250101_000003_create_appointments::Migration),
            Box::new(m20250101_000004_create_medical_records::Migration),
            Box::new(m20250101_000005_add_search_columns::Migration),
        ]
    }
}
