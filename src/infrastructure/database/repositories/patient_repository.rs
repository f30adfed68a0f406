//! SeaORM implementation of PatientRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use tracing::debug;

use crate::domain::patient::{
    CreatePatientDto, Gender, ListPatientsQuery, Patient, PatientRepository, PatientSort,
    UpdatePatientDto,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::patient;
use crate::infrastructure::database::query::{any_contains_folded, fold_case};
use crate::shared::OffsetPage;

const SEARCH_COLUMNS: [patient::Column; 4] = [
    patient::Column::SearchFirstName,
    patient::Column::SearchLastName,
    patient::Column::SearchPhone,
    patient::Column::SearchEmail,
];

pub struct SeaOrmPatientRepository {
    db: DatabaseConnection,
}

impl SeaOrmPatientRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_gender_to_domain(g: patient::Gender) -> Gender {
    match g {
        patient::Gender::Male => Gender::Male,
        patient::Gender::Female => Gender::Female,
    }
}

fn domain_gender_to_entity(g: Gender) -> patient::Gender {
    match g {
        Gender::Male => patient::Gender::Male,
        Gender::Female => patient::Gender::Female,
    }
}

fn model_to_domain(m: patient::Model) -> Patient {
    Patient {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        gender: entity_gender_to_domain(m.gender),
        phone: m.phone,
        email: m.email,
        notes: m.notes,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

/// Every column set, search columns recomputed from the source fields.
fn into_active(m: patient::Model) -> patient::ActiveModel {
    patient::ActiveModel {
        search_first_name: Set(fold_case(&m.first_name)),
        search_last_name: Set(fold_case(&m.last_name)),
        search_phone: Set(fold_case(&m.phone)),
        search_email: Set(fold_case(&m.email)),
        id: Set(m.id),
        first_name: Set(m.first_name),
        last_name: Set(m.last_name),
        gender: Set(m.gender),
        phone: Set(m.phone),
        email: Set(m.email),
        notes: Set(m.notes),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}

fn not_found(id: &str) -> DomainError {
    DomainError::not_found("Patient", id)
}

fn filtered(query: &ListPatientsQuery) -> Select<patient::Entity> {
    let mut select = patient::Entity::find();

    if let Some(ref q) = query.q {
        select = select.filter(any_contains_folded(&SEARCH_COLUMNS, q));
    }
    if let Some(gender) = query.gender {
        select = select.filter(patient::Column::Gender.eq(domain_gender_to_entity(gender)));
    }

    select
}

// ── PatientRepository impl ──────────────────────────────────────

#[async_trait]
impl PatientRepository for SeaOrmPatientRepository {
    async fn create(&self, dto: CreatePatientDto) -> DomainResult<Patient> {
        let now = Utc::now();
        let model = into_active(patient::Model {
            id: uuid::Uuid::new_v4().to_string(),
            first_name: dto.first_name,
            last_name: dto.last_name,
            gender: domain_gender_to_entity(dto.gender),
            phone: dto.phone,
            email: dto.email,
            notes: dto.notes,
            search_first_name: String::new(),
            search_last_name: String::new(),
            search_phone: String::new(),
            search_email: String::new(),
            created_at: now,
            updated_at: now,
        });

        let inserted = model.insert(&self.db).await?;
        debug!(patient_id = %inserted.id, "Inserted patient");
        Ok(model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Patient>> {
        let model = patient::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn exists(&self, id: &str) -> DomainResult<bool> {
        let count = patient::Entity::find_by_id(id).count(&self.db).await?;
        Ok(count > 0)
    }

    async fn list(&self, query: &ListPatientsQuery) -> DomainResult<OffsetPage<Patient>> {
        let select = match query.sort {
            PatientSort::Oldest => filtered(query)
                .order_by_asc(patient::Column::CreatedAt)
                .order_by_asc(patient::Column::Id),
            PatientSort::Newest => filtered(query)
                .order_by_desc(patient::Column::CreatedAt)
                .order_by_desc(patient::Column::Id),
        };

        let txn = self.db.begin().await?;
        let total = filtered(query).count(&txn).await?;
        let models = select
            .offset(query.offset)
            .limit(query.limit)
            .all(&txn)
            .await?;
        txn.commit().await?;

        let items = models.into_iter().map(model_to_domain).collect();
        Ok(OffsetPage::new(items, total, query.offset, query.limit))
    }

    async fn update(&self, id: &str, dto: UpdatePatientDto) -> DomainResult<Patient> {
        let mut row = patient::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found(id))?;

        let mut gender = entity_gender_to_domain(row.gender);
        dto.first_name.apply_to(&mut row.first_name);
        dto.last_name.apply_to(&mut row.last_name);
        dto.gender.apply_to(&mut gender);
        dto.phone.apply_to(&mut row.phone);
        dto.email.apply_to(&mut row.email);
        dto.notes.apply_to(&mut row.notes);
        row.gender = domain_gender_to_entity(gender);
        row.updated_at = Utc::now();

        let updated = into_active(row)
            .update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => not_found(id),
            other => other.into(),
        })?;

        Ok(model_to_domain(updated))
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = patient::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }
}
