//! Patient directory: CRUD and search over patient records
//!
//! Stateless apart from the injected repositories; safe to share behind an
//! `Arc` across requests.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    CreatePatientDto, DomainError, DomainResult, ListPatientsQuery, Patient, RepositoryProvider,
    UpdatePatientDto,
};
use crate::shared::{Confirmation, OffsetPage};

pub struct PatientDirectory {
    repos: Arc<dyn RepositoryProvider>,
}

impl PatientDirectory {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create(&self, dto: CreatePatientDto) -> DomainResult<Patient> {
        let patient = self.repos.patients().create(dto).await?;
        info!(patient_id = %patient.id, "Patient created");
        Ok(patient)
    }

    /// Search, filter and page through patients. Total and items come from
    /// the same transaction.
    pub async fn list(&self, query: ListPatientsQuery) -> DomainResult<OffsetPage<Patient>> {
        self.repos.patients().list(&query).await
    }

    pub async fn get_one(&self, id: &str) -> DomainResult<Patient> {
        self.repos
            .patients()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Patient", id))
    }

    pub async fn update(&self, id: &str, dto: UpdatePatientDto) -> DomainResult<Patient> {
        self.ensure_exists(id).await?;
        let patient = self.repos.patients().update(id, dto).await?;
        info!(patient_id = %patient.id, "Patient updated");
        Ok(patient)
    }

    pub async fn remove(&self, id: &str) -> DomainResult<Confirmation> {
        self.ensure_exists(id).await?;
        self.repos.patients().delete(id).await?;
        info!(patient_id = %id, "Patient deleted");
        Ok(Confirmation::new("Patient deleted"))
    }

    async fn ensure_exists(&self, id: &str) -> DomainResult<()> {
        if self.repos.patients().exists(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Patient", id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Gender, PatientSort};
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::testing::memory_db;
    use crate::shared::Patch;

    async fn directory() -> PatientDirectory {
        let db = memory_db().await;
        PatientDirectory::new(Arc::new(SeaOrmRepositoryProvider::new(db)))
    }

    fn patient(first: &str, last: &str, gender: Gender) -> CreatePatientDto {
        CreatePatientDto {
            first_name: first.into(),
            last_name: last.into(),
            gender,
            phone: "+998901112233".into(),
            email: format!("{}.{}@mail.test", first.to_lowercase(), last.to_lowercase()),
            notes: None,
        }
    }

    fn search(q: &str) -> ListPatientsQuery {
        ListPatientsQuery::new(Some(q.into()), None, None, None, None)
    }

    #[tokio::test]
    async fn create_then_get_one_returns_same_fields() {
        let dir = directory().await;
        let mut dto = patient("Dilnoza", "Rashidova", Gender::Female);
        dto.notes = Some("penicillin allergy".into());

        let created = dir.create(dto.clone()).await.unwrap();
        let fetched = dir.get_one(&created.id).await.unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.first_name, dto.first_name);
        assert_eq!(fetched.last_name, dto.last_name);
        assert_eq!(fetched.gender, dto.gender);
        assert_eq!(fetched.phone, dto.phone);
        assert_eq!(fetched.email, dto.email);
        assert_eq!(fetched.notes, dto.notes);
        assert!(!fetched.id.is_empty());
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[tokio::test]
    async fn list_without_filters_pages_everything() {
        let dir = directory().await;
        for i in 0..5 {
            dir.create(patient(&format!("P{}", i), "Test", Gender::Male))
                .await
                .unwrap();
        }

        let page = dir.list(ListPatientsQuery::default()).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.offset, 0);
        assert_eq!(page.limit, 20);
        assert_eq!(page.items.len(), 5);

        let page = dir
            .list(ListPatientsQuery::new(None, None, None, Some(3), Some(10)))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);

        let page = dir
            .list(ListPatientsQuery::new(None, None, None, Some(1), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);

        let page = dir
            .list(ListPatientsQuery::new(None, None, None, Some(9), None))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn search_is_case_insensitive_substring_over_four_fields() {
        let dir = directory().await;
        dir.create(patient("John", "Smith", Gender::Male)).await.unwrap();
        dir.create(patient("Anna", "SMITH", Gender::Female)).await.unwrap();
        dir.create(patient("Bob", "Blacksmith", Gender::Male)).await.unwrap();
        dir.create(patient("Carl", "Jones", Gender::Male)).await.unwrap();

        let mut by_phone = patient("Dana", "White", Gender::Female);
        by_phone.phone = "555-0199".into();
        dir.create(by_phone).await.unwrap();

        let page = dir.list(search("smith")).await.unwrap();
        assert_eq!(page.total, 3);
        for p in &page.items {
            let hit = [&p.first_name, &p.last_name, &p.phone, &p.email]
                .iter()
                .any(|f| f.to_lowercase().contains("smith"));
            assert!(hit, "{} does not match", p.full_name());
        }

        let page = dir.list(search("0199")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].first_name, "Dana");

        let page = dir.list(search("CARL.JONES@")).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn search_folds_non_ascii_case() {
        let dir = directory().await;
        dir.create(patient("Азиз", "Каримов", Gender::Male)).await.unwrap();
        dir.create(patient("Émile", "Durand", Gender::Male)).await.unwrap();
        dir.create(patient("John", "Smith", Gender::Male)).await.unwrap();

        for q in ["каримов", "КАРИМОВ", "Каримов", "арим"] {
            let page = dir.list(search(q)).await.unwrap();
            assert_eq!(page.total, 1, "query {:?}", q);
            assert_eq!(page.items[0].last_name, "Каримов");
        }
        for q in ["émile", "ÉMILE", "Émile"] {
            let page = dir.list(search(q)).await.unwrap();
            assert_eq!(page.total, 1, "query {:?}", q);
            assert_eq!(page.items[0].first_name, "Émile");
        }
    }

    #[tokio::test]
    async fn search_follows_updated_fields() {
        let dir = directory().await;
        let created = dir
            .create(patient("Азиз", "Каримов", Gender::Male))
            .await
            .unwrap();

        let dto = UpdatePatientDto {
            last_name: Patch::Set("Юсупов".into()),
            ..Default::default()
        };
        dir.update(&created.id, dto).await.unwrap();

        assert_eq!(dir.list(search("КАРИМОВ")).await.unwrap().total, 0);
        assert_eq!(dir.list(search("ЮСУПОВ")).await.unwrap().total, 1);
        assert_eq!(dir.list(search("азиз")).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn wildcards_in_search_are_literal() {
        let dir = directory().await;
        dir.create(patient("Ann", "Lee", Gender::Female)).await.unwrap();
        let mut odd = patient("Odd", "Name", Gender::Male);
        odd.notes = None;
        odd.email = "100%_sure@mail.test".into();
        dir.create(odd).await.unwrap();

        assert_eq!(dir.list(search("%")).await.unwrap().total, 1);
        assert_eq!(dir.list(search("_")).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn empty_search_is_ignored() {
        let dir = directory().await;
        dir.create(patient("A", "B", Gender::Male)).await.unwrap();
        dir.create(patient("C", "D", Gender::Female)).await.unwrap();

        assert_eq!(dir.list(search("")).await.unwrap().total, 2);
    }

    #[tokio::test]
    async fn gender_filter_is_anded_with_search() {
        let dir = directory().await;
        dir.create(patient("John", "Smith", Gender::Male)).await.unwrap();
        dir.create(patient("Jane", "Smith", Gender::Female)).await.unwrap();
        dir.create(patient("Mary", "Jones", Gender::Female)).await.unwrap();

        let page = dir
            .list(ListPatientsQuery::new(
                Some("smith".into()),
                Some(Gender::Female),
                None,
                None,
                None,
            ))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].first_name, "Jane");

        let page = dir
            .list(ListPatientsQuery::new(None, Some(Gender::Female), None, None, None))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|p| p.gender == Gender::Female));
    }

    #[tokio::test]
    async fn sort_orders_by_creation_time() {
        let dir = directory().await;
        for i in 0..4 {
            dir.create(patient(&format!("N{}", i), "Order", Gender::Male))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let newest = dir.list(ListPatientsQuery::default()).await.unwrap();
        assert!(newest
            .items
            .windows(2)
            .all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(newest.items[0].first_name, "N3");

        let oldest = dir
            .list(ListPatientsQuery::new(
                None,
                None,
                Some(PatientSort::Oldest),
                None,
                None,
            ))
            .await
            .unwrap();
        assert!(oldest
            .items
            .windows(2)
            .all(|w| w[0].created_at <= w[1].created_at));
        assert_eq!(oldest.items[0].first_name, "N0");
    }

    #[tokio::test]
    async fn update_applies_only_set_fields() {
        let dir = directory().await;
        let mut dto = patient("Old", "Name", Gender::Male);
        dto.notes = Some("keep me".into());
        let created = dir.create(dto).await.unwrap();

        let updated = dir
            .update(
                &created.id,
                UpdatePatientDto {
                    first_name: Patch::Set("New".into()),
                    phone: Patch::Set("777".into()),
                    ..UpdatePatientDto::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.first_name, "New");
        assert_eq!(updated.phone, "777");
        assert_eq!(updated.last_name, "Name");
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.notes.as_deref(), Some("keep me"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_can_clear_notes() {
        let dir = directory().await;
        let mut dto = patient("Has", "Notes", Gender::Female);
        dto.notes = Some("temporary".into());
        let created = dir.create(dto).await.unwrap();

        let updated = dir
            .update(
                &created.id,
                UpdatePatientDto {
                    notes: Patch::Set(None),
                    gender: Patch::Set(Gender::Male),
                    ..UpdatePatientDto::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.notes, None);
        assert_eq!(updated.gender, Gender::Male);
    }

    #[tokio::test]
    async fn missing_patient_is_not_found_everywhere() {
        let dir = directory().await;

        assert!(matches!(
            dir.get_one("nope").await,
            Err(DomainError::NotFound { entity: "Patient", .. })
        ));
        assert!(matches!(
            dir.update("nope", UpdatePatientDto::default()).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(matches!(
            dir.remove("nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn remove_deletes_the_record() {
        let dir = directory().await;
        let created = dir.create(patient("Gone", "Soon", Gender::Male)).await.unwrap();

        let confirmation = dir.remove(&created.id).await.unwrap();
        assert_eq!(confirmation.message, "Patient deleted");

        assert!(matches!(
            dir.get_one(&created.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert_eq!(dir.list(ListPatientsQuery::default()).await.unwrap().total, 0);
    }
}
