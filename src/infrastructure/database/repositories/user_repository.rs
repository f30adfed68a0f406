use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use crate::domain::user::guards::EMAIL_IN_USE_MESSAGE;
use crate::domain::{
    DoctorLinks, DomainError, DomainResult, ListUsersQuery, NewUser, User, UserRepository,
    UserRole,
};
use crate::infrastructure::database::entities::{appointment, medical_record, user};
use crate::infrastructure::database::query::{any_contains_folded, fold_case};
use crate::shared::OffsetPage;

const SEARCH_COLUMNS: [user::Column; 3] = [
    user::Column::SearchEmail,
    user::Column::SearchFirstName,
    user::Column::SearchLastName,
];

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Doctor => UserRole::Doctor,
        user::UserRole::Receptionist => UserRole::Receptionist,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Doctor => user::UserRole::Doctor,
        UserRole::Receptionist => user::UserRole::Receptionist,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        email: model.email,
        first_name: model.first_name,
        last_name: model.last_name,
        role: entity_role_to_domain(model.role),
        password_hash: model.password_hash,
        is_active: model.is_active,
        must_change_password: model.must_change_password,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn not_found(id: &str) -> DomainError {
    DomainError::not_found("User", id)
}

fn update_err(id: &str) -> impl FnOnce(DbErr) -> DomainError + '_ {
    move |e| match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => not_found(id),
        other => other.into(),
    }
}

fn filtered(query: &ListUsersQuery) -> Select<user::Entity> {
    let mut select = user::Entity::find();
    if let Some(ref q) = query.q {
        select = select.filter(any_contains_folded(&SEARCH_COLUMNS, q));
    }
    select
}

impl SeaOrmUserRepository {
    async fn load(&self, id: &str) -> DomainResult<user::Model> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, new_user: NewUser) -> DomainResult<User> {
        let now = Utc::now();

        let model = user::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            search_email: Set(fold_case(&new_user.email)),
            search_first_name: Set(fold_case(&new_user.first_name)),
            search_last_name: Set(fold_case(&new_user.last_name)),
            email: Set(new_user.email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            role: Set(domain_role_to_entity(new_user.role)),
            password_hash: Set(new_user.password_hash),
            is_active: Set(new_user.is_active),
            must_change_password: Set(new_user.must_change_password),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                DomainError::Conflict(EMAIL_IN_USE_MESSAGE.to_string())
            } else {
                e.into()
            }
        })?;

        debug!(user_id = %inserted.id, "Inserted user");
        Ok(user_model_to_domain(inserted))
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(user_model_to_domain))
    }

    async fn find_all(&self) -> DomainResult<Vec<User>> {
        let models = user::Entity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(user_model_to_domain).collect())
    }

    async fn list(&self, query: &ListUsersQuery) -> DomainResult<OffsetPage<User>> {
        let txn = self.db.begin().await?;
        let total = filtered(query).count(&txn).await?;
        let models = filtered(query)
            .order_by_desc(user::Column::CreatedAt)
            .order_by_desc(user::Column::Id)
            .offset(query.offset)
            .limit(query.limit)
            .all(&txn)
            .await?;
        txn.commit().await?;

        let items = models.into_iter().map(user_model_to_domain).collect();
        Ok(OffsetPage::new(items, total, query.offset, query.limit))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    async fn count_active_admins(&self) -> DomainResult<u64> {
        let count = user::Entity::find()
            .filter(user::Column::Role.eq(user::UserRole::Admin))
            .filter(user::Column::IsActive.eq(true))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    async fn update_role(&self, id: &str, role: UserRole) -> DomainResult<User> {
        let mut active: user::ActiveModel = self.load(id).await?.into();
        active.role = Set(domain_role_to_entity(role));
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(update_err(id))?;
        Ok(user_model_to_domain(updated))
    }

    async fn update_status(&self, id: &str, is_active: bool) -> DomainResult<User> {
        let mut active: user::ActiveModel = self.load(id).await?.into();
        active.is_active = Set(is_active);
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(update_err(id))?;
        Ok(user_model_to_domain(updated))
    }

    async fn update_password(
        &self,
        id: &str,
        password_hash: &str,
        must_change_password: bool,
    ) -> DomainResult<()> {
        let mut active: user::ActiveModel = self.load(id).await?.into();
        active.password_hash = Set(password_hash.to_string());
        active.must_change_password = Set(must_change_password);
        active.updated_at = Set(Utc::now());

        active.update(&self.db).await.map_err(update_err(id))?;
        Ok(())
    }

    async fn count_doctor_links(&self, doctor_id: &str) -> DomainResult<DoctorLinks> {
        let txn = self.db.begin().await?;
        let appointments = appointment::Entity::find()
            .filter(appointment::Column::DoctorId.eq(doctor_id))
            .count(&txn)
            .await?;
        let medical_records = medical_record::Entity::find()
            .filter(medical_record::Column::AuthorId.eq(doctor_id))
            .count(&txn)
            .await?;
        txn.commit().await?;

        Ok(DoctorLinks {
            appointments,
            medical_records,
        })
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = user::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(not_found(id));
        }

        Ok(())
    }
}
