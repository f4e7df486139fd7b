use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};

use crate::domain::{
    Balance, CreateUserDto, DomainError, DomainResult, ImageChange, InfraError, User,
    UserChanges, UserIdentity, UserLookup, UserRepositoryInterface, UserRole,
};
use crate::infrastructure::crypto::PasswordHasher;
use crate::infrastructure::database::entities::{balance, user};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::User => UserRole::User,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::User => user::UserRole::User,
    }
}

fn balance_model_to_domain(model: balance::Model) -> Balance {
    Balance {
        user_id: model.user_id,
        balance: model.balance,
        revenue: model.revenue,
    }
}

fn user_model_to_domain(model: user::Model, balance: Option<balance::Model>) -> User {
    User {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password_hash,
        role: entity_role_to_domain(model.role),
        activated: model.activated,
        image: model.image,
        full_name: model.full_name,
        bio: model.bio,
        created_at: model.created_at,
        updated_at: model.updated_at,
        balance: balance.map(balance_model_to_domain),
    }
}

fn db_err(e: sea_orm::DbErr) -> DomainError {
    InfraError::Database(e).into()
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepositoryInterface for SeaOrmUserRepository {
    async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let password_hash = self.hasher.hash(&dto.password)?;

        let new_user = user::ActiveModel {
            id: Set(id.clone()),
            username: Set(dto.username),
            email: Set(dto.email),
            password_hash: Set(password_hash),
            role: Set(domain_role_to_entity(dto.role.unwrap_or_default())),
            activated: Set(false),
            image: Set(None),
            full_name: Set(dto.full_name),
            bio: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let new_balance = balance::ActiveModel {
            user_id: Set(id),
            balance: Set(Decimal::ZERO),
            revenue: Set(Decimal::ZERO),
        };

        let txn = self.db.begin().await.map_err(db_err)?;
        let user = new_user.insert(&txn).await.map_err(db_err)?;
        let balance = new_balance.insert(&txn).await.map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;

        Ok(user_model_to_domain(user, Some(balance)))
    }

    async fn find_unique(
        &self,
        lookup: UserLookup,
        include_balance: bool,
    ) -> DomainResult<Option<User>> {
        let query = match lookup {
            UserLookup::Id(id) => user::Entity::find_by_id(id),
            UserLookup::Email(email) => user::Entity::find().filter(user::Column::Email.eq(email)),
            UserLookup::Username(username) => {
                user::Entity::find().filter(user::Column::Username.eq(username))
            }
        };

        if include_balance {
            let found = query
                .find_also_related(balance::Entity)
                .one(&self.db)
                .await
                .map_err(db_err)?;
            Ok(found.map(|(user, balance)| user_model_to_domain(user, balance)))
        } else {
            let found = query.one(&self.db).await.map_err(db_err)?;
            Ok(found.map(|user| user_model_to_domain(user, None)))
        }
    }

    async fn find_by_email_or_username(
        &self,
        email: Option<&str>,
        username: Option<&str>,
    ) -> DomainResult<Vec<UserIdentity>> {
        if email.is_none() && username.is_none() {
            return Ok(Vec::new());
        }

        let mut condition = Condition::any();
        if let Some(email) = email {
            condition = condition.add(user::Column::Email.eq(email));
        }
        if let Some(username) = username {
            condition = condition.add(user::Column::Username.eq(username));
        }

        let rows: Vec<(String, String)> = user::Entity::find()
            .select_only()
            .column(user::Column::Email)
            .column(user::Column::Username)
            .filter(condition)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(email, username)| UserIdentity { email, username })
            .collect())
    }

    async fn update_user(&self, id: &str, changes: UserChanges) -> DomainResult<User> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let existing = user::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        let mut active: user::ActiveModel = existing.into();

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(email) = changes.email {
            active.email = Set(email);
        }
        if let Some(full_name) = changes.full_name {
            active.full_name = Set(Some(full_name));
        }
        if let Some(bio) = changes.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(activated) = changes.activated {
            active.activated = Set(activated);
        }
        match changes.image {
            ImageChange::Set(name) => active.image = Set(Some(name)),
            ImageChange::Clear => active.image = Set(None),
            ImageChange::Unchanged => {}
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(db_err)?;

        let existing_balance = balance::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?;

        let balance = match (changes.balance, existing_balance) {
            (Some(changes), Some(existing)) => {
                let mut active: balance::ActiveModel = existing.into();
                if let Some(value) = changes.balance {
                    active.balance = Set(value);
                }
                if let Some(value) = changes.revenue {
                    active.revenue = Set(value);
                }
                Some(active.update(&txn).await.map_err(db_err)?)
            }
            (Some(_), None) => {
                return Err(DomainError::NotFound {
                    entity: "Balance",
                    field: "user_id",
                    value: id.to_string(),
                });
            }
            (None, existing) => existing,
        };

        txn.commit().await.map_err(db_err)?;

        Ok(user_model_to_domain(updated, balance))
    }
}
