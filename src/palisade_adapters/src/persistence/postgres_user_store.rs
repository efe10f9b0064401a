use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use palisade_core::{
    Email, LockState, NewUser, StoredPasswordHash, UserId, UserRecord, UserSelector, UserStore,
    UserStoreError, UserUpdate,
};

const SELECT_BY_ID: &str = "SELECT id, email, password_hash, failed_login_attempts, \
     is_temp_locked, is_perm_locked, last_failed_login_attempt FROM users WHERE id = $1";

const SELECT_BY_EMAIL: &str = "SELECT id, email, password_hash, failed_login_attempts, \
     is_temp_locked, is_perm_locked, last_failed_login_attempt FROM users WHERE email = $1";

const INSERT_USER: &str = "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
     RETURNING id, email, password_hash, failed_login_attempts, is_temp_locked, \
     is_perm_locked, last_failed_login_attempt";

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresUserStore { pool }
    }

    async fn fetch_by_selector(
        &self,
        selector: &UserSelector,
    ) -> Result<Option<UserRow>, UserStoreError> {
        let query = match selector {
            UserSelector::ById(id) => {
                sqlx::query_as::<_, UserRow>(SELECT_BY_ID).bind(id.as_uuid())
            }
            UserSelector::ByEmail(email) => sqlx::query_as::<_, UserRow>(SELECT_BY_EMAIL)
                .bind(email.as_ref().expose_secret().clone()),
        };

        query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    password_hash: String,
    failed_login_attempts: i32,
    is_temp_locked: bool,
    is_perm_locked: bool,
    last_failed_login_attempt: Option<DateTime<Utc>>,
}

impl UserRow {
    fn into_record(self) -> Result<UserRecord, UserStoreError> {
        let email = Email::parse(Secret::from(self.email))
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        Ok(UserRecord {
            id: UserId::from(self.id),
            email,
            password_hash: StoredPasswordHash::new(Secret::from(self.password_hash)),
            lockout: LockState {
                failed_attempts: self.failed_login_attempts.max(0) as u32,
                temp_locked: self.is_temp_locked,
                perm_locked: self.is_perm_locked,
                last_failed_at: self.last_failed_login_attempt,
            },
        })
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(Uuid::new_v4())
            .bind(user.email.as_ref().expose_secret().clone())
            .bind(user.password_hash.as_ref().expose_secret().clone())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.constraint().is_some() {
                        return UserStoreError::UserAlreadyExists;
                    }
                }
                UserStoreError::UnexpectedError(e.to_string())
            })?;

        row.into_record()
    }

    #[tracing::instrument(name = "Looking up user in PostgreSQL", skip_all)]
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, UserStoreError> {
        let row = self
            .fetch_by_selector(&UserSelector::ByEmail(email.clone()))
            .await?;
        row.map(UserRow::into_record).transpose()
    }

    #[tracing::instrument(name = "Updating user in PostgreSQL", skip_all)]
    async fn update(
        &self,
        selector: UserSelector,
        update: UserUpdate,
    ) -> Result<UserRecord, UserStoreError> {
        if let Some(lockout) = &update.lockout {
            let statement = match &selector {
                UserSelector::ById(_) => {
                    "UPDATE users SET failed_login_attempts = $1, is_temp_locked = $2, \
                     is_perm_locked = $3, last_failed_login_attempt = $4 WHERE id = $5"
                }
                UserSelector::ByEmail(_) => {
                    "UPDATE users SET failed_login_attempts = $1, is_temp_locked = $2, \
                     is_perm_locked = $3, last_failed_login_attempt = $4 WHERE email = $5"
                }
            };
            let query = sqlx::query(statement)
                .bind(lockout.failed_attempts as i32)
                .bind(lockout.temp_locked)
                .bind(lockout.perm_locked)
                .bind(lockout.last_failed_at);
            let query = match &selector {
                UserSelector::ById(id) => query.bind(id.as_uuid()),
                UserSelector::ByEmail(email) => query.bind(email.as_ref().expose_secret().clone()),
            };

            let result = query
                .execute(&self.pool)
                .await
                .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;
            if result.rows_affected() == 0 {
                return Err(UserStoreError::UserNotFound);
            }
        }

        if let Some(new_email) = &update.email {
            let statement = match &selector {
                UserSelector::ById(_) => "UPDATE users SET email = $1 WHERE id = $2",
                UserSelector::ByEmail(_) => "UPDATE users SET email = $1 WHERE email = $2",
            };
            let query = sqlx::query(statement).bind(new_email.as_ref().expose_secret().clone());
            let query = match &selector {
                UserSelector::ById(id) => query.bind(id.as_uuid()),
                UserSelector::ByEmail(email) => query.bind(email.as_ref().expose_secret().clone()),
            };

            let result = query.execute(&self.pool).await.map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.constraint().is_some() {
                        return UserStoreError::UserAlreadyExists;
                    }
                }
                UserStoreError::UnexpectedError(e.to_string())
            })?;
            if result.rows_affected() == 0 {
                return Err(UserStoreError::UserNotFound);
            }
        }

        // Re-read through the possibly-updated email key.
        let selector = match (update.email, selector) {
            (Some(new_email), UserSelector::ByEmail(_)) => UserSelector::ByEmail(new_email),
            (_, selector) => selector,
        };
        let row = self
            .fetch_by_selector(&selector)
            .await?
            .ok_or(UserStoreError::UserNotFound)?;
        row.into_record()
    }

    #[tracing::instrument(name = "Set new password hash in PostgreSQL", skip_all)]
    async fn set_password_hash(
        &self,
        selector: UserSelector,
        hash: StoredPasswordHash,
    ) -> Result<(), UserStoreError> {
        let statement = match &selector {
            UserSelector::ById(_) => "UPDATE users SET password_hash = $1 WHERE id = $2",
            UserSelector::ByEmail(_) => "UPDATE users SET password_hash = $1 WHERE email = $2",
        };
        let query = sqlx::query(statement).bind(hash.as_ref().expose_secret().clone());
        let query = match &selector {
            UserSelector::ById(id) => query.bind(id.as_uuid()),
            UserSelector::ByEmail(email) => query.bind(email.as_ref().expose_secret().clone()),
        };

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }
}
