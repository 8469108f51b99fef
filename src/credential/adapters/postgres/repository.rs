//! `PostgreSQL` repository implementation for API credentials.

use super::{
    models::{CredentialRow, NewCredentialRow},
    schema::api_credentials,
};
use crate::credential::{
    domain::{ApiCredential, CredentialId, KeyHash, PersistedCredentialData},
    ports::{CredentialRepository, CredentialRepositoryError, CredentialRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by credential adapters.
pub type CredentialPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed credential repository.
#[derive(Debug, Clone)]
pub struct PostgresCredentialRepository {
    pool: CredentialPgPool,
}

impl PostgresCredentialRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: CredentialPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CredentialRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CredentialRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CredentialRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CredentialRepositoryError::persistence)?
    }
}

impl From<DieselError> for CredentialRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn insert(&self, credential: &ApiCredential) -> CredentialRepositoryResult<()> {
        let credential_id = credential.id();
        let new_row = to_new_row(credential);

        self.run_blocking(move |connection| {
            diesel::insert_into(api_credentials::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        CredentialRepositoryError::Duplicate(credential_id)
                    }
                    _ => CredentialRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_hash(
        &self,
        hash: &KeyHash,
    ) -> CredentialRepositoryResult<Option<ApiCredential>> {
        let digest = hash.as_str().to_owned();

        self.run_blocking(move |connection| {
            let row = api_credentials::table
                .filter(api_credentials::key_hash.eq(digest))
                .select(CredentialRow::as_select())
                .first::<CredentialRow>(connection)
                .optional()?;
            row.map(row_to_credential).transpose()
        })
        .await
    }

    async fn mark_used(
        &self,
        id: CredentialId,
        at: DateTime<Utc>,
    ) -> CredentialRepositoryResult<Option<ApiCredential>> {
        self.run_blocking(move |connection| {
            let row = diesel::update(
                api_credentials::table.filter(api_credentials::id.eq(id.into_inner())),
            )
            .set(api_credentials::last_used_at.eq(Some(at)))
            .returning(CredentialRow::as_returning())
            .get_result::<CredentialRow>(connection)
            .optional()?;
            row.map(row_to_credential).transpose()
        })
        .await
    }
}

fn to_new_row(credential: &ApiCredential) -> NewCredentialRow {
    NewCredentialRow {
        id: credential.id().into_inner(),
        key_hash: credential.key_hash().as_str().to_owned(),
        label: credential.label().map(str::to_owned),
        created_at: credential.created_at(),
        last_used_at: credential.last_used_at(),
    }
}

fn row_to_credential(row: CredentialRow) -> CredentialRepositoryResult<ApiCredential> {
    let CredentialRow {
        id,
        key_hash,
        label,
        created_at,
        last_used_at,
    } = row;

    let digest =
        KeyHash::new(key_hash).map_err(CredentialRepositoryError::invalid_persisted_data)?;

    Ok(ApiCredential::from_persisted(PersistedCredentialData {
        id: CredentialId::from_uuid(id),
        label,
        key_hash: digest,
        created_at,
        last_used_at,
    }))
}
