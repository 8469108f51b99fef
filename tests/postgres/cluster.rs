//! Embedded `PostgreSQL` cluster lifecycle for integration tests.
//!
//! One cluster is started lazily for the whole test binary and never torn
//! down; each test creates its own uniquely-named database inside it. The
//! cluster owns a private runtime so its async lifecycle calls stay off the
//! runtimes individual tests build.

use postgresql_embedded::{PostgreSQL, Settings};
use rstest::fixture;
use std::sync::OnceLock;
use tokio::runtime::Runtime;

/// Boxed error type shared by the `PostgreSQL` test helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared handle to the lazily-started embedded cluster.
pub type PostgresCluster = &'static EmbeddedCluster;

static SHARED_CLUSTER: OnceLock<Result<EmbeddedCluster, String>> = OnceLock::new();

/// A running embedded `PostgreSQL` server.
pub struct EmbeddedCluster {
    postgres: PostgreSQL,
    runtime: Runtime,
}

impl EmbeddedCluster {
    fn start() -> Result<Self, BoxError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let mut postgres = PostgreSQL::new(Settings::default());
        runtime.block_on(async {
            postgres.setup().await?;
            postgres.start().await
        })?;
        Ok(Self { postgres, runtime })
    }

    /// Creates a database and returns its connection URL.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be created.
    pub fn create_database(&self, name: &str) -> Result<String, BoxError> {
        self.runtime.block_on(self.postgres.create_database(name))?;
        Ok(self.postgres.settings().url(name))
    }
}

/// Fixture resolving the shared cluster, starting it on first use.
#[fixture]
pub fn postgres_cluster() -> Result<PostgresCluster, BoxError> {
    let entry =
        SHARED_CLUSTER.get_or_init(|| EmbeddedCluster::start().map_err(|err| err.to_string()));
    match entry {
        Ok(cluster) => Ok(cluster),
        Err(message) => Err(message.clone().into()),
    }
}
