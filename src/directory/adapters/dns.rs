//! DNS TXT resolution via hickory-resolver.

use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveError;

use crate::directory::ports::{TxtLookupError, TxtLookupResult, TxtResolver};

/// TXT resolver backed by the hickory asynchronous DNS client.
pub struct HickoryTxtResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryTxtResolver {
    /// Creates a resolver using the built-in default upstream servers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
        }
    }

    /// Creates a resolver from the host's DNS configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the system resolver configuration
    /// cannot be read.
    pub fn from_system_conf() -> Result<Self, ResolveError> {
        Ok(Self {
            resolver: TokioAsyncResolver::tokio_from_system_conf()?,
        })
    }
}

impl Default for HickoryTxtResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn lookup_txt(&self, name: &str) -> TxtLookupResult {
        let lookup = self
            .resolver
            .txt_lookup(name)
            .await
            .map_err(TxtLookupError::lookup)?;

        let values = lookup
            .iter()
            .flat_map(|txt| txt.txt_data())
            .map(|data| String::from_utf8_lossy(data).into_owned())
            .collect();
        Ok(values)
    }
}
