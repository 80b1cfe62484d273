use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Cluster, ProjectParams, Repository};

/// Read-only queries the form uses to fill its repository and cluster
/// selectors.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    async fn list_clusters(&self) -> Result<Vec<Cluster>>;
}

/// Receives the finalized record once the form validates.
#[async_trait]
pub trait Submit: Send + Sync {
    async fn submit(&self, params: ProjectParams) -> Result<()>;
}

#[async_trait]
impl<F> Submit for F
where
    F: Fn(ProjectParams) -> Result<()> + Send + Sync,
{
    async fn submit(&self, params: ProjectParams) -> Result<()> {
        (self)(params)
    }
}
