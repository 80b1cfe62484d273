use std::iter;

use anyhow::Result;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::FutureExt;
use tracing::{debug, error};

use crate::models::{Cluster, Repository};
use crate::provider::ReferenceSource;

/// State of one asynchronously loaded piece of reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Pending
    }
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Loadable::Pending)
    }
}

impl<T> From<Result<T>> for Loadable<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Loadable::Ready(value),
            Err(e) => Loadable::Failed(format!("{:#}", e)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceUpdate {
    Repositories(Loadable<Vec<String>>),
    Clusters(Loadable<Vec<String>>),
}

pub async fn load_repository_options(source: &dyn ReferenceSource) -> Result<Vec<String>> {
    let repos = source.list_repositories().await?;
    debug!(count = repos.len(), "loaded repositories");

    Ok(repos
        .into_iter()
        .chain(iter::once(Repository::wildcard()))
        .map(|repo| repo.repo)
        .collect())
}

pub async fn load_cluster_options(source: &dyn ReferenceSource) -> Result<Vec<String>> {
    let clusters = source.list_clusters().await?;
    debug!(count = clusters.len(), "loaded clusters");

    Ok(clusters
        .into_iter()
        .chain(iter::once(Cluster::wildcard()))
        .map(|cluster| cluster.server)
        .collect())
}

/// Starts both reference loads and yields each result as soon as it lands.
/// Neither load waits on the other; dropping the stream abandons whatever
/// is still in flight.
pub fn reference_updates(
    source: &dyn ReferenceSource,
) -> FuturesUnordered<BoxFuture<'_, ReferenceUpdate>> {
    let loads: FuturesUnordered<BoxFuture<'_, ReferenceUpdate>> = FuturesUnordered::new();

    loads.push(
        async move {
            let result = load_repository_options(source).await;
            if let Err(e) = &result {
                error!(error = %format!("{:#}", e), "failed to load repositories");
            }
            ReferenceUpdate::Repositories(result.into())
        }
        .boxed(),
    );

    loads.push(
        async move {
            let result = load_cluster_options(source).await;
            if let Err(e) = &result {
                error!(error = %format!("{:#}", e), "failed to load clusters");
            }
            ReferenceUpdate::Clusters(result.into())
        }
        .boxed(),
    );

    loads
}
