use anyhow::Result;
use async_trait::async_trait;

use crate::models::{ApplicationDestination, Cluster, GroupKind, ProjectParams, Repository};
use crate::provider::ReferenceSource;

pub fn project_params(name: &str) -> ProjectParams {
    ProjectParams {
        name: name.to_string(),
        ..ProjectParams::default()
    }
}

pub fn group_kind(group: &str, kind: &str) -> GroupKind {
    GroupKind {
        group: group.to_string(),
        kind: kind.to_string(),
    }
}

pub fn destination(server: &str, namespace: &str) -> ApplicationDestination {
    ApplicationDestination {
        server: server.to_string(),
        namespace: namespace.to_string(),
    }
}

/// Reference source answering from fixed lists.
pub struct StaticSource {
    pub repos: Vec<String>,
    pub servers: Vec<String>,
}

impl StaticSource {
    pub fn new(repos: &[&str], servers: &[&str]) -> StaticSource {
        StaticSource {
            repos: repos.iter().map(|repo| repo.to_string()).collect(),
            servers: servers.iter().map(|server| server.to_string()).collect(),
        }
    }
}

#[async_trait]
impl ReferenceSource for StaticSource {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        Ok(self
            .repos
            .iter()
            .map(|repo| Repository { repo: repo.clone() })
            .collect())
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        Ok(self
            .servers
            .iter()
            .map(|server| Cluster {
                server: server.clone(),
                name: None,
            })
            .collect())
    }
}
