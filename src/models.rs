use serde::{Deserialize, Serialize};

/// Identifier appended to both reference lists so a project can allow any
/// repository or any cluster.
pub const WILDCARD: &str = "*";

pub const DEFAULT_NAMESPACE: &str = "default";

pub const APP_PROJECT_API_VERSION: &str = "argoproj.io/v1alpha1";
pub const APP_PROJECT_KIND: &str = "AppProject";

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectParams {
    pub name: String,
    pub description: String,
    pub source_repos: Vec<String>,
    pub destinations: Vec<ApplicationDestination>,
    pub cluster_resource_whitelist: Vec<GroupKind>,
    pub namespace_resource_blacklist: Vec<GroupKind>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationDestination {
    pub server: String,
    pub namespace: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupKind {
    pub group: String,
    pub kind: String,
}

impl GroupKind {
    pub fn trimmed(&self) -> GroupKind {
        GroupKind {
            group: self.group.trim().to_string(),
            kind: self.kind.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub repo: String,
}

impl Repository {
    pub fn wildcard() -> Repository {
        Repository {
            repo: WILDCARD.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Cluster {
    pub fn wildcard() -> Cluster {
        Cluster {
            server: WILDCARD.to_string(),
            name: None,
        }
    }
}

/// List envelope used by the API for every collection endpoint. `items` is
/// `null` when the collection is empty.
#[derive(Debug, Deserialize)]
pub struct ItemList<T> {
    pub items: Option<Vec<T>>,
}

impl<T> ItemList<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items.unwrap_or_default()
    }
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProject {
    pub api_version: String,
    pub kind: String,
    pub metadata: AppProjectMetadata,
    pub spec: AppProjectSpec,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProjectMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppProjectSpec {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub source_repos: Vec<String>,
    pub destinations: Vec<ApplicationDestination>,
    pub cluster_resource_whitelist: Vec<GroupKind>,
    pub namespace_resource_blacklist: Vec<GroupKind>,
}

impl AppProject {
    pub fn from_params(params: &ProjectParams, namespace: &str) -> AppProject {
        AppProject {
            api_version: APP_PROJECT_API_VERSION.to_string(),
            kind: APP_PROJECT_KIND.to_string(),
            metadata: AppProjectMetadata {
                name: params.name.clone(),
                namespace: namespace.to_string(),
            },
            spec: AppProjectSpec::from(params),
        }
    }
}

impl From<&ProjectParams> for AppProjectSpec {
    fn from(params: &ProjectParams) -> Self {
        AppProjectSpec {
            description: params.description.clone(),
            source_repos: params.source_repos.clone(),
            destinations: params.destinations.clone(),
            cluster_resource_whitelist: params.cluster_resource_whitelist.clone(),
            namespace_resource_blacklist: params.namespace_resource_blacklist.clone(),
        }
    }
}
