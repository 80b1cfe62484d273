use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::models::{AppProject, AppProjectSpec, Cluster, ItemList, ProjectParams, Repository};
use crate::provider::{ReferenceSource, Submit};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

pub struct ArgoCdProvider {
    pub config: ServerConfig,
}

impl ArgoCdProvider {
    /// Builds a client for the configured server, or for `base_url` when
    /// one is given.
    pub fn configure_provider(&self, base_url: Option<String>) -> Result<ArgoCdClient> {
        let base_url = base_url.unwrap_or_else(|| self.config.base_url.clone());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("invalid server url `{}`", base_url))?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow!("server url `{}` cannot hold an api path", base_url));
        }

        let http = Client::builder()
            .timeout(self.config.timeout)
            .build()
            .context("could not build http client")?;

        Ok(ArgoCdClient {
            http,
            base_url,
            token: self.config.token.clone(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct ArgoCdClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl ArgoCdClient {
    /// `/api/v1/<segments>` under the base url. Each segment is
    /// percent-encoded on its own, so `/` or `?` inside a project name stay
    /// part of that name.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|_| anyhow!("server url `{}` cannot hold an api path", self.base_url))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, url: &Url) -> Result<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .with_context(|| format!("request to `{}` failed", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("`{}` returned {}: {}", url, status, body.trim()));
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("could not decode response from `{}`", url))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.url(segments)?;
        debug!(url = %url, "GET");
        self.send(self.http.get(url.clone()), &url).await
    }

    pub async fn get_project(&self, name: &str) -> Result<Value> {
        self.get(&["projects", name]).await
    }

    pub async fn create_project(&self, params: &ProjectParams) -> Result<Value> {
        let url = self.url(&["projects"])?;
        let body = json!({ "project": AppProject::from_params(params, "") });
        info!(project = %params.name, url = %url, "creating project");
        self.send(self.http.post(url.clone()).json(&body), &url).await
    }

    /// Replaces the editable spec fields of an existing project and keeps
    /// everything else the server returned, including `resourceVersion`.
    pub async fn update_project(&self, params: &ProjectParams) -> Result<Value> {
        let mut project = self.get_project(&params.name).await?;
        merge_spec(&mut project, &AppProjectSpec::from(params))?;

        let url = self.url(&["projects", params.name.as_str()])?;
        info!(project = %params.name, url = %url, "updating project");
        self.send(self.http.put(url.clone()).json(&json!({ "project": project })), &url)
            .await
    }
}

fn merge_spec(project: &mut Value, spec: &AppProjectSpec) -> Result<()> {
    let edited = serde_json::to_value(spec)?;
    let edited = edited
        .as_object()
        .ok_or_else(|| anyhow!("project spec is not an object"))?;

    let object = project
        .as_object_mut()
        .ok_or_else(|| anyhow!("project is not an object"))?;
    let current = object
        .entry("spec")
        .or_insert_with(|| Value::Object(serde_json::Map::new()));
    let current = current
        .as_object_mut()
        .ok_or_else(|| anyhow!("project spec is not an object"))?;

    // the description is skipped when empty, clear it explicitly
    current.remove("description");
    for (key, value) in edited {
        current.insert(key.clone(), value.clone());
    }

    Ok(())
}

#[async_trait]
impl ReferenceSource for ArgoCdClient {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let list: ItemList<Repository> = self.get(&["repositories"]).await?;
        Ok(list.into_items())
    }

    async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        let list: ItemList<Cluster> = self.get(&["clusters"]).await?;
        Ok(list.into_items())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update,
}

/// Submits the finalized project to the API server.
pub struct ProjectSubmitter {
    pub client: Arc<ArgoCdClient>,
    pub mode: SubmitMode,
}

#[async_trait]
impl Submit for ProjectSubmitter {
    async fn submit(&self, params: ProjectParams) -> Result<()> {
        match self.mode {
            SubmitMode::Create => self.client.create_project(&params).await?,
            SubmitMode::Update => self.client.update_project(&params).await?,
        };
        Ok(())
    }
}
