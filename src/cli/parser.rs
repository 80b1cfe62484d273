use std::time::Duration;

use anyhow::{anyhow, Result};
use reqwest::Url;

use super::reader;
use crate::argocd_provider::{ServerConfig, DEFAULT_TIMEOUT};
use crate::event::Edit;
use crate::models::ProjectParams;

pub const TOKEN_ENV: &str = "ARGOCD_AUTH_TOKEN";
pub const DEFAULT_ARGOCD_NAMESPACE: &str = "argocd";

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedConfig {
    pub server: ServerConfig,
    pub namespace: String,
    pub name_readonly: bool,
    pub project: ProjectParams,
    pub edits: Vec<Edit>,
}

pub fn parse_config(config: reader::Config, env_token: Option<String>) -> Result<ParsedConfig> {
    let base_url = Url::parse(&config.server)
        .map_err(|e| anyhow!("invalid server url `{}`: {}", config.server, e))?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(anyhow!(
            "server url `{}` must use http or https",
            config.server
        ));
    }

    let token = config
        .token
        .filter(|token| !token.is_empty())
        .or(env_token.filter(|token| !token.is_empty()));

    let timeout = match config.timeout_secs {
        Some(0) => return Err(anyhow!("timeout_secs must be greater than zero")),
        Some(secs) => Duration::from_secs(secs),
        None => DEFAULT_TIMEOUT,
    };

    Ok(ParsedConfig {
        server: ServerConfig {
            base_url: config.server,
            token,
            timeout,
        },
        namespace: config
            .namespace
            .unwrap_or_else(|| DEFAULT_ARGOCD_NAMESPACE.to_string()),
        name_readonly: config.name_readonly,
        project: config.project,
        edits: config.edits.unwrap_or_default(),
    })
}
