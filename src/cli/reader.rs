use anyhow::Result;
use serde::Deserialize;
use serde_yaml;

use crate::event::Edit;
use crate::models::ProjectParams;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Config {
    pub server: String,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
    pub namespace: Option<String>,
    #[serde(default)]
    pub name_readonly: bool,
    #[serde(default)]
    pub project: ProjectParams,
    pub edits: Option<Vec<Edit>>,
}

pub fn read_config(config: &str) -> Result<Config> {
    let deserialized_config: serde_yaml::Result<Config> = serde_yaml::from_str(config);

    let result = match deserialized_config {
        Ok(content) => content,
        Err(error) => {
            return Err(error.into());
        }
    };

    Ok(result)
}
