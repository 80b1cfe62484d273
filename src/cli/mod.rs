pub mod parser;
pub mod reader;

pub use parser::{ParsedConfig, DEFAULT_ARGOCD_NAMESPACE, TOKEN_ENV};

use anyhow::{Context, Result};
use clap::Parser;
use parser::parse_config;
use reader::read_config;

#[derive(Parser)]
#[clap(about = "Edit an Argo CD project from a YAML description")]
pub struct Args {
    #[clap(short, long, parse(from_os_str))]
    pub config: std::path::PathBuf,
    /// Print the resulting AppProject manifest instead of calling the API
    #[clap(long)]
    pub dry_run: bool,
}

pub fn run() -> Result<(Args, ParsedConfig)> {
    let args = Args::parse();

    let result = std::fs::read_to_string(&args.config)
        .with_context(|| format!("could not read file `{:?}`", &args.config))?;

    let content = read_config(&result)
        .with_context(|| format!("could not parse config `{:?}`", &args.config))?;
    let parsed_config = parse_config(content, std::env::var(TOKEN_ENV).ok())?;

    Ok((args, parsed_config))
}
