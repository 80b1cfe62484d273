use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use futures::StreamExt;
use tracing::{error, info};

use projedit::argocd_provider::{ArgoCdProvider, ProjectSubmitter, SubmitMode};
use projedit::cli;
use projedit::form::{FormProps, ProjectForm};
use projedit::loader::{reference_updates, ReferenceUpdate};
use projedit::models::{AppProject, ProjectParams};
use projedit::provider::Submit;
use projedit::render::render;

/// Dry-run submit: prints the manifest the server would receive.
struct PrintManifest {
    namespace: String,
}

#[async_trait]
impl Submit for PrintManifest {
    async fn submit(&self, params: ProjectParams) -> Result<()> {
        let manifest = AppProject::from_params(&params, &self.namespace);
        print!("{}", serde_yaml::to_string(&manifest)?);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let run_result = run().await;

    match run_result {
        Ok(v) => Ok(v),
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}

async fn run() -> Result<()> {
    let (args, config) = cli::run()?;

    let provider = ArgoCdProvider {
        config: config.server.clone(),
    };
    let client = Arc::new(provider.configure_provider(None)?);

    let submit: Arc<dyn Submit> = if args.dry_run {
        Arc::new(PrintManifest {
            namespace: config.namespace.clone(),
        })
    } else {
        let mode = if config.name_readonly {
            SubmitMode::Update
        } else {
            SubmitMode::Create
        };
        Arc::new(ProjectSubmitter {
            client: client.clone(),
            mode,
        })
    };

    let mut form = ProjectForm::mount(
        FormProps::new(submit)
            .name_readonly(config.name_readonly)
            .default_params(config.project),
    );

    let mut updates = reference_updates(client.as_ref());
    while let Some(update) = updates.next().await {
        match &update {
            ReferenceUpdate::Repositories(loaded) => {
                info!(ready = loaded.ready().is_some(), "repositories settled")
            }
            ReferenceUpdate::Clusters(loaded) => {
                info!(ready = loaded.ready().is_some(), "clusters settled")
            }
        }
        form.apply_reference_update(update);
    }

    for edit in config.edits {
        form.apply(edit)?;
    }

    println!("{}", render(&form));

    form.submit_form().await?;
    info!(project = %form.values().name, dry_run = args.dry_run, "done");

    Ok(())
}
