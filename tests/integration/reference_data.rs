use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use projedit::argocd_provider::{ArgoCdClient, ArgoCdProvider, ServerConfig, DEFAULT_TIMEOUT};
use projedit::form::{FormError, FormProps, ProjectForm, SectionKind};
use projedit::loader::{reference_updates, Loadable, ReferenceUpdate};
use projedit::models::ProjectParams;
use projedit::provider::ReferenceSource;

use crate::mocks::argocd::{get_mock, status_mock, TOKEN};

fn client(mock_server: &MockServer) -> ArgoCdClient {
    client_with_timeout(mock_server, DEFAULT_TIMEOUT)
}

fn client_with_timeout(mock_server: &MockServer, timeout: Duration) -> ArgoCdClient {
    let provider = ArgoCdProvider {
        config: ServerConfig {
            base_url: "https://unused.example.com".to_string(),
            token: Some(TOKEN.to_string()),
            timeout,
        },
    };

    provider.configure_provider(Some(mock_server.uri())).unwrap()
}

fn form() -> ProjectForm {
    let submit = |_: ProjectParams| -> anyhow::Result<()> { Ok(()) };
    ProjectForm::mount(FormProps::new(Arc::new(submit)))
}

#[tokio::test]
async fn lists_repositories_and_clusters() {
    let mock_server = MockServer::start().await;

    get_mock(
        "repositories",
        json!({
            "metadata": {},
            "items": [
                { "repo": "https://github.com/team/app.git", "type": "git" },
                { "repo": "https://charts.example.com", "type": "helm" },
            ],
        }),
    )
    .mount(&mock_server)
    .await;

    get_mock(
        "clusters",
        json!({
            "metadata": {},
            "items": [
                { "server": "https://kubernetes.default.svc", "name": "in-cluster" },
            ],
        }),
    )
    .mount(&mock_server)
    .await;

    let client = client(&mock_server);
    let mut form = form();
    form.load_reference_data(&client).await;

    assert_eq!(
        form.repositories(),
        &Loadable::Ready(vec![
            "https://github.com/team/app.git".to_string(),
            "https://charts.example.com".to_string(),
            "*".to_string(),
        ])
    );
    assert_eq!(
        form.clusters(),
        &Loadable::Ready(vec![
            "https://kubernetes.default.svc".to_string(),
            "*".to_string()
        ])
    );

    form.add_source_repo().unwrap();
    form.add_destination().unwrap();
    assert_eq!(
        form.values().source_repos,
        vec!["https://github.com/team/app.git".to_string()]
    );
    assert_eq!(
        form.values().destinations[0].server,
        "https://kubernetes.default.svc"
    );

    mock_server.verify().await;
}

#[tokio::test]
async fn null_items_leave_only_the_wildcard() {
    let mock_server = MockServer::start().await;

    get_mock("repositories", json!({ "metadata": {}, "items": null }))
        .mount(&mock_server)
        .await;
    get_mock("clusters", json!({ "metadata": {} }))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert!(client.list_repositories().await.unwrap().is_empty());
    assert!(client.list_clusters().await.unwrap().is_empty());

    mock_server.reset().await;
    get_mock("repositories", json!({ "items": null }))
        .mount(&mock_server)
        .await;
    get_mock("clusters", json!({ "items": null }))
        .mount(&mock_server)
        .await;

    let mut form = form();
    form.load_reference_data(&client).await;
    form.add_source_repo().unwrap();
    form.add_destination().unwrap();

    assert_eq!(form.values().source_repos, vec!["*".to_string()]);
    assert_eq!(form.values().destinations[0].server, "*");
    assert_eq!(form.values().destinations[0].namespace, "default");
}

#[tokio::test]
async fn failed_cluster_load_leaves_sources_usable() {
    let mock_server = MockServer::start().await;

    get_mock("repositories", json!({ "items": [{ "repo": "repoA" }] }))
        .mount(&mock_server)
        .await;
    status_mock("GET", "clusters", 403).mount(&mock_server).await;

    let client = client(&mock_server);
    let mut form = form();
    form.load_reference_data(&client).await;

    match form.clusters() {
        Loadable::Failed(message) => assert!(message.contains("403"), "{}", message),
        other => panic!("expected failed cluster load, got {:?}", other),
    }

    form.add_source_repo().unwrap();
    assert_eq!(form.values().source_repos, vec!["repoA".to_string()]);
    assert!(matches!(
        form.add_destination(),
        Err(FormError::SectionUnavailable(SectionKind::Destinations))
    ));

    mock_server.verify().await;
}

#[tokio::test]
async fn slow_cluster_load_does_not_hold_back_repositories() {
    let mock_server = MockServer::start().await;

    get_mock("repositories", json!({ "items": [{ "repo": "repoA" }] }))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut form = form();
    let mut updates = reference_updates(&client);

    let first = updates.next().await.unwrap();
    assert_eq!(
        first,
        ReferenceUpdate::Repositories(Loadable::Ready(vec![
            "repoA".to_string(),
            "*".to_string()
        ]))
    );

    form.apply_reference_update(first);
    assert!(form.clusters().is_pending());
    form.add_source_repo().unwrap();
    assert!(matches!(
        form.add_destination(),
        Err(FormError::SectionLoading(SectionKind::Destinations))
    ));

    let second = updates.next().await.unwrap();
    form.apply_reference_update(second);
    form.add_destination().unwrap();
    assert_eq!(form.values().destinations[0].server, "*");
}

#[tokio::test]
async fn unanswered_cluster_load_times_out() {
    let mock_server = MockServer::start().await;

    get_mock("repositories", json!({ "items": [{ "repo": "repoA" }] }))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/clusters"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "items": [] }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&mock_server)
        .await;

    let client = client_with_timeout(&mock_server, Duration::from_millis(300));
    let mut form = form();
    form.load_reference_data(&client).await;

    assert_eq!(
        form.repositories(),
        &Loadable::Ready(vec!["repoA".to_string(), "*".to_string()])
    );
    assert!(matches!(form.clusters(), Loadable::Failed(_)));
    form.add_source_repo().unwrap();
}
