//! Permission checks with the same glob semantics the API server applies to
//! a project's source and destination allow-lists.

use crate::models::ApplicationDestination;

fn matches(pattern: &str, value: &str) -> bool {
    if pattern == value {
        return true;
    }

    match glob::Pattern::new(pattern) {
        Ok(pattern) => pattern.matches(value),
        Err(_) => false,
    }
}

pub fn permits_source(source_repos: &[String], repo: &str) -> bool {
    source_repos.iter().any(|pattern| matches(pattern, repo))
}

pub fn permits_destination(
    destinations: &[ApplicationDestination],
    server: &str,
    namespace: &str,
) -> bool {
    destinations.iter().any(|destination| {
        matches(&destination.server, server) && matches(&destination.namespace, namespace)
    })
}
