use std::fmt::Write;

use crate::form::{ProjectForm, ResourceList, Section};
use crate::models::GroupKind;

const INDENT: &str = "  ";

/// Plain-text view of the form: one block per section, indexed rows, the
/// add control of each section and any inline validation message.
pub fn render(form: &ProjectForm) -> String {
    let mut out = String::new();
    let values = form.values();

    let _ = writeln!(out, "Summary:");
    let readonly = if form.name_readonly() { " (read-only)" } else { "" };
    let _ = writeln!(out, "{}Project Name: {}{}", INDENT, values.name, readonly);
    if let Some(message) = form.errors().name {
        let _ = writeln!(out, "{}{}! {}", INDENT, INDENT, message);
    }
    let _ = writeln!(out, "{}Project Description: {}", INDENT, values.description);

    let _ = writeln!(out);
    let _ = writeln!(out, "Sources");
    let _ = writeln!(
        out,
        "{}Git repositories where application manifests are permitted to be retrieved from",
        INDENT
    );
    match form.sources_section() {
        Section::Ready { options, rows } => {
            let _ = writeln!(out, "{}options: {}", INDENT, options.join(", "));
            for (i, repo) in rows.iter().enumerate() {
                let _ = writeln!(out, "{}[{}] {}", INDENT, i, repo);
            }
            let _ = writeln!(out, "{}+ add source", INDENT);

            let unpermitted = form.unpermitted_repositories();
            if !unpermitted.is_empty() {
                let _ = writeln!(
                    out,
                    "{}{} known repositories not permitted",
                    INDENT,
                    unpermitted.len()
                );
            }
        }
        other => write_unready(&mut out, &other),
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Destinations");
    let _ = writeln!(
        out,
        "{}Cluster URLs and namespaces where applications are permitted to be deployed to",
        INDENT
    );
    match form.destinations_section() {
        Section::Ready { options, rows } => {
            let _ = writeln!(out, "{}options: {}", INDENT, options.join(", "));
            let _ = writeln!(out, "{}CLUSTER URL | NAMESPACE", INDENT);
            for (i, destination) in rows.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{}[{}] {} | {}",
                    INDENT, i, destination.server, destination.namespace
                );
            }
            let _ = writeln!(out, "{}+ add destination", INDENT);
        }
        other => write_unready(&mut out, &other),
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Whitelisted Cluster Resources");
    let _ = writeln!(
        out,
        "{}Cluster-scoped K8s API Groups and Kinds which are permitted to be deployed",
        INDENT
    );
    write_group_kinds(&mut out, form.resource_rows(ResourceList::ClusterWhitelist));
    let _ = writeln!(out, "{}+ whitelist new cluster resource", INDENT);

    let _ = writeln!(out);
    let _ = writeln!(out, "Blacklisted Namespaced Resources");
    let _ = writeln!(
        out,
        "{}Namespace-scoped K8s API Groups and Kinds which are prohibited from being deployed",
        INDENT
    );
    write_group_kinds(&mut out, form.resource_rows(ResourceList::NamespaceBlacklist));
    let _ = writeln!(out, "{}+ blacklist new namespaced resource", INDENT);

    out
}

fn write_unready<T>(out: &mut String, section: &Section<'_, T>) {
    match section {
        Section::Loading => {
            let _ = writeln!(out, "{}Loading...", INDENT);
        }
        Section::Unavailable(message) => {
            let _ = writeln!(out, "{}Failed to load: {}", INDENT, message);
        }
        Section::Ready { .. } => {}
    }
}

fn write_group_kinds(out: &mut String, rows: &[GroupKind]) {
    let _ = writeln!(out, "{}GROUP | KIND", INDENT);
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{}[{}] {} | {}", INDENT, i, row.group, row.kind);
    }
}
