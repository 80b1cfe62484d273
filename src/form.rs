use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::event::Edit;
use crate::loader::{reference_updates, Loadable, ReferenceUpdate};
use crate::models::{ApplicationDestination, GroupKind, ProjectParams, DEFAULT_NAMESPACE, WILDCARD};
use crate::policy;
use crate::provider::{ReferenceSource, Submit};
use crate::rows;

pub const NAME_REQUIRED: &str = "Project name is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Sources,
    Destinations,
    ClusterResourceWhitelist,
    NamespaceResourceBlacklist,
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionKind::Sources => "sources",
            SectionKind::Destinations => "destinations",
            SectionKind::ClusterResourceWhitelist => "cluster resource whitelist",
            SectionKind::NamespaceResourceBlacklist => "namespace resource blacklist",
        };
        f.write_str(name)
    }
}

/// The two group/kind sections share their row shape and operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceList {
    ClusterWhitelist,
    NamespaceBlacklist,
}

impl From<ResourceList> for SectionKind {
    fn from(list: ResourceList) -> Self {
        match list {
            ResourceList::ClusterWhitelist => SectionKind::ClusterResourceWhitelist,
            ResourceList::NamespaceBlacklist => SectionKind::NamespaceResourceBlacklist,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Unsubmitted,
    Validating,
    Submitted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub name: Option<&'static str>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(message) => write!(f, "name: {}", message),
            None => f.write_str("no errors"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error("project name is read-only")]
    NameReadonly,
    #[error("{0} are still loading")]
    SectionLoading(SectionKind),
    #[error("{0} failed to load")]
    SectionUnavailable(SectionKind),
    #[error("no row {index} in {section} ({len} rows)")]
    IndexOutOfRange {
        section: SectionKind,
        index: usize,
        len: usize,
    },
    #[error("form has already been submitted")]
    AlreadySubmitted,
    #[error("invalid project: {0}")]
    Invalid(ValidationErrors),
    #[error(transparent)]
    Submit(anyhow::Error),
}

/// What a section backed by reference data can show right now.
#[derive(Debug, PartialEq)]
pub enum Section<'a, T> {
    Loading,
    Unavailable(&'a str),
    Ready { options: &'a [String], rows: &'a [T] },
}

type GetApi = Box<dyn FnOnce(&mut ProjectForm) + Send>;

pub struct FormProps {
    pub name_readonly: bool,
    pub default_params: Option<ProjectParams>,
    pub submit: Arc<dyn Submit>,
    pub get_api: Option<GetApi>,
}

impl FormProps {
    pub fn new(submit: Arc<dyn Submit>) -> Self {
        FormProps {
            name_readonly: false,
            default_params: None,
            submit,
            get_api: None,
        }
    }

    pub fn name_readonly(mut self, name_readonly: bool) -> Self {
        self.name_readonly = name_readonly;
        self
    }

    pub fn default_params(mut self, params: ProjectParams) -> Self {
        self.default_params = Some(params);
        self
    }

    pub fn get_api(mut self, get_api: impl FnOnce(&mut ProjectForm) + Send + 'static) -> Self {
        self.get_api = Some(Box::new(get_api));
        self
    }
}

/// Editable state of a project: the record itself, the two reference lists
/// that back the repository and cluster selectors, and the inline
/// validation result.
pub struct ProjectForm {
    name_readonly: bool,
    values: ProjectParams,
    repositories: Loadable<Vec<String>>,
    clusters: Loadable<Vec<String>>,
    errors: ValidationErrors,
    status: FormStatus,
    submit: Arc<dyn Submit>,
}

impl ProjectForm {
    pub fn mount(props: FormProps) -> ProjectForm {
        let FormProps {
            name_readonly,
            default_params,
            submit,
            get_api,
        } = props;

        let mut form = ProjectForm {
            name_readonly,
            values: default_params.unwrap_or_default(),
            repositories: Loadable::Pending,
            clusters: Loadable::Pending,
            errors: ValidationErrors::default(),
            status: FormStatus::Unsubmitted,
            submit,
        };
        debug!(name = %form.values.name, name_readonly, "mounted project form");

        if let Some(get_api) = get_api {
            get_api(&mut form);
        }

        form
    }

    pub fn values(&self) -> &ProjectParams {
        &self.values
    }

    pub fn name_readonly(&self) -> bool {
        self.name_readonly
    }

    pub fn status(&self) -> FormStatus {
        self.status
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn repositories(&self) -> &Loadable<Vec<String>> {
        &self.repositories
    }

    pub fn clusters(&self) -> &Loadable<Vec<String>> {
        &self.clusters
    }

    pub fn apply_reference_update(&mut self, update: ReferenceUpdate) {
        match update {
            ReferenceUpdate::Repositories(repositories) => self.repositories = repositories,
            ReferenceUpdate::Clusters(clusters) => self.clusters = clusters,
        }
    }

    /// Runs both reference loads and applies each result as it arrives.
    pub async fn load_reference_data(&mut self, source: &dyn ReferenceSource) {
        let mut updates = reference_updates(source);
        while let Some(update) = updates.next().await {
            self.apply_reference_update(update);
        }
    }

    pub fn sources_section(&self) -> Section<'_, String> {
        section(&self.repositories, &self.values.source_repos)
    }

    pub fn destinations_section(&self) -> Section<'_, ApplicationDestination> {
        section(&self.clusters, &self.values.destinations)
    }

    pub fn resource_rows(&self, list: ResourceList) -> &[GroupKind] {
        match list {
            ResourceList::ClusterWhitelist => &self.values.cluster_resource_whitelist,
            ResourceList::NamespaceBlacklist => &self.values.namespace_resource_blacklist,
        }
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        if self.name_readonly {
            return Err(FormError::NameReadonly);
        }
        self.values.name = name.to_string();
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.values.description = description.to_string();
        Ok(())
    }

    pub fn add_source_repo(&mut self) -> Result<(), FormError> {
        self.ensure_editable()?;
        let first = first_option(&self.repositories, SectionKind::Sources)?;
        self.values.source_repos = rows::append(&self.values.source_repos, first);
        Ok(())
    }

    /// Free-form: a source entry is a glob pattern and need not be one of
    /// the loaded repositories.
    pub fn set_source_repo(&mut self, index: usize, repo: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        let row = row_mut(&mut self.values.source_repos, SectionKind::Sources, index)?;
        *row = repo.to_string();
        Ok(())
    }

    pub fn remove_source_repo(&mut self, index: usize) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.values.source_repos =
            remove_row(&self.values.source_repos, SectionKind::Sources, index)?;
        Ok(())
    }

    pub fn add_destination(&mut self) -> Result<(), FormError> {
        self.ensure_editable()?;
        let server = first_option(&self.clusters, SectionKind::Destinations)?;
        self.values.destinations = rows::append(
            &self.values.destinations,
            ApplicationDestination {
                server,
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
        );
        Ok(())
    }

    /// Free-form, like [`ProjectForm::set_source_repo`].
    pub fn set_destination_server(&mut self, index: usize, server: &str) -> Result<(), FormError> {
        self.ensure_editable()?;
        let row = row_mut(&mut self.values.destinations, SectionKind::Destinations, index)?;
        row.server = server.to_string();
        Ok(())
    }

    pub fn set_destination_namespace(
        &mut self,
        index: usize,
        namespace: &str,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        let row = row_mut(&mut self.values.destinations, SectionKind::Destinations, index)?;
        row.namespace = namespace.to_string();
        Ok(())
    }

    pub fn remove_destination(&mut self, index: usize) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.values.destinations =
            remove_row(&self.values.destinations, SectionKind::Destinations, index)?;
        Ok(())
    }

    pub fn add_resource(&mut self, list: ResourceList) -> Result<(), FormError> {
        self.ensure_editable()?;
        let appended = rows::append(self.resource_rows(list), GroupKind::default());
        *self.resources_mut(list) = appended;
        Ok(())
    }

    pub fn set_resource_group(
        &mut self,
        list: ResourceList,
        index: usize,
        group: &str,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        let row = row_mut(self.resources_mut(list), list.into(), index)?;
        row.group = group.to_string();
        Ok(())
    }

    pub fn set_resource_kind(
        &mut self,
        list: ResourceList,
        index: usize,
        kind: &str,
    ) -> Result<(), FormError> {
        self.ensure_editable()?;
        let row = row_mut(self.resources_mut(list), list.into(), index)?;
        row.kind = kind.to_string();
        Ok(())
    }

    pub fn remove_resource(&mut self, list: ResourceList, index: usize) -> Result<(), FormError> {
        self.ensure_editable()?;
        let remaining = remove_row(self.resource_rows(list), list.into(), index)?;
        *self.resources_mut(list) = remaining;
        Ok(())
    }

    pub fn apply(&mut self, edit: Edit) -> Result<(), FormError> {
        use ResourceList::*;

        match edit {
            Edit::SetName { value } => self.set_name(&value),
            Edit::SetDescription { value } => self.set_description(&value),
            Edit::AddSourceRepo => self.add_source_repo(),
            Edit::SetSourceRepo { index, value } => self.set_source_repo(index, &value),
            Edit::RemoveSourceRepo { index } => self.remove_source_repo(index),
            Edit::AddDestination => self.add_destination(),
            Edit::SetDestinationServer { index, value } => {
                self.set_destination_server(index, &value)
            }
            Edit::SetDestinationNamespace { index, value } => {
                self.set_destination_namespace(index, &value)
            }
            Edit::RemoveDestination { index } => self.remove_destination(index),
            Edit::AddClusterResource => self.add_resource(ClusterWhitelist),
            Edit::SetClusterResourceGroup { index, value } => {
                self.set_resource_group(ClusterWhitelist, index, &value)
            }
            Edit::SetClusterResourceKind { index, value } => {
                self.set_resource_kind(ClusterWhitelist, index, &value)
            }
            Edit::RemoveClusterResource { index } => self.remove_resource(ClusterWhitelist, index),
            Edit::AddNamespaceResource => self.add_resource(NamespaceBlacklist),
            Edit::SetNamespaceResourceGroup { index, value } => {
                self.set_resource_group(NamespaceBlacklist, index, &value)
            }
            Edit::SetNamespaceResourceKind { index, value } => {
                self.set_resource_kind(NamespaceBlacklist, index, &value)
            }
            Edit::RemoveNamespaceResource { index } => {
                self.remove_resource(NamespaceBlacklist, index)
            }
        }
    }

    /// Re-evaluates the inline errors against the current values.
    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = validate(&self.values);
        &self.errors
    }

    /// Validates, normalizes and hands the record to the submit
    /// collaborator exactly once.
    pub async fn submit_form(&mut self) -> Result<(), FormError> {
        self.ensure_editable()?;
        self.status = FormStatus::Validating;

        if !self.validate().is_empty() {
            warn!(errors = %self.errors, "project form rejected");
            self.status = FormStatus::Unsubmitted;
            return Err(FormError::Invalid(self.errors.clone()));
        }

        let params = pre_submit(self.values.clone());
        let name = params.name.clone();
        match self.submit.submit(params).await {
            Ok(()) => {
                info!(project = %name, "project submitted");
                self.status = FormStatus::Submitted;
                Ok(())
            }
            Err(e) => {
                self.status = FormStatus::Unsubmitted;
                Err(FormError::Submit(e))
            }
        }
    }

    pub fn permits_source(&self, repo: &str) -> bool {
        policy::permits_source(&self.values.source_repos, repo)
    }

    pub fn permits_destination(&self, server: &str, namespace: &str) -> bool {
        policy::permits_destination(&self.values.destinations, server, namespace)
    }

    /// Loaded repositories that no source pattern of the record covers.
    pub fn unpermitted_repositories(&self) -> Vec<&str> {
        self.repositories
            .ready()
            .map(|repos| {
                repos
                    .iter()
                    .filter(|repo| repo.as_str() != WILDCARD && !self.permits_source(repo))
                    .map(String::as_str)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn ensure_editable(&self) -> Result<(), FormError> {
        match self.status {
            FormStatus::Submitted => Err(FormError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    fn resources_mut(&mut self, list: ResourceList) -> &mut Vec<GroupKind> {
        match list {
            ResourceList::ClusterWhitelist => &mut self.values.cluster_resource_whitelist,
            ResourceList::NamespaceBlacklist => &mut self.values.namespace_resource_blacklist,
        }
    }
}

pub fn validate(params: &ProjectParams) -> ValidationErrors {
    ValidationErrors {
        name: params.name.is_empty().then(|| NAME_REQUIRED),
    }
}

/// Trims the whitelist entries. The blacklist is passed through as entered.
pub fn pre_submit(mut params: ProjectParams) -> ProjectParams {
    params.cluster_resource_whitelist = params
        .cluster_resource_whitelist
        .iter()
        .map(GroupKind::trimmed)
        .collect();
    params
}

fn section<'a, T>(options: &'a Loadable<Vec<String>>, rows: &'a [T]) -> Section<'a, T> {
    match options {
        Loadable::Pending => Section::Loading,
        Loadable::Failed(message) => Section::Unavailable(message),
        Loadable::Ready(options) => Section::Ready { options, rows },
    }
}

fn first_option(options: &Loadable<Vec<String>>, section: SectionKind) -> Result<String, FormError> {
    match options {
        Loadable::Pending => Err(FormError::SectionLoading(section)),
        Loadable::Failed(_) => Err(FormError::SectionUnavailable(section)),
        Loadable::Ready(options) => options
            .first()
            .cloned()
            .ok_or(FormError::SectionUnavailable(section)),
    }
}

fn row_mut<T>(items: &mut [T], section: SectionKind, index: usize) -> Result<&mut T, FormError> {
    let len = items.len();
    items.get_mut(index).ok_or(FormError::IndexOutOfRange {
        section,
        index,
        len,
    })
}

fn remove_row<T: Clone>(items: &[T], section: SectionKind, index: usize) -> Result<Vec<T>, FormError> {
    rows::remove_at(items, index).ok_or(FormError::IndexOutOfRange {
        section,
        index,
        len: items.len(),
    })
}
