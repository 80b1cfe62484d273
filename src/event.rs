use serde::Deserialize;

/// A single interaction with the project form. The CLI reads a list of
/// these from its config and applies them in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    SetName { value: String },
    SetDescription { value: String },

    AddSourceRepo,
    SetSourceRepo { index: usize, value: String },
    RemoveSourceRepo { index: usize },

    AddDestination,
    SetDestinationServer { index: usize, value: String },
    SetDestinationNamespace { index: usize, value: String },
    RemoveDestination { index: usize },

    AddClusterResource,
    SetClusterResourceGroup { index: usize, value: String },
    SetClusterResourceKind { index: usize, value: String },
    RemoveClusterResource { index: usize },

    AddNamespaceResource,
    SetNamespaceResourceGroup { index: usize, value: String },
    SetNamespaceResourceKind { index: usize, value: String },
    RemoveNamespaceResource { index: usize },
}
