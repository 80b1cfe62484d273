pub mod argocd_provider;
pub mod cli;
pub mod event;
pub mod fixtures;
pub mod form;
pub mod loader;
pub mod models;
pub mod policy;
pub mod provider;
pub mod render;
pub mod rows;
