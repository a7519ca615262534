mod config;
mod error;
mod manager;
mod migrations;
pub(crate) mod models;
mod observability;
pub(crate) mod repositories;
mod types;

pub(crate) use config::{RepositoryManagerConfig, RepositoryManagerConfigRaw};
pub(crate) use error::RepositoryError;
pub(crate) use manager::RepositoryManager;
#[cfg(test)]
pub(crate) use migrations::Migrator;
pub(crate) use types::{EligibleItemInput, RoundRecord, TaskRecord};
