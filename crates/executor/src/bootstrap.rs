//! Process bootstrap: configuration → registry → store → controller.

use std::path::Path;
use std::sync::Arc;

use docvault_core::{Config, Result};
use docvault_storage::{Connector, DocumentStore};
use tracing::info;

use crate::DocumentController;

/// Build a controller from a configuration document.
///
/// Opens the `main` storage through `connector`. Any failure here is a
/// startup failure: the caller should not serve requests.
pub fn open(config: &Config, connector: &dyn Connector) -> Result<DocumentController> {
    let registry = Arc::new(config.registry()?);
    let storage = config.main_storage()?;
    let store = DocumentStore::open(storage, Arc::clone(&registry), connector)?;

    info!(
        target: "docvault::bootstrap",
        entity_types = registry.len(),
        database = store.database_name(),
        "document store ready"
    );
    Ok(DocumentController::new(Arc::new(store), registry))
}

/// Read `config.json`-style configuration from `path` and [`open`] it.
pub fn open_path(path: &Path, connector: &dyn Connector) -> Result<DocumentController> {
    let config = Config::from_file(path)?;
    open(&config, connector)
}
