//! Agent and task catalog loader.

use std::path::Path;

use parley_types::catalog::{AgentCatalog, parse_agents, parse_tasks};
use parley_types::config::CatalogConfig;
use parley_types::error::CatalogError;

/// Read both YAML catalogs named in the config.
///
/// Relative paths resolve against `base_dir`.
pub async fn load_catalog(
    config: &CatalogConfig,
    base_dir: &Path,
) -> Result<AgentCatalog, CatalogError> {
    let agents_path = base_dir.join(&config.agents_path);
    let tasks_path = base_dir.join(&config.tasks_path);

    let agents_yaml = read(&agents_path).await?;
    let tasks_yaml = read(&tasks_path).await?;

    let catalog = AgentCatalog::new(
        parse_agents(&agents_yaml, &agents_path.display().to_string())?,
        parse_tasks(&tasks_yaml, &tasks_path.display().to_string())?,
    );

    tracing::info!(
        agents = catalog.agent_names().count(),
        tasks = catalog.task_names().count(),
        "loaded agent catalog"
    );
    Ok(catalog)
}

async fn read(path: &Path) -> Result<String, CatalogError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}
