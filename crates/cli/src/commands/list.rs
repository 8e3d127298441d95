//! Run the list controller against the configured backend.
//!
//! # Usage
//!
//! ```bash
//! jb-cli list companies --token "$TOKEN" --search surabaya --status active --page 2
//! ```
//!
//! # Environment Variables
//!
//! - `API_BASE_URL` - REST backend base URL
//! - `API_TIMEOUT_SECS` - Per-request timeout (default 15)

use jatim_bissa_admin::api::{ApiClient, ApiError, EntityBackend};
use jatim_bissa_admin::config::{ConfigError, DashboardConfig};
use jatim_bissa_admin::entities::{Admins, Applications, Companies, Entity, JobSeekers, Jobs};
use jatim_bissa_admin::listing::{FilterState, ListController, ListQuery, Listable};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while listing.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend client error: {0}")]
    Client(#[from] ApiError),

    /// The collection could not be loaded; carries the user-facing message.
    #[error("Failed to load {resource}: {message}")]
    Load {
        resource: &'static str,
        message: String,
    },
}

/// Which entity to list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    Admins,
    Companies,
    #[value(alias = "job-seekers")]
    Users,
    Jobs,
    Applications,
}

/// List `kind` with the given filter and print the page.
///
/// # Errors
///
/// Returns `ListError` if configuration is missing or the backend fails.
pub async fn run(kind: EntityKind, token: String, query: &ListQuery) -> Result<(), ListError> {
    let config = DashboardConfig::from_env()?;
    let backend = ApiClient::new(&config.api)?.with_token(SecretString::from(token));
    let filter = FilterState::from_query(query);

    let lines = match kind {
        EntityKind::Admins => page_lines::<Admins, _>(backend, filter).await?,
        EntityKind::Companies => page_lines::<Companies, _>(backend, filter).await?,
        EntityKind::Users => page_lines::<JobSeekers, _>(backend, filter).await?,
        EntityKind::Jobs => page_lines::<Jobs, _>(backend, filter).await?,
        EntityKind::Applications => page_lines::<Applications, _>(backend, filter).await?,
    };

    print_lines(&lines);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Header, one tab-separated line per record, and a page footer.
async fn page_lines<E: Entity, B: EntityBackend>(
    backend: B,
    filter: FilterState,
) -> Result<Vec<String>, ListError> {
    let mut controller = ListController::<E, B>::new(backend, filter);
    controller.load().await;
    if let Some(message) = controller.error() {
        return Err(ListError::Load {
            resource: E::RESOURCE,
            message: message.to_string(),
        });
    }

    let page = controller.visible();
    let mut lines = Vec::with_capacity(page.items.len() + 2);
    lines.push(format!("ID\t{}", E::COLUMNS.join("\t")));
    for item in &page.items {
        lines.push(format!("{}\t{}", item.id(), E::cells(item).join("\t")));
    }
    lines.push(format!(
        "-- page {}/{} ({} {})",
        page.number,
        page.total_pages,
        page.total_items,
        E::TITLE.to_lowercase()
    ));
    Ok(lines)
}
