//! Managed entities.
//!
//! Each entity names its backend resource and dashboard page, maps the wire
//! record to a view model, and declares its table columns and form schema.
//! The list controller and the management routes are generic over
//! [`Entity`], so adding a page means adding one module here.
//!
//! | Entity | Resource | Page |
//! |---|---|---|
//! | [`Admins`] | `admins` | `/management-admin` |
//! | [`Companies`] | `companies` | `/management-company` |
//! | [`JobSeekers`] | `users` | `/management-user` |
//! | [`Jobs`] | `jobs` | `/management-job` |
//! | [`Applications`] | `applications` | `/management-application` |

use std::fmt::Debug;

use serde::de::DeserializeOwned;

use crate::listing::{FieldSpec, FormDraft, Listable, ValidationErrors};

pub mod admins;
pub mod applications;
pub mod companies;
pub mod job_seekers;
pub mod jobs;
pub mod wire;

pub use admins::{AdminView, Admins};
pub use applications::{ApplicationView, Applications};
pub use companies::{Companies, CompanyView};
pub use job_seekers::{JobSeekerView, JobSeekers};
pub use jobs::{JobView, Jobs};

/// A record type managed from its own dashboard page.
pub trait Entity: Send + Sync + 'static {
    /// Record as the backend sends it.
    type Wire: DeserializeOwned;
    /// Record as the dashboard shows it.
    type View: Listable + Clone + Debug + Send + Sync;

    /// Backend resource, appended to the API base URL.
    const RESOURCE: &'static str;
    /// Dashboard page path.
    const PATH: &'static str;
    /// Page heading, plural.
    const TITLE: &'static str;
    /// Singular noun used in buttons and notices.
    const NOUN: &'static str;
    /// Whether records can be created from the dashboard.
    const CAN_CREATE: bool = true;
    /// Label of the status filter.
    const STATUS_LABEL: &'static str = "Status";
    /// Values the status filter offers, `(value, label)`.
    const STATUS_OPTIONS: &'static [(&'static str, &'static str)];
    /// Table headers, matching [`Entity::cells`].
    const COLUMNS: &'static [&'static str];
    /// Create/edit form schema.
    const FIELDS: &'static [FieldSpec];

    /// Wire record to view model. Missing data degrades to placeholders;
    /// only a record without a readable id yields `None`.
    fn transform(wire: Self::Wire) -> Option<Self::View>;

    /// Table cells for one row.
    fn cells(view: &Self::View) -> Vec<String>;

    /// Form values for editing `view`.
    fn draft_from(view: &Self::View) -> FormDraft;

    /// Checks spanning more than one field, run after the per-field schema.
    fn cross_check(_draft: &FormDraft, _errors: &mut ValidationErrors) {}
}
