//! Job seekers (the backend's `users` resource).

use chrono::{DateTime, Utc};
use jatim_bissa_core::{AccountStatus, JobSeekerId};
use serde::Deserialize;

use super::Entity;
use super::wire::{self, Region, editable, or_placeholder, region_name};
use crate::listing::{FieldSpec, FormDraft, Listable};

const ACCOUNT_STATUS: &[(&str, &str)] = &[
    (AccountStatus::Active.as_str(), AccountStatus::Active.label()),
    (AccountStatus::Inactive.as_str(), AccountStatus::Inactive.label()),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobSeekerWire {
    #[serde(deserialize_with = "wire::id")]
    id: Option<i64>,
    #[serde(deserialize_with = "wire::text", alias = "full_name")]
    name: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    email: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    phone: Option<String>,
    #[serde(deserialize_with = "wire::text", alias = "disability_type")]
    disability: Option<String>,
    #[serde(deserialize_with = "wire::region")]
    province: Option<Region>,
    #[serde(deserialize_with = "wire::region")]
    regency: Option<Region>,
    #[serde(deserialize_with = "wire::text")]
    status: Option<String>,
    #[serde(deserialize_with = "wire::timestamp")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSeekerView {
    pub id: JobSeekerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub disability: String,
    pub province: String,
    pub regency: String,
    pub status: Option<AccountStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Listable for JobSeekerView {
    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.disability.as_str(),
            self.province.as_str(),
            self.regency.as_str(),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.map(AccountStatus::as_str)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// `/management-user`
pub struct JobSeekers;

impl Entity for JobSeekers {
    type Wire = JobSeekerWire;
    type View = JobSeekerView;

    const RESOURCE: &'static str = "users";
    const PATH: &'static str = "/management-user";
    const TITLE: &'static str = "Job Seekers";
    const NOUN: &'static str = "Job seeker";
    const STATUS_OPTIONS: &'static [(&'static str, &'static str)] = ACCOUNT_STATUS;
    const COLUMNS: &'static [&'static str] =
        &["Name", "Email", "Disability", "Location", "Status", "Joined"];
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Full name").required(),
        FieldSpec::email("email", "Email").required(),
        FieldSpec::text("phone", "Phone"),
        FieldSpec::text("disability", "Disability"),
        FieldSpec::select("status", "Status", ACCOUNT_STATUS).required(),
        FieldSpec::password("password", "Password").required_on_create(),
    ];

    fn transform(wire: JobSeekerWire) -> Option<JobSeekerView> {
        let id = JobSeekerId::new(wire.id?);
        Some(JobSeekerView {
            id,
            name: or_placeholder(wire.name),
            email: or_placeholder(wire.email),
            phone: or_placeholder(wire.phone),
            disability: or_placeholder(wire.disability),
            province: region_name(wire.province.as_ref()),
            regency: region_name(wire.regency.as_ref()),
            status: wire.status.as_deref().and_then(AccountStatus::parse),
            created_at: wire.created_at,
        })
    }

    fn cells(view: &JobSeekerView) -> Vec<String> {
        vec![
            view.name.clone(),
            view.email.clone(),
            view.disability.clone(),
            format!("{}, {}", view.regency, view.province),
            view.status
                .map_or(wire::PLACEHOLDER, AccountStatus::label)
                .to_string(),
            wire::display_date(view.created_at),
        ]
    }

    fn draft_from(view: &JobSeekerView) -> FormDraft {
        FormDraft::new()
            .with("name", editable(&view.name))
            .with("email", editable(&view.email))
            .with("phone", editable(&view.phone))
            .with("disability", editable(&view.disability))
            .with("status", view.status.map_or("", AccountStatus::as_str))
    }
}
