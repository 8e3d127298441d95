//! Job applications. Created by job seekers; the dashboard only reviews them.

use chrono::{DateTime, Utc};
use jatim_bissa_core::{ApplicationId, ApplicationStatus};
use serde::Deserialize;
use serde_json::Value;

use super::Entity;
use super::wire::{self, or_placeholder};
use crate::listing::{FieldSpec, FormDraft, Listable};

const APPLICATION_STATUS: &[(&str, &str)] = &[
    (ApplicationStatus::Pending.as_str(), ApplicationStatus::Pending.label()),
    (ApplicationStatus::Reviewed.as_str(), ApplicationStatus::Reviewed.label()),
    (ApplicationStatus::Accepted.as_str(), ApplicationStatus::Accepted.label()),
    (ApplicationStatus::Rejected.as_str(), ApplicationStatus::Rejected.label()),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationWire {
    #[serde(deserialize_with = "wire::id")]
    id: Option<i64>,
    /// Nested applicant, under `user` or `job_seeker`.
    #[serde(alias = "job_seeker")]
    user: Option<Value>,
    /// Nested vacancy; its `company` may be nested too.
    job: Option<Value>,
    #[serde(deserialize_with = "wire::text")]
    applicant_name: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    applicant_email: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    job_title: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    company_name: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    status: Option<String>,
    #[serde(deserialize_with = "wire::timestamp", alias = "applied_at")]
    created_at: Option<DateTime<Utc>>,
}

/// String at `path` inside nested objects, if present and non-blank.
fn nested_text(value: Option<&Value>, path: &[&str]) -> Option<String> {
    let mut current = value?;
    for key in path {
        current = current.get(key)?;
    }
    match current {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_owned()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub applicant: String,
    pub email: String,
    pub job_title: String,
    pub company: String,
    pub status: Option<ApplicationStatus>,
    pub applied_at: Option<DateTime<Utc>>,
}

impl Listable for ApplicationView {
    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.applicant.as_str(),
            self.email.as_str(),
            self.job_title.as_str(),
            self.company.as_str(),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.map(ApplicationStatus::as_str)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.applied_at
    }

    fn sort_name(&self) -> &str {
        &self.applicant
    }

    fn sort_company(&self) -> &str {
        &self.company
    }
}

/// `/management-application`
pub struct Applications;

impl Entity for Applications {
    type Wire = ApplicationWire;
    type View = ApplicationView;

    const RESOURCE: &'static str = "applications";
    const PATH: &'static str = "/management-application";
    const TITLE: &'static str = "Applications";
    const NOUN: &'static str = "Application";
    const CAN_CREATE: bool = false;
    const STATUS_OPTIONS: &'static [(&'static str, &'static str)] = APPLICATION_STATUS;
    const COLUMNS: &'static [&'static str] =
        &["Applicant", "Email", "Job", "Company", "Status", "Applied"];
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::select("status", "Status", APPLICATION_STATUS).required()];

    fn transform(wire: ApplicationWire) -> Option<ApplicationView> {
        let id = ApplicationId::new(wire.id?);
        let user = wire.user.as_ref();
        let job = wire.job.as_ref();

        let applicant = nested_text(user, &["name"])
            .or_else(|| nested_text(user, &["full_name"]))
            .or(wire.applicant_name);
        let email = nested_text(user, &["email"]).or(wire.applicant_email);
        let job_title = nested_text(job, &["title"]).or(wire.job_title);
        let company = nested_text(job, &["company", "name"])
            .or_else(|| nested_text(job, &["company_name"]))
            .or(wire.company_name);

        Some(ApplicationView {
            id,
            applicant: or_placeholder(applicant),
            email: or_placeholder(email),
            job_title: or_placeholder(job_title),
            company: or_placeholder(company),
            status: wire.status.as_deref().and_then(ApplicationStatus::parse),
            applied_at: wire.created_at,
        })
    }

    fn cells(view: &ApplicationView) -> Vec<String> {
        vec![
            view.applicant.clone(),
            view.email.clone(),
            view.job_title.clone(),
            view.company.clone(),
            view.status
                .map_or(wire::PLACEHOLDER, ApplicationStatus::label)
                .to_string(),
            wire::display_date(view.applied_at),
        ]
    }

    fn draft_from(view: &ApplicationView) -> FormDraft {
        FormDraft::new().with("status", view.status.map_or("", ApplicationStatus::as_str))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::listing::{FormMode, build_payload};

    #[test]
    fn test_transform_nested_fixture() {
        let wire: ApplicationWire = serde_json::from_value(json!({
            "id": 9001,
            "user": {"id": 77, "name": "Andi Wijaya", "email": "andi@mail.com"},
            "job": {"id": 301, "title": "Operator Data Entry", "company": {"name": "PT Sinar Inklusi"}},
            "status": "reviewed",
            "applied_at": "2025-05-10 09:15:00"
        }))
        .unwrap();

        assert_eq!(
            Applications::transform(wire).unwrap(),
            ApplicationView {
                id: ApplicationId::new(9001),
                applicant: "Andi Wijaya".into(),
                email: "andi@mail.com".into(),
                job_title: "Operator Data Entry".into(),
                company: "PT Sinar Inklusi".into(),
                status: Some(ApplicationStatus::Reviewed),
                applied_at: wire::parse_timestamp("2025-05-10 09:15:00"),
            }
        );
    }

    #[test]
    fn test_transform_flat_fixture() {
        let wire: ApplicationWire = serde_json::from_value(json!({
            "id": "12",
            "applicant_name": "Rina",
            "job_title": "Kasir",
            "company_name": "Toko Makmur",
            "status": "pending"
        }))
        .unwrap();
        let view = Applications::transform(wire).unwrap();
        assert_eq!(view.applicant, "Rina");
        assert_eq!(view.email, "-");
        assert_eq!(view.company, "Toko Makmur");
        assert_eq!(view.sort_company(), "Toko Makmur");
    }

    #[test]
    fn test_status_is_the_only_editable_field() {
        let draft = FormDraft::new()
            .with("status", "ACCEPTED")
            .with("applicant", "ignored");
        let payload = build_payload(Applications::FIELDS, &draft, FormMode::Edit(12)).unwrap();
        assert_eq!(payload, json!({"status": "accepted"}));
    }
}
