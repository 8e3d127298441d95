//! Job vacancies posted by companies.

use chrono::{DateTime, Utc};
use jatim_bissa_core::{CompanyId, JobId, JobStatus};
use serde::Deserialize;
use serde_json::Value;

use super::Entity;
use super::wire::{self, Region, editable, or_placeholder, region_name, rupiah};
use crate::listing::{FieldSpec, FormDraft, Listable, ValidationErrors};

const JOB_STATUS: &[(&str, &str)] = &[
    (JobStatus::Open.as_str(), JobStatus::Open.label()),
    (JobStatus::Closed.as_str(), JobStatus::Closed.label()),
    (JobStatus::Draft.as_str(), JobStatus::Draft.label()),
];

/// `company` is either a nested object or just a name.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CompanyRef {
    #[serde(deserialize_with = "wire::id")]
    id: Option<i64>,
    #[serde(deserialize_with = "wire::text")]
    name: Option<String>,
}

fn company_ref<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Option<CompanyRef>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(name)) => Some(CompanyRef {
            id: None,
            name: Some(name),
        }),
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JobWire {
    #[serde(deserialize_with = "wire::id")]
    id: Option<i64>,
    #[serde(deserialize_with = "wire::text", alias = "name")]
    title: Option<String>,
    #[serde(deserialize_with = "wire::id")]
    company_id: Option<i64>,
    #[serde(deserialize_with = "company_ref")]
    company: Option<CompanyRef>,
    #[serde(deserialize_with = "wire::text")]
    company_name: Option<String>,
    #[serde(deserialize_with = "wire::text", alias = "type")]
    job_type: Option<String>,
    #[serde(deserialize_with = "wire::amount")]
    salary_min: Option<i64>,
    #[serde(deserialize_with = "wire::amount")]
    salary_max: Option<i64>,
    #[serde(deserialize_with = "wire::timestamp")]
    deadline: Option<DateTime<Utc>>,
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
pub struct JobView {
    pub id: JobId,
    pub title: String,
    pub company_id: Option<CompanyId>,
    pub company: String,
    pub job_type: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub province: String,
    pub regency: String,
    pub status: Option<JobStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

impl JobView {
    /// `Rp 5.000.000 - Rp 8.000.000`, one bound, or the placeholder.
    #[must_use]
    pub fn salary_range(&self) -> String {
        match (self.salary_min, self.salary_max) {
            (Some(min), Some(max)) if min == max => rupiah(min),
            (Some(min), Some(max)) => format!("{} - {}", rupiah(min), rupiah(max)),
            (Some(min), None) => format!("from {}", rupiah(min)),
            (None, Some(max)) => format!("up to {}", rupiah(max)),
            (None, None) => wire::PLACEHOLDER.to_string(),
        }
    }
}

impl Listable for JobView {
    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.company.as_str(),
            self.province.as_str(),
            self.regency.as_str(),
            self.job_type.as_str(),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.map(JobStatus::as_str)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn sort_name(&self) -> &str {
        &self.title
    }

    fn sort_company(&self) -> &str {
        &self.company
    }
}

/// `/management-job`
pub struct Jobs;

impl Entity for Jobs {
    type Wire = JobWire;
    type View = JobView;

    const RESOURCE: &'static str = "jobs";
    const PATH: &'static str = "/management-job";
    const TITLE: &'static str = "Job Vacancies";
    const NOUN: &'static str = "Job";
    const STATUS_OPTIONS: &'static [(&'static str, &'static str)] = JOB_STATUS;
    const COLUMNS: &'static [&'static str] = &[
        "Title", "Company", "Type", "Salary", "Location", "Deadline", "Status",
    ];
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("title", "Title").required(),
        FieldSpec::number("company_id", "Company ID").required(),
        FieldSpec::text("job_type", "Job type").required(),
        FieldSpec::number("salary_min", "Minimum salary"),
        FieldSpec::number("salary_max", "Maximum salary"),
        FieldSpec::date("deadline", "Deadline"),
        FieldSpec::select("status", "Status", JOB_STATUS).required(),
    ];

    fn transform(wire: JobWire) -> Option<JobView> {
        let id = JobId::new(wire.id?);
        let company_id = wire
            .company_id
            .or_else(|| wire.company.as_ref().and_then(|c| c.id));
        let company = wire
            .company
            .and_then(|c| c.name)
            .or(wire.company_name);

        Some(JobView {
            id,
            title: or_placeholder(wire.title),
            company_id: company_id.map(CompanyId::new),
            company: or_placeholder(company),
            job_type: or_placeholder(wire.job_type),
            salary_min: wire.salary_min,
            salary_max: wire.salary_max,
            deadline: wire.deadline,
            province: region_name(wire.province.as_ref()),
            regency: region_name(wire.regency.as_ref()),
            status: wire.status.as_deref().and_then(JobStatus::parse),
            created_at: wire.created_at,
        })
    }

    fn cells(view: &JobView) -> Vec<String> {
        vec![
            view.title.clone(),
            view.company.clone(),
            view.job_type.clone(),
            view.salary_range(),
            format!("{}, {}", view.regency, view.province),
            wire::display_date(view.deadline),
            view.status
                .map_or(wire::PLACEHOLDER, JobStatus::label)
                .to_string(),
        ]
    }

    fn draft_from(view: &JobView) -> FormDraft {
        let number = |n: Option<i64>| n.map(|n| n.to_string()).unwrap_or_default();
        FormDraft::new()
            .with("title", editable(&view.title))
            .with(
                "company_id",
                view.company_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .with("job_type", editable(&view.job_type))
            .with("salary_min", number(view.salary_min))
            .with("salary_max", number(view.salary_max))
            .with(
                "deadline",
                view.deadline
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            )
            .with("status", view.status.map_or("", JobStatus::as_str))
    }

    fn cross_check(draft: &FormDraft, errors: &mut ValidationErrors) {
        let min = draft.get("salary_min").trim().parse::<u64>().ok();
        let max = draft.get("salary_max").trim().parse::<u64>().ok();
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                errors.add(
                    "salary_max",
                    "Maximum salary must not be lower than the minimum",
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fixture() -> JobView {
        let wire: JobWire = serde_json::from_value(json!({
            "id": 301,
            "title": "Operator Data Entry",
            "company": {"id": "12", "name": "PT Sinar Inklusi"},
            "job_type": "Full-time",
            "salary_min": "4500000.00",
            "salary_max": 6000000,
            "deadline": "2025-06-30",
            "province": {"name": "Jawa Timur"},
            "regency": {"name": "Kota Surabaya"},
            "status": "open",
            "created_at": "2025-05-01T00:00:00+07:00"
        }))
        .unwrap();
        Jobs::transform(wire).unwrap()
    }

    #[test]
    fn test_transform_fixture() {
        let view = fixture();
        assert_eq!(view.id, JobId::new(301));
        assert_eq!(view.company_id, Some(CompanyId::new(12)));
        assert_eq!(view.company, "PT Sinar Inklusi");
        assert_eq!(view.status, Some(JobStatus::Open));
        assert_eq!(
            Jobs::cells(&view),
            vec![
                "Operator Data Entry",
                "PT Sinar Inklusi",
                "Full-time",
                "Rp 4.500.000 - Rp 6.000.000",
                "Kota Surabaya, Jawa Timur",
                "30 Jun 2025",
                "Open"
            ]
        );
    }

    #[test]
    fn test_company_as_plain_name() {
        let wire: JobWire =
            serde_json::from_value(json!({"id": 1, "title": "Kasir", "company": "Toko Makmur"}))
                .unwrap();
        let view = Jobs::transform(wire).unwrap();
        assert_eq!(view.company, "Toko Makmur");
        assert!(view.company_id.is_none());
        assert_eq!(view.salary_range(), "-");
    }

    #[test]
    fn test_edit_draft_round_trips_form_values() {
        let draft = Jobs::draft_from(&fixture());
        assert_eq!(draft.get("company_id"), "12");
        assert_eq!(draft.get("salary_min"), "4500000");
        assert_eq!(draft.get("deadline"), "2025-06-30");
    }

    #[test]
    fn test_salary_bounds_cross_check() {
        let draft = FormDraft::new()
            .with("salary_min", "8000000")
            .with("salary_max", "5000000");
        let mut errors = ValidationErrors::new();
        Jobs::cross_check(&draft, &mut errors);
        assert!(errors.get("salary_max").is_some());
    }
}
