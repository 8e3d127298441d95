//! Employer companies registered on the platform.

use chrono::{DateTime, Utc};
use jatim_bissa_core::{CompanyId, CompanyStatus, ProvinceId, RegencyId};
use serde::Deserialize;

use super::Entity;
use super::wire::{self, Region, editable, or_placeholder, region_name};
use crate::listing::{FieldSpec, FormDraft, Listable};

const COMPANY_STATUS: &[(&str, &str)] = &[
    (CompanyStatus::Active.as_str(), CompanyStatus::Active.label()),
    (CompanyStatus::Pending.as_str(), CompanyStatus::Pending.label()),
    (CompanyStatus::Inactive.as_str(), CompanyStatus::Inactive.label()),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompanyWire {
    #[serde(deserialize_with = "wire::id")]
    id: Option<i64>,
    #[serde(deserialize_with = "wire::text", alias = "company_name")]
    name: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    email: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    phone: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    address: Option<String>,
    #[serde(deserialize_with = "wire::id")]
    province_id: Option<i64>,
    #[serde(deserialize_with = "wire::id")]
    regency_id: Option<i64>,
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
pub struct CompanyView {
    pub id: CompanyId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub province_id: Option<ProvinceId>,
    pub regency_id: Option<RegencyId>,
    pub province: String,
    pub regency: String,
    pub status: Option<CompanyStatus>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Listable for CompanyView {
    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.email.as_str(),
            self.province.as_str(),
            self.regency.as_str(),
        ]
    }

    fn status(&self) -> Option<&str> {
        self.status.map(CompanyStatus::as_str)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// `/management-company`
pub struct Companies;

impl Entity for Companies {
    type Wire = CompanyWire;
    type View = CompanyView;

    const RESOURCE: &'static str = "companies";
    const PATH: &'static str = "/management-company";
    const TITLE: &'static str = "Companies";
    const NOUN: &'static str = "Company";
    const STATUS_OPTIONS: &'static [(&'static str, &'static str)] = COMPANY_STATUS;
    const COLUMNS: &'static [&'static str] =
        &["Company", "Email", "Phone", "Location", "Status", "Registered"];
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Company name").required(),
        FieldSpec::email("email", "Email").required(),
        FieldSpec::text("phone", "Phone"),
        FieldSpec::text_area("address", "Address"),
        FieldSpec::number("province_id", "Province ID"),
        FieldSpec::number("regency_id", "Regency ID"),
        FieldSpec::select("status", "Status", COMPANY_STATUS).required(),
        FieldSpec::password("password", "Password").required_on_create(),
    ];

    fn transform(wire: CompanyWire) -> Option<CompanyView> {
        let id = CompanyId::new(wire.id?);
        let province_id = wire
            .province_id
            .or_else(|| wire.province.as_ref().and_then(|r| r.id));
        let regency_id = wire
            .regency_id
            .or_else(|| wire.regency.as_ref().and_then(|r| r.id));

        Some(CompanyView {
            id,
            name: or_placeholder(wire.name),
            email: or_placeholder(wire.email),
            phone: or_placeholder(wire.phone),
            address: or_placeholder(wire.address),
            province_id: province_id.map(ProvinceId::new),
            regency_id: regency_id.map(RegencyId::new),
            province: region_name(wire.province.as_ref()),
            regency: region_name(wire.regency.as_ref()),
            status: wire.status.as_deref().and_then(CompanyStatus::parse),
            created_at: wire.created_at,
        })
    }

    fn cells(view: &CompanyView) -> Vec<String> {
        vec![
            view.name.clone(),
            view.email.clone(),
            view.phone.clone(),
            format!("{}, {}", view.regency, view.province),
            view.status
                .map_or(wire::PLACEHOLDER, CompanyStatus::label)
                .to_string(),
            wire::display_date(view.created_at),
        ]
    }

    fn draft_from(view: &CompanyView) -> FormDraft {
        FormDraft::new()
            .with("name", editable(&view.name))
            .with("email", editable(&view.email))
            .with("phone", editable(&view.phone))
            .with("address", editable(&view.address))
            .with(
                "province_id",
                view.province_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .with(
                "regency_id",
                view.regency_id.map(|id| id.to_string()).unwrap_or_default(),
            )
            .with("status", view.status.map_or("", CompanyStatus::as_str))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_transform_fixture() {
        let wire: CompanyWire = serde_json::from_value(json!({
            "id": 12,
            "name": "PT Sinar Inklusi",
            "email": "hr@sinar.co.id",
            "phone": "031-555-0101",
            "address": "Jl. Darmo 10",
            "province": {"id": 35, "name": "Jawa Timur"},
            "regency": {"id": "3578", "name": "Kota Surabaya"},
            "status": "Pending",
            "created_at": "2025-02-01T09:00:00Z"
        }))
        .unwrap();

        let view = Companies::transform(wire).unwrap();
        assert_eq!(
            view,
            CompanyView {
                id: CompanyId::new(12),
                name: "PT Sinar Inklusi".into(),
                email: "hr@sinar.co.id".into(),
                phone: "031-555-0101".into(),
                address: "Jl. Darmo 10".into(),
                province_id: Some(ProvinceId::new(35)),
                regency_id: Some(RegencyId::new(3578)),
                province: "Jawa Timur".into(),
                regency: "Kota Surabaya".into(),
                status: Some(CompanyStatus::Pending),
                created_at: wire::parse_timestamp("2025-02-01T09:00:00Z"),
            }
        );
        assert_eq!(
            Companies::cells(&view)[3],
            "Kota Surabaya, Jawa Timur"
        );
    }

    #[test]
    fn test_missing_regions_degrade_to_placeholder() {
        let wire: CompanyWire =
            serde_json::from_value(json!({"id": 1, "name": "CV Maju", "province": null})).unwrap();
        let view = Companies::transform(wire).unwrap();
        assert_eq!(view.province, "-");
        assert_eq!(view.regency, "-");
        assert!(view.province_id.is_none());
        assert!(view.status.is_none());
    }

    #[test]
    fn test_search_covers_regions() {
        let wire: CompanyWire = serde_json::from_value(json!({
            "id": 2, "name": "CV Maju", "regency": "Kabupaten Malang"
        }))
        .unwrap();
        let view = Companies::transform(wire).unwrap();
        assert!(view.matches_search("malang"));
        assert!(!view.matches_search("surabaya"));
        assert_eq!(view.province, "-");
        assert!(!view.matches_search("-"), "placeholders are not searchable");
    }

    #[test]
    fn test_edit_draft_skips_placeholders() {
        let wire: CompanyWire =
            serde_json::from_value(json!({"id": 5, "name": "CV Maju", "status": "active"}))
                .unwrap();
        let draft = Companies::draft_from(&Companies::transform(wire).unwrap());
        assert_eq!(draft.get("name"), "CV Maju");
        assert_eq!(draft.get("phone"), "");
        assert_eq!(draft.get("status"), "active");
    }
}
