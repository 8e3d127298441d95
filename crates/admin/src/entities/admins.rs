//! Dashboard administrators. Only superadmins reach this page.

use chrono::{DateTime, Utc};
use jatim_bissa_core::{AdminId, Role};
use serde::Deserialize;

use super::Entity;
use super::wire::{self, editable, or_placeholder};
use crate::listing::{FieldSpec, FormDraft, Listable};

const ROLE_OPTIONS: &[(&str, &str)] = &[
    (Role::SuperAdmin.as_str(), "Super Admin"),
    (Role::Admin.as_str(), "Admin"),
];

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AdminWire {
    #[serde(deserialize_with = "wire::id")]
    id: Option<i64>,
    #[serde(deserialize_with = "wire::text")]
    name: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    email: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    role: Option<String>,
    #[serde(deserialize_with = "wire::timestamp")]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminView {
    pub id: AdminId,
    pub name: String,
    pub email: String,
    pub role: Option<Role>,
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminView {
    #[must_use]
    pub fn role_label(&self) -> &'static str {
        match self.role {
            Some(Role::SuperAdmin) => "Super Admin",
            Some(Role::Admin) => "Admin",
            Some(Role::User) => "User",
            None => wire::PLACEHOLDER,
        }
    }
}

impl Listable for AdminView {
    fn id(&self) -> i64 {
        self.id.as_i64()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.email.as_str()]
    }

    fn status(&self) -> Option<&str> {
        self.role.map(Role::as_str)
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// `/management-admin`
pub struct Admins;

impl Entity for Admins {
    type Wire = AdminWire;
    type View = AdminView;

    const RESOURCE: &'static str = "admins";
    const PATH: &'static str = "/management-admin";
    const TITLE: &'static str = "Admins";
    const NOUN: &'static str = "Admin";
    const STATUS_LABEL: &'static str = "Role";
    const STATUS_OPTIONS: &'static [(&'static str, &'static str)] = ROLE_OPTIONS;
    const COLUMNS: &'static [&'static str] = &["Name", "Email", "Role", "Created"];
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Name").required(),
        FieldSpec::email("email", "Email").required().immutable(),
        FieldSpec::password("password", "Password").required_on_create(),
        FieldSpec::select("role", "Role", ROLE_OPTIONS).required(),
    ];

    fn transform(wire: AdminWire) -> Option<AdminView> {
        let id = AdminId::new(wire.id?);
        Some(AdminView {
            id,
            name: or_placeholder(wire.name),
            email: or_placeholder(wire.email),
            role: wire.role.and_then(|r| r.parse().ok()),
            created_at: wire.created_at,
        })
    }

    fn cells(view: &AdminView) -> Vec<String> {
        vec![
            view.name.clone(),
            view.email.clone(),
            view.role_label().to_string(),
            wire::display_date(view.created_at),
        ]
    }

    fn draft_from(view: &AdminView) -> FormDraft {
        FormDraft::new()
            .with("name", editable(&view.name))
            .with("email", editable(&view.email))
            .with("role", view.role.map_or("", Role::as_str))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::listing::{FormMode, build_payload};

    #[test]
    fn test_transform_fixture() {
        let wire: AdminWire = serde_json::from_value(json!({
            "id": "3",
            "name": "Siti Rahayu",
            "email": "siti@jatimbissa.id",
            "role": "super_admin",
            "created_at": "2025-01-05 10:00:00"
        }))
        .unwrap();

        let view = Admins::transform(wire).unwrap();
        assert_eq!(view.id, AdminId::new(3));
        assert_eq!(view.name, "Siti Rahayu");
        assert_eq!(view.role, Some(Role::SuperAdmin));
        assert_eq!(view.status(), Some("superadmin"));
        assert_eq!(
            Admins::cells(&view),
            vec!["Siti Rahayu", "siti@jatimbissa.id", "Super Admin", "05 Jan 2025"]
        );
    }

    #[test]
    fn test_missing_fields_degrade_to_placeholder() {
        let wire: AdminWire = serde_json::from_value(json!({"id": 4})).unwrap();
        let view = Admins::transform(wire).unwrap();
        assert_eq!(view.id, AdminId::new(4));
        assert_eq!(view.name, "-");
        assert_eq!(view.role_label(), "-");
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        assert!(Admins::transform(AdminWire::default()).is_none());

        let wire: AdminWire =
            serde_json::from_value(json!({"id": "abc", "name": "Siti"})).unwrap();
        assert!(Admins::transform(wire).is_none());
    }

    #[test]
    fn test_update_keeps_email_out_of_payload() {
        let draft = FormDraft::new()
            .with("name", "Siti")
            .with("email", "changed@jatimbissa.id")
            .with("role", "admin");
        let payload = build_payload(Admins::FIELDS, &draft, FormMode::Edit(3)).unwrap();
        assert_eq!(payload, json!({"name": "Siti", "role": "admin"}));
    }

    #[test]
    fn test_role_must_be_an_admin_role() {
        let draft = FormDraft::new()
            .with("name", "Siti")
            .with("email", "siti@jatimbissa.id")
            .with("password", "rahasia123")
            .with("role", "user");
        let errors = build_payload(Admins::FIELDS, &draft, FormMode::Create).unwrap_err();
        assert!(errors.get("role").is_some());
    }
}
