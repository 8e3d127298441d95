//! Data table component types.
//!
//! View models for the management pages: what the table, its filter bar, the
//! pager and the create/edit modal render. Built from a [`ListController`] so
//! the templates never see entity-specific types.

use crate::entities::Entity;
use crate::listing::{
    FieldKind, FieldSpec, FilterState, FormMode, FormState, ListController, Listable, Page,
    STATUS_ALL, SortKey,
};

/// Column header.
#[derive(Debug, Clone)]
pub struct TableColumn {
    pub label: &'static str,
}

/// Option for the status and sort selects.
#[derive(Debug, Clone)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl FilterOption {
    #[must_use]
    pub fn new(value: &str, label: &str, current: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected: value == current,
        }
    }
}

/// One rendered record.
#[derive(Debug, Clone)]
pub struct TableRow {
    pub id: i64,
    pub cells: Vec<String>,
    pub edit_href: String,
    pub delete_href: String,
}

impl TableRow {
    pub fn of<E: Entity>(view: &E::View) -> Self {
        let id = view.id();
        Self {
            id,
            cells: E::cells(view),
            edit_href: format!("{}/{id}/edit", E::PATH),
            delete_href: format!("{}/{id}/delete", E::PATH),
        }
    }
}

/// Link in the pager.
#[derive(Debug, Clone)]
pub struct PageLink {
    pub label: String,
    pub href: String,
    pub current: bool,
}

/// Pager state for the current page.
#[derive(Debug, Clone)]
pub struct Pager {
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub first_index: usize,
    pub last_index: usize,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub links: Vec<PageLink>,
}

impl Pager {
    fn new<T>(path: &str, filter: &FilterState, page: &Page<'_, T>) -> Self {
        let links = (1..=page.total_pages)
            .map(|n| PageLink {
                label: n.to_string(),
                href: list_href(path, filter, n),
                current: n == page.number,
            })
            .collect();

        Self {
            number: page.number,
            total_pages: page.total_pages,
            total_items: page.total_items,
            first_index: page.first_index(),
            last_index: page.last_index(),
            previous: page
                .has_previous()
                .then(|| list_href(path, filter, page.number - 1)),
            next: page
                .has_next()
                .then(|| list_href(path, filter, page.number + 1)),
            links,
        }
    }
}

/// `path?q=..&status=..&sort=..&page=n`, leaving out default values.
#[must_use]
pub fn list_href(path: &str, filter: &FilterState, page: usize) -> String {
    let mut params = Vec::new();
    if !filter.search().is_empty() {
        params.push(format!("q={}", urlencoding::encode(filter.search())));
    }
    if filter.status() != STATUS_ALL {
        params.push(format!("status={}", urlencoding::encode(filter.status())));
    }
    if filter.sort() != SortKey::default() {
        params.push(format!("sort={}", filter.sort().as_str()));
    }
    if page > 1 {
        params.push(format!("page={page}"));
    }

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", params.join("&"))
    }
}

/// One input of the create/edit modal.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    /// `text`, `email`, `password`, `number`, `date`, `textarea` or `select`.
    pub input: &'static str,
    pub value: String,
    pub required: bool,
    pub disabled: bool,
    pub options: Vec<FilterOption>,
    pub error: Option<String>,
}

impl FormField {
    fn new(spec: &FieldSpec, form: &FormState) -> Self {
        let value = form.draft.get(spec.name);
        let (input, options) = match spec.kind {
            FieldKind::Text => ("text", Vec::new()),
            FieldKind::TextArea => ("textarea", Vec::new()),
            FieldKind::Email => ("email", Vec::new()),
            FieldKind::Password => ("password", Vec::new()),
            FieldKind::Number => ("number", Vec::new()),
            FieldKind::Date => ("date", Vec::new()),
            FieldKind::Select(options) => (
                "select",
                options
                    .iter()
                    .map(|(v, l)| FilterOption::new(v, l, value))
                    .collect(),
            ),
        };

        Self {
            name: spec.name,
            label: spec.label,
            input,
            value: value.to_string(),
            required: spec.is_required(form.mode),
            disabled: !spec.is_editable(form.mode),
            options,
            error: form.errors.get(spec.name).map(ToString::to_string),
        }
    }
}

/// The create/edit modal.
#[derive(Debug, Clone)]
pub struct FormModal {
    pub title: String,
    pub action: String,
    pub submit_label: &'static str,
    pub message: Option<String>,
    pub fields: Vec<FormField>,
    pub is_edit: bool,
}

impl FormModal {
    fn of<E: Entity>(form: &FormState) -> Self {
        let (title, action) = match form.mode {
            FormMode::Create => (format!("New {}", E::NOUN), E::PATH.to_string()),
            FormMode::Edit(id) => (format!("Edit {}", E::NOUN), format!("{}/{id}", E::PATH)),
        };

        Self {
            title,
            action,
            submit_label: if form.mode.is_create() { "Create" } else { "Save" },
            message: form.message.clone(),
            fields: E::FIELDS.iter().map(|f| FormField::new(f, form)).collect(),
            is_edit: !form.mode.is_create(),
        }
    }
}

/// The delete confirmation modal.
#[derive(Debug, Clone)]
pub struct DeleteModal {
    pub action: String,
    /// First cell of the record, usually its name.
    pub subject: String,
    pub message: Option<String>,
}

/// Everything a management page renders.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub title: &'static str,
    pub noun: &'static str,
    pub path: &'static str,
    pub can_create: bool,
    pub new_href: String,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
    pub search: String,
    pub search_placeholder: String,
    pub status_label: &'static str,
    pub status_options: Vec<FilterOption>,
    pub sort_options: Vec<FilterOption>,
    pub pager: Pager,
    pub is_filtering: bool,
    pub error: Option<String>,
    pub retry_href: String,
    pub notice: Option<String>,
    pub form: Option<FormModal>,
    pub delete: Option<DeleteModal>,
}

impl DataTable {
    /// Snapshot of `controller` for rendering.
    pub fn from_controller<E: Entity, B>(controller: &ListController<E, B>) -> Self
    where
        B: crate::api::EntityBackend,
    {
        let filter = controller.filter();
        let page = controller.visible();

        let mut status_options = vec![FilterOption::new(STATUS_ALL, "All", filter.status())];
        status_options.extend(
            E::STATUS_OPTIONS
                .iter()
                .map(|(v, l)| FilterOption::new(v, l, filter.status())),
        );

        let sort_options = SortKey::ALL
            .iter()
            .map(|k| FilterOption::new(k.as_str(), k.label(), filter.sort().as_str()))
            .collect();

        let delete = controller.pending_delete().map(|pending| DeleteModal {
            action: format!("{}/{}/delete", E::PATH, pending.id),
            subject: controller
                .pending_delete_item()
                .and_then(|item| E::cells(item).into_iter().next())
                .unwrap_or_else(|| format!("#{}", pending.id)),
            message: pending.message.clone(),
        });

        Self {
            title: E::TITLE,
            noun: E::NOUN,
            path: E::PATH,
            can_create: E::CAN_CREATE,
            new_href: format!("{}/new", E::PATH),
            columns: E::COLUMNS
                .iter()
                .map(|label| TableColumn { label })
                .collect(),
            rows: page.items.iter().map(|v| TableRow::of::<E>(v)).collect(),
            search: filter.search().to_string(),
            search_placeholder: format!("Search {}...", E::TITLE.to_lowercase()),
            status_label: E::STATUS_LABEL,
            status_options,
            sort_options,
            pager: Pager::new(E::PATH, filter, &page),
            is_filtering: filter.is_filtering(),
            error: controller.error().map(ToString::to_string),
            retry_href: list_href(E::PATH, filter, filter.page()),
            notice: controller.notice().map(ToString::to_string),
            form: controller.form().map(FormModal::of::<E>),
            delete,
        }
    }

    /// Text for an empty table.
    #[must_use]
    pub fn empty_title(&self) -> String {
        if self.is_filtering {
            format!("No {} match your filters", self.title.to_lowercase())
        } else {
            format!("No {} yet", self.title.to_lowercase())
        }
    }
}
