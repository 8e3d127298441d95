//! Entity list pages: filtering, pagination, form validation and the
//! controller tying them to the backend.

mod controller;
mod filter;
mod validation;

pub use controller::{FetchTicket, FormState, ListController, PendingDelete, Phase};
pub use filter::{
    FilterState, ListQuery, Listable, PAGE_SIZE, Page, STATUS_ALL, SortKey, paginate, total_pages,
};
pub use validation::{
    FieldKind, FieldSpec, FormDraft, FormMode, MIN_PASSWORD_LEN, Required, ValidationErrors,
    build_payload,
};
