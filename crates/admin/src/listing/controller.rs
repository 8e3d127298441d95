//! Generic entity list controller.
//!
//! One controller drives one page view of one [`Entity`]:
//!
//! ```text
//! Loading ──ok──▶ Ready ──submit──▶ Submitting ──▶ Ready (refetched)
//!    │              │ ▲                  │
//!    └──err──▶ Error│ └─ filter changes  └─ backend error: form stays open
//!               │   │    (no network)
//!               └───┴── retry ──▶ Loading
//! ```
//!
//! Each fetch takes a [`FetchTicket`]. Only the newest ticket's result is
//! applied, and a closed controller ignores every late result.

use serde_json::Value;
use tracing::{debug, warn};

use super::filter::{FilterState, Listable, Page, SortKey, paginate};
use super::validation::{FormDraft, FormMode, ValidationErrors, build_payload};
use crate::api::{ApiError, EntityBackend, normalize};
use crate::entities::Entity;

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    /// Fetch failed; the message is shown with a retry link.
    Error(String),
    Submitting,
}

/// Generation number of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Create/edit modal state.
#[derive(Debug, Clone)]
pub struct FormState {
    pub mode: FormMode,
    pub draft: FormDraft,
    pub errors: ValidationErrors,
    /// Backend error shown at the top of the modal.
    pub message: Option<String>,
}

/// Delete confirmation modal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: i64,
    pub message: Option<String>,
}

pub struct ListController<E: Entity, B> {
    backend: B,
    raw: Vec<Value>,
    items: Vec<E::View>,
    loaded: bool,
    filter: FilterState,
    phase: Phase,
    form: Option<FormState>,
    pending_delete: Option<PendingDelete>,
    notice: Option<String>,
    session_expired: bool,
    issued: u64,
    closed: bool,
}

impl<E: Entity, B: EntityBackend> ListController<E, B> {
    /// A controller that has not fetched yet.
    #[must_use]
    pub const fn new(backend: B, filter: FilterState) -> Self {
        Self {
            backend,
            raw: Vec::new(),
            items: Vec::new(),
            loaded: false,
            filter,
            phase: Phase::Loading,
            form: None,
            pending_delete: None,
            notice: None,
            session_expired: false,
            issued: 0,
            closed: false,
        }
    }

    // =========================================================================
    // Fetching
    // =========================================================================

    /// Start a fetch and return its ticket; any older ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.phase = Phase::Loading;
        FetchTicket(self.issued)
    }

    /// Apply the result of the fetch holding `ticket`.
    ///
    /// Returns `false` when the result was dropped because a newer fetch
    /// started or the controller was closed.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Value, ApiError>) -> bool {
        if self.closed || ticket.0 != self.issued {
            debug!(
                resource = E::RESOURCE,
                ticket = ticket.0,
                newest = self.issued,
                closed = self.closed,
                "Dropping stale collection response"
            );
            return false;
        }

        match result.and_then(normalize::collection) {
            Ok(raw) => {
                let items = raw
                    .iter()
                    .filter_map(|record| match serde_json::from_value::<E::Wire>(record.clone()) {
                        Ok(wire) => {
                            let view = E::transform(wire);
                            if view.is_none() {
                                warn!(resource = E::RESOURCE, "Skipping record without an id");
                            }
                            view
                        }
                        Err(e) => {
                            warn!(resource = E::RESOURCE, error = %e, "Skipping unreadable record");
                            None
                        }
                    })
                    .collect();

                if self.loaded {
                    self.filter.reset_page();
                }
                self.raw = raw;
                self.items = items;
                self.loaded = true;
                self.phase = Phase::Ready;
            }
            Err(error) => {
                if matches!(error, ApiError::UnexpectedShape(_)) {
                    warn!(resource = E::RESOURCE, error = %error, "Unexpected collection shape");
                }
                self.fail(&error);
                self.raw.clear();
                self.items.clear();
                self.phase = Phase::Error(error.user_message());
            }
        }
        true
    }

    /// Fetch the collection from the backend.
    pub async fn load(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.backend.fetch_collection(E::RESOURCE).await;
        self.complete_fetch(ticket, result);
    }

    /// Fetch again after an error.
    pub async fn retry(&mut self) {
        self.load().await;
    }

    /// Stop applying results; the page view is gone.
    pub const fn close(&mut self) {
        self.closed = true;
    }

    fn fail(&mut self, error: &ApiError) {
        if error.is_unauthorized() {
            self.session_expired = true;
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn set_search(&mut self, term: &str) {
        self.filter.set_search(term);
    }

    pub fn set_status(&mut self, status: &str) {
        self.filter.set_status(status);
    }

    pub const fn set_sort(&mut self, sort: SortKey) {
        self.filter.set_sort(sort);
    }

    pub fn set_page(&mut self, page: usize) {
        self.filter.set_page(page);
    }

    /// The current page of filtered, sorted records.
    #[must_use]
    pub fn visible(&self) -> Page<'_, E::View> {
        paginate(self.filter.apply(&self.items), self.filter.page())
    }

    // =========================================================================
    // Create / update
    // =========================================================================

    /// Open the create or edit modal.
    ///
    /// Returns `false` when creating is not allowed for this entity or the
    /// record to edit is not in the loaded collection.
    pub fn open_form(&mut self, mode: FormMode) -> bool {
        let draft = match mode {
            FormMode::Create if E::CAN_CREATE => FormDraft::new(),
            FormMode::Create => return false,
            FormMode::Edit(id) => match self.find(id) {
                Some(view) => E::draft_from(view),
                None => return false,
            },
        };

        self.pending_delete = None;
        self.form = Some(FormState {
            mode,
            draft,
            errors: ValidationErrors::new(),
            message: None,
        });
        true
    }

    /// Close the modal and discard the draft.
    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validate and send `draft` for the open form, then refetch.
    ///
    /// Returns `true` on success. On failure the form stays open with the
    /// draft and the field errors or backend message.
    pub async fn submit(&mut self, draft: FormDraft) -> bool {
        let Some(open) = self.form.take() else {
            return false;
        };
        let mode = open.mode;
        // Disabled inputs are not posted; show their original values again.
        let mut shown = draft.redacted(E::FIELDS);
        for field in E::FIELDS.iter().filter(|f| !f.is_editable(mode)) {
            shown.set(field.name, open.draft.get(field.name));
        }

        let checked = build_payload(E::FIELDS, &draft, mode).and_then(|payload| {
            let mut errors = ValidationErrors::new();
            E::cross_check(&draft, &mut errors);
            if errors.is_empty() { Ok(payload) } else { Err(errors) }
        });

        let payload = match checked {
            Ok(payload) => payload,
            Err(errors) => {
                debug!(resource = E::RESOURCE, invalid = errors.len(), "Form rejected");
                self.form = Some(FormState {
                    mode,
                    draft: shown,
                    errors,
                    message: None,
                });
                return false;
            }
        };

        self.phase = Phase::Submitting;
        let result = match mode {
            FormMode::Create => self.backend.create(E::RESOURCE, &payload).await,
            FormMode::Edit(id) => self.backend.update(E::RESOURCE, id, &payload).await,
        };

        match result {
            Ok(()) => {
                self.notice = Some(match mode {
                    FormMode::Create => format!("{} created.", E::NOUN),
                    FormMode::Edit(_) => format!("{} updated.", E::NOUN),
                });
                self.load().await;
                true
            }
            Err(error) => {
                self.fail(&error);
                self.phase = Phase::Ready;
                self.form = Some(FormState {
                    mode,
                    draft: shown,
                    errors: ValidationErrors::new(),
                    message: Some(error.user_message()),
                });
                false
            }
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: i64) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.form = None;
        self.pending_delete = Some(PendingDelete { id, message: None });
        true
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the record awaiting confirmation, then refetch.
    pub async fn confirm_delete(&mut self) -> bool {
        let Some(id) = self.pending_delete.as_ref().map(|p| p.id) else {
            return false;
        };

        self.phase = Phase::Submitting;
        match self.backend.delete(E::RESOURCE, id).await {
            Ok(()) => {
                self.pending_delete = None;
                self.notice = Some(format!("{} deleted.", E::NOUN));
                self.load().await;
                true
            }
            Err(error) => {
                self.fail(&error);
                self.phase = Phase::Ready;
                self.pending_delete = Some(PendingDelete {
                    id,
                    message: Some(error.user_message()),
                });
                false
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    fn find(&self, id: i64) -> Option<&E::View> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Every transformed record, unfiltered.
    #[must_use]
    pub fn items(&self) -> &[E::View] {
        &self.items
    }

    /// Records as the backend sent them.
    #[must_use]
    pub fn raw(&self) -> &[Value] {
        &self.raw
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub const fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    #[must_use]
    pub const fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    /// The record awaiting delete confirmation.
    #[must_use]
    pub fn pending_delete_item(&self) -> Option<&E::View> {
        self.pending_delete.as_ref().and_then(|p| self.find(p.id))
    }

    /// Success message from the last mutation.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Whether the backend rejected the session token.
    #[must_use]
    pub const fn session_expired(&self) -> bool {
        self.session_expired
    }
}
