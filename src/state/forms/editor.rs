//! Editor state machine for submission forms
//!
//! The editor owns a draft, the current [`ErrorSet`] and the `validated`
//! flag. All changes go through [`EditorState::reduce`]:
//!
//! - `Set` / `Blur` apply an edit, recompute the live errors and drop back
//!   to `Editing`.
//! - `Validate` runs the full rules; an empty result moves to `Validated`.
//! - `Error` overlays externally sourced errors and drops back to `Editing`.
//!
//! Submission is keyed off the rising edge of `validated`, which
//! [`Editor::validate`] reports.

use std::fmt;

use tracing::debug;
use uuid::Uuid;

use super::errors::{ErrorSet, FormKind};
use super::validator::{char_len, Validate};

/// A form draft driven by an [`Editor`]
pub trait FormDraft: Validate + Clone + Default + fmt::Debug {
    /// Tagged edit applied by the reducer
    type Edit: Clone + fmt::Debug;

    const KIND: FormKind;

    /// Apply one edit, producing the next draft
    fn reduce(self, edit: Self::Edit) -> Self;

    /// Trim surrounding whitespace from a field, as done on blur
    fn trim(self, field: Self::Field) -> Self;

    /// Current text of a single-valued field
    fn text(&self, field: Self::Field) -> Option<&str>;

    /// Upper bound shown next to a field
    fn max_length(schema: &Self::Schema, field: Self::Field) -> Option<usize>;
}

/// Observable phase of an editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Editing,
    Validated,
}

/// Input to the editor reducer
#[derive(Debug, Clone)]
pub enum EditorAction<D: FormDraft> {
    Set(D::Edit),
    Blur(D::Field),
    Validate,
    Error(ErrorSet<D::Field>),
}

/// Draft plus its validation bookkeeping
#[derive(Debug, Clone)]
pub struct EditorState<D: FormDraft> {
    pub value: D,
    pub error: ErrorSet<D::Field>,
    pub validated: bool,
}

impl<D: FormDraft> EditorState<D> {
    pub fn new(value: D) -> Self {
        Self {
            value,
            error: ErrorSet::new(),
            validated: false,
        }
    }

    /// Compute the next state for `action`
    pub fn reduce(self, action: EditorAction<D>, schema: &D::Schema) -> Self {
        match action {
            EditorAction::Set(edit) => Self::edited(self.value.reduce(edit), schema),
            EditorAction::Blur(field) => Self::edited(self.value.trim(field), schema),
            EditorAction::Validate => {
                let error = self.value.full_errors(schema);
                let validated = error.is_empty();
                Self {
                    value: self.value,
                    error,
                    validated,
                }
            }
            EditorAction::Error(errors) => {
                let mut error = self.error;
                error.merge(errors);
                Self {
                    value: self.value,
                    error,
                    validated: false,
                }
            }
        }
    }

    fn edited(value: D, schema: &D::Schema) -> Self {
        let error = value.live_errors(schema);
        Self {
            value,
            error,
            validated: false,
        }
    }

    pub fn phase(&self) -> EditorPhase {
        if self.validated {
            EditorPhase::Validated
        } else {
            EditorPhase::Editing
        }
    }
}

/// Identifies the editor session an async result was requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorTicket(Uuid);

/// Holds one form's state for the lifetime of a single authoring session
#[derive(Debug)]
pub struct Editor<D: FormDraft> {
    state: EditorState<D>,
    schema: D::Schema,
    session: Uuid,
}

impl<D: FormDraft> Editor<D> {
    pub fn new(initial: D, schema: D::Schema) -> Self {
        Self {
            state: EditorState::new(initial),
            schema,
            session: Uuid::new_v4(),
        }
    }

    pub fn state(&self) -> &EditorState<D> {
        &self.state
    }

    pub fn value(&self) -> &D {
        &self.state.value
    }

    pub fn errors(&self) -> &ErrorSet<D::Field> {
        &self.state.error
    }

    pub fn schema(&self) -> &D::Schema {
        &self.schema
    }

    pub fn is_validated(&self) -> bool {
        self.state.validated
    }

    pub fn phase(&self) -> EditorPhase {
        self.state.phase()
    }

    /// Run one action through the reducer.
    /// Returns true when `validated` went from false to true.
    pub fn dispatch(&mut self, action: EditorAction<D>) -> bool {
        let was_validated = self.state.validated;
        let state = std::mem::replace(&mut self.state, EditorState::new(D::default()));
        self.state = state.reduce(action, &self.schema);
        !was_validated && self.state.validated
    }

    pub fn set(&mut self, edit: D::Edit) {
        self.dispatch(EditorAction::Set(edit));
    }

    pub fn blur(&mut self, field: D::Field) {
        self.dispatch(EditorAction::Blur(field));
    }

    /// Run the full rules. Returns true only on the transition into
    /// `Validated`; validating an already validated draft returns false.
    pub fn validate(&mut self) -> bool {
        let edge = self.dispatch(EditorAction::Validate);
        debug!(
            form = D::KIND.as_str(),
            errors = self.state.error.len(),
            validated = self.state.validated,
            edge,
            "Validated draft"
        );
        edge
    }

    pub fn error(&mut self, errors: ErrorSet<D::Field>) {
        self.dispatch(EditorAction::Error(errors));
    }

    /// Character counter for a text field as `(current, limit)`
    pub fn counter(&self, field: D::Field) -> Option<(usize, usize)> {
        let text = self.state.value.text(field)?;
        let limit = D::max_length(&self.schema, field)?;
        Some((char_len(text), limit))
    }

    /// Start a new session from `initial`, invalidating outstanding tickets
    pub fn reset(&mut self, initial: D) {
        self.state = EditorState::new(initial);
        self.session = Uuid::new_v4();
    }

    pub fn ticket(&self) -> EditorTicket {
        EditorTicket(self.session)
    }

    pub fn is_current(&self, ticket: EditorTicket) -> bool {
        ticket.0 == self.session
    }

    /// Apply an edit produced by an async request, unless the session moved on
    pub fn set_if_current(&mut self, ticket: EditorTicket, edit: D::Edit) -> bool {
        if !self.is_current(ticket) {
            debug!(form = D::KIND.as_str(), "Dropping edit for stale session");
            return false;
        }
        self.set(edit);
        true
    }

    /// Record errors produced by an async request, unless the session moved on
    pub fn error_if_current(&mut self, ticket: EditorTicket, errors: ErrorSet<D::Field>) -> bool {
        if !self.is_current(ticket) {
            debug!(form = D::KIND.as_str(), "Dropping errors for stale session");
            return false;
        }
        self.error(errors);
        true
    }
}

impl<D: FormDraft> Editor<D>
where
    D::Schema: Default,
{
    pub fn with_default_schema(initial: D) -> Self {
        Self::new(initial, D::Schema::default())
    }
}
