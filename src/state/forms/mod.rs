//! Form domain layer
//!
//! Schema-driven validation and the editor state machine shared by the
//! governance and poll submission forms.

mod editor;
mod errors;
mod governance;
mod poll;
mod schema;
mod validator;

pub use editor::{Editor, EditorAction, EditorPhase, EditorState, EditorTicket, FormDraft};
pub use errors::{ErrorCode, ErrorSet, FieldName, FormKind};
pub use governance::{GovernanceDraft, GovernanceEdit, GovernanceField, LinkedPrefill};
pub use poll::{ChoiceKey, Choices, PollDraft, PollEdit, PollField, MANDATORY_OPTION};
pub use schema::{ChoicesRule, GovernanceSchema, LengthRule, PollSchema};
pub use validator::{char_len, check_choices, check_length, check_max, check_required, Validate};
