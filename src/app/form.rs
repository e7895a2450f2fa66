//! Create/edit form state.
//!
//! At most one form is open at a time and [`ActiveForm`] records which one,
//! so a keystroke only ever reaches the draft of the open form. Every submit
//! is stamped with a fresh [`Ticket`]; a gateway answer only closes or fails
//! the form whose draft still holds that ticket.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::app::controller::Command;
use crate::error::FormError;
use crate::model::{NewAddress, NewUser, User, UserId, UserPatch};

/// Identifies one submission of one draft.
pub type Ticket = u64;

static NEXT_TICKET: AtomicU64 = AtomicU64::new(1);

fn next_ticket() -> Ticket {
    NEXT_TICKET.fetch_add(1, Ordering::Relaxed)
}

/// Input fields shared by the create and edit forms, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    City,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::City];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::City => "City",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::City,
            FormField::City => FormField::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::City,
            FormField::Email => FormField::Name,
            FormField::City => FormField::Email,
        }
    }
}

/// Held-but-unsubmitted values of one form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub name: String,
    pub email: String,
    pub city: String,
    /// Field receiving keystrokes; `None` reads as `Name`.
    pub focus: Option<FormField>,
    /// Set between submit and the gateway's answer.
    pub submitting: bool,
    /// Ticket of the latest submission of this draft.
    pub ticket: Option<Ticket>,
    /// Last validation or remote error, shown inside the form.
    pub error: Option<String>,
}

impl Draft {
    pub fn empty() -> Self {
        Self { focus: Some(FormField::Name), ..Self::default() }
    }

    /// Seed from an existing record; a missing city becomes "".
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            city: user.city().to_string(),
            ..Self::empty()
        }
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::City => &self.city,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::City => &mut self.city,
        }
    }

    pub fn focused(&self) -> FormField {
        self.focus.unwrap_or(FormField::Name)
    }

    /// Every field must hold something other than whitespace.
    pub fn validate(&self) -> Result<(), FormError> {
        match FormField::ALL.into_iter().find(|f| self.field(*f).trim().is_empty()) {
            Some(missing) => Err(FormError::MissingField(missing)),
            None => Ok(()),
        }
    }

    pub fn to_new_user(&self) -> NewUser {
        NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            address: NewAddress { city: self.city.clone() },
        }
    }

    pub fn to_patch(&self) -> UserPatch {
        UserPatch {
            name: self.name.clone(),
            email: self.email.clone(),
            city: self.city.clone(),
        }
    }
}

/// Which form, if any, is open.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActiveForm {
    /// No form open.
    #[default]
    None,
    /// Create form with its draft.
    Creating(Draft),
    /// Edit form for record `id`.
    Editing { id: UserId, draft: Draft },
}

impl ActiveForm {
    pub fn open_create() -> Self {
        ActiveForm::Creating(Draft::empty())
    }

    pub fn open_edit(user: &User) -> Self {
        ActiveForm::Editing { id: user.id, draft: Draft::from_user(user) }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, ActiveForm::None)
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            ActiveForm::None => None,
            ActiveForm::Creating(draft) | ActiveForm::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            ActiveForm::None => None,
            ActiveForm::Creating(draft) | ActiveForm::Editing { draft, .. } => Some(draft),
        }
    }

    /// Replace one field of the open draft. No-op when closed.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        if let Some(draft) = self.draft_mut() {
            *draft.field_mut(field) = value.into();
            draft.error = None;
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(draft) = self.draft_mut() {
            let f = draft.focused();
            draft.field_mut(f).push(c);
            draft.error = None;
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(draft) = self.draft_mut() {
            let f = draft.focused();
            draft.field_mut(f).pop();
        }
    }

    pub fn focus_next(&mut self) {
        if let Some(draft) = self.draft_mut() {
            draft.focus = Some(draft.focused().next());
        }
    }

    pub fn focus_prev(&mut self) {
        if let Some(draft) = self.draft_mut() {
            draft.focus = Some(draft.focused().prev());
        }
    }

    /// Validate the open draft and turn it into a gateway command.
    ///
    /// On success the draft is marked submitting; the form stays open until
    /// the outcome is reconciled. Validation errors are also stored on the
    /// draft for display. Returns `Ok(None)` when no form is open.
    pub fn submit(&mut self) -> Result<Option<Command>, FormError> {
        let cmd = match self {
            ActiveForm::None => return Ok(None),
            ActiveForm::Creating(draft) => {
                let ticket = Self::check(draft)?;
                Command::Create { ticket, new_user: draft.to_new_user() }
            }
            ActiveForm::Editing { id, draft } => {
                let ticket = Self::check(draft)?;
                Command::Update { ticket, id: *id, patch: draft.to_patch() }
            }
        };
        Ok(Some(cmd))
    }

    /// Validate and mark submitting under a new ticket.
    fn check(draft: &mut Draft) -> Result<Ticket, FormError> {
        if draft.submitting {
            return Err(FormError::Busy);
        }
        draft.validate().inspect_err(|e| draft.error = Some(e.to_string()))?;
        let ticket = next_ticket();
        draft.submitting = true;
        draft.error = None;
        draft.ticket = Some(ticket);
        Ok(ticket)
    }

    /// True when the open draft's latest submission carries `ticket`.
    pub fn owns(&self, ticket: Ticket) -> bool {
        self.draft().and_then(|d| d.ticket) == Some(ticket)
    }

    /// Put a failed submission back into an editable state.
    pub fn fail(&mut self, message: String) {
        if let Some(draft) = self.draft_mut() {
            draft.submitting = false;
            draft.error = Some(message);
        }
    }

    pub fn close(&mut self) {
        *self = ActiveForm::None;
    }
}
