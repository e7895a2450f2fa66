//! Maps operator intents to gateway calls and folds the answers back into
//! application state.
//!
//! A [`Command`] runs as one independent request; its [`Outcome`] carries
//! enough context (ticket, id, patch) to be reconciled whenever it arrives.
//! The store is only touched after the gateway confirms, so a failure never
//! needs a rollback.

use tracing::{error, info, warn};

use crate::app::form::Ticket;
use crate::app::{AppState, InputMode, ModalState};
use crate::error::NetworkError;
use crate::model::{NewUser, User, UserId, UserPatch};
use crate::remote::UserGateway;

/// One gateway call the operator asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fetch the whole collection and replace the store.
    Refresh,
    /// Create a record from a submitted create form.
    Create { ticket: Ticket, new_user: NewUser },
    /// Save a submitted edit form for record `id`.
    Update { ticket: Ticket, id: UserId, patch: UserPatch },
    /// Delete record `id` after confirmation.
    Delete { id: UserId },
}

/// Answer to a [`Command`], with the context needed to apply it late.
#[derive(Debug)]
pub enum Outcome {
    /// Collection fetched by `Refresh`.
    Listed(Result<Vec<User>, NetworkError>),
    /// Record returned by the server for `Create`.
    Created {
        ticket: Ticket,
        result: Result<User, NetworkError>,
    },
    /// Acknowledgement of `Update`; `patch` is applied locally on success.
    Updated {
        ticket: Ticket,
        id: UserId,
        patch: UserPatch,
        result: Result<(), NetworkError>,
    },
    /// Acknowledgement of `Delete`.
    Deleted {
        id: UserId,
        result: Result<(), NetworkError>,
    },
}

impl Command {
    /// Perform the call. Never retried.
    pub async fn execute(self, gateway: &dyn UserGateway) -> Outcome {
        match self {
            Command::Refresh => Outcome::Listed(gateway.list().await),
            Command::Create { ticket, new_user } => Outcome::Created {
                ticket,
                result: gateway.create(&new_user).await,
            },
            Command::Update { ticket, id, patch } => {
                let result = gateway.update(id, &patch).await;
                Outcome::Updated { ticket, id, patch, result }
            }
            Command::Delete { id } => Outcome::Deleted {
                id,
                result: gateway.delete(id).await,
            },
        }
    }
}

/// Fold one gateway answer into the application state.
///
/// Only the form whose draft still holds the answer's ticket is closed or
/// failed; answers for abandoned submissions touch the store alone.
pub fn reconcile(app: &mut AppState, outcome: Outcome) {
    app.in_flight = app.in_flight.saturating_sub(1);
    match outcome {
        Outcome::Listed(Ok(users)) => {
            let count = users.len();
            match app.store.load(users) {
                Ok(()) => {
                    info!(count, "loaded users");
                    app.clamp_selection();
                    app.notify(format!("Loaded {count} users"));
                }
                Err(e) => {
                    error!(error = %e, "rejected user list");
                    show_error(app, "Loading users failed", e.to_string());
                }
            }
        }
        Outcome::Listed(Err(e)) => {
            error!(error = %e, "error fetching users");
            show_error(app, "Loading users failed", e.to_string());
        }
        Outcome::Created { ticket, result: Ok(user) } => {
            let (id, name) = (user.id, user.name.clone());
            match app.store.append(user) {
                Ok(()) => {
                    info!(id, ticket, name = %name, "user created");
                    if app.form.owns(ticket) {
                        close_form(app);
                    }
                    app.clamp_selection();
                    app.notify(format!("Created '{name}' (id {id})"));
                }
                Err(e) => {
                    warn!(id, ticket, error = %e, "created user rejected by store");
                    fail_submission(app, ticket, e.to_string());
                }
            }
        }
        Outcome::Created { ticket, result: Err(e) } => {
            error!(ticket, error = %e, "error creating user");
            fail_submission(app, ticket, e.to_string());
        }
        Outcome::Updated { ticket, id, patch, result: Ok(()) } => match app.store.replace(id, &patch) {
            Ok(()) => {
                info!(id, ticket, "user updated");
                if app.form.owns(ticket) {
                    close_form(app);
                }
                app.clamp_selection();
                app.notify(format!("Updated '{}' (id {id})", patch.name));
            }
            Err(e) => {
                warn!(id, ticket, error = %e, "updated user no longer in store");
                fail_submission(app, ticket, e.to_string());
            }
        },
        Outcome::Updated { ticket, id, result: Err(e), .. } => {
            error!(id, ticket, error = %e, "error updating user");
            fail_submission(app, ticket, e.to_string());
        }
        Outcome::Deleted { id, result: Ok(()) } => match app.store.remove(id) {
            Ok(removed) => {
                info!(id, "user deleted");
                app.clamp_selection();
                app.notify(format!("Deleted '{}' (id {id})", removed.name));
            }
            Err(e) => warn!(id, error = %e, "deleted user already gone"),
        },
        Outcome::Deleted { id, result: Err(e) } => {
            error!(id, error = %e, "error deleting user");
            show_error(app, "Delete failed", e.to_string());
        }
    }
}

/// Report a failed submission inside its form when that form is still open,
/// otherwise like any other error.
fn fail_submission(app: &mut AppState, ticket: Ticket, message: String) {
    if app.form.owns(ticket) {
        app.form.fail(message.clone());
        app.notify_error(message);
    } else {
        show_error(app, "Save failed", message);
    }
}

/// Status bar always; a dialog only when it would not interrupt another
/// dialog or a half-typed search.
fn show_error(app: &mut AppState, title: &str, message: String) {
    app.notify_error(format!("{title}: {message}"));
    if app.modal.is_some() || app.input_mode == InputMode::Search {
        return;
    }
    app.open_modal(ModalState::Info {
        title: title.to_string(),
        message,
    });
}

fn close_form(app: &mut AppState) {
    app.form.close();
    if app.input_mode == InputMode::Form {
        app.input_mode = InputMode::Normal;
    }
}
