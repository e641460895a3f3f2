//! Confirmation gate for irreversible edits.
//!
//! The gate is a single pending-action slot with two states:
//!
//! ```text
//!   Idle --request--> Pending --confirm--> Idle   (action runs)
//!                             --cancel---> Idle   (cancel hook runs)
//! ```
//!
//! A request made while another one is pending is rejected with
//! [`GateError::AlreadyPending`]; the pending prompt stays as it was.
//!
//! The gate never looks at what an action does. Call sites bundle the real
//! mutation into the confirm closure and describe it in the [`Prompt`].
//! Actions receive the state they act on (`&mut T`) when they run, so nothing
//! is captured by reference and nothing can run early.

use std::fmt;

use thiserror::Error;

/// Text shown to the user while an action is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub description: String,
}

impl Prompt {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Misuse of the gate's state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Another confirmation is already pending: {title}")]
    AlreadyPending { title: String },

    #[error("No confirmation is pending")]
    NothingPending,
}

type ConfirmAction<T, E> = Box<dyn FnOnce(&mut T) -> Result<(), E>>;
type CancelAction<T> = Box<dyn FnOnce(&mut T)>;

struct Pending<T, E> {
    prompt: Prompt,
    on_confirm: ConfirmAction<T, E>,
    on_cancel: Option<CancelAction<T>>,
}

/// Single-slot pending action over state `T`, with action errors `E`.
pub struct ConfirmationGate<T, E> {
    pending: Option<Pending<T, E>>,
}

impl<T, E> Default for ConfirmationGate<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for ConfirmationGate<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationGate")
            .field("prompt", &self.prompt())
            .finish()
    }
}

impl<T, E> ConfirmationGate<T, E> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Prompt of the pending action, or `None` while idle.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.pending.as_ref().map(|p| &p.prompt)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Park `on_confirm` until the user confirms. Cancelling does nothing.
    pub fn request<F>(&mut self, prompt: Prompt, on_confirm: F) -> Result<(), GateError>
    where
        F: FnOnce(&mut T) -> Result<(), E> + 'static,
    {
        self.park(prompt, Box::new(on_confirm), None)
    }

    /// Like [`Self::request`], with a hook that runs on cancel.
    pub fn request_with_cancel<F, C>(
        &mut self,
        prompt: Prompt,
        on_confirm: F,
        on_cancel: C,
    ) -> Result<(), GateError>
    where
        F: FnOnce(&mut T) -> Result<(), E> + 'static,
        C: FnOnce(&mut T) + 'static,
    {
        self.park(prompt, Box::new(on_confirm), Some(Box::new(on_cancel)))
    }

    fn park(
        &mut self,
        prompt: Prompt,
        on_confirm: ConfirmAction<T, E>,
        on_cancel: Option<CancelAction<T>>,
    ) -> Result<(), GateError> {
        if let Some(current) = &self.pending {
            tracing::warn!(
                pending = %current.prompt.title,
                rejected = %prompt.title,
                "confirmation already pending"
            );
            return Err(GateError::AlreadyPending {
                title: current.prompt.title.clone(),
            });
        }
        tracing::debug!(title = %prompt.title, "confirmation requested");
        self.pending = Some(Pending {
            prompt,
            on_confirm,
            on_cancel,
        });
        Ok(())
    }

    /// Drop the pending action, run its cancel hook and return to idle.
    pub fn cancel(&mut self, target: &mut T) -> Result<Prompt, GateError> {
        let pending = self.pending.take().ok_or(GateError::NothingPending)?;
        tracing::debug!(title = %pending.prompt.title, "cancelled");
        if let Some(on_cancel) = pending.on_cancel {
            on_cancel(target);
        }
        Ok(pending.prompt)
    }
}

impl<T, E> ConfirmationGate<T, E>
where
    E: From<GateError>,
{
    /// Run the pending action against `target` and return to idle.
    ///
    /// The gate is idle again before the action runs, so an action error
    /// does not leave the prompt hanging. The error is returned as-is.
    pub fn confirm(&mut self, target: &mut T) -> Result<Prompt, E> {
        let pending = self.pending.take().ok_or(GateError::NothingPending)?;
        tracing::debug!(title = %pending.prompt.title, "confirmed");
        (pending.on_confirm)(target)?;
        Ok(pending.prompt)
    }
}
