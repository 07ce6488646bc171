//! Medication reminder dispatch.
//!
//! Stateless: a reminder is pure formatting. There is no lookup, no
//! persistence, and no check that the name corresponds to an existing
//! patient.

/// Confirmation returned for a dispatched reminder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderConfirmation {
    pub message: String,
}

/// Formats and emits medication reminders.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReminderDispatcher;

impl ReminderDispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Dispatches one reminder. Always succeeds given string inputs.
    pub fn dispatch(&self, name: &str, medication: &str, time: &str) -> ReminderConfirmation {
        ReminderConfirmation {
            message: format!("Reminder set for {name} to take {medication} at {time}"),
        }
    }
}
