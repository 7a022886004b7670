use std::collections::HashMap;

use chrono::{DateTime, Utc};
use spdlog::{info, warn};

use crate::contact::ContactMessage;
use crate::contact::field_names::FieldNames;
use crate::contact::guard::SpamGuard;
use crate::contact::issued::IssuedForms;
use crate::contact::relay::FormRelay;

pub const SEED_FIELD: &str = "form_seed";
pub const RENDERED_AT_FIELD: &str = "form_ts";

/// Shown for every refusal so nothing hints at which check tripped.
pub const REJECTION_MESSAGE: &str = "Your message could not be sent. Please try again later.";
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormStatus {
    Idle,
    Submitting,
    Submitted,
    Error,
}

/// Contact form state for one render: the seed behind its field names,
/// when it was rendered, what was typed and where the submission stands.
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub seed: u64,
    pub rendered_at: DateTime<Utc>,
    pub names: FieldNames,
    pub values: ContactMessage,
    pub status: FormStatus,
}

impl ContactForm {
    pub fn new(seed: u64, rendered_at: DateTime<Utc>) -> Self {
        ContactForm {
            seed,
            rendered_at,
            names: FieldNames::from_seed(seed),
            values: ContactMessage::default(),
            status: FormStatus::Idle,
        }
    }

    /// Rebuilds the rendered form from its hidden seed and timestamp fields.
    /// Only forms in `issued` come back, and only when the posted timestamp
    /// is the one the server rendered. The seed is spent either way.
    pub fn restore(values: &HashMap<String, String>, issued: &IssuedForms, now: DateTime<Utc>) -> Option<Self> {
        let seed = values.get(SEED_FIELD)?.parse::<u64>().ok()?;
        let millis = values.get(RENDERED_AT_FIELD)?.parse::<i64>().ok()?;
        let rendered_at = issued.redeem(seed, now)?;
        if rendered_at.timestamp_millis() != millis {
            warn!("Contact form {} posted with a rendered time that was never issued", seed);
            return None;
        }
        Some(ContactForm::new(seed, rendered_at))
    }

    /// Records this form so a later submission can be restored.
    pub fn issue(&self, issued: &IssuedForms) {
        issued.issue(self.seed, self.rendered_at);
    }

    pub fn rendered_at_millis(&self) -> i64 {
        self.rendered_at.timestamp_millis()
    }

    /// Whatever was typed into the visible inputs, unchecked.
    pub fn typed_values(&self, values: &HashMap<String, String>) -> ContactMessage {
        let typed = |name: &String| values.get(name).cloned().unwrap_or_default();
        ContactMessage {
            name: typed(&self.names.name),
            email: typed(&self.names.email),
            subject: typed(&self.names.subject),
            message: typed(&self.names.message),
        }
    }

    /// The form to render next: new field names and timestamp, same values
    /// and status.
    pub fn renew(&self, seed: u64, rendered_at: DateTime<Utc>) -> ContactForm {
        let mut next = ContactForm::new(seed, rendered_at);
        next.values = self.values.clone();
        next.status = self.status;
        next
    }

    pub fn reject(&mut self) -> FormStatus {
        self.status = FormStatus::Error;
        self.status
    }

    pub async fn submit<R: FormRelay>(&mut self, guard: &SpamGuard, values: &HashMap<String, String>,
                                      now: DateTime<Utc>, relay: &R) -> FormStatus {
        self.status = FormStatus::Submitting;

        let message = match guard.check(self, values, now) {
            Ok(message) => message,
            Err(rejection) => {
                info!("Contact submission rejected: {:?}", rejection);
                self.values = self.typed_values(values);
                return self.reject();
            }
        };
        self.values = message;

        match relay.relay(&self.values).await {
            Ok(()) => {
                info!("Contact message relayed for {}", self.values.email);
                self.values = ContactMessage::default();
                self.status = FormStatus::Submitted;
            }
            Err(e) => {
                warn!("Error relaying contact message: {}", e);
                self.status = FormStatus::Error;
            }
        }
        self.status
    }

    pub fn status_message(&self) -> Option<&'static str> {
        match self.status {
            FormStatus::Idle | FormStatus::Submitting => None,
            FormStatus::Submitted => Some(SUCCESS_MESSAGE),
            FormStatus::Error => Some(REJECTION_MESSAGE),
        }
    }
}
