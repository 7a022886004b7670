use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;

use chrono::{DateTime, Duration, Utc};

use crate::contact::ContactMessage;
use crate::contact::form::ContactForm;

pub const DEFAULT_MIN_ELAPSED_SECS: i64 = 3;

/// Why a submission was refused. Only ever logged, never shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    TooFast,
    Honeypot,
    NotConfirmed,
    MissingField(&'static str),
}

pub struct SpamGuard {
    pub min_elapsed: Duration,
}

impl Default for SpamGuard {
    fn default() -> Self {
        SpamGuard {
            min_elapsed: Duration::seconds(DEFAULT_MIN_ELAPSED_SECS),
        }
    }
}

fn field<'a>(values: &'a HashMap<String, String>, name: &str) -> &'a str {
    values.get(name).map(|v| v.trim()).unwrap_or("")
}

impl SpamGuard {
    pub fn new(min_elapsed_secs: i64) -> io::Result<Self> {
        match Duration::try_seconds(min_elapsed_secs) {
            Some(min_elapsed) if min_elapsed_secs >= 0 => Ok(SpamGuard { min_elapsed }),
            _ => Err(io::Error::new(
                ErrorKind::InvalidInput,
                format!("Invalid contact.min_elapsed_secs - value={}", min_elapsed_secs),
            )),
        }
    }

    /// Maps the randomized inputs back to a message, or tells why not.
    pub fn check(&self, form: &ContactForm, values: &HashMap<String, String>, now: DateTime<Utc>) -> Result<ContactMessage, Rejection> {
        let names = &form.names;

        if now - form.rendered_at < self.min_elapsed {
            return Err(Rejection::TooFast);
        }
        if !field(values, &names.honeypot).is_empty() {
            return Err(Rejection::Honeypot);
        }
        if field(values, &names.confirm).is_empty() {
            return Err(Rejection::NotConfirmed);
        }

        let message = ContactMessage {
            name: field(values, &names.name).to_string(),
            email: field(values, &names.email).to_string(),
            subject: field(values, &names.subject).to_string(),
            message: field(values, &names.message).to_string(),
        };

        if message.name.is_empty() {
            return Err(Rejection::MissingField("name"));
        }
        if !message.email.contains('@') {
            return Err(Rejection::MissingField("email"));
        }
        if message.message.is_empty() {
            return Err(Rejection::MissingField("message"));
        }

        Ok(message)
    }
}
