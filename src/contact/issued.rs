use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use spdlog::debug;

pub const DEFAULT_CAPACITY: usize = 4096;
pub const DEFAULT_MAX_AGE_SECS: i64 = 60 * 60 * 2;

/// Forms the server rendered and has not seen back yet, by seed. The render
/// time kept here is the one the timing check trusts; the hidden timestamp
/// a visitor posts must match it.
///
/// Each seed is redeemed once. Entries older than `max_age` are dropped and
/// the oldest entry makes room when the registry is full.
pub struct IssuedForms {
    forms: Mutex<HashMap<u64, DateTime<Utc>>>,
    capacity: usize,
    max_age: Duration,
}

impl Default for IssuedForms {
    fn default() -> Self {
        IssuedForms::new(DEFAULT_CAPACITY, Duration::seconds(DEFAULT_MAX_AGE_SECS))
    }
}

impl IssuedForms {
    pub fn new(capacity: usize, max_age: Duration) -> Self {
        IssuedForms {
            forms: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
            max_age,
        }
    }

    fn lock(&self) -> MutexGuard<HashMap<u64, DateTime<Utc>>> {
        // The map stays consistent even if a holder panicked
        self.forms.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn issue(&self, seed: u64, rendered_at: DateTime<Utc>) {
        let mut forms = self.lock();
        if forms.len() >= self.capacity {
            let max_age = self.max_age;
            forms.retain(|_, issued_at| rendered_at - *issued_at <= max_age);
        }
        if forms.len() >= self.capacity {
            let oldest = forms.iter().min_by_key(|(_, issued_at)| **issued_at).map(|(seed, _)| *seed);
            if let Some(oldest) = oldest {
                debug!("Contact form registry full, dropping seed {}", oldest);
                forms.remove(&oldest);
            }
        }
        forms.insert(seed, rendered_at);
    }

    /// Removes `seed` and returns when it was rendered, unless it was never
    /// issued, already redeemed or has expired.
    pub fn redeem(&self, seed: u64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let rendered_at = self.lock().remove(&seed)?;
        if now - rendered_at > self.max_age {
            return None;
        }
        Some(rendered_at)
    }
}
