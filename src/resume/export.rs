use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use spdlog::{debug, error};

use crate::resume::document::render_resume_pdf;
use crate::resume::Resume;

/// Allows a single export at a time. Requests arriving while one is running
/// are dropped.
#[derive(Debug, Default)]
pub struct ExportState {
    busy: AtomicBool,
}

pub struct ExportGuard<'a> {
    state: &'a ExportState,
}

impl ExportState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn try_begin(&self) -> Option<ExportGuard<'_>> {
        match self.busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => Some(ExportGuard { state: self }),
            Err(_) => None,
        }
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.state.busy.store(false, Ordering::Release);
    }
}

/// Runs `render` under the busy flag. Failures are logged and yield `None`;
/// the flag is cleared either way.
pub fn export_with<F>(state: &ExportState, resume: &Resume, render: F) -> Option<Vec<u8>>
    where F: FnOnce(&Resume) -> io::Result<Vec<u8>> {
    let _guard = match state.try_begin() {
        Some(guard) => guard,
        None => {
            debug!("Resume export already running, ignoring request");
            return None;
        }
    };

    match render(resume) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            error!("Error generating resume PDF: {}", e);
            None
        }
    }
}

pub fn export_resume(state: &ExportState, resume: &Resume) -> Option<Vec<u8>> {
    export_with(state, resume, render_resume_pdf)
}
