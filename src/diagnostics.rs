//! Error collector threaded through the static stages.
//!
//! The scanner, parser and resolver keep going after a mistake so that one
//! run reports as many problems as possible. Each stage pushes into the same
//! [`Diagnostics`], and the caller checks [`Diagnostics::has_errors`] before
//! starting the next stage.

use log::debug;

use crate::error::LoxError;

#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one error. Nothing is printed here.
    pub fn report(&mut self, error: LoxError) {
        debug!("Diagnostic reported: {}", error);

        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors in the order they were reported.
    pub fn errors(&self) -> &[LoxError] {
        &self.errors
    }

    /// Drain the collected errors, leaving the collector empty.
    pub fn take(&mut self) -> Vec<LoxError> {
        std::mem::take(&mut self.errors)
    }

    pub fn into_errors(self) -> Vec<LoxError> {
        self.errors
    }
}
