//! Fault types and crash reports.
//!
//! A block hook that fails during a move is not recoverable for that tick.
//! The orchestrator wraps the failure in a [`CrashReport`] that names the
//! block and the entity, and surfaces it as a [`SimulationFault`].

use std::fmt;

/// Failure raised by a world block hook.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct BlockCallbackError {
    message: String,
}

impl BlockCallbackError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A fatal fault that aborts the current entity update.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationFault {
    #[error("simulation faulted: {}", .0.description())]
    BlockCollision(Box<CrashReport>),
}

impl SimulationFault {
    pub fn report(&self) -> &CrashReport {
        match self {
            SimulationFault::BlockCollision(report) => report,
        }
    }
}

/// A snapshot that cannot be applied to an entity.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum SnapshotError {
    #[error("entity has invalid position")]
    InvalidPosition,
    #[error("entity has invalid rotation")]
    InvalidRotation,
}

/// Named section of a crash report.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashCategory {
    name: String,
    details: Vec<(String, String)>,
}

impl CrashCategory {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn details(&self) -> &[(String, String)] {
        &self.details
    }

    /// Value recorded under `key`, if any.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn add_detail(&mut self, key: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        self.details.push((key.into(), value.to_string()));
        self
    }
}

/// Diagnostic report for a fatal simulation fault.
#[derive(Debug, Clone, PartialEq)]
pub struct CrashReport {
    description: String,
    cause: String,
    categories: Vec<CrashCategory>,
}

impl CrashReport {
    pub fn new(description: impl Into<String>, cause: impl fmt::Display) -> Self {
        Self {
            description: description.into(),
            cause: cause.to_string(),
            categories: Vec::new(),
        }
    }

    /// Wrap `inner` under a new description, keeping its sections.
    pub fn caused_by(description: impl Into<String>, inner: CrashReport) -> Self {
        Self {
            description: description.into(),
            cause: format!("{}: {}", inner.description, inner.cause),
            categories: inner.categories,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cause(&self) -> &str {
        &self.cause
    }

    pub fn categories(&self) -> &[CrashCategory] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&CrashCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Append a new section and return it for filling.
    pub fn make_category(&mut self, name: impl Into<String>) -> &mut CrashCategory {
        self.categories.push(CrashCategory {
            name: name.into(),
            details: Vec::new(),
        });
        let last = self.categories.len() - 1;
        &mut self.categories[last]
    }
}

impl fmt::Display for CrashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "---- Cinder Crash Report ----")?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f)?;
        writeln!(f, "{}", self.cause)?;
        for category in &self.categories {
            writeln!(f)?;
            writeln!(f, "-- {} --", category.name)?;
            for (key, value) in &category.details {
                writeln!(f, "\t{key}: {value}")?;
            }
        }
        Ok(())
    }
}
