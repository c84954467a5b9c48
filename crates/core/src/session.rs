//! Form sessions: one editable configuration per open form.
//!
//! A session recompiles its command after every mutation, so
//! [`FormSession::command`] is always in sync with the configuration. The
//! in-flight flag is per session: a second submission from the same form is
//! rejected while the first is outstanding, submissions from different
//! forms are independent.

use serde::Serialize;

use crate::command::{compile, CommandLine};
use crate::error::CoreError;
use crate::gate::{self, Readiness};
use crate::params::{Configuration, ConfigurationUpdate, FieldState};
use crate::store::NewJob;
use crate::task::TaskVariant;

#[derive(Debug, Clone)]
pub struct FormSession {
    config: Configuration,
    command: CommandLine,
    in_flight: bool,
}

/// Everything a form renders.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub task: TaskVariant,
    pub params: Configuration,
    pub command: String,
    pub readiness: Readiness,
    pub fields: Vec<FieldState>,
}

impl FormSession {
    /// Open a form on the variant's default configuration.
    pub fn new(task: TaskVariant) -> Self {
        Self::from_configuration(Configuration::defaults(task))
    }

    pub fn from_configuration(config: Configuration) -> Self {
        let command = compile(&config);
        Self {
            config,
            command,
            in_flight: false,
        }
    }

    pub fn task(&self) -> TaskVariant {
        self.config.task()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Merge a partial update and recompile.
    pub fn update(&mut self, update: ConfigurationUpdate) -> Result<(), CoreError> {
        self.config.apply(update)?;
        self.command = compile(&self.config);
        Ok(())
    }

    /// The gate for this form, including the in-flight state.
    pub fn readiness(&self) -> Readiness {
        if self.in_flight {
            Readiness::Busy
        } else {
            gate::check(&self.config)
        }
    }

    pub fn view(&self) -> FormView {
        FormView {
            task: self.task(),
            params: self.config.clone(),
            command: self.command.render(),
            readiness: self.readiness(),
            fields: self.config.fields(),
        }
    }

    /// Claim the form for a submission and snapshot the job to insert.
    ///
    /// Fails with [`CoreError::Busy`] while another submission from this form
    /// is outstanding, and with [`CoreError::Validation`] when the gate is
    /// blocked. On failure nothing changes.
    pub fn begin_submission(&mut self) -> Result<NewJob, CoreError> {
        if self.in_flight {
            return Err(CoreError::Busy(
                "A submission from this form is already in progress".into(),
            ));
        }
        gate::ensure_ready(&self.config)?;
        let job = NewJob::from_configuration(&self.config)?;
        self.in_flight = true;
        Ok(job)
    }

    /// Release the form after the store call returns, whatever its outcome.
    /// The configuration is left as it was.
    pub fn end_submission(&mut self) {
        self.in_flight = false;
    }
}
