//! Generation queue core.
//!
//! Typed per-task parameters, the command compiler that renders them into a
//! `generate.py` invocation, the submission gate, form sessions, and the job
//! lifecycle observed through the [`store::JobStore`] seam.

pub mod command;
pub mod error;
pub mod gate;
pub mod history;
pub mod job;
pub mod params;
pub mod session;
pub mod store;
pub mod task;
pub mod types;
