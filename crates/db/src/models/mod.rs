//! Row structs for database tables and their conversions to core types.

pub mod generation_job;
