pub mod commands;
pub mod forms;
pub mod jobs;
pub mod tasks;
