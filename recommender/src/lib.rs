pub mod cli;
pub mod config;
pub mod prompt;
pub mod report;
