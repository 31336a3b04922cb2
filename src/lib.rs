pub mod adapter;
pub mod backend;
pub mod cli;
pub mod compliance;
pub mod config;
pub mod detect;
pub mod error;
pub mod output;
pub mod shell;
pub mod sysfs;
pub mod vendor;
