// ABOUTME: Library root for cargolift - local container lifecycle, deployment and WAR merging.
// ABOUTME: The cargolift binary is in main.rs.

pub mod config;
pub mod configuration;
pub mod container;
pub mod deploy;
pub mod error;
pub mod fs;
pub mod merge;
pub mod output;
pub mod probe;
pub mod registry;
pub mod types;
