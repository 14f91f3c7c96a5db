#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for repo-stats
//!
//! This library consolidates all functionality for the repo-stats tool, which collects
//! activity metrics for a set of GitHub repositories and writes them to a CSV file.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`facts`]: Repository references, API access, fetching, reduction and batching
//! - [`reports`]: CSV and console output

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[doc(hidden)]
pub mod commands;

#[doc(hidden)]
pub mod facts;

#[doc(hidden)]
pub mod reports;

pub use crate::commands::{Host, run};
