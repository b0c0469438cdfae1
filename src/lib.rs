//! Multi-region AWS resource inventory built on the Resource Explorer
//! search API.
//!
//! The crate scans one or more regions for indexed resources, normalizes
//! every hit into a flat [`inventory::ResourceRecord`] (including an
//! inferred Application label from tag data), and writes the aggregated
//! report to JSON and XLSX files, optionally uploading both to S3.
//!
//! # Architecture
//!
//! - [`inventory`]: the scan core — per-region scanner, bounded-concurrency
//!   fleet aggregator, resource normalization, region catalog
//! - [`export`]: JSON and spreadsheet report writers
//! - [`upload`]: S3 delivery of exported reports

#![warn(clippy::all, rust_2018_idioms)]

pub mod export;
pub mod inventory;
pub mod upload;
