//! Core data types for installed software inventories.
//!
//! This module contains the fundamental types used throughout software-audit:
//!
//! - [`PackageRecord`] - One installed package, normalized across sources
//! - [`Source`] - The registry or tool a record was read from
//! - [`OsFamily`] - Operating system family that selects the collectors
//! - [`ScanResult`] - Complete snapshot of one host
//!
//! # Example
//!
//! ```
//! use software_audit::{OsFamily, PackageRecord, ScanResult};
//!
//! let record = PackageRecord::new("curl", "7.88.1").with_vendor("Debian curl maintainers");
//! let result = ScanResult::new("build-01", OsFamily::Debian, vec![record]);
//!
//! println!("Scanned {} packages", result.records.len());
//! ```

mod package;
mod scan_result;

pub use package::*;
pub use scan_result::*;
