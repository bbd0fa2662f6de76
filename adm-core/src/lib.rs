//! Core types and synthetic data generators for the ADM marketing dashboard.
//!
//! Everything the dashboard displays is synthesized here:
//! - `metric`: daily time series for revenue, users, conversions and sessions
//! - `campaign`: the eight-row campaign performance table
//! - `device`: the static device breakdown
//! - `snapshot`: one complete dataset for a selected date range
//!
//! Numeric campaign fields are stored as display strings ("$1234", "3.45%",
//! "2.9x"); [`display`] owns the single parse/format pair used to move
//! between the two representations.

pub mod campaign;
pub mod date_range;
pub mod device;
pub mod display;
pub mod metric;
pub mod snapshot;
