//! Vendas - sales-per-customer report extraction
//!
//! This library rebuilds structured customer sales records from the raw
//! text of "Venda X Cliente" PDF reports: Brazilian-formatted amounts and
//! dates, rows split over several lines, repeated headers and pagination.

pub mod cleanup;
pub mod config;
pub mod converters;
pub mod error;
pub mod importers;
pub mod report;
pub mod utils;

pub use report::{extract, Extraction, ReportExtractor, SalesRecord};
