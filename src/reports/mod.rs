//! Printable documents
//!
//! `layout` turns query results into a plain document model and `pdf`
//! renders that model. Layout code never touches the PDF library.

pub mod layout;
pub mod pdf;

pub use layout::{Block, ReportDocument, Section};
