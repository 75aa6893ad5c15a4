//! Application layer: analysis entry point and result queries

pub mod analyzer;
pub mod result;

pub use analyzer::PointerAnalysis;
pub use result::{AnalysisReport, CICallGraph, PointerAnalysisResult, ReportEdge};
