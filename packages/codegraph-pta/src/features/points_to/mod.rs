//! # Context-Sensitive Points-to Analysis
//!
//! Inclusion-based pointer analysis with on-the-fly call graph construction
//! for an object-oriented IR:
//! - **Pluggable context sensitivity**: ci, k-call, k-obj, k-type, hybrid
//! - **Field sensitivity**: one pointer per (object, field); array indices merged
//! - **Delta propagation**: only objects new to a pointer trigger work
//!
//! ## Academic References
//! - Andersen, L. O. "Program Analysis and Specialization for C" (PhD 1994)
//! - Milanova et al. "Parameterized Object Sensitivity" (TOSEM 2005)
//! - Smaragdakis et al. "Pick Your Contexts Well" (POPL 2011)
//!
//! ## Usage
//! ```text
//! let world = World::new(program)?;
//! let analysis = PointerAnalysis::new(PtaConfig::preset(Preset::Balanced))?;
//! let result = analysis.analyze(&world)?;
//! result.may_alias(x, y);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports for public API
pub use application::{AnalysisReport, PointerAnalysis, PointerAnalysisResult};
pub use domain::{Context, ContextElement, PointsToSet};
pub use infrastructure::SolverStats;
pub use ports::ContextSelector;
// Re-export infrastructure (internal use - prefer application layer)
#[doc(hidden)]
pub use infrastructure::Solver;
