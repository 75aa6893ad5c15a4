/*
 * Codegraph PTA - Context-Sensitive Pointer Analysis Engine
 *
 * Feature-First Hexagonal Architecture:
 * - ir/        : Program model, class hierarchy, heap abstraction, World
 * - config/    : PtaConfig, context sensitivity parsing and validation
 * - features/  : Vertical slices (call_graph, points_to)
 * - bin/pta    : CLI driver
 *
 * The analysis is a single-threaded worklist fixpoint; every run owns its
 * state and nothing is global.
 */

// Crate-level lint configuration
#![allow(clippy::too_many_arguments)] // Builder helpers mirror IR statement shapes
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::len_without_is_empty)] // Size accessors on append-only tables

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration (YAML, presets, validation)
pub mod config;

/// Error types
pub mod errors;

/// Analysis features
pub mod features;

/// Program representation
pub mod ir;

pub use config::{ContextSensitivity, Preset, PtaConfig, WorklistOrder};
pub use errors::{PtaError, Result};
pub use features::call_graph::{build_cha, CallGraph, CallKind, Edge};
pub use features::points_to::{AnalysisReport, PointerAnalysis, PointerAnalysisResult};
pub use ir::{ProgramBuilder, World};
