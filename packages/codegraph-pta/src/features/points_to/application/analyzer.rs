//! High-Level Pointer Analysis
//!
//! Entry point tying configuration, context selector and solver together.
//!
//! # Usage
//! ```
//! use codegraph_pta::config::{ContextSensitivity, PtaConfig};
//! use codegraph_pta::features::points_to::PointerAnalysis;
//! use codegraph_pta::ir::{ProgramBuilder, World};
//!
//! let mut b = ProgramBuilder::new();
//! let main_class = b.add_class("Main", None);
//! let main = b.add_static_method(main_class, "main", "void main()", &[]);
//! let x = b.add_var(main, "x");
//! let y = b.add_var(main, "y");
//! b.new_obj(main, x, main_class);
//! b.copy(main, y, x);
//! b.set_entry(main);
//! let world = World::new(b.build().unwrap()).unwrap();
//!
//! let config = PtaConfig::default().context_sensitivity(ContextSensitivity::object(1));
//! let result = PointerAnalysis::new(config).unwrap().analyze(&world).unwrap();
//! assert!(result.may_alias(x, y));
//! ```

use super::result::PointerAnalysisResult;
use crate::config::{PtaConfig, Validatable};
use crate::errors::Result;
use crate::features::points_to::infrastructure::{make_selector, Solver};
use crate::features::points_to::ports::ContextSelector;
use crate::ir::World;

/// Configured pointer analysis, reusable across worlds
#[derive(Debug, Clone)]
pub struct PointerAnalysis {
    config: PtaConfig,
}

impl PointerAnalysis {
    /// Validate `config`; invalid selector settings are rejected here, before
    /// any solving
    pub fn new(config: PtaConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PtaConfig {
        &self.config
    }

    /// Run with the configured context sensitivity
    pub fn analyze(&self, world: &World) -> Result<PointerAnalysisResult> {
        self.analyze_with_selector(world, make_selector(self.config.context_sensitivity))
    }

    /// Run with a custom context selector
    pub fn analyze_with_selector(
        &self,
        world: &World,
        selector: Box<dyn ContextSelector>,
    ) -> Result<PointerAnalysisResult> {
        let name = selector.name();
        let output = Solver::new(world, selector, self.config.worklist_order)?.solve()?;
        let result = PointerAnalysisResult::new(name, output);
        if self.config.build_alias_index {
            result.alias_index();
        }
        Ok(result)
    }
}
