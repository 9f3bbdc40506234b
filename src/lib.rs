//! # Flowcraft - Workflow Customization and Decision Engine
//!
//! **Flowcraft** turns multi-phase project templates (phases → operations → steps) into
//! concrete, linear execution plans for individual project runs. Authors annotate nodes
//! with a *flow type*; end users answer the resulting decisions; the engine merges the
//! authored structure, the answers and the canonical-phase ordering rule into one
//! consistent plan.
//!
//! ## Core Workflow
//!
//! 1.  **Annotate**: Record flow types in a `FlowConfigStore`, a side map keyed by node id.
//!     Alternates are kept symmetric, dependents must point at if-necessary work.
//! 2.  **Extract**: `extract_decisions` (step decision points) and
//!     `extract_alternate_decisions` (alternate groups) build the list to present.
//! 3.  **Answer**: Collect answers and optional-work picks into `Selections`.
//! 4.  **Resolve**: `Resolver::resolve` filters and rewires the phase graph.
//! 5.  **Order**: `enforce_standard_ordering` keeps Kickoff, Planning, Ordering and
//!     Close Project in place around any custom or incorporated phases.
//!
//! `ResolutionSession` runs steps 2–5 for one project run and produces a `ProjectRun`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowcraft::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let phases = vec![
//!         Phase::new("close", "Close Project"),
//!         Phase::new("tile", "Tile Floor").with_operations(vec![
//!             Operation::new("thinset", "Thinset install"),
//!             Operation::new("mastic", "Mastic install"),
//!             Operation::new("heat", "Radiant heat mat"),
//!         ]),
//!         Phase::new("kickoff", "Kickoff"),
//!     ];
//!
//!     // 1. Author the flow annotations.
//!     let mut flows = FlowConfigStore::new();
//!     flows.add_alternate("thinset", "mastic")?;
//!     flows.set_config("heat", FlowConfigPatch::flow_type(FlowType::IfNecessary))?;
//!
//!     // 2-3. The user picks thinset and opts into the heat mat.
//!     let selections = Selections::new()
//!         .answer("thinset", "thinset")
//!         .select_work("tile", "heat");
//!
//!     // 4. Resolve, then 5. order.
//!     let config = EngineConfig::default();
//!     let resolution = Resolver::new(&flows, &config, ResolutionMode::InitialPlan)
//!         .resolve(&phases, &selections)?;
//!     let plan = enforce_standard_ordering(&resolution.phases);
//!
//!     println!("{}", PlanFormatter::format_plan(&plan));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod decisions;
pub mod error;
pub mod flow;
pub mod model;
pub mod ordering;
pub mod prelude;
pub mod report;
pub mod resolver;
pub mod session;
pub mod storage;
