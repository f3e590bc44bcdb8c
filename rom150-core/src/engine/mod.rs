//! Per-step decision engine.

pub mod orchestrator;
pub mod step;
pub mod warmup;

pub use orchestrator::Orchestrator;
pub use step::{EntryEvent, ExitEvent, StepInput, StepReport, StepStatus, SymbolPhase};
pub use warmup::WarmupState;
