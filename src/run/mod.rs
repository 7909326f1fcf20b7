pub mod event;
pub mod loop_fn;
pub mod run_config;

pub use event::{RunEvent, RunOutcome};
pub use loop_fn::run_loop;
pub use run_config::{RunConfig, DEFAULT_TICK};
