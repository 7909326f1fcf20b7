pub mod config;
pub mod run;
pub mod sim;
pub mod view;

// Convenience re-exports
pub use config::AppConfig;
pub use run::{run_loop, RunConfig, RunEvent, RunOutcome};
pub use sim::{ConfusionMatrix, Engine, GpuSample, MetricPoint, RunState, SimError, TrainingSettings};
pub use view::{to_gauge_value, to_grid_view, to_progress_percent, to_series, Field, StepFrame, Topology};
