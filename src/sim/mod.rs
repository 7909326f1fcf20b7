pub mod confusion;
pub mod engine;
pub mod error;
pub mod metric;
pub mod run_state;
pub mod settings;

pub use confusion::{ConfusionMatrix, DEFAULT_EVAL_SAMPLES, LABELS, NUM_CLASSES};
pub use engine::Engine;
pub use error::{Result, SimError};
pub use metric::{GpuSample, MetricPoint};
pub use run_state::{RunState, DEFAULT_MAX_STEPS};
pub use settings::TrainingSettings;
