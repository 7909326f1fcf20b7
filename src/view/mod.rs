pub mod chart;
pub mod frame;
pub mod gauge;
pub mod grid;
pub mod progress;
pub mod series;
pub mod topology;

pub use frame::{RunExport, StepFrame};
pub use gauge::{band_index, to_gauge_value, GaugeBand, GAUGE_BANDS};
pub use grid::{to_grid_view, GridView};
pub use progress::to_progress_percent;
pub use series::{to_series, Field};
pub use topology::{Edge, Node, Topology, DEFAULT_LAYERS};
