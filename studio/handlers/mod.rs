pub mod dashboard;
pub mod model;
pub mod run;
pub mod run_sse;
pub mod settings;
