pub mod clock;
pub mod config;
pub mod dataset;
pub mod error;
pub mod telemetry;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BackendConfig, ChatConfig, GeneralConfig, GradtrackConfig};
pub use error::{GradtrackError, Result};
pub use telemetry::init_tracing;
pub use types::*;
