pub mod config;
pub mod constants;
pub mod error;
pub mod output;
pub mod processing;
pub mod signal_processing;
pub mod simulation;
pub mod wav;

pub use config::DemoConfig;
pub use error::{FilterError, Result};
pub use processing::{ComparisonResult, FilterSummary, compare, run_comparison};
pub use signal_processing::{FilterSpec, FirDecimator, TapSequence, apply, design_low_pass};
pub use wav::save_iq_wav;
