pub mod fir_decimator;
pub mod firdes;
pub mod spectrum;
pub mod taps;
pub mod window;

pub use fir_decimator::{FirDecimator, apply};
pub use firdes::{DesignMethod, FilterSpec, design_low_pass, design_low_pass_with};
pub use spectrum::{Psd, power_to_db, welch_psd};
pub use taps::TapSequence;
pub use window::Window;
