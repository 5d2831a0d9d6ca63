mod noise;

pub use noise::{NoiseSource, NoiseType, signal_power};
