pub mod generate;

pub use generate::{complex_tone, impulse, seeded_gaussian};
