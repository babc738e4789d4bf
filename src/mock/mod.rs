mod generator;

pub use generator::{MockConfig, MockGenerator};
