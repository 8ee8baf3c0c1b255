//! Test utilities and fixtures, usable from this crate's own tests and
//! from downstream crates that enable the `testing` feature.

pub mod fixtures;

pub use crate::ports::{
    MockCarbStore, MockConfigProvider, MockDoseStore, MockGlucoseStore, MockPredictionMath,
    MockPumpDevice, MockPumpStatusProvider, MockRecommendationMath,
};
