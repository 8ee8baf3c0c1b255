//! Collaborator interfaces (§6): the engine depends only on these traits,
//! never on a concrete store, device, or config backend.

pub mod carb_store;
pub mod config_provider;
pub mod dose_store;
pub mod glucose_store;
pub mod math;
pub mod pump;

pub use carb_store::CarbStore;
pub use config_provider::ConfigProvider;
pub use dose_store::DoseStore;
pub use glucose_store::GlucoseStore;
pub use math::{PredictionMath, RecommendationMath};
pub use pump::{PumpDevice, PumpStatusProvider};

#[cfg(any(test, feature = "testing"))]
pub use carb_store::MockCarbStore;
#[cfg(any(test, feature = "testing"))]
pub use config_provider::MockConfigProvider;
#[cfg(any(test, feature = "testing"))]
pub use dose_store::MockDoseStore;
#[cfg(any(test, feature = "testing"))]
pub use glucose_store::MockGlucoseStore;
#[cfg(any(test, feature = "testing"))]
pub use math::{MockPredictionMath, MockRecommendationMath};
#[cfg(any(test, feature = "testing"))]
pub use pump::{MockPumpDevice, MockPumpStatusProvider};
