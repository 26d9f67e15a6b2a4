pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{BrepEditError, Result};
pub use operations::parametrics::{Parametrics, ParametricsConfig, ParametricsOutcome, RadiusAction};
pub use topology::TopologyStore;
