//! Parametric editing of a shell.
//!
//! A [`Parametrics`] session clones a shell, stages face moves and radius
//! changes on the clone and finally recomputes every affected vertex and
//! edge. The source shell is never modified.

mod config;
mod edit;
mod radius_action;
mod recompute;
mod session;

pub use config::ParametricsConfig;
pub use radius_action::RadiusAction;
pub use session::{Parametrics, ParametricsOutcome};
