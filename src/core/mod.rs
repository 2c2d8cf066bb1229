//! Core data models, provider registry, and synchronization.

pub mod clock;
pub mod defaults;
pub mod enrich;
pub mod filter;
pub mod http;
pub mod logging;
pub mod models;
pub mod provider;
pub mod sync;

pub use clock::{Clock, ManualClock};
pub use filter::{ModelFilter, Page, SortDirection, SortField, paginate, sort_models};
pub use models::{CapabilitySource, Model, ModelCapability, RobotOutput};
pub use provider::{AuthStyle, ProviderConfig, ProviderRegistry};
pub use sync::{
    ModelSynchronizer, ProviderRefresh, RefreshOutcome, RefreshReport, VerificationReport,
};
