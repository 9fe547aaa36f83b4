mod error;
mod traits;
mod types;

pub use error::BackendError;
pub use traits::{
    AuthConfigurator, CacheRestorer, CacheSupport, DistributionFactory, EnvironmentReporter,
    InputSource, LogSink, NodeDistribution, StateStore, VersionFileParser,
};
pub use types::{DistributionKind, NodeVersion, SetupRequest, VersionComponent, VersionParseError};
