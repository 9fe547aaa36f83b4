use async_trait::async_trait;
use std::path::Path;

use crate::error::BackendError;
use crate::types::{DistributionKind, SetupRequest};

/// Read-only lookup of action inputs. Unknown or unset names read as "".
pub trait InputSource: Send + Sync {
    fn get_input(&self, name: &str) -> String;
}

/// Write-only channel for build output.
pub trait LogSink: Send + Sync {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn start_group(&self, name: &str);
    fn end_group(&self);
    fn add_matcher(&self, path: &Path);
}

/// Job-scoped key/value store that outlives this step, read later by the
/// post-job step.
pub trait StateStore: Send + Sync {
    fn save_state(&self, name: &str, value: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait NodeDistribution: Send + Sync {
    fn kind(&self) -> DistributionKind;

    fn request(&self) -> &SetupRequest;

    async fn setup_node(&self) -> Result<(), BackendError>;
}

pub trait DistributionFactory: Send + Sync {
    fn create(&self, request: SetupRequest) -> Box<dyn NodeDistribution>;
}

/// Extracts a version spec from files such as `.nvmrc` or `package.json`.
/// Missing or unparseable files yield `None`.
pub trait VersionFileParser: Send + Sync {
    fn parse_version_file(&self, path: &Path) -> Option<String>;
}

pub trait CacheSupport: Send + Sync {
    fn is_available(&self) -> bool;
}

#[async_trait]
pub trait CacheRestorer: Send + Sync {
    async fn restore(
        &self,
        package_manager: &str,
        dependency_path: Option<&str>,
    ) -> Result<(), BackendError>;
}

pub trait AuthConfigurator: Send + Sync {
    fn configure(&self, registry_url: &str, always_auth: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait EnvironmentReporter: Send + Sync {
    async fn report(&self, sink: &dyn LogSink) -> Result<(), BackendError>;
}

impl<T: DistributionFactory + ?Sized> DistributionFactory for Box<T> {
    fn create(&self, request: SetupRequest) -> Box<dyn NodeDistribution> {
        (**self).create(request)
    }
}
