use std::path::PathBuf;
use std::sync::Arc;

use log::warn;
use setup_node_backend::{DistributionFactory, NodeDistribution, SetupRequest};
use setup_node_platform::WorkflowFiles;

use crate::backend::FnmDistribution;
use crate::detection::{FnmDetection, detect_fnm, detect_fnm_dir};

/// Creates fnm-backed distributions for setup requests.
pub struct FnmProvider {
    detection: FnmDetection,
    files: Arc<WorkflowFiles>,
}

impl FnmProvider {
    #[must_use]
    pub fn new(detection: FnmDetection, files: Arc<WorkflowFiles>) -> Self {
        Self { detection, files }
    }

    pub async fn detect(files: Arc<WorkflowFiles>) -> Self {
        Self::new(detect_fnm().await, files)
    }
}

impl DistributionFactory for FnmProvider {
    fn create(&self, request: SetupRequest) -> Box<dyn NodeDistribution> {
        if !self.detection.found() {
            warn!("fnm was not detected, falling back to a PATH lookup at install time");
        }
        let path = self
            .detection
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("fnm"));
        let distribution = FnmDistribution::new(path, request, Arc::clone(&self.files));
        let distribution = match self.detection.fnm_dir.clone().or_else(detect_fnm_dir) {
            Some(dir) => distribution.with_fnm_dir(dir),
            None => distribution,
        };
        Box::new(distribution)
    }
}
