//! Job context
//!
//! Carries the configuration, the driver's platform and the job's
//! logging span into the synchronizer and orchestrator constructors.

use tracing::Span;

use crate::config::RayConfig;
use crate::domain::value_objects::Platform;

/// Everything a job's sync components share
#[derive(Debug, Clone)]
pub struct JobContext {
    config: RayConfig,
    driver_platform: Platform,
    span: Span,
}

impl JobContext {
    /// Context for a job driven from this machine
    pub fn new(config: RayConfig) -> Self {
        let span = tracing::info_span!(
            "job",
            driver = %config.driver.hostname_or_ip_address,
            worker = %config.worker.hostname_or_ip_address,
        );
        Self {
            config,
            driver_platform: Platform::current(),
            span,
        }
    }

    /// Override the driver platform (the process's platform by default)
    pub fn with_driver_platform(mut self, platform: Platform) -> Self {
        self.driver_platform = platform;
        self
    }

    pub fn config(&self) -> &RayConfig {
        &self.config
    }

    pub fn driver_platform(&self) -> Platform {
        self.driver_platform
    }

    /// Span every sync operation of this job is logged under
    pub fn span(&self) -> &Span {
        &self.span
    }
}
