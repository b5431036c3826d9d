//! Shared AWS SDK configuration.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tracing::debug;

/// Load AWS configuration from the default provider chain.
///
/// Credentials come from the usual sources (environment, profile, instance
/// metadata). `region` overrides the chain's region when given.
pub async fn load_sdk_config(region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    let config = loader.load().await;
    debug!(region = ?config.region().map(|r| r.as_ref().to_string()), "AWS configuration loaded");
    config
}
