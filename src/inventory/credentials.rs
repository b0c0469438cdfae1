use aws_config::BehaviorVersion;
use aws_types::region::Region;
use tracing::debug;

/// Explicit replacement for an ambient SDK session: every scan, region
/// lookup, and upload builds its client config through this provider.
///
/// Credentials come from the ambient provider chain (environment, shared
/// config files, instance metadata); the provider only pins the target
/// region and, optionally, a named profile.
#[derive(Debug, Clone, Default)]
pub struct AwsConfigProvider {
    profile: Option<String>,
}

impl AwsConfigProvider {
    pub fn new(profile: Option<String>) -> Self {
        Self { profile }
    }

    /// Build an SDK config scoped to one region.
    pub async fn config_for_region(&self, region: &str) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()));
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }

        let config = loader.load().await;
        debug!("created AWS config for region {}", region);
        config
    }
}
