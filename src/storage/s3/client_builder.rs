use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;

use crate::config::ClientConfig;
use crate::types::S3Credentials;

const CREDENTIALS_PROVIDER_NAME: &str = "s3sweep";

impl ClientConfig {
    /// Build an S3 client from this configuration.
    ///
    /// No request is sent here. Credentials from the environment chain are
    /// resolved lazily on the first call.
    pub async fn create_client(&self) -> Client {
        let mut config_loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(self.region.clone()));

        match &self.credential {
            S3Credentials::Credentials { access_keys } => {
                tracing::debug!("Using AWS credentials from input.");
                config_loader = config_loader.credentials_provider(Credentials::new(
                    access_keys.access_key.clone(),
                    access_keys.secret_access_key.clone(),
                    None,
                    None,
                    CREDENTIALS_PROVIDER_NAME,
                ));
            }
            S3Credentials::FromEnvironment => {
                tracing::debug!("Using AWS credentials from environment.");
            }
        }

        if let Some(endpoint_url) = &self.endpoint_url {
            config_loader = config_loader.endpoint_url(endpoint_url);
        }

        let sdk_config = config_loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(self.force_path_style)
            .build();

        Client::from_conf(s3_config)
    }
}
