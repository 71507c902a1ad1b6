use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;

/// S3 client from the default credential and region chain.
pub async fn build_client() -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    Client::new(&config)
}
