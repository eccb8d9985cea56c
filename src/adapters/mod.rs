// Adapters layer: concrete clients for the remote services (auth, transport, analysis, pub/sub).

pub mod analysis;
pub mod auth;
pub mod http;
pub mod pubsub;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use analysis::AnalysisClient;
use pubsub::PubsubClient;

/// 依設定建立兩個 client，共用同一個 token provider
pub fn clients_from_config<C: ConfigProvider + ?Sized>(
    config: &C,
) -> Result<(AnalysisClient, PubsubClient)> {
    let tokens = auth::token_provider_from_config(config);

    let analysis = AnalysisClient::new(http::ApiTransport::new(
        config.analysis_endpoint(),
        tokens.clone(),
        config.request_timeout(),
    )?);
    let pubsub = PubsubClient::new(http::ApiTransport::new(
        config.pubsub_endpoint(),
        tokens,
        config.request_timeout(),
    )?)
    .with_settings(config.receive_settings());

    Ok((analysis, pubsub))
}
