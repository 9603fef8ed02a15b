//! Animation documents served over HTTP

use super::{AnimationResource, AnimationSource, FetchError};
use async_trait::async_trait;
use board_common::ClientConfig;
use board_core::Rating;
use reqwest::Client;
use std::time::Duration;

/// Fetches `{base_url}/{code}/lottie.json` for each rating
#[derive(Debug, Clone)]
pub struct HttpAnimationSource {
    client: Client,
    base_url: String,
}

impl HttpAnimationSource {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::new(client, config.animation_base_url.clone()))
    }

    /// Resource URL for a rating
    pub fn url_for(&self, rating: Rating) -> String {
        format!("{}/{}/lottie.json", self.base_url, rating.animation_code())
    }
}

#[async_trait]
impl AnimationSource for HttpAnimationSource {
    async fn fetch(&self, rating: Rating) -> Result<AnimationResource, FetchError> {
        let response = self.client.get(self.url_for(rating)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let data: serde_json::Value = response.json().await?;
        Ok(AnimationResource::new(rating, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_noto_layout() {
        let source = HttpAnimationSource::new(
            Client::new(),
            "https://fonts.gstatic.com/s/e/notoemoji/latest/",
        );
        assert_eq!(
            source.url_for(Rating::VeryGood),
            "https://fonts.gstatic.com/s/e/notoemoji/latest/1f603/lottie.json"
        );
        assert_eq!(
            source.url_for(Rating::Disappointed),
            "https://fonts.gstatic.com/s/e/notoemoji/latest/1f61e/lottie.json"
        );
    }

    #[test]
    fn test_from_config_uses_configured_base() {
        let config = ClientConfig {
            animation_base_url: "http://cdn.test/emoji".to_string(),
            ..ClientConfig::default()
        };
        let source = HttpAnimationSource::from_config(&config).unwrap();
        assert_eq!(source.url_for(Rating::Neutral), "http://cdn.test/emoji/1f610/lottie.json");
    }
}
