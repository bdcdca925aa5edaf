use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    services::tracking::alert_trigger::AlertSender,
    types::{location_fix::LocationFix, tracker_error::TrackerError},
};

#[derive(Clone)]
pub struct SmsClientConfig {
    pub host: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
    pub message: String,
}

#[derive(Clone)]
pub struct SmsClient {
    config: SmsClientConfig,
    client: reqwest::Client,
}

#[derive(Serialize, Deserialize)]
pub struct SendSmsRequest {
    pub from: String,
    pub to: String,
    pub text: String,
}

impl SmsClient {
    pub fn new(config: SmsClientConfig) -> Self {
        SmsClient {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub async fn send_sms(&self) -> Result<(), reqwest::Error> {
        self.client
            .post(format!("{}/v1/messages", self.config.host))
            .bearer_auth(&self.config.api_key)
            .json(&SendSmsRequest {
                from: self.config.from.clone(),
                to: self.config.to.clone(),
                text: self.config.message.clone(),
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}

#[async_trait]
impl AlertSender for SmsClient {
    async fn send_alert(&self, _fix: &LocationFix) -> Result<(), TrackerError> {
        self.send_sms()
            .await
            .map_err(|e| TrackerError::NotificationSideEffectFailure(e.to_string()))?;

        info!("SMS sent to {}", self.config.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(host: &str) -> SmsClient {
        SmsClient::new(SmsClientConfig {
            host: host.to_string(),
            api_key: "key".to_string(),
            from: "0200000000".to_string(),
            to: "01012345678".to_string(),
            message: "device contacted".to_string(),
        })
    }

    #[tokio::test]
    async fn sends_configured_message() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("authorization", "Bearer key")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "from": "0200000000",
                "to": "01012345678",
                "text": "device contacted",
            })))
            .with_status(200)
            .create_async()
            .await;

        client(&server.url())
            .send_alert(&LocationFix::new(37.5, 127.0))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gateway_error_is_side_effect_failure() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("POST", "/v1/messages")
            .with_status(500)
            .create_async()
            .await;

        let result = client(&server.url())
            .send_alert(&LocationFix::new(37.5, 127.0))
            .await;

        assert!(matches!(
            result,
            Err(TrackerError::NotificationSideEffectFailure(_))
        ));
    }
}
