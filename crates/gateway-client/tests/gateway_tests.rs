//! Tests for gateway-client.
//!
//! The live tests require a reachable gateway and are ignored by default:
//!
//!   GATEWAY_URL=http://localhost:3001 GATEWAY_TOKEN=... \
//!   GATEWAY_TEST_NUMBER=5548999998888 \
//!   cargo test --test gateway_tests -- --ignored

use std::env;
use std::time::Duration;

use gateway_client::{GatewayClient, GatewayConfig, TargetOutcome, DEFAULT_TIMEOUT};

/// Helper to build a live config from the environment.
fn live_config() -> Option<GatewayConfig> {
    let url = env::var("GATEWAY_URL").ok()?;
    let token = env::var("GATEWAY_TOKEN").ok()?;
    Some(GatewayConfig::new(url, token))
}

mod config_tests {
    use super::*;

    #[test]
    fn test_config_urls() {
        let config = GatewayConfig::new("http://localhost:3001", "tok");
        assert_eq!(config.send_url(), "http://localhost:3001/send");
        assert_eq!(config.status_url(), "http://localhost:3001/status");
    }

    #[test]
    fn test_config_default_timeout() {
        let config = GatewayConfig::new("http://localhost:3001", "tok");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_config_with_timeout() {
        let config = GatewayConfig::new("http://localhost:3001", "tok")
            .with_timeout(Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_config_debug_redacts_token() {
        let config = GatewayConfig::new("http://localhost:3001", "super-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_client_debug_redacts_token() {
        let config = GatewayConfig::new("http://localhost:3001", "super-secret");
        let client = GatewayClient::new(config).unwrap();
        let rendered = format!("{:?}", client);
        assert!(!rendered.contains("super-secret"));
    }
}

mod outcome_tests {
    use super::*;

    #[test]
    fn test_outcome_serde_shape() {
        let outcome = TargetOutcome::delivered("5548999998888", "ok");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["number"], "5548999998888");
        assert_eq!(json["success"], true);
        assert_eq!(json["response"], "ok");
        // Failed-only field is omitted entirely
        assert!(json.get("error").is_none());
    }
}

mod live_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires a running gateway"]
    async fn test_health_check() {
        let _ = dotenvy::dotenv();
        let config = live_config().expect("GATEWAY_URL and GATEWAY_TOKEN must be set");
        let client = GatewayClient::new(config).unwrap();

        let healthy = client.health_check().await.unwrap();
        assert!(healthy);
    }

    #[tokio::test]
    #[ignore = "requires a running gateway and sends a real message"]
    async fn test_send_text() {
        let _ = dotenvy::dotenv();
        let config = live_config().expect("GATEWAY_URL and GATEWAY_TOKEN must be set");
        let number = env::var("GATEWAY_TEST_NUMBER").expect("GATEWAY_TEST_NUMBER must be set");
        let client = GatewayClient::new(config).unwrap();

        let ack = client
            .send_text(&number, "Mensagem de teste do gateway-client")
            .await
            .unwrap();
        assert!(!ack.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running gateway and sends real messages"]
    async fn test_send_batch_partial_failure() {
        let _ = dotenvy::dotenv();
        let config = live_config().expect("GATEWAY_URL and GATEWAY_TOKEN must be set");
        let number = env::var("GATEWAY_TEST_NUMBER").expect("GATEWAY_TEST_NUMBER must be set");
        let client = GatewayClient::new(config).unwrap();

        // The second entry is not a dialable number; the batch must still
        // produce an outcome for every entry.
        let numbers = vec![number, "0".to_string()];
        let outcomes = client.send_batch("Teste de lote", &numbers).await;
        assert_eq!(outcomes.len(), 2);
    }
}
