//! External reference rate lookups

use anyhow::{Context, Result};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use super::retry::{RetryConfig, retry_with_backoff};

/// Fetch a base/token reference rate from an external ticker endpoint,
/// expected to answer with a JSON object carrying a string `price`
/// field. Telemetry only: the engine never reads this value, so failures
/// stay at the keeper boundary instead of entering the trade error
/// taxonomy.
pub async fn get_reference_rate(url: &str) -> Result<Decimal> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .context("Failed to build HTTP client")?;

    let operation = || async {
        let response = client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("⚠️ Reference endpoint returned {}: {}", status, body);
            return Err(anyhow::anyhow!("Reference endpoint error: {status} - {body}"));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse JSON response")?;

        let price_str = json["price"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Missing 'price' field in response"))?;

        Decimal::from_str(price_str).context("Failed to parse price string")
    };

    let price = retry_with_backoff(
        operation,
        &RetryConfig {
            max_attempts: 3,
            initial_delay_ms: 200,
            ..Default::default()
        },
        "Reference rate fetch",
    )
    .await?;

    if price <= dec!(0) || price > dec!(100000) {
        warn!("⚠️ Reference rate outside valid range: {}", price);
        anyhow::bail!("Reference rate {price} outside valid range");
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn parses_a_ticker_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rate")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"symbol":"ETHUSDC","price":"2450.10"}"#)
            .create_async()
            .await;

        let rate = get_reference_rate(&format!("{}/rate", server.url()))
            .await
            .unwrap();
        assert_eq!(rate, dec!(2450.10));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn missing_price_field_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rate")
            .with_status(200)
            .with_body(r#"{"symbol":"ETHUSDC"}"#)
            .create_async()
            .await;

        let result = get_reference_rate(&format!("{}/rate", server.url())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_errors_are_retried_then_surfaced() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rate")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let result = get_reference_rate(&format!("{}/rate", server.url())).await;
        assert!(result.is_err());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn out_of_range_rate_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rate")
            .with_status(200)
            .with_body(r#"{"price":"0"}"#)
            .create_async()
            .await;

        let result = get_reference_rate(&format!("{}/rate", server.url())).await;
        assert!(result.is_err());
    }
}
