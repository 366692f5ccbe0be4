//! payment.rs
//!
//! Service layer for payment processing.
//!
//! The booking coordinator only depends on the `PaymentProcessor` trait, so a
//! real gateway integration can replace `MockPaymentGateway` behind the same
//! contract. The mock models the behavior of a real gateway: a network
//! round-trip latency, deterministic rejection of malformed card numbers, and
//! a transient business-rule decline (fraud checks, insufficient funds) with a
//! configurable probability. Latency and decline rate come from configuration
//! so tests can inject zero latency and a fixed decline rate.

use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::PaymentConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct CardDetails {
    // Missing field behaves like an empty card number and fails validation.
    #[serde(default)]
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("Invalid Card Number: Must be 16 digits.")]
    InvalidCard,
    #[error("{0}")]
    Declined(String),
    #[error("Payment gateway timed out.")]
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub transaction_id: String,
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn process(&self, card: &CardDetails, amount: f64)
        -> Result<PaymentReceipt, PaymentError>;
}

/// A card number is valid when it is exactly 16 ASCII digits. Checked before
/// the decline roll, so invalid cards fail deterministically.
pub fn card_number_is_valid(number: &str) -> bool {
    number.len() == 16 && number.bytes().all(|b| b.is_ascii_digit())
}

pub struct MockPaymentGateway {
    latency: Duration,
    decline_rate: f64,
}

impl MockPaymentGateway {
    pub fn new(latency: Duration, decline_rate: f64) -> Self {
        Self {
            latency,
            decline_rate,
        }
    }

    pub fn from_config(config: &PaymentConfig) -> Self {
        Self::new(
            Duration::from_millis(config.latency_ms),
            config.decline_rate,
        )
    }
}

#[async_trait]
impl PaymentProcessor for MockPaymentGateway {
    async fn process(
        &self,
        card: &CardDetails,
        amount: f64,
    ) -> Result<PaymentReceipt, PaymentError> {
        info!("Connecting to bank server... processing ${:.2}", amount);
        tokio::time::sleep(self.latency).await;

        if !card_number_is_valid(&card.number) {
            return Err(PaymentError::InvalidCard);
        }

        if self.decline_rate > 0.0 && rand::thread_rng().gen::<f64>() < self.decline_rate {
            return Err(PaymentError::Declined(
                "Transaction Declined: Insufficient Funds.".to_string(),
            ));
        }

        let transaction_id = format!("txn_{}", &Uuid::new_v4().simple().to_string()[..10]);
        debug!("Payment approved, transaction_id={}", transaction_id);
        Ok(PaymentReceipt { transaction_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn instant_gateway(decline_rate: f64) -> MockPaymentGateway {
        MockPaymentGateway::new(Duration::ZERO, decline_rate)
    }

    fn valid_card() -> CardDetails {
        CardDetails {
            number: "4242424242424242".to_string(),
        }
    }

    #[tokio::test]
    async fn valid_card_succeeds_with_receipt() {
        let gateway = instant_gateway(0.0);
        let receipt = gateway.process(&valid_card(), 10.0).await.unwrap();
        assert!(receipt.transaction_id.starts_with("txn_"));
        assert_eq!(receipt.transaction_id.len(), "txn_".len() + 10);
    }

    #[tokio::test]
    async fn receipts_are_unique() {
        let gateway = instant_gateway(0.0);
        let a = gateway.process(&valid_card(), 10.0).await.unwrap();
        let b = gateway.process(&valid_card(), 10.0).await.unwrap();
        assert_ne!(a.transaction_id, b.transaction_id);
    }

    #[tokio::test]
    async fn short_card_number_is_rejected() {
        let gateway = instant_gateway(0.0);
        let card = CardDetails {
            number: "1234".to_string(),
        };
        let err = gateway.process(&card, 10.0).await.unwrap_err();
        assert_eq!(err, PaymentError::InvalidCard);
    }

    #[tokio::test]
    async fn invalid_card_beats_the_decline_roll() {
        // Even with a guaranteed decline, card validation fails first.
        let gateway = instant_gateway(1.0);
        let card = CardDetails {
            number: "not-a-card-number".to_string(),
        };
        let err = gateway.process(&card, 10.0).await.unwrap_err();
        assert_eq!(err, PaymentError::InvalidCard);
    }

    #[tokio::test]
    async fn full_decline_rate_always_declines_valid_cards() {
        let gateway = instant_gateway(1.0);
        for _ in 0..20 {
            let err = gateway.process(&valid_card(), 10.0).await.unwrap_err();
            assert!(matches!(err, PaymentError::Declined(_)));
        }
    }

    #[tokio::test]
    async fn missing_number_deserializes_to_invalid_card() {
        let card: CardDetails = serde_json::from_str("{}").unwrap();
        let gateway = instant_gateway(0.0);
        let err = gateway.process(&card, 10.0).await.unwrap_err();
        assert_eq!(err, PaymentError::InvalidCard);
    }

    proptest! {
        #[test]
        fn any_non_16_digit_string_is_invalid(number in "[0-9]{0,15}|[0-9]{17,24}") {
            prop_assert!(!card_number_is_valid(&number));
        }

        #[test]
        fn sixteen_digits_are_always_valid(number in "[0-9]{16}") {
            prop_assert!(card_number_is_valid(&number));
        }

        #[test]
        fn non_digit_characters_are_invalid(number in "[0-9]{7}[a-zA-Z ][0-9]{8}") {
            prop_assert!(!card_number_is_valid(&number));
        }
    }
}
