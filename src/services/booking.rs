//! booking.rs
//!
//! The booking coordinator: the one multi-step flow in the system. For a
//! reservation request it validates the showtime and seat, pre-checks
//! availability, charges the card through the payment processor, commits the
//! booking, and broadcasts `seat_booked` to connected clients.
//!
//! Double-booking protection lives in the store: the unique constraint on
//! (showtime_id, seat_code) decides every race, and a lost race surfaces as
//! `SeatTaken`, not a server error. The availability pre-check is only a fast
//! path that avoids charging a card for a seat that is already gone.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

use crate::{
    database::Database,
    errors::ApiError,
    models::{Booking, Seat, Showtime},
    services::broadcast::{SeatBooked, SeatEventBroadcaster},
    services::payment::{CardDetails, PaymentError, PaymentProcessor, PaymentReceipt},
    AppState,
};

/// Storage operations the coordinator needs. Postgres implements this via the
/// model helpers; tests drive the coordinator through an in-memory store.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_showtime(&self, showtime_id: i64) -> Result<Option<Showtime>, sqlx::Error>;

    async fn seat_exists(&self, theater_id: i64, seat_code: &str) -> Result<bool, sqlx::Error>;

    async fn booking_exists(&self, showtime_id: i64, seat_code: &str)
        -> Result<bool, sqlx::Error>;

    /// `None` means the (showtime_id, seat_code) pair was already booked.
    async fn insert_booking(
        &self,
        user_id: i64,
        showtime_id: i64,
        seat_code: &str,
        transaction_id: &str,
    ) -> Result<Option<i64>, sqlx::Error>;
}

#[async_trait]
impl BookingStore for Database {
    async fn find_showtime(&self, showtime_id: i64) -> Result<Option<Showtime>, sqlx::Error> {
        Showtime::find_by_id(showtime_id, self).await
    }

    async fn seat_exists(&self, theater_id: i64, seat_code: &str) -> Result<bool, sqlx::Error> {
        Seat::exists(theater_id, seat_code, self).await
    }

    async fn booking_exists(
        &self,
        showtime_id: i64,
        seat_code: &str,
    ) -> Result<bool, sqlx::Error> {
        Booking::exists(showtime_id, seat_code, self).await
    }

    async fn insert_booking(
        &self,
        user_id: i64,
        showtime_id: i64,
        seat_code: &str,
        transaction_id: &str,
    ) -> Result<Option<i64>, sqlx::Error> {
        Booking::insert(user_id, showtime_id, seat_code, transaction_id, self).await
    }
}

#[derive(Debug)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub transaction_id: String,
}

/// Request-scoped coordinator; holds no state across requests.
pub struct BookingCoordinator {
    store: Arc<dyn BookingStore>,
    payment: Arc<dyn PaymentProcessor>,
    broadcaster: SeatEventBroadcaster,
    payment_deadline: Duration,
}

impl BookingCoordinator {
    pub fn new(
        store: Arc<dyn BookingStore>,
        payment: Arc<dyn PaymentProcessor>,
        broadcaster: SeatEventBroadcaster,
        payment_deadline: Duration,
    ) -> Self {
        Self {
            store,
            payment,
            broadcaster,
            payment_deadline,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            Arc::new(state.db.clone()),
            state.payment.clone(),
            state.broadcaster.clone(),
            Duration::from_secs(state.config.payment.timeout_seconds),
        )
    }

    pub async fn reserve(
        &self,
        user_id: i64,
        showtime_id: i64,
        seat_code: &str,
        card: &CardDetails,
    ) -> Result<BookingConfirmation, ApiError> {
        // 1. The showtime must exist; its price drives the charge.
        let showtime = self
            .store
            .find_showtime(showtime_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Showtime not found".to_string()))?;

        // 2. The seat code must be registered to the showtime's theater.
        if !self.store.seat_exists(showtime.theater_id, seat_code).await? {
            return Err(ApiError::InvalidSeat(seat_code.to_string()));
        }

        // 3. Availability fast path: don't charge a card for a seat that is
        //    already gone. The insert below is authoritative.
        if self.store.booking_exists(showtime_id, seat_code).await? {
            return Err(ApiError::SeatTaken);
        }

        // 4. Charge the card. Declines abort before anything is persisted and
        //    are never retried with the same card.
        let receipt = self.charge(card, showtime.price).await?;

        // 5. Commit. No returned row means a concurrent request won the race
        //    between the pre-check and this insert. The card was already
        //    charged at this point; there is no compensating refund.
        let booking_id = self
            .store
            .insert_booking(user_id, showtime_id, seat_code, &receipt.transaction_id)
            .await?;

        let booking_id = match booking_id {
            Some(id) => id,
            None => {
                warn!(
                    showtime_id,
                    seat_code, "lost booking race after payment, surfacing SeatTaken"
                );
                return Err(ApiError::SeatTaken);
            }
        };

        // 6. Fire-and-forget notification; delivery problems never roll back
        //    or fail the booking.
        self.broadcaster.publish(SeatBooked {
            showtime_id,
            seat_code: seat_code.to_string(),
        });

        info!(
            booking_id,
            showtime_id,
            seat_code,
            transaction_id = %receipt.transaction_id,
            "booking confirmed"
        );

        Ok(BookingConfirmation {
            booking_id,
            transaction_id: receipt.transaction_id,
        })
    }

    // The processor call is bounded by a deadline so a stalled gateway cannot
    // pin the request forever.
    async fn charge(&self, card: &CardDetails, amount: f64) -> Result<PaymentReceipt, ApiError> {
        match timeout(self.payment_deadline, self.payment.process(card, amount)).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(err)) => Err(ApiError::PaymentDeclined(err.to_string())),
            Err(_) => {
                warn!(
                    "payment gateway exceeded {}s deadline",
                    self.payment_deadline.as_secs()
                );
                Err(ApiError::PaymentDeclined(PaymentError::TimedOut.to_string()))
            }
        }
    }
}
