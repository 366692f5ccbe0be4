use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

// Bounded; a subscriber that falls this far behind starts skipping events.
const CHANNEL_CAPACITY: usize = 256;

/// Broadcast payload emitted after every committed booking, so clients
/// watching a showtime can mark the seat unavailable in near-real-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatBooked {
    pub showtime_id: i64,
    pub seat_code: String,
}

/// Process-wide pub/sub for seat events. The coordinator publishes through
/// this handle; the WebSocket transport owns subscriber lifecycles. Publishing
/// is fire-and-forget: it never blocks and never fails a booking.
#[derive(Clone)]
pub struct SeatEventBroadcaster {
    tx: broadcast::Sender<SeatBooked>,
}

impl SeatEventBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SeatBooked> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: SeatBooked) {
        // Err just means nobody is listening right now.
        match self.tx.send(event) {
            Ok(receivers) => debug!("seat_booked delivered to {} subscriber(s)", receivers),
            Err(_) => debug!("seat_booked dropped, no subscribers connected"),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for SeatEventBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let broadcaster = SeatEventBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.publish(SeatBooked {
            showtime_id: 7,
            seat_code: "A1".to_string(),
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.showtime_id, 7);
        assert_eq!(event.seat_code, "A1");
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let broadcaster = SeatEventBroadcaster::new();
        broadcaster.publish(SeatBooked {
            showtime_id: 1,
            seat_code: "B2".to_string(),
        });
        assert_eq!(broadcaster.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_gets_its_own_copy() {
        let broadcaster = SeatEventBroadcaster::new();
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();

        broadcaster.publish(SeatBooked {
            showtime_id: 3,
            seat_code: "C4".to_string(),
        });

        assert_eq!(rx1.recv().await.unwrap().seat_code, "C4");
        assert_eq!(rx2.recv().await.unwrap().seat_code, "C4");
    }

    #[test]
    fn event_serializes_with_snake_case_fields() {
        let json = serde_json::to_value(SeatBooked {
            showtime_id: 5,
            seat_code: "D6".to_string(),
        })
        .unwrap();
        assert_eq!(json["showtime_id"], 5);
        assert_eq!(json["seat_code"], "D6");
    }
}
