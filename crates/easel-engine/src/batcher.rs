//! Outbound command batching and the keepalive policy.

use std::time::{Duration, Instant};

/// Separator between commands within one aggregated frame.
pub const COMMAND_SEPARATOR: &str = "||";
/// Separator between a command name and its positional arguments.
pub const FIELD_SEPARATOR: char = '|';
/// Idle-channel liveness token.
pub const KEEPALIVE_TOKEN: &str = "ping";
/// Outbound silence tolerated before a keepalive is sent.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Accumulates wire commands between ticks and aggregates them into a
/// single frame on flush, or emits a keepalive when the channel is idle.
#[derive(Debug)]
pub struct CommandBatcher {
    pending: Vec<String>,
    last_keepalive: Instant,
}

impl Default for CommandBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBatcher {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            last_keepalive: Instant::now(),
        }
    }

    /// Append one wire command. Content is opaque to the batcher; call
    /// order is preserved end-to-end into the transmitted batch.
    pub fn enqueue(&mut self, command: String) {
        self.pending.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drain pending commands into one aggregated frame, or produce a
    /// keepalive after enough outbound silence. Exactly one of the two per
    /// flush, never an empty frame.
    pub fn flush(&mut self) -> Option<String> {
        self.flush_at(Instant::now())
    }

    fn flush_at(&mut self, now: Instant) -> Option<String> {
        if !self.pending.is_empty() {
            let frame = self.pending.join(COMMAND_SEPARATOR);
            self.pending.clear();
            Some(frame)
        } else if now.duration_since(self.last_keepalive) > KEEPALIVE_INTERVAL {
            self.last_keepalive = now;
            Some(KEEPALIVE_TOKEN.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_joins_commands_in_order() {
        let mut batcher = CommandBatcher::new();
        batcher.enqueue("rect|0|0|10|10|true".into());
        batcher.enqueue("fillStyle|red".into());
        batcher.enqueue("text|5|5|hello".into());

        let frame = batcher.flush().unwrap();
        assert_eq!(frame, "rect|0|0|10|10|true||fillStyle|red||text|5|5|hello");
        assert!(batcher.is_empty());
    }

    #[test]
    fn test_flush_clears_pending() {
        let mut batcher = CommandBatcher::new();
        batcher.enqueue("rect|0|0|1|1|false".into());
        assert!(batcher.flush().is_some());
        // Nothing pending and no silence yet, so nothing goes out.
        assert_eq!(batcher.flush(), None);
    }

    #[test]
    fn test_idle_flush_below_threshold_sends_nothing() {
        let mut batcher = CommandBatcher::new();
        let now = batcher.last_keepalive + Duration::from_secs(14);
        assert_eq!(batcher.flush_at(now), None);
    }

    #[test]
    fn test_idle_flush_past_threshold_sends_keepalive() {
        let mut batcher = CommandBatcher::new();
        let now = batcher.last_keepalive + Duration::from_secs(16);
        assert_eq!(batcher.flush_at(now).as_deref(), Some(KEEPALIVE_TOKEN));

        // Timer was reset, so the next flush is silent again.
        assert_eq!(batcher.flush_at(now + Duration::from_secs(1)), None);
        assert_eq!(
            batcher.flush_at(now + Duration::from_secs(16)).as_deref(),
            Some(KEEPALIVE_TOKEN)
        );
    }

    #[test]
    fn test_data_frame_takes_priority_over_keepalive() {
        let mut batcher = CommandBatcher::new();
        batcher.enqueue("rect|0|0|1|1|false".into());
        let now = batcher.last_keepalive + Duration::from_secs(60);
        assert_eq!(batcher.flush_at(now).as_deref(), Some("rect|0|0|1|1|false"));
    }
}
