//! Dismissible notices that expire on their own

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Error,
    Info,
}

/// A message shown until dismissed or until its timeout passes
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    shown_at: Instant,
    ttl: Duration,
}

impl Banner {
    pub fn new(message: impl Into<String>, kind: BannerKind, now: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: now,
            ttl,
        }
    }

    pub fn error(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self::new(message, BannerKind::Error, now, ttl)
    }

    pub fn info(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self::new(message, BannerKind::Info, now, ttl)
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}
