//! Shared test doubles and builders for the integration suite.
#![allow(dead_code)] // not every test binary uses every helper

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use giveaway_core::lifecycle::CreateGiveaway;
use giveaway_core::models::Destination;
use giveaway_core::transport::{Transport, TransportError, TransportResult};

/// Transport double that records every call and can be told to fail
/// private deliveries.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub announcements: Mutex<Vec<(String, String)>>,
    pub updates: Mutex<Vec<(Destination, String)>>,
    pub privates: Mutex<Vec<(String, String)>>,
    pub fail_private: AtomicBool,
    pub fail_announce: AtomicBool,
    next_ref: AtomicU64,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn announcement_count(&self) -> usize {
        self.announcements.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn private_count(&self) -> usize {
        self.privates.lock().unwrap().len()
    }

    pub fn private_recipients(&self) -> Vec<String> {
        self.privates
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn last_update_text(&self) -> Option<String> {
        self.updates
            .lock()
            .unwrap()
            .last()
            .map(|(_, text)| text.clone())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn announce(&self, destination_hint: &str, text: &str) -> TransportResult<Destination> {
        if self.fail_announce.load(Ordering::SeqCst) {
            return Err(TransportError::new("announce", "channel unreachable"));
        }
        self.announcements
            .lock()
            .unwrap()
            .push((destination_hint.to_string(), text.to_string()));
        let message_ref = format!("msg-{}", self.next_ref.fetch_add(1, Ordering::SeqCst));
        Ok(Destination {
            channel: destination_hint.to_string(),
            message_ref,
        })
    }

    async fn update_announcement(
        &self,
        destination: &Destination,
        text: &str,
    ) -> TransportResult<()> {
        self.updates
            .lock()
            .unwrap()
            .push((destination.clone(), text.to_string()));
        Ok(())
    }

    async fn deliver_private(&self, participant_id: &str, text: &str) -> TransportResult<()> {
        if self.fail_private.load(Ordering::SeqCst) {
            return Err(TransportError::new("deliver_private", "recipient blocked"));
        }
        self.privates
            .lock()
            .unwrap()
            .push((participant_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// A well-formed creation request; tweak fields per test
pub fn create_request(winner_count: u32, tokens: &[&str], duration: Duration) -> CreateGiveaway {
    CreateGiveaway {
        title: "Mechanical keyboard".to_string(),
        description: "Community giveaway".to_string(),
        winner_count,
        duration,
        reward_tokens: tokens.iter().map(|t| t.to_string()).collect(),
        destination_hint: "announcements".to_string(),
    }
}
