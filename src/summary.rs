//! AI product summaries.
//!
//! Each product card owns a [`SummaryCard`]: the first successful summary is
//! cached on the card, a failed attempt leaves the card retryable.

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::{
    api::StorefrontApi,
    error::ClientError,
    models::{SummaryRequest, SummaryResponse},
};

pub const NO_SUMMARY: &str = "No summary available";
pub const SUMMARY_FAILED: &str = "AI summary failed";

/// SummaryCard
///
/// Summary state of one product card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SummaryCard {
    pub summary: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SummaryCard {
    /// Marks the card as loading. Returns `false` when a summary is already cached
    /// or a request is in flight, in which case no call must be made.
    pub fn begin(&mut self) -> bool {
        if self.summary.is_some() || self.loading {
            return false;
        }
        self.error = None;
        self.loading = true;
        true
    }

    /// Records the outcome of the summarize call.
    pub fn finish(&mut self, outcome: Result<SummaryResponse, ClientError>) {
        self.loading = false;
        match outcome {
            Ok(response) => {
                let text = response
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| NO_SUMMARY.to_string());
                self.summary = Some(text);
            }
            Err(e) => {
                tracing::warn!(failure = ?e.kind(), "summary request failed: {}", e);
                self.error = Some(SUMMARY_FAILED.to_string());
            }
        }
    }
}

/// SummaryCards
///
/// The cards of one session, keyed by product id. The lock is released while the
/// remote call is pending so cards never wait on each other.
#[derive(Default)]
pub struct SummaryCards {
    cards: Mutex<HashMap<i64, SummaryCard>>,
}

impl SummaryCards {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card(&self, product_id: i64) -> SummaryCard {
        self.cards
            .lock()
            .get(&product_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Summarizes the product on card `product_id` unless the card already holds a
    /// summary or is loading. Returns the card state afterwards.
    pub async fn summarize(
        &self,
        api: &dyn StorefrontApi,
        product_id: i64,
        request: &SummaryRequest,
    ) -> SummaryCard {
        let should_fetch = self.cards.lock().entry(product_id).or_default().begin();
        if !should_fetch {
            return self.card(product_id);
        }

        let mut in_flight = InFlightCard {
            cards: self,
            product_id,
            armed: true,
        };
        let outcome = api.summarize(request).await;
        in_flight.armed = false;
        drop(in_flight);

        let mut cards = self.cards.lock();
        let card = cards.entry(product_id).or_default();
        card.finish(outcome);
        card.clone()
    }
}

/// Clears the loading flag of a card whose summarize call was cancelled before it
/// finished, leaving the card failed and retryable.
struct InFlightCard<'a> {
    cards: &'a SummaryCards,
    product_id: i64,
    armed: bool,
}

impl Drop for InFlightCard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!(product_id = self.product_id, "summary request cancelled");
        if let Some(card) = self.cards.cards.lock().get_mut(&self.product_id) {
            card.loading = false;
            card.error = Some(SUMMARY_FAILED.to_string());
        }
    }
}
