//! Context selection for the chat assistant.

use cityguide_core::{FetchWindow, Place, PlaceFilter, PlaceRepository};
use cityguide_scorer::Keywords;
use log::{debug, warn};
use rand::Rng;
use rand::seq::index;

use crate::Ranker;
use crate::ranker::Candidate;

impl<R> Ranker<R>
where
    R: PlaceRepository,
{
    /// Select places to ground a chat answer about `message`.
    ///
    /// Uses the thread-local RNG for the fallback sample. See
    /// [`select_chat_context_with_rng`](Self::select_chat_context_with_rng).
    #[must_use]
    pub fn select_chat_context(&self, message: &str) -> Vec<Place> {
        self.select_chat_context_with_rng(message, &mut rand::thread_rng())
    }

    /// Select places to ground a chat answer about `message`.
    ///
    /// Places whose name, description, history, personal tips or category
    /// mention any keyword of the message are returned in name order, up to
    /// the configured context limit. The whole corpus is scanned, one window
    /// at a time. When nothing qualifies, a random sample drawn from the
    /// whole corpus is returned instead, so context is empty only when the
    /// repository is.
    ///
    /// # Examples
    /// ```
    /// use cityguide_core::{MemoryPlaceRepository, RawPlace};
    /// use cityguide_ranker::Ranker;
    ///
    /// let ranker = Ranker::new(MemoryPlaceRepository::with_places([
    ///     RawPlace::default().with("id", "1").with("name", "Howrah Bridge"),
    ///     RawPlace::default().with("id", "2").with("name", "Esplanade"),
    /// ]));
    /// let context = ranker.select_chat_context_with_rng(
    ///     "Tell me about Howrah Bridge timings",
    ///     &mut rand::thread_rng(),
    /// );
    /// assert_eq!(context.len(), 1);
    /// assert_eq!(context[0].name, "Howrah Bridge");
    /// ```
    pub fn select_chat_context_with_rng<G>(&self, message: &str, rng: &mut G) -> Vec<Place>
    where
        G: Rng + ?Sized,
    {
        let keywords = Keywords::extract(message);
        let matched = self.keyword_matches(&keywords);
        if !matched.is_empty() {
            debug!("chat context matched {} places", matched.len());
            return matched
                .iter()
                .map(|candidate| self.hydrate(&candidate.raw))
                .collect();
        }
        self.random_sample(rng)
    }

    /// Scan the corpus in name order until enough places mention a keyword.
    fn keyword_matches(&self, keywords: &Keywords) -> Vec<Candidate> {
        let wanted = self.config().chat_context_limit;
        let window_size = self.config().chat_scan_window.max(1);
        let filter = PlaceFilter::default();
        let mut matched = Vec::new();
        if keywords.is_empty() {
            return matched;
        }

        let mut offset = 0;
        while matched.len() < wanted {
            let scanned = self.pool(
                &filter,
                FetchWindow {
                    offset,
                    limit: window_size,
                },
            );
            let exhausted = scanned.len() < window_size;
            let remaining = wanted.saturating_sub(matched.len());
            matched.extend(
                scanned
                    .into_iter()
                    .filter(|candidate| keywords.mentioned_by(&candidate.place))
                    .take(remaining),
            );
            if exhausted {
                break;
            }
            offset = offset.saturating_add(window_size);
        }
        matched
    }

    /// Draw distinct places uniformly from the whole corpus.
    fn random_sample<G>(&self, rng: &mut G) -> Vec<Place>
    where
        G: Rng + ?Sized,
    {
        let filter = PlaceFilter::default();
        let total = self.repository().count_by_filter(&filter).unwrap_or_else(|err| {
            warn!("counting places for the chat sample failed, sampling none: {err}");
            0
        });
        let amount = self.config().chat_fallback_sample.min(total);
        debug!("no chat keywords matched; sampling {amount} of {total} places");
        index::sample(rng, total, amount)
            .into_iter()
            .flat_map(|offset| self.pool(&filter, FetchWindow { offset, limit: 1 }))
            .map(|candidate| self.hydrate(&candidate.raw))
            .collect()
    }
}
