//! Tunables for [`Ranker`](crate::Ranker).

/// Configuration for [`Ranker`](crate::Ranker).
///
/// Search and recommend pool caps bound per-request work independently of
/// corpus size. Pools are taken in name order before scoring, so on corpora
/// larger than a cap the best-scoring place may fall outside the pool. Chat
/// context selection is not capped: it pages through the whole corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankerConfig {
    /// Maximum candidates scored in search mode.
    pub search_pool: usize,
    /// Maximum candidates scored in recommend mode.
    pub recommend_pool: usize,
    /// Maximum places returned as chat context when keywords match.
    pub chat_context_limit: usize,
    /// Maximum places sampled as chat context when nothing matches.
    pub chat_fallback_sample: usize,
    /// Places fetched per page while scanning the corpus for chat keyword
    /// matches.
    pub chat_scan_window: usize,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            search_pool: 500,
            recommend_pool: 800,
            chat_context_limit: 8,
            chat_fallback_sample: 5,
            chat_scan_window: 800,
        }
    }
}
