//! Keyword mentions for chat context selection.

use cityguide_core::Place;

/// Lowercase keywords extracted from a chat message.
///
/// Words are split on any non-alphanumeric character; only words longer than
/// two characters are kept, each once, in order of first appearance.
///
/// # Examples
/// ```
/// use cityguide_scorer::Keywords;
///
/// let keywords = Keywords::extract("Tell me about Howrah Bridge timings!");
/// assert_eq!(
///     keywords.as_slice(),
///     ["tell", "about", "howrah", "bridge", "timings"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// Minimum number of characters a word must exceed to count.
    pub const MIN_EXCLUSIVE_LEN: usize = 2;

    /// Extract keywords from `message`.
    #[must_use]
    pub fn extract(message: &str) -> Self {
        let mut words: Vec<String> = Vec::new();
        for word in message
            .split(|ch: char| !ch.is_alphanumeric())
            .filter(|word| word.chars().count() > Self::MIN_EXCLUSIVE_LEN)
        {
            let lowered = word.to_lowercase();
            if !words.contains(&lowered) {
                words.push(lowered);
            }
        }
        Self(words)
    }

    /// Whether no keyword qualified.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extracted keywords.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether any keyword appears in the place's name, description,
    /// history, personal tips or category.
    #[must_use]
    pub fn mentioned_by(&self, place: &Place) -> bool {
        if self.0.is_empty() {
            return false;
        }
        let fields = [
            &place.name,
            &place.description,
            &place.history,
            &place.personal_tips,
            &place.category,
        ]
        .map(|field| field.to_lowercase());
        self.0
            .iter()
            .any(|keyword| fields.iter().any(|field| field.contains(keyword.as_str())))
    }
}
