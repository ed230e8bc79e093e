use strsim::levenshtein;

use crate::model::config::SearchSettings;
use crate::model::item::{Record, SearchField};

/// A ranked search hit
#[derive(Debug, Clone, Copy)]
pub struct Match<'a, T> {
    pub item: &'a T,
    /// Position in the indexed collection
    pub index: usize,
    /// Error in `[0, 1]`; 0 is a perfect match
    pub score: f64,
}

/// Approximate-match index over one snapshot of a collection.
///
/// Build a new index whenever the collection changes; there is no
/// incremental update.
pub struct FuzzyIndex<'a, T> {
    items: &'a [T],
    /// Lowercased searchable text, one `Vec<char>` per field per item
    haystacks: Vec<Vec<Vec<char>>>,
    threshold: f64,
}

impl<'a, T: Record> FuzzyIndex<'a, T> {
    pub fn build(items: &'a [T], fields: &[SearchField], threshold: f64) -> Self {
        let haystacks = items
            .iter()
            .map(|item| {
                fields
                    .iter()
                    .filter_map(|f| item.field(*f))
                    .filter(|text| !text.is_empty())
                    .map(|text| text.to_lowercase().chars().collect())
                    .collect()
            })
            .collect();
        FuzzyIndex {
            items,
            haystacks,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn from_settings(items: &'a [T], settings: &SearchSettings) -> Self {
        Self::build(items, &settings.fields, settings.threshold)
    }

    /// The indexed collection, in input order
    pub fn items(&self) -> &'a [T] {
        self.items
    }

    /// Matching items, best first. A blank query yields every item in input
    /// order.
    pub fn search(&self, query: &str) -> SearchResults<'a, T> {
        let order: Vec<usize> = if query.trim().is_empty() {
            (0..self.items.len()).collect()
        } else {
            self.scored(query).into_iter().map(|m| m.index).collect()
        };
        SearchResults {
            items: self.items,
            order: order.into_iter(),
        }
    }

    /// Scored matches for a non-blank query, best first (ties keep input
    /// order). A blank query scores nothing.
    pub fn scored(&self, query: &str) -> Vec<Match<'a, T>> {
        let tokens: Vec<Vec<char>> = query
            .to_lowercase()
            .split_whitespace()
            .map(|t| t.chars().collect())
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<Match<'a, T>> = self
            .haystacks
            .iter()
            .enumerate()
            .filter_map(|(index, fields)| {
                let score = self.score_item(&tokens, fields)?;
                Some(Match {
                    item: &self.items[index],
                    index,
                    score,
                })
            })
            .collect();

        // sort_by is stable, so equal scores keep input order
        matches.sort_by(|a, b| a.score.total_cmp(&b.score));
        matches
    }

    /// Every token must match some field within the threshold; the item's
    /// score is the mean of the best per-token errors.
    fn score_item(&self, tokens: &[Vec<char>], fields: &[Vec<char>]) -> Option<f64> {
        let mut total = 0.0;
        for token in tokens {
            let best = fields
                .iter()
                .map(|text| token_error(token, text))
                .fold(1.0_f64, f64::min);
            if best > self.threshold {
                return None;
            }
            total += best;
        }
        Some(total / tokens.len() as f64)
    }
}

/// Lazily yields items in ranked order
pub struct SearchResults<'a, T> {
    items: &'a [T],
    order: std::vec::IntoIter<usize>,
}

impl<'a, T> Iterator for SearchResults<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.order.next().map(|i| &self.items[i])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<T> ExactSizeIterator for SearchResults<'_, T> {}

/// Error of one query token against one field, in `[0, 1]`.
///
/// A substring hit anywhere in the text is a perfect match. Otherwise the
/// token is compared against every window of the text within one character
/// of its own length, and the best edit distance is normalised by the token
/// length.
fn token_error(token: &[char], text: &[char]) -> f64 {
    let n = token.len();
    if n == 0 {
        return 0.0;
    }
    if text.len() >= n && text.windows(n).any(|w| w == token) {
        return 0.0;
    }

    let needle: String = token.iter().collect();
    let min_len = n.saturating_sub(1).max(1);
    let max_len = n + 1;

    let mut best = n;
    if text.len() < min_len {
        let whole: String = text.iter().collect();
        best = best.min(levenshtein(&needle, &whole));
    } else {
        for len in min_len..=max_len.min(text.len()) {
            for window in text.windows(len) {
                let hay: String = window.iter().collect();
                best = best.min(levenshtein(&needle, &hay));
                if best == 0 {
                    return 0.0;
                }
            }
        }
    }
    (best as f64 / n as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::item::{Contact, TodoItem};

    fn todos() -> Vec<TodoItem> {
        let mut venue = TodoItem::new("1", "Book the venue", "Venue");
        venue.note = Some("Ask about the rain plan".into());
        let photographer = TodoItem::new("2", "Hire photographer", "Photographer");
        let cake = TodoItem::new("3", "Cake tasting", "Baker");
        let dj = TodoItem::new("4", "Send DJ playlist", "DJ");
        vec![venue, photographer, cake, dj]
    }

    const FIELDS: [SearchField; 3] = [SearchField::Name, SearchField::Note, SearchField::Category];

    fn ids<'a>(iter: impl Iterator<Item = &'a TodoItem>) -> Vec<&'a str> {
        iter.map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn blank_query_returns_everything_in_order() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.3);
        assert_eq!(ids(index.search("")), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(index.search("   ")), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn substring_match_is_case_insensitive() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.3);
        assert_eq!(ids(index.search("CAKE")), vec!["3"]);
    }

    #[test]
    fn tolerates_typos() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.3);
        assert_eq!(ids(index.search("photgrapher")), vec!["2"]);
    }

    #[test]
    fn searches_note_field() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.3);
        assert_eq!(ids(index.search("rain")), vec!["1"]);
    }

    #[test]
    fn note_not_searched_unless_configured() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &[SearchField::Name], 0.3);
        assert_eq!(index.search("rain").count(), 0);
    }

    #[test]
    fn ranks_exact_before_approximate() {
        let items = vec![
            Contact::new("a", "Florence Bakery", "Baker"),
            Contact::new("b", "Florist Ana", "Florist"),
        ];
        let index = FuzzyIndex::build(&items, &[SearchField::Name], 0.4);
        let hits = index.scored("florist");
        assert_eq!(hits[0].item.id, "b");
        assert_eq!(hits[0].score, 0.0);
        assert!(hits.iter().all(|m| m.score <= 0.4));
    }

    #[test]
    fn every_token_must_match() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.3);
        assert_eq!(ids(index.search("send playlist")), vec!["4"]);
        assert_eq!(index.search("send zebra").count(), 0);
    }

    #[test]
    fn zero_threshold_means_substring_only() {
        let items = todos();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.0);
        assert_eq!(index.search("photgrapher").count(), 0);
        assert_eq!(ids(index.search("photo")), vec!["2"]);
    }

    #[test]
    fn empty_collection() {
        let items: Vec<TodoItem> = Vec::new();
        let index = FuzzyIndex::build(&items, &FIELDS, 0.3);
        assert_eq!(index.search("anything").count(), 0);
        assert_eq!(index.search("").count(), 0);
    }

    #[test]
    fn token_error_bounds() {
        let t: Vec<char> = "dj".chars().collect();
        let text: Vec<char> = "de".chars().collect();
        assert_eq!(token_error(&t, &text), 0.5);
        let short: Vec<char> = "x".chars().collect();
        assert_eq!(token_error(&"abcd".chars().collect::<Vec<_>>(), &short), 1.0);
    }
}
