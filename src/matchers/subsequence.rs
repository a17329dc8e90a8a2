use crate::traits::LineMatcher;

/// Query characters allowed per typo by [`SubsequenceMatcher::new`].
pub const DEFAULT_CHARS_PER_TYPO: usize = 5;

/// Case-insensitive, in-order character matching with a small typo budget.
///
/// The query is split on whitespace and every term must match the line, in
/// any order. A term matches when its characters appear in the line in order.
/// Failing that, a term may match a single word of the line that starts with
/// the term's first character and shares at least `len(term) - typos` of its
/// characters in order, where `typos` is one per `chars_per_typo` term
/// characters (rounded down).
#[derive(Debug, Clone)]
pub struct SubsequenceMatcher {
    chars_per_typo: Option<usize>,
}

impl SubsequenceMatcher {
    pub fn new() -> Self {
        Self {
            chars_per_typo: Some(DEFAULT_CHARS_PER_TYPO),
        }
    }

    /// Every query character must appear in the line, in order.
    pub fn strict() -> Self {
        Self {
            chars_per_typo: None,
        }
    }

    pub fn with_chars_per_typo(chars_per_typo: usize) -> Self {
        Self {
            chars_per_typo: (chars_per_typo > 0).then_some(chars_per_typo),
        }
    }

    fn allowed_typos(&self, query_len: usize) -> usize {
        self.chars_per_typo.map_or(0, |n| query_len / n)
    }
}

impl Default for SubsequenceMatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().flat_map(char::to_lowercase)
}

fn is_subsequence(needle: &[char], line: &str) -> bool {
    let mut haystack = fold(line);
    needle.iter().all(|c| haystack.any(|h| h == *c))
}

/// Length of the longest common subsequence of `needle` and `line`, stopping
/// early once `enough` is reached.
fn common_subsequence_len(needle: &[char], line: &str, enough: usize) -> usize {
    let mut prev = vec![0usize; needle.len() + 1];
    let mut cur = vec![0usize; needle.len() + 1];
    for h in fold(line) {
        for (j, q) in needle.iter().enumerate() {
            cur[j + 1] = if *q == h {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        if cur[needle.len()] >= enough {
            return cur[needle.len()];
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[needle.len()]
}

impl SubsequenceMatcher {
    fn term_matches(&self, term: &[char], line: &str) -> bool {
        if is_subsequence(term, line) {
            return true;
        }
        let typos = self.allowed_typos(term.len());
        if typos == 0 {
            return false;
        }
        let required = term.len() - typos;
        line.split_whitespace().any(|word| {
            fold(word).next() == term.first().copied()
                && common_subsequence_len(term, word, required) >= required
        })
    }
}

impl LineMatcher for SubsequenceMatcher {
    fn matches(&mut self, query: &str, line: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        let terms: Vec<Vec<char>> = query
            .split_whitespace()
            .map(|term| fold(term).collect())
            .collect();
        if terms.is_empty() {
            // whitespace only
            let needle: Vec<char> = fold(query).collect();
            return is_subsequence(&needle, line);
        }
        terms.iter().all(|term| self.term_matches(term, line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_substring_matches() {
        let mut matcher = SubsequenceMatcher::strict();
        assert!(matcher.matches("search", "fuzzy search is approximate"));
        assert!(matcher.matches("is approx", "fuzzy search is approximate"));
    }

    #[test]
    fn test_case_insensitive() {
        let mut matcher = SubsequenceMatcher::strict();
        assert!(matcher.matches("RUST", "learning rust ownership"));
        assert!(matcher.matches("rust", "RUST OWNERSHIP"));
        assert!(matcher.matches("straße", "STRASSE und STRAßE"));
    }

    #[test]
    fn test_non_contiguous_subsequence() {
        let mut matcher = SubsequenceMatcher::strict();
        assert!(matcher.matches("fzy", "fuzzy"));
        assert!(!matcher.matches("yzf", "fuzzy"));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let mut matcher = SubsequenceMatcher::new();
        assert!(!matcher.matches("", "anything"));
        assert!(!matcher.matches("", ""));
        let lines = vec!["a".to_string(), "".to_string()];
        assert!(matcher.find_fragments("", &mut lines.into_iter()).is_empty());
    }

    #[test]
    fn test_typo_budget() {
        let mut tolerant = SubsequenceMatcher::new();
        let mut strict = SubsequenceMatcher::strict();

        // "cache" has five characters, so one may go unmatched
        assert!(tolerant.matches("cache", "design notes on caching"));
        assert!(!strict.matches("cache", "design notes on caching"));

        // four characters leave no budget
        assert!(!tolerant.matches("rust", "rush hour"));
        assert!(!tolerant.matches("cache", "nothing relevant here"));
    }

    #[test]
    fn test_typos_stay_within_one_word() {
        let mut matcher = SubsequenceMatcher::new();
        assert!(!matcher.matches("cache", "the teacher said"));
        assert!(!matcher.matches("cache", "reaches"));
        assert!(!matcher.matches("cache", "ache and pain"));
        assert!(matcher.matches("cache", "Caching layer"));
    }

    #[test]
    fn test_terms_match_independently() {
        let mut matcher = SubsequenceMatcher::strict();
        assert!(matcher.matches("search fuzzy", "fuzzy search is approximate"));
        assert!(!matcher.matches("search kubernetes", "fuzzy search is approximate"));
        assert!(matcher.matches(" ", "two words"));
        assert!(!matcher.matches(" ", "oneword"));

        let mut tolerant = SubsequenceMatcher::new();
        assert!(tolerant.matches("fuzzy cache", "fuzzy caching"));
        assert!(!tolerant.matches("fuzzy cache", "fuzzy teacher"));
    }

    #[test]
    fn test_custom_typo_budget() {
        let mut generous = SubsequenceMatcher::with_chars_per_typo(2);
        assert!(generous.matches("rust", "rush hour"));
        let mut disabled = SubsequenceMatcher::with_chars_per_typo(0);
        assert!(!disabled.matches("cache", "design notes on caching"));
    }

    #[test]
    fn test_common_subsequence_len() {
        let needle: Vec<char> = "cache".chars().collect();
        assert_eq!(common_subsequence_len(&needle, "caching", usize::MAX), 4);
        assert_eq!(common_subsequence_len(&needle, "", usize::MAX), 0);
        assert_eq!(common_subsequence_len(&needle, "xcachex", usize::MAX), 5);
    }

    #[test]
    fn test_find_fragments_preserves_line_order() {
        let mut matcher = SubsequenceMatcher::new();
        let lines: Vec<String> = vec![
            "second brain".to_string(),
            "nothing".to_string(),
            "brain dump".to_string(),
        ];
        assert_eq!(
            matcher.find_fragments("brain", &mut lines.into_iter()),
            vec!["second brain".to_string(), "brain dump".to_string()]
        );
    }
}
