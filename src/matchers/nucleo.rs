use crate::traits::LineMatcher;
use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

/// Fuzzy line matching backed by nucleo-matcher.
///
/// The whole query is one fuzzy atom, so every character must appear in the
/// line in order. No typos are tolerated.
pub struct NucleoMatcher {
    matcher: Matcher,
    buf: Vec<char>,
    atom: Option<(String, Atom)>,
}

impl NucleoMatcher {
    pub fn new() -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            buf: Vec::new(),
            atom: None,
        }
    }

    fn refresh_atom(&mut self, query: &str) {
        if matches!(&self.atom, Some((cached, _)) if cached == query) {
            return;
        }
        let atom = Atom::new(
            query,
            CaseMatching::Ignore,
            Normalization::Smart,
            AtomKind::Fuzzy,
            false,
        );
        self.atom = Some((query.to_string(), atom));
    }
}

impl Default for NucleoMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LineMatcher for NucleoMatcher {
    fn matches(&mut self, query: &str, line: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        self.refresh_atom(query);
        let Some((_, atom)) = &self.atom else {
            return false;
        };
        let haystack = Utf32Str::new(line, &mut self.buf);
        atom.score(haystack, &mut self.matcher).is_some()
    }
}
