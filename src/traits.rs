use serde::{Deserialize, Serialize};

/// A note file with at least one line matching a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub path: String,
    /// Matched lines, in the order they appear in the file.
    pub components: Vec<String>,
}

/// Query results in file-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResultSet {
    results: Vec<QueryResult>,
}

impl QueryResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, result: QueryResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryResult> {
        self.results.iter()
    }

    /// Number of matched lines across all files.
    pub fn total_components(&self) -> usize {
        self.results.iter().map(|r| r.components.len()).sum()
    }
}

impl IntoIterator for QueryResultSet {
    type Item = QueryResult;
    type IntoIter = std::vec::IntoIter<QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResultSet {
    type Item = &'a QueryResult;
    type IntoIter = std::slice::Iter<'a, QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Strategy deciding whether a line of a note matches a query.
///
/// Implementations must treat an empty query as matching nothing, and must
/// match every line that contains the query as an exact substring.
pub trait LineMatcher {
    fn matches(&mut self, query: &str, line: &str) -> bool;

    /// Returns every matching line, preserving the order of `lines`.
    ///
    /// Lines are consumed one at a time; only the matches are kept.
    fn find_fragments(
        &mut self,
        query: &str,
        lines: &mut dyn Iterator<Item = String>,
    ) -> Vec<String> {
        lines.filter(|line| self.matches(query, line)).collect()
    }
}

impl<M: LineMatcher + ?Sized> LineMatcher for Box<M> {
    fn matches(&mut self, query: &str, line: &str) -> bool {
        (**self).matches(query, line)
    }

    fn find_fragments(
        &mut self,
        query: &str,
        lines: &mut dyn Iterator<Item = String>,
    ) -> Vec<String> {
        (**self).find_fragments(query, lines)
    }
}
