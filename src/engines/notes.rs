use crate::lines::LineReader;
use crate::traits::{LineMatcher, QueryResult, QueryResultSet};
use crate::tree::{DirectoryNode, DirectoryWalker, FileEntry, WalkOptions};
use anyhow::anyhow;
use log::{debug, info};
use std::path::Path;

/// Joins query terms with single spaces.
///
/// Returns `None` when the terms carry no characters other than whitespace,
/// which means there is nothing to filter on.
pub fn join_terms<S: AsRef<str>>(terms: &[S]) -> Option<String> {
    let query = terms
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ");
    if query.trim().is_empty() {
        None
    } else {
        Some(query)
    }
}

/// Files that hold note bodies: `root/<topic>/<year>/<note>/<file>`.
///
/// Files at the root, topic or year level, and anything nested inside a note
/// directory, are not returned.
pub fn note_files(root: &DirectoryNode) -> Vec<&FileEntry> {
    root.dirs
        .iter()
        .flat_map(|topic| &topic.dirs)
        .flat_map(|year| &year.dirs)
        .flat_map(|note| &note.files)
        .collect()
}

/// Answers fuzzy queries against the notes under a zets root.
pub struct ZetQueryEngine<M: LineMatcher> {
    walker: DirectoryWalker,
    matcher: M,
}

impl<M: LineMatcher> ZetQueryEngine<M> {
    pub fn new(options: WalkOptions, matcher: M) -> Self {
        Self {
            walker: DirectoryWalker::new(options),
            matcher,
        }
    }

    pub fn walker(&self) -> &DirectoryWalker {
        &self.walker
    }

    /// Walks `root` and matches every note body line against `terms`.
    ///
    /// Any traversal or read failure aborts the query; no partial results are
    /// returned.
    pub fn query<S: AsRef<str>>(
        &mut self,
        root: &Path,
        terms: &[S],
    ) -> anyhow::Result<QueryResultSet> {
        let tree = self.walker.walk(root)?;
        self.query_tree(&tree, terms)
    }

    /// Same as [`ZetQueryEngine::query`] over a tree that was already walked.
    pub fn query_tree<S: AsRef<str>>(
        &mut self,
        tree: &DirectoryNode,
        terms: &[S],
    ) -> anyhow::Result<QueryResultSet> {
        let mut results = QueryResultSet::new();
        let Some(query) = join_terms(terms) else {
            info!("Empty query for {}, nothing to match", tree.path.display());
            return Ok(results);
        };

        let files = note_files(tree);
        debug!("Scanning {} note files for '{}'", files.len(), query);

        for file in files {
            if file.path.is_dir() {
                debug!("Skipping linked directory {}", file.path.display());
                continue;
            }
            let components = self.match_file(&query, file)?;
            if components.is_empty() {
                continue;
            }
            debug!(
                "{} matched {} line(s)",
                file.path.display(),
                components.len()
            );
            results.push(QueryResult {
                path: file.path.to_string_lossy().to_string(),
                components,
            });
        }

        info!(
            "Query '{}' matched {} file(s), {} line(s)",
            query,
            results.len(),
            results.total_components()
        );
        Ok(results)
    }

    /// Streams `file` line by line through the matcher, keeping only matches.
    fn match_file(&mut self, query: &str, file: &FileEntry) -> anyhow::Result<Vec<String>> {
        let mut read_error = None;
        let components = {
            let mut lines = LineReader::open(&file.path)?.map_while(|line| match line {
                Ok(line) => Some(line),
                Err(e) => {
                    read_error = Some(e);
                    None
                }
            });
            self.matcher.find_fragments(query, &mut lines)
        };
        match read_error {
            Some(e) => Err(anyhow!("Failed to read {}: {}", file.path.display(), e)),
            None => Ok(components),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::SubsequenceMatcher;
    use std::fs;
    use tempfile::TempDir;

    fn write_note(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn create_test_engine() -> ZetQueryEngine<SubsequenceMatcher> {
        ZetQueryEngine::new(WalkOptions::default(), SubsequenceMatcher::new())
    }

    #[test]
    fn test_join_terms() {
        assert_eq!(join_terms(&["fuzzy", "search"]), Some("fuzzy search".to_string()));
        assert_eq!(join_terms(&["one"]), Some("one".to_string()));
        assert_eq!(join_terms::<&str>(&[]), None);
        assert_eq!(join_terms(&["", "  "]), None);
    }

    #[test]
    fn test_note_files_only_reads_note_level() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(root, "index.html", "root level");
        write_note(root, "rust/topic.md", "topic level");
        write_note(root, "rust/2024/year.md", "year level");
        write_note(root, "rust/2024/borrowck/README.md", "note level");
        write_note(root, "rust/2024/borrowck/img/diagram.txt", "too deep");

        let tree = DirectoryWalker::default().walk(root).unwrap();
        let files = note_files(&tree);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "README.md");
    }

    #[test]
    fn test_query_collects_matching_lines_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(
            root,
            "systems/2024/caching/README.md",
            "# Caching\ndesign notes on caching\nunrelated\nCACHE invalidation\n",
        );

        let results = create_test_engine().query(root, &["cache"]).unwrap();

        assert_eq!(results.len(), 1);
        let result = results.iter().next().unwrap();
        assert!(result.path.ends_with("README.md"));
        assert_eq!(
            result.components,
            vec![
                "# Caching".to_string(),
                "design notes on caching".to_string(),
                "CACHE invalidation".to_string()
            ]
        );
    }

    #[test]
    fn test_query_without_matches_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(root, "systems/2024/caching/README.md", "design notes on caching\n");

        let results = create_test_engine().query(root, &["kubernetes"]).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(root, "systems/2024/caching/README.md", "design notes on caching\n");

        let mut engine = create_test_engine();
        assert!(engine.query::<&str>(root, &[]).unwrap().is_empty());
        assert!(engine.query(root, &[" "]).unwrap().is_empty());
    }

    #[test]
    fn test_query_tree_reuses_walked_tree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(root, "lang/2023/rust/README.md", "ownership and borrowing\n");

        let mut engine = create_test_engine();
        let tree = engine.walker().walk(root).unwrap();
        let results = engine.query_tree(&tree, &["borrowing"]).unwrap();

        assert_eq!(results.total_components(), 1);
    }

    /// Records every line it is offered and matches lines containing "keep".
    #[derive(Default)]
    struct RecordingMatcher {
        offered: Vec<String>,
    }

    impl LineMatcher for RecordingMatcher {
        fn matches(&mut self, _query: &str, line: &str) -> bool {
            self.offered.push(line.to_string());
            line.contains("keep")
        }
    }

    #[test]
    fn test_query_streams_each_line_in_file_order() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(
            root,
            "lang/2024/rust/README.md",
            "keep one\ndrop two\r\nkeep three\nlast line without newline keep",
        );

        let mut engine = ZetQueryEngine::new(WalkOptions::default(), RecordingMatcher::default());
        let results = engine.query(root, &["anything"]).unwrap();

        assert_eq!(
            engine.matcher.offered,
            vec![
                "keep one".to_string(),
                "drop two".to_string(),
                "keep three".to_string(),
                "last line without newline keep".to_string()
            ]
        );
        assert_eq!(
            results.iter().next().unwrap().components,
            vec![
                "keep one".to_string(),
                "keep three".to_string(),
                "last line without newline keep".to_string()
            ]
        );
    }

    #[test]
    fn test_query_decodes_invalid_utf8_lossily() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dir = root.join("media/2024/diagram");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("blob.bin"), b"\xff\xfe binary\ncache header\n").unwrap();

        let results = create_test_engine().query(root, &["cache"]).unwrap();
        assert_eq!(results.total_components(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_directory_in_note_is_not_read() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(root, "lang/2024/rust/README.md", "borrowing rules\n");
        fs::create_dir_all(root.join("shared")).unwrap();
        std::os::unix::fs::symlink(root.join("shared"), root.join("lang/2024/rust/assets"))
            .unwrap();

        let tree = create_test_engine().walker().walk(root).unwrap();
        assert_eq!(note_files(&tree).len(), 2);

        let results = create_test_engine().query_tree(&tree, &["borrowing"]).unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.iter().next().unwrap().path.ends_with("README.md"));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_note_aborts_query() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_note(root, "a/2024/first/README.md", "matching line\n");
        fs::create_dir_all(root.join("a/2024/second")).unwrap();
        std::os::unix::fs::symlink(
            root.join("does-not-exist.md"),
            root.join("a/2024/second/README.md"),
        )
        .unwrap();

        let err = create_test_engine().query(root, &["matching"]).unwrap_err();
        assert!(err.to_string().contains("second"));
    }
}
