//! Greeting Table - Language Code to Greeting Mapping
//!
//! Immutable lookup table driving every response the service gives.
//! Codes are matched case-sensitively with no normalization; anything
//! not in the table is an unknown language.

use std::collections::HashMap;

/// Fixed mapping from language code to greeting text.
///
/// Built once at startup and shared read-only between the HTTP
/// handler and the self-pinger. Tests construct isolated tables
/// via [`GreetingTable::new`].
#[derive(Debug, Clone)]
pub struct GreetingTable {
    /// Language code → greeting text.
    entries: HashMap<String, String>,
}

impl GreetingTable {
    /// Build a table from arbitrary (code, greeting) pairs.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(code, text)| (code.into(), text.into()))
                .collect(),
        }
    }

    /// The default five-language set shipped with the service.
    pub fn with_defaults() -> Self {
        Self::new([
            ("en", "Hello"),
            ("es", "Hola"),
            ("de", "Hallo"),
            ("ch", "你好"),
            ("cs", "Ahoj"),
        ])
    }

    /// Exact-match lookup. No trimming, no case folding.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.entries.get(code).map(String::as_str)
    }

    /// All known language codes, sorted.
    ///
    /// Sorted so that a seeded RNG picking by index yields the same
    /// code sequence on every run.
    pub fn languages(&self) -> Vec<String> {
        let mut langs: Vec<String> =
            self.entries.keys().cloned().collect();
        langs.sort();
        langs
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
