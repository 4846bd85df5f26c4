//! Client identifier predicate deciding which peers get banned.

/// Identifier reported by a client that disguises a non-compliant build.
pub const DISGUISED_CLIENT: &str = "-TS0008-";
/// Identifier reported when the client could not be recognised.
pub const UNIDENTIFIED_CLIENT: &str = "Unknown";

/// Prefixes of client families that misreport themselves or skip fair-share
/// enforcement.
pub const DEFAULT_PREFIXES: &[&str] = &[
    // WebTorrent
    "-WW00",
    // movie downloader / MovieTVShow
    "-Lr",
    // Elementum
    "-LT11",
];

/// Immutable exact-or-prefix rule set. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blocklist {
    exact: Vec<String>,
    prefixes: Vec<String>,
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::with_prefixes(DEFAULT_PREFIXES.iter().copied())
    }
}

impl Blocklist {
    /// Build a blocklist with the fixed literal identifiers and the given
    /// prefixes. Empty prefixes are dropped since they would match everyone.
    #[must_use]
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exact: vec![DISGUISED_CLIENT.to_string(), UNIDENTIFIED_CLIENT.to_string()],
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|prefix: &String| !prefix.is_empty())
                .collect(),
        }
    }

    /// Whether `client_id` belongs to a banned client.
    #[must_use]
    pub fn matches(&self, client_id: &str) -> bool {
        self.exact.iter().any(|exact| exact == client_id)
            || self
                .prefixes
                .iter()
                .any(|prefix| client_id.starts_with(prefix.as_str()))
    }

    /// Configured prefixes.
    #[must_use]
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}
