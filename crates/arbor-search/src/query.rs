//! Query tokenization.

/// Ordered list of search terms.
///
/// Terms come from splitting the raw query on whitespace and ASCII
/// punctuation. Duplicates are kept: a repeated term counts twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    /// Split a raw query string into terms.
    ///
    /// With `normalize` set, terms are lower-cased to match the lower-cased
    /// index tokens.
    #[must_use]
    pub fn parse(raw: &str, normalize: bool) -> Self {
        let terms = raw
            .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .filter(|term| !term.is_empty())
            .map(|term| {
                if normalize {
                    term.to_lowercase()
                } else {
                    term.to_owned()
                }
            })
            .collect();
        Self { terms }
    }

    /// Create a query from already tokenized terms.
    #[must_use]
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|t: &String| !t.is_empty())
                .collect(),
        }
    }

    /// Terms in query order.
    #[must_use]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// True when the query produced no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Consume the query, returning its terms.
    #[must_use]
    pub fn into_terms(self) -> Vec<String> {
        self.terms
    }
}
