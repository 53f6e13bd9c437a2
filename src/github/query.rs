//! Query-string construction for list endpoints.
//!
//! Filters convert into [`QueryParams`], which drop unset values so that only
//! the parameters a caller actually chose reach GitHub.

/// Ordered set of query parameters; setting a key twice keeps the last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Sets `key` to `value`, replacing any earlier value.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.set(key, value.to_string());
        self
    }

    /// Sets `key` when `value` is present; `None` leaves the set unchanged.
    #[must_use]
    pub fn with_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        let Some(present) = value else {
            return self;
        };
        self.with(key, present)
    }

    /// Merges `other` into `self`; keys from `other` win.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        for (key, value) in other.0 {
            self.set(&key, value);
        }
        self
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Borrow the parameters as `(key, value)` pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    /// Returns true when no parameter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn set(&mut self, key: &str, value: String) {
        if let Some(entry) = self.0.iter_mut().find(|(existing, _)| existing == key) {
            entry.1 = value;
            return;
        }
        self.0.push((key.to_owned(), value));
    }
}

/// Conversion of a model filter into query parameters.
pub trait ToQuery {
    /// Builds the query parameters this filter contributes to a list request.
    fn to_query(&self) -> QueryParams;
}

impl ToQuery for () {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
    }
}

/// Sort direction accepted by most list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Oldest or smallest first.
    Asc,
    /// Newest or largest first.
    Desc,
}

impl Direction {
    /// Returns the API parameter value for this direction.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// State filter shared by issues and pull requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateFilter {
    /// Only open items.
    #[default]
    Open,
    /// Only closed items.
    Closed,
    /// All items regardless of state.
    All,
}

impl StateFilter {
    /// Returns the API parameter value for this state.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}
