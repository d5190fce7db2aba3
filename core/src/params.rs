//! Path parameters matched by the router for the current request.
//!
//! Names and values are kept as pairs in one ordered sequence, so a name can
//! never point at another parameter's value.

/// Ordered `(name, value)` pairs, filled once by the router before the handler runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, String)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size for the router's maximum parameter count.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Value at position `index`, or `""` when out of range.
    pub fn by_index(&self, index: usize) -> &str {
        self.entries
            .get(index)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    /// Value of the first parameter named exactly `name`, or `""`.
    ///
    /// Matching is case-sensitive.
    pub fn by_name(&self, name: &str) -> &str {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<N, V> FromIterator<(N, V)> for Params
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_index() {
        let params: Params = [("id", "1"), ("post", "42")].into_iter().collect();
        assert_eq!(params.by_index(0), "1");
        assert_eq!(params.by_index(1), "42");
        assert_eq!(params.by_index(2), "");
        assert_eq!(params.by_index(usize::MAX), "");
    }

    #[test]
    fn test_by_name_is_exact_and_first_match() {
        let mut params = Params::with_capacity(5);
        params.push("id", "1");
        params.push("id", "2");

        assert_eq!(params.by_name("id"), "1");
        assert_eq!(params.by_name("ID"), "");
        assert_eq!(params.by_name("missing"), "");
    }

    #[test]
    fn test_empty_store() {
        let params = Params::new();
        assert!(params.is_empty());
        assert_eq!(params.by_index(0), "");
        assert_eq!(params.by_name("id"), "");
    }

    #[test]
    fn test_clear_for_reuse_by_router() {
        let mut params: Params = [("id", "1")].into_iter().collect();
        params.clear();
        assert!(params.is_empty());
        assert_eq!(params.by_name("id"), "");

        params.push("slug", "hello");
        assert_eq!(params.by_index(0), "hello");
    }

    #[test]
    fn test_names_stay_aligned_with_values() {
        let params: Params = [("a", "1"), ("b", "2")].into_iter().collect();
        let names: Vec<_> = params.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        for (i, (name, value)) in params.iter().enumerate() {
            assert_eq!(params.by_index(i), value);
            assert_eq!(params.by_name(name), value);
        }
    }
}
