//! Ordered key/text annotations attached to record fields.

/// Annotations declared on a field, in declaration order.
///
/// Keys may repeat; lookups return the first match.
///
/// ```
/// use stratum_config::Annotations;
/// let annotations: Annotations = [("doc", "Port"), ("description", "Listen port"), ("default", "80")]
///     .into_iter()
///     .collect();
/// assert_eq!(annotations.get("default"), Some("80"));
/// assert_eq!(
///     annotations.find(&["description", "doc"]),
///     Some(("description", "Listen port"))
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Annotations(Vec<(String, String)>);

impl Annotations {
    /// Append an annotation.
    pub fn insert(&mut self, key: &str, text: &str) {
        self.0.push((key.to_owned(), text.to_owned()));
    }

    /// Text of the first annotation named `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, text)| text.as_str())
    }

    /// The first of `keys` that is present, with its text.
    ///
    /// `keys` are tried in order, so earlier keys take precedence over later
    /// ones regardless of declaration order.
    #[must_use]
    pub fn find<'a>(&'a self, keys: &[&str]) -> Option<(&'a str, &'a str)> {
        keys.iter().find_map(|key| {
            self.0
                .iter()
                .find(|(name, _)| name == key)
                .map(|(name, text)| (name.as_str(), text.as_str()))
        })
    }

    /// Whether no annotation is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, text)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, text)| (key.as_str(), text.as_str()))
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Annotations {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, text)| (key.as_ref().to_owned(), text.as_ref().to_owned()))
                .collect(),
        )
    }
}
