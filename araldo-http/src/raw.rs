// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::borrow::Cow;

use hashbrown::HashMap;
use unicase::UniCase;

/// The request header fields as handed over by the transport, before any
/// decoding. Names are matched case-insensitively, repeated fields are kept
/// in arrival order, and the map isn't changed after the request started.
#[derive(Clone, Debug, Default)]
pub struct RawHeaderMap {
    fields: Vec<(String, Vec<String>)>,
    index: HashMap<UniCase<String>, usize>,
}

impl RawHeaderMap {
    pub fn new() -> RawHeaderMap {
        RawHeaderMap::default()
    }

    /// Adds a field line. A name seen before gets the value appended to the
    /// existing field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        let key = UniCase::ascii(name);
        if let Some(index) = self.index.get(&key) {
            self.fields[*index].1.push(value);
            return;
        }

        let index = self.fields.len();
        self.fields.push((key.as_ref().to_owned(), vec![value]));
        self.index.insert(key, index);
    }

    /// Returns the field value. Repeated field lines are combined with a
    /// comma, as RFC 9110 section 5.3 allows for list-based fields, except
    /// for `Cookie`, which uses the cookie-pair separator instead.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Cow<'_, str>> {
        let values = self.get_all(name)?;
        match values {
            [single] => Some(Cow::Borrowed(single.as_str())),
            _ if name.eq_ignore_ascii_case("cookie") => Some(Cow::Owned(values.join("; "))),
            _ => Some(Cow::Owned(values.join(", "))),
        }
    }

    #[must_use]
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        let index = self.index.get(&UniCase::ascii(name.to_owned()))?;
        Some(&self.fields[*index].1)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&UniCase::ascii(name.to_owned()))
    }

    /// Iterates the fields with the name as first received and the combined
    /// value.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Cow<'_, str>)> {
        self.fields.iter()
            .filter_map(|(name, _)| Some((name.as_str(), self.get(name)?)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for RawHeaderMap
        where N: Into<String>, V: Into<String> {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut map = RawHeaderMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_lookup() {
        let map: RawHeaderMap = [("X-Custom", "hello"), ("Accept", "text/html")].into_iter().collect();
        assert_eq!(map.get("x-custom").as_deref(), Some("hello"));
        assert_eq!(map.get("X-CUSTOM").as_deref(), Some("hello"));
        assert!(map.contains("ACCEPT"));
        assert_eq!(map.get("accept-language"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_repeated_fields_are_combined() {
        let mut map = RawHeaderMap::new();
        map.insert("Accept-Encoding", "gzip");
        map.insert("accept-encoding", "br");
        map.insert("Cookie", "a=1");
        map.insert("cookie", "b=2");

        assert_eq!(map.get("Accept-Encoding").as_deref(), Some("gzip, br"));
        assert_eq!(map.get("Cookie").as_deref(), Some("a=1; b=2"));
        assert_eq!(map.get_all("accept-encoding").map(<[String]>::len), Some(2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_iter_keeps_arrival_order() {
        let map: RawHeaderMap = [("B", "2"), ("a", "1"), ("b", "3")].into_iter().collect();
        let fields: Vec<(String, String)> = map.iter()
            .map(|(name, value)| (name.to_owned(), value.into_owned()))
            .collect();
        assert_eq!(fields, vec![("B".to_owned(), "2, 3".to_owned()), ("a".to_owned(), "1".to_owned())]);
    }
}
