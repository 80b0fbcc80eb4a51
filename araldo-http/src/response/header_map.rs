// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use crate::ResponseHeaderName;

use super::HeaderValue;

/// The response header fields in the order they were first set. A field
/// appears once, except the ones that are sent as one line per value, see
/// [`ResponseHeaderName::allows_multiple_lines`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderMap {
    headers: Vec<(ResponseHeaderName, HeaderValue)>,
}

impl HeaderMap {
    pub fn new() -> HeaderMap {
        HeaderMap::default()
    }

    /// Appends a line for headers that can be repeated, such as
    /// `Set-Cookie` and `Link`. Other headers are replaced.
    pub fn append_possible_duplicate(&mut self, header_name: ResponseHeaderName, value: HeaderValue) {
        if header_name.allows_multiple_lines() {
            self.headers.push((header_name, value));
        } else {
            self.set(header_name, value);
        }
    }

    #[must_use]
    pub fn contains(&self, header_name: &ResponseHeaderName) -> bool {
        self.headers.iter().any(|(name, _)| name == header_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// The first value of the header.
    #[must_use]
    pub fn get(&self, header_name: &ResponseHeaderName) -> Option<&HeaderValue> {
        self.headers.iter()
            .find(|(name, _)| name == header_name)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, header_name: &ResponseHeaderName) -> Option<&mut HeaderValue> {
        self.headers.iter_mut()
            .find(|(name, _)| name == header_name)
            .map(|(_, value)| value)
    }

    pub fn get_all<'a>(&'a self, header_name: &'a ResponseHeaderName) -> impl Iterator<Item = &'a HeaderValue> + 'a {
        self.headers.iter()
            .filter(move |(name, _)| name == header_name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ResponseHeaderName, HeaderValue)> {
        self.headers.iter()
    }

    /// Removes every line of the header, returning whether there was one.
    pub fn remove(&mut self, header_name: &ResponseHeaderName) -> bool {
        let length = self.headers.len();
        self.headers.retain(|(name, _)| name != header_name);
        length != self.headers.len()
    }

    /// Replaces the value of the header, keeping its position. Any further
    /// lines of a repeatable header are dropped.
    pub fn set(&mut self, header_name: ResponseHeaderName, value: HeaderValue) {
        let Some(index) = self.headers.iter().position(|(name, _)| *name == header_name) else {
            self.headers.push((header_name, value));
            return;
        };

        self.headers[index].1 = value;
        let mut seen = false;
        self.headers.retain(|(name, _)| {
            if *name != header_name {
                return true;
            }
            let first = !seen;
            seen = true;
            first
        });
    }
}
