// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! Weighted content negotiation for `Accept`, `Accept-Charset`,
//! `Accept-Encoding`, `Accept-Language` and `TE`.
//!
//! A field value is split into choices, each with an optional quality
//! weight. The choices are grouped by weight, heaviest first, and within one
//! weight they keep the order the client sent them in. An unweighted choice
//! weighs `1.0` and sorts with the other `1.0` choices; no bucket is treated
//! specially.
//!
//! # References
//! * [RFC 9110 Section 12.4.2](https://www.rfc-editor.org/rfc/rfc9110.html#name-quality-values)
//! * [RFC 9110 Section 12.5](https://www.rfc-editor.org/rfc/rfc9110.html#name-content-negotiation-fields)

use crate::{
    lists::{parse_http_list, parse_quality_value},
    syntax,
    HttpParseError,
};

/// One choice offered by the client, e.g. `text/html;level=1;q=0.5`.
#[derive(Clone, Debug, PartialEq)]
pub struct NegotiationChoice<C> {
    /// The value, lowercased.
    pub value: String,

    /// Parameters other than the weight, names lowercased.
    pub params: Vec<(String, String)>,

    /// Between `0.0` and `1.0`, in steps of `0.1`.
    pub weight: f32,

    /// What the value resolved to in the vocabulary of the field, `None`
    /// when it's not known (or is a wildcard).
    pub resolved_code: Option<C>,
}

impl<C> NegotiationChoice<C> {
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.value == "*" || self.value == "*/*"
    }

    /// A weight of `0` means "not acceptable".
    #[must_use]
    pub fn is_acceptable(&self) -> bool {
        self.weight > 0.0
    }
}

/// Choices grouped by weight in tenths, the key sorted descending.
#[derive(Clone, Debug, PartialEq)]
pub struct NegotiationTable<C> {
    buckets: Vec<(u8, Vec<NegotiationChoice<C>>)>,
}

impl<C> Default for NegotiationTable<C> {
    fn default() -> Self {
        Self { buckets: Vec::new() }
    }
}

/// Converts a qvalue into tenths. Positive weights that would round to zero
/// stay at `0.1`, since zero means "not acceptable".
fn weight_to_tenths(weight: f32) -> u8 {
    let weight = weight.clamp(0.0, 1.0);
    let tenths = (weight * 10.0).round() as u8;
    if tenths == 0 && weight > 0.0 {
        1
    } else {
        tenths
    }
}

/// Parses a negotiation field value into a table of unresolved choices.
///
/// ```text
/// Accept          = #( media-range [ weight ] )
/// Accept-Language = #( language-range [ weight ] )
/// weight          = OWS ";" OWS "q=" qvalue
/// ```
pub fn parse_negotiation(value: &str) -> Result<NegotiationTable<()>, HttpParseError> {
    let mut table = NegotiationTable::default();

    for element in parse_http_list(value) {
        let end = element.find(';').unwrap_or(element.len());
        let choice = element[..end].trim_matches(syntax::is_whitespace_character);
        if choice.is_empty() || !choice.bytes().all(|byte| syntax::is_token_character(byte) || byte == b'/') {
            return Err(HttpParseError::InvalidNegotiation);
        }

        let parameters = syntax::scan_parameters(element, end);
        if parameters.is_invalid() || parameters.position != element.len() {
            return Err(HttpParseError::InvalidNegotiation);
        }

        let mut weight = 1.0;
        let mut params = Vec::with_capacity(parameters.value.len());
        for (name, value) in parameters.value {
            if name == "q" {
                weight = parse_quality_value(&value);
            } else {
                params.push((name, value));
            }
        }

        table.push(NegotiationChoice {
            value: choice.to_ascii_lowercase(),
            params,
            weight,
            resolved_code: None,
        });
    }

    if table.is_empty() {
        return Err(HttpParseError::InvalidNegotiation);
    }

    Ok(table)
}

impl<C> NegotiationTable<C> {
    fn push(&mut self, mut choice: NegotiationChoice<C>) {
        let tenths = weight_to_tenths(choice.weight);
        choice.weight = f32::from(tenths) / 10.0;

        match self.buckets.binary_search_by(|(key, _)| tenths.cmp(key)) {
            Ok(index) => self.buckets[index].1.push(choice),
            Err(index) => self.buckets.insert(index, (tenths, vec![choice])),
        }
    }

    /// Resolves every value against a vocabulary. Values the vocabulary
    /// doesn't know stay in the table with `resolved_code` set to `None`.
    pub fn resolve<D>(self, mut resolver: impl FnMut(&str) -> Option<D>) -> NegotiationTable<D> {
        let buckets = self.buckets.into_iter()
            .map(|(key, choices)| {
                let choices = choices.into_iter()
                    .map(|choice| NegotiationChoice {
                        resolved_code: resolver(&choice.value),
                        value: choice.value,
                        params: choice.params,
                        weight: choice.weight,
                    })
                    .collect();
                (key, choices)
            })
            .collect();
        NegotiationTable { buckets }
    }

    /// All choices, heaviest first, in client order within one weight.
    pub fn iter(&self) -> impl Iterator<Item = &NegotiationChoice<C>> {
        self.buckets.iter().flat_map(|(_, choices)| choices.iter())
    }

    /// The distinct weights present, descending.
    pub fn weights(&self) -> impl Iterator<Item = f32> + '_ {
        self.buckets.iter().map(|(key, _)| f32::from(*key) / 10.0)
    }

    /// The choices with the given weight.
    #[must_use]
    pub fn bucket(&self, weight: f32) -> &[NegotiationChoice<C>] {
        let tenths = weight_to_tenths(weight);
        self.buckets.iter()
            .find(|(key, _)| *key == tenths)
            .map_or(&[][..], |(_, choices)| choices.as_slice())
    }

    /// Returns the first acceptable choice matching the predicate.
    pub fn select(&self, mut predicate: impl FnMut(&NegotiationChoice<C>) -> bool) -> Option<&NegotiationChoice<C>> {
        self.iter().find(|choice| choice.is_acceptable() && predicate(choice))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|(_, choices)| choices.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<C: Clone + PartialEq> NegotiationTable<C> {
    /// Walks the table heaviest first and returns the first code that is in
    /// `supported`. When none is, `fallback` is returned, even though the
    /// client may have excluded it.
    #[must_use]
    pub fn select_language(&self, supported: &[C], fallback: C) -> C {
        self.select(|choice| choice.resolved_code.as_ref().is_some_and(|code| supported.contains(code)))
            .and_then(|choice| choice.resolved_code.clone())
            .unwrap_or(fallback)
    }

    /// The weight the client gives to `code`: its own entry when listed,
    /// otherwise the weight of a `*` entry, otherwise `None`.
    #[must_use]
    pub fn weight_of(&self, code: &C) -> Option<f32> {
        self.iter()
            .find(|choice| choice.resolved_code.as_ref() == Some(code))
            .or_else(|| self.iter().find(|choice| choice.is_wildcard()))
            .map(|choice| choice.weight)
    }
}
