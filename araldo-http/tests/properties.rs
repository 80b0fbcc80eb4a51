// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::time::SystemTime;

use araldo_http::{
    cache_control::{CacheControl, CacheDirective},
    checksum::{checksum_header, covered_headers},
    conditional::{parse_if_match, parse_if_none_match, Comparison, EntityTag},
    date::{format_http_date, parse_strict_date},
    request::decoders,
    BufferedSink,
    ChecksumSpec,
    ChecksumWhat,
    DecodeSettings,
    HttpParseError,
    Outcome,
    Parsed,
    RawHeaderMap,
    RequestHeaders,
    Response,
    ResponseHeaderName,
    ResponseSettings,
};
use araldo_resources::{ChecksumAlgorithm, ContentCoding, Encoding, Language};
use rstest::rstest;

fn response() -> Response {
    Response::new(ResponseSettings { shuffle_headers: false, ..ResponseSettings::default() })
}

#[rstest]
#[case(ContentCoding::Brotli)]
#[case(ContentCoding::Bzip2)]
#[case(ContentCoding::Deflate)]
#[case(ContentCoding::Gzip)]
fn test_content_coding_round_trip(#[case] coding: ContentCoding) {
    let body = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(64);
    let encoded = coding.encode(body.as_bytes(), None).unwrap();
    assert_ne!(encoded, body.as_bytes());
    assert_eq!(coding.decode(&encoded).unwrap(), body.as_bytes());

    assert_eq!(coding.decode(&coding.encode(b"", None).unwrap()).unwrap(), b"");
}

#[test]
fn test_cache_control_serializer_agrees_with_decoder() {
    let mut response = response();
    response.set_cache_control(CacheDirective::Private, None, false).unwrap();
    response.set_cache_control(CacheDirective::MaxAge, Some("600"), true).unwrap();
    response.set_cache_control(CacheDirective::Extension("x-note".to_owned()), Some("a \"b\""), true).unwrap();

    let lines = response.prepare_header_lines();
    let decoded = decoders::cache_control(&lines[0].1).unwrap();

    let mut expected = CacheControl::new();
    expected.insert(CacheDirective::Private, None);
    expected.insert(CacheDirective::MaxAge, Some("600".to_owned()));
    expected.insert(CacheDirective::Extension("x-note".to_owned()), Some("a \"b\"".to_owned()));
    assert_eq!(decoded, expected);
    assert_eq!(decoded.seconds(&CacheDirective::MaxAge), Some(600));
}

#[test]
fn test_token_lists_serializer_agrees_with_decoder() {
    let mut response = response();
    response.set_vary("accept", false).unwrap();
    response.set_vary("accept-encoding", true).unwrap();
    response.set_connection("keep-alive", false).unwrap();
    response.set_connection("upgrade", true).unwrap();

    let lines = response.prepare_header_lines();
    assert_eq!(lines[0].0, ResponseHeaderName::Vary);
    assert_eq!(decoders::token_list(&lines[0].1).unwrap(), ["accept", "accept-encoding"]);
    assert_eq!(lines[1].0, ResponseHeaderName::Connection);
    assert_eq!(decoders::token_list(&lines[1].1).unwrap(), ["keep-alive", "upgrade"]);
}

#[test]
fn test_select_language_follows_weights() {
    let table = decoders::accept_language("en;q=0.5, fr;q=0.9, *;q=0.1").unwrap();
    let en = Language::from_tag("en").unwrap();
    let de = Language::from_tag("de").unwrap();

    assert_eq!(table.select_language(&[en, de], de), en);
}

#[test]
fn test_weak_tags_match_only_weakly() {
    let candidate = EntityTag::strong("def");

    let if_none_match = parse_if_none_match("\"abc\", W/\"def\"").unwrap();
    assert!(if_none_match.evaluate(&candidate, Comparison::Weak));
    assert!(!if_none_match.evaluate(&candidate, Comparison::Strong));

    let if_match = parse_if_match("\"abc\", W/\"def\"").unwrap();
    assert!(!if_match.evaluate(&candidate, Comparison::Strong));
    assert!(!if_match.evaluate(&EntityTag::weak("def"), Comparison::Strong));
    assert!(if_match.evaluate(&EntityTag::strong("abc"), Comparison::Strong));
}

#[test]
fn test_date_validation() {
    let raw: RawHeaderMap = [("Date", "now"), ("If-Modified-Since", "Sun, 06 Nov 1994 08:49:37 GMT")]
        .into_iter()
        .collect();
    let headers = RequestHeaders::decode(&raw, &DecodeSettings::default());

    assert_eq!(headers.date, Parsed::Invalid(HttpParseError::InvalidDate));
    let since = *headers.if_modified_since.valid().unwrap();
    assert_eq!(format_http_date(since), "Sun, 06 Nov 1994 08:49:37 GMT");

    let now = format_http_date(SystemTime::now());
    assert_eq!(format_http_date(parse_strict_date(&now).unwrap()), now);
}

#[test]
fn test_transfer_encoding_clears_content_length() {
    let mut response = response();
    assert!(response.set_content_length(Some(42), false).unwrap().is_applied());
    response.set_transfer_encoding(Encoding::Chunked, false).unwrap();

    assert!(response.get(ResponseHeaderName::ContentLength).is_none());
    assert!(response.get(ResponseHeaderName::TransferEncoding).is_some());
}

#[test]
fn test_content_length_yields_to_transfer_encoding() {
    let mut response = response();
    response.set_transfer_encoding(Encoding::Chunked, false).unwrap();
    let before = response.prepare_header_lines();

    assert_eq!(response.set_content_length(Some(42), false).unwrap(), Outcome::NotApplicable);
    assert_eq!(response.prepare_header_lines(), before);
}

fn header_lines() -> Vec<(ResponseHeaderName, String)> {
    vec![
        (ResponseHeaderName::ContentType, "text/plain".to_owned()),
        (ResponseHeaderName::ETag, "\"v1\"".to_owned()),
        (ResponseHeaderName::Server, "araldo".to_owned()),
    ]
}

#[test]
fn test_header_checksum_is_deterministic() {
    let included = [ResponseHeaderName::ContentType, ResponseHeaderName::ETag];
    let digest = |lines: &[(ResponseHeaderName, String)]| {
        let covered = covered_headers(lines, Some(&included));
        checksum_header("HTTP/1.1 200 OK", lines, &covered, ChecksumWhat::Full, ChecksumAlgorithm::Sha256)
            .unwrap()
            .digest
    };

    let lines = header_lines();
    let original = digest(&lines);
    assert_eq!(digest(&lines), original);

    let mut changed = header_lines();
    changed[1].1 = "\"v2\"".to_owned();
    assert_ne!(digest(&changed), original);

    let mut excluded_changed = header_lines();
    excluded_changed[2].1 = "other".to_owned();
    assert_eq!(digest(&excluded_changed), original);
}

#[test]
fn test_header_checksum_through_the_builder() {
    let build = |server: &str| {
        let mut response = response();
        response.set_etag(Some("v1"), false).unwrap();
        response.set_server(server).unwrap();
        response.set_checksum_headers(ResponseHeaderName::ETag, false).unwrap();
        assert!(response.set_checksum_header(ChecksumSpec::auto(ChecksumAlgorithm::Sha256)).is_applied());

        let mut sink = BufferedSink::new();
        response.send_response_headers(&mut sink).unwrap();
        sink
    };

    let first = build("araldo");
    assert_eq!(first.header("checksum-headers"), Some("etag"));
    assert_eq!(first.header("checksum-header"), build("araldo").header("checksum-header"));
    assert_eq!(first.header("checksum-header"), build("other").header("checksum-header"));
}

#[test]
fn test_unknown_header_is_preserved_and_capped() {
    let long = "y".repeat(400);
    let raw: RawHeaderMap = [("X-Custom", "hello"), ("X-Long", long.as_str())].into_iter().collect();
    let settings = DecodeSettings { max_unknown_length: 100, ..DecodeSettings::default() };
    let headers = RequestHeaders::decode(&raw, &settings);

    assert_eq!(headers.unknown("x-custom"), Some("hello"));
    assert_eq!(headers.unknown("X-CUSTOM"), Some("hello"));
    assert_eq!(headers.unknown("x-long").map(str::len), Some(100));

    // 'İ' takes two bytes, its lowercase form three.
    let dotted = "İ".repeat(100);
    let raw: RawHeaderMap = [("X-Dotted", dotted.as_str())].into_iter().collect();
    let settings = DecodeSettings { max_unknown_length: 200, ..DecodeSettings::default() };
    let headers = RequestHeaders::decode(&raw, &settings);

    let value = headers.unknown("x-dotted").unwrap();
    assert!(value.len() <= 200, "length: {}", value.len());
    assert_eq!(value.len(), 199);
    assert!(dotted.to_lowercase().starts_with(value));
}

#[test]
fn test_headers_are_sent_once() {
    let mut response = response();
    response.set_server("araldo").unwrap();

    let mut sink = BufferedSink::new();
    assert_eq!(response.send_response_headers(&mut sink).unwrap(), Outcome::Applied);
    assert_eq!(response.send_response_headers(&mut sink).unwrap(), Outcome::NotApplicable);
    assert_eq!(sink.headers, vec![("Server".to_owned(), "araldo".to_owned())]);
}
