// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

use std::{
    io::Write,
    time::{Duration, UNIX_EPOCH},
};

use araldo_http::{
    checksum::ChecksumRecord,
    select_content_coding,
    ChecksumSpec,
    DecodeSettings,
    EntityTag,
    Method,
    PreconditionOutcome,
    RawHeaderMap,
    RequestHeaders,
    Response,
    ResponseHeaderName,
    ResponseSettings,
    StatusCode,
    WriteSink,
};
use araldo_resources::{
    Charset,
    ChecksumAlgorithm,
    Content,
    ContentCoding,
    Encoding,
    Language,
    MediaType,
};

const PAGE: &str = "<!doctype html><title>araldo</title><p>Hello, world!</p>\n";

fn request(fields: &[(&str, &str)]) -> RequestHeaders {
    let raw: RawHeaderMap = fields.iter().copied().collect();
    RequestHeaders::decode(&raw, &DecodeSettings::default())
}

/// Splits an HTTP/1 message into its head lines and its body.
fn split_message(message: &[u8]) -> (Vec<String>, Vec<u8>) {
    let end = message.windows(4).position(|window| window == b"\r\n\r\n").unwrap();
    let head = std::str::from_utf8(&message[..end]).unwrap();
    (head.split("\r\n").map(str::to_owned).collect(), message[end + 4..].to_vec())
}

fn header<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines.iter()
        .filter_map(|line| line.split_once(": "))
        .find(|(line_name, _)| line_name.eq_ignore_ascii_case(name))
        .map(|(_, value)| value)
}

/// Reassembles a chunked body, checking that nothing follows the last
/// chunk.
fn dechunk(mut body: &[u8]) -> Vec<u8> {
    let mut data = Vec::new();
    loop {
        let line_end = body.windows(2).position(|window| window == b"\r\n").unwrap();
        let size = usize::from_str_radix(std::str::from_utf8(&body[..line_end]).unwrap(), 16).unwrap();
        body = &body[line_end + 2..];
        if size == 0 {
            assert_eq!(body, b"\r\n");
            return data;
        }

        data.extend_from_slice(&body[..size]);
        assert_eq!(&body[size..size + 2], b"\r\n");
        body = &body[size + 2..];
    }
}

#[test]
fn test_negotiated_response_from_files() {
    let mut first = tempfile::NamedTempFile::new().unwrap();
    let mut second = tempfile::NamedTempFile::new().unwrap();
    let (head, tail) = PAGE.split_at(20);
    first.write_all(head.as_bytes()).unwrap();
    second.write_all(tail.as_bytes()).unwrap();

    let request = request(&[
        ("Host", "example.org"),
        ("Accept-Encoding", "br;q=0.8, gzip, deflate"),
        ("Accept-Language", "nl;q=0.9, en;q=0.7"),
        ("User-Agent", "curl/8.4.0"),
    ]);
    assert_eq!(request.host.valid().map(|host| host.to_string()).as_deref(), Some("example.org"));

    let coding = request.accept_encoding.valid().and_then(select_content_coding);
    assert_eq!(coding, Some(ContentCoding::Gzip));

    let en = Language::from_tag("en").unwrap();
    let nl = Language::from_tag("nl").unwrap();
    let language = request.accept_language.valid().map_or(en, |table| table.select_language(&[en, nl], en));
    assert_eq!(language, nl);

    let mut response = Response::new(ResponseSettings { shuffle_seed: Some(42), ..ResponseSettings::default() });
    _ = response.set_content(Content::Files(vec![first.path().to_path_buf()]), false);
    _ = response.set_content(Content::Files(vec![second.path().to_path_buf()]), true);

    response.set_content_type(MediaType::parse("text/html").unwrap(), Some(Charset::Utf8));
    response.set_content_language(language.as_str(), false).unwrap();
    response.set_vary("accept-encoding", false).unwrap();
    response.set_date(Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000)));
    response.set_etag(None, false).unwrap();
    assert!(response.set_content_length(None, false).unwrap().is_applied());
    assert!(response.set_checksum_content(ChecksumSpec::auto(ChecksumAlgorithm::Sha256)).is_applied());
    assert!(response.set_checksum_header(ChecksumSpec::auto(ChecksumAlgorithm::Crc32)).is_applied());

    assert!(response.encode_response_content(coding, None, None).unwrap().is_applied());

    let mut sink = WriteSink::new(Vec::new());
    assert!(response.send_response_headers(&mut sink).unwrap().is_applied());
    assert!(response.send_response_content(&mut sink).unwrap().is_applied());

    let (lines, body) = split_message(&sink.into_inner());
    assert_eq!(lines[0], "HTTP/1.1 200 OK");
    assert_eq!(header(&lines, "content-encoding"), Some("gzip"));
    assert_eq!(header(&lines, "content-language"), Some("nl"));
    assert_eq!(header(&lines, "content-length"), Some(body.len().to_string().as_str()));
    assert_eq!(ContentCoding::Gzip.decode(&body).unwrap(), PAGE.as_bytes());

    let content_checksum = ChecksumRecord::parse(header(&lines, "checksum-content").unwrap()).unwrap();
    let etag = EntityTag::parse(header(&lines, "etag").unwrap()).unwrap();
    assert_eq!(content_checksum.digest, etag.tag);

    let checksum_headers = header(&lines, "checksum-headers").unwrap();
    assert!(!checksum_headers.contains("checksum"));
    assert!(checksum_headers.contains("content-encoding"));
    assert_eq!(header(&lines, "checksum-header").map(|value| value.len()), Some("full:crc32:".len() + 8));
}

#[test]
fn test_streamed_response_is_chunked() {
    let page = PAGE.repeat(40);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(page.as_bytes()).unwrap();

    let request = request(&[("Accept-Encoding", "gzip")]);
    let coding = request.accept_encoding.valid().and_then(select_content_coding);

    let settings = ResponseSettings { shuffle_headers: false, content_chunk_size: 256, ..ResponseSettings::default() };
    let mut response = Response::new(settings);
    _ = response.set_content(Content::Files(vec![file.path().to_path_buf()]), false);
    assert!(response.set_content_length(None, false).unwrap().is_applied());
    assert!(response.encode_response_content(coding, None, Some(64)).unwrap().is_applied());

    let mut sink = WriteSink::new(Vec::new());
    assert!(response.send_response_headers(&mut sink).unwrap().is_applied());
    assert!(response.send_response_content(&mut sink).unwrap().is_applied());

    let (lines, body) = split_message(&sink.into_inner());
    assert_eq!(header(&lines, "content-encoding"), Some("gzip"));
    assert_eq!(header(&lines, "transfer-encoding"), Some("chunked"));
    assert_eq!(header(&lines, "content-length"), None);
    assert_eq!(ContentCoding::Gzip.decode(&dechunk(&body)).unwrap(), page.as_bytes());
}

#[test]
fn test_chunked_bytes_body() {
    let mut response = Response::new(ResponseSettings { shuffle_headers: false, ..ResponseSettings::default() });
    _ = response.set_content(Content::Bytes(b"hello".to_vec()), false);
    response.set_transfer_encoding(Encoding::Chunked, false).unwrap();

    let mut sink = WriteSink::new(Vec::new());
    assert!(response.send_response_headers(&mut sink).unwrap().is_applied());
    assert!(response.send_response_content(&mut sink).unwrap().is_applied());

    let (lines, body) = split_message(&sink.into_inner());
    assert_eq!(header(&lines, "transfer-encoding"), Some("chunked"));
    assert_eq!(body, b"5\r\nhello\r\n0\r\n\r\n");
    assert_eq!(dechunk(&body), b"hello");
}

#[test]
fn test_conditional_get_is_not_modified() {
    let last_modified = UNIX_EPOCH + Duration::from_secs(784_111_777);
    let mut response = Response::new(ResponseSettings { shuffle_headers: false, ..ResponseSettings::default() });
    _ = response.set_content(Content::Bytes(PAGE.as_bytes().to_vec()), false);
    response.set_etag(None, true).unwrap();
    response.set_last_modified(last_modified);

    let etag = response.get(ResponseHeaderName::ETag).unwrap().to_string();
    assert!(etag.starts_with("W/\""));

    let revalidation = request(&[("If-None-Match", etag.as_str())]);
    let current = EntityTag::parse(&etag).unwrap();
    let outcome = revalidation.preconditions().evaluate(&Method::Get, Some(&current), Some(last_modified));
    assert_eq!(outcome, PreconditionOutcome::NotModified);

    let update = request(&[("If-Match", etag.as_str())]);
    let outcome = update.preconditions().evaluate(&Method::Put, Some(&current), Some(last_modified));
    assert_eq!(outcome, PreconditionOutcome::PreconditionFailed);

    let fresh = request(&[("If-Modified-Since", "Sun, 06 Nov 1994 08:49:37 GMT")]);
    let outcome = fresh.preconditions().evaluate(&Method::Head, None, Some(last_modified));
    assert_eq!(outcome, PreconditionOutcome::NotModified);

    response.set_status(StatusCode::NotModified.code()).unwrap();
    assert_eq!(response.status_line(), "HTTP/1.1 304 Not Modified");
}

#[test]
fn test_identity_when_nothing_is_acceptable() {
    let request = request(&[("Accept-Encoding", "identity, gzip;q=0")]);
    let coding = request.accept_encoding.valid().and_then(select_content_coding);
    assert_eq!(coding, None);

    let mut response = Response::new(ResponseSettings { shuffle_headers: false, ..ResponseSettings::default() });
    _ = response.set_content(Content::Bytes(PAGE.as_bytes().to_vec()), false);
    assert!(!response.encode_response_content(coding, None, None).unwrap().is_applied());
    assert_eq!(response.content(), &Content::Bytes(PAGE.as_bytes().to_vec()));
}
