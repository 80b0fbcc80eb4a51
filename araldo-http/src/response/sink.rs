// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The outbound adapter: where the status line, the header lines and the
//! body end up. The engine never touches the transport itself.

use std::io::{self, Write};

pub trait HeaderSink {
    /// Whether some other layer already wrote the head of the response. The
    /// response then refuses to send its own headers.
    fn headers_flushed(&self) -> bool {
        false
    }

    fn write_status_line(&mut self, status_line: &str) -> io::Result<()>;

    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()>;

    /// Called after the last header line.
    fn finish_headers(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()>;

    /// Called after the last part of the body.
    fn finish_body(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Collects the response in memory, e.g. for a CGI or FastCGI adapter that
/// forwards the lines itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferedSink {
    pub status_line: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    flushed_elsewhere: bool,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose head was already written by another layer.
    pub fn flushed_elsewhere() -> Self {
        Self { flushed_elsewhere: true, ..Self::default() }
    }

    /// The value of the first line with this name, compared
    /// case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(line_name, _)| line_name.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl HeaderSink for BufferedSink {
    fn headers_flushed(&self) -> bool {
        self.flushed_elsewhere
    }

    fn write_status_line(&mut self, status_line: &str) -> io::Result<()> {
        self.status_line = Some(status_line.to_owned());
        Ok(())
    }

    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.headers.push((name.to_owned(), value.to_owned()));
        Ok(())
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(data);
        Ok(())
    }
}

/// Writes an HTTP/1 message to a stream. The head is buffered and written
/// at once.
///
/// When the final transfer coding in the head is `chunked`, the body is
/// framed in chunks, one per [`HeaderSink::write_body`] call, and
/// [`HeaderSink::finish_body`] writes the last chunk.
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    writer: W,
    head: String,
    chunked: bool,
}

impl<W: Write> WriteSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, head: String::with_capacity(1024), chunked: false }
    }

    /// Whether the body is framed in chunks.
    #[must_use]
    pub fn is_chunked(&self) -> bool {
        self.chunked
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> HeaderSink for WriteSink<W> {
    fn write_status_line(&mut self, status_line: &str) -> io::Result<()> {
        self.head.push_str(status_line);
        self.head.push_str("\r\n");
        Ok(())
    }

    fn write_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        if name.eq_ignore_ascii_case("transfer-encoding") {
            self.chunked = value.rsplit(',')
                .next()
                .is_some_and(|coding| coding.trim().eq_ignore_ascii_case("chunked"));
        }

        self.head.push_str(name);
        self.head.push_str(": ");
        self.head.push_str(value);
        self.head.push_str("\r\n");
        Ok(())
    }

    fn finish_headers(&mut self) -> io::Result<()> {
        self.head.push_str("\r\n");
        self.writer.write_all(self.head.as_bytes())?;
        self.head.clear();
        self.writer.flush()
    }

    fn write_body(&mut self, data: &[u8]) -> io::Result<()> {
        if !self.chunked {
            return self.writer.write_all(data);
        }

        // An empty chunk would end the body.
        if data.is_empty() {
            return Ok(());
        }
        write!(self.writer, "{:x}\r\n", data.len())?;
        self.writer.write_all(data)?;
        self.writer.write_all(b"\r\n")
    }

    fn finish_body(&mut self) -> io::Result<()> {
        if self.chunked {
            self.writer.write_all(b"0\r\n\r\n")?;
        }
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_sink_formats_http1() {
        let mut sink = WriteSink::new(Vec::new());
        sink.write_status_line("HTTP/1.1 200 OK").unwrap();
        sink.write_header("Content-Length", "2").unwrap();
        sink.finish_headers().unwrap();
        sink.write_body(b"hi").unwrap();

        assert_eq!(sink.into_inner(), b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
    }

    #[test]
    fn test_write_sink_frames_chunks() {
        let mut sink = WriteSink::new(Vec::new());
        sink.write_status_line("HTTP/1.1 200 OK").unwrap();
        sink.write_header("Transfer-Encoding", "gzip, chunked").unwrap();
        sink.finish_headers().unwrap();
        assert!(sink.is_chunked());

        sink.write_body(b"hello").unwrap();
        sink.write_body(b"").unwrap();
        sink.write_body(&[b'x'; 26]).unwrap();
        sink.finish_body().unwrap();

        let expected = [
            &b"HTTP/1.1 200 OK\r\nTransfer-Encoding: gzip, chunked\r\n\r\n"[..],
            b"5\r\nhello\r\n",
            b"1a\r\nxxxxxxxxxxxxxxxxxxxxxxxxxx\r\n",
            b"0\r\n\r\n",
        ].concat();
        assert_eq!(sink.into_inner(), expected);
    }

    #[test]
    fn test_write_sink_chunked_must_be_last() {
        let mut sink = WriteSink::new(Vec::new());
        sink.write_header("Transfer-Encoding", "chunked, gzip").unwrap();
        assert!(!sink.is_chunked());
        sink.write_header("Content-Length", "3").unwrap();
        sink.finish_headers().unwrap();
        sink.write_body(b"abc").unwrap();
        sink.finish_body().unwrap();
        assert!(sink.into_inner().ends_with(b"\r\n\r\nabc"));
    }

    #[test]
    fn test_buffered_sink_lookup() {
        let mut sink = BufferedSink::new();
        sink.write_header("ETag", "\"a\"").unwrap();
        assert_eq!(sink.header("etag"), Some("\"a\""));
        assert!(!sink.headers_flushed());
        assert!(BufferedSink::flushed_elsewhere().headers_flushed());
    }
}
