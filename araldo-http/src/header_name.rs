// Copyright (C) 2023 Tristan Gerritsen <tristan@thewoosh.org>
// All Rights Reserved.

//! The header registry: static tables between header names and their
//! identifiers. Lookups are case-insensitive. Outbound names are emitted with
//! every word capitalized, the way most clients send them.

use std::borrow::Cow;

use phf::phf_map;
use unicase::UniCase;

/// The request header fields the decoders know about. Anything else ends up
/// as [`RequestHeaderName::Other`] and is kept in the unknown bucket.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestHeaderName {
    Other(String),

    Accept,
    AcceptCharset,
    AcceptDatetime,
    AcceptEncoding,
    AcceptLanguage,
    AccessControlRequestHeaders,
    AccessControlRequestMethod,
    Authorization,
    CacheControl,
    ChecksumContent,
    ChecksumHeader,
    ChecksumHeaders,
    Connection,
    ContentEncoding,
    ContentLength,
    ContentType,
    Cookie,
    Date,
    DNT,
    EarlyData,
    Expect,
    Forwarded,
    From,
    Host,
    IfMatch,
    IfModifiedSince,
    IfNoneMatch,
    IfRange,
    IfUnmodifiedSince,
    KeepAlive,
    MaxForwards,
    Origin,
    Pragma,
    ProxyAuthorization,
    Purpose,
    Range,
    Referer,
    SecChUa,
    SecChUaMobile,
    SecChUaPlatform,
    SecFetchDest,
    SecFetchMode,
    SecFetchSite,
    SecFetchUser,
    SignaturePg,
    TE,
    Trailer,
    TransferEncoding,
    Upgrade,
    UpgradeInsecureRequests,
    UserAgent,
    Via,
    Warning,
    XForwardedFor,
    XForwardedHost,
    XForwardedProto,
    XRequestedWith,
}

static STRING_TO_REQUEST_HEADER_NAME_MAP: phf::Map<UniCase<&'static str>, RequestHeaderName> = phf_map!(
    UniCase::ascii("accept") => RequestHeaderName::Accept,
    UniCase::ascii("accept-charset") => RequestHeaderName::AcceptCharset,
    UniCase::ascii("accept-datetime") => RequestHeaderName::AcceptDatetime,
    UniCase::ascii("accept-encoding") => RequestHeaderName::AcceptEncoding,
    UniCase::ascii("accept-language") => RequestHeaderName::AcceptLanguage,
    UniCase::ascii("access-control-request-headers") => RequestHeaderName::AccessControlRequestHeaders,
    UniCase::ascii("access-control-request-method") => RequestHeaderName::AccessControlRequestMethod,
    UniCase::ascii("authorization") => RequestHeaderName::Authorization,
    UniCase::ascii("cache-control") => RequestHeaderName::CacheControl,
    UniCase::ascii("checksum-content") => RequestHeaderName::ChecksumContent,
    UniCase::ascii("checksum-header") => RequestHeaderName::ChecksumHeader,
    UniCase::ascii("checksum-headers") => RequestHeaderName::ChecksumHeaders,
    UniCase::ascii("connection") => RequestHeaderName::Connection,
    UniCase::ascii("content-encoding") => RequestHeaderName::ContentEncoding,
    UniCase::ascii("content-length") => RequestHeaderName::ContentLength,
    UniCase::ascii("content-type") => RequestHeaderName::ContentType,
    UniCase::ascii("cookie") => RequestHeaderName::Cookie,
    UniCase::ascii("date") => RequestHeaderName::Date,
    UniCase::ascii("dnt") => RequestHeaderName::DNT,
    UniCase::ascii("early-data") => RequestHeaderName::EarlyData,
    UniCase::ascii("expect") => RequestHeaderName::Expect,
    UniCase::ascii("forwarded") => RequestHeaderName::Forwarded,
    UniCase::ascii("from") => RequestHeaderName::From,
    UniCase::ascii("host") => RequestHeaderName::Host,
    UniCase::ascii("if-match") => RequestHeaderName::IfMatch,
    UniCase::ascii("if-modified-since") => RequestHeaderName::IfModifiedSince,
    UniCase::ascii("if-none-match") => RequestHeaderName::IfNoneMatch,
    UniCase::ascii("if-range") => RequestHeaderName::IfRange,
    UniCase::ascii("if-unmodified-since") => RequestHeaderName::IfUnmodifiedSince,
    UniCase::ascii("keep-alive") => RequestHeaderName::KeepAlive,
    UniCase::ascii("max-forwards") => RequestHeaderName::MaxForwards,
    UniCase::ascii("origin") => RequestHeaderName::Origin,
    UniCase::ascii("pragma") => RequestHeaderName::Pragma,
    UniCase::ascii("proxy-authorization") => RequestHeaderName::ProxyAuthorization,
    UniCase::ascii("purpose") => RequestHeaderName::Purpose,
    UniCase::ascii("range") => RequestHeaderName::Range,
    UniCase::ascii("referer") => RequestHeaderName::Referer,
    UniCase::ascii("sec-ch-ua") => RequestHeaderName::SecChUa,
    UniCase::ascii("sec-ch-ua-mobile") => RequestHeaderName::SecChUaMobile,
    UniCase::ascii("sec-ch-ua-platform") => RequestHeaderName::SecChUaPlatform,
    UniCase::ascii("sec-fetch-dest") => RequestHeaderName::SecFetchDest,
    UniCase::ascii("sec-fetch-mode") => RequestHeaderName::SecFetchMode,
    UniCase::ascii("sec-fetch-site") => RequestHeaderName::SecFetchSite,
    UniCase::ascii("sec-fetch-user") => RequestHeaderName::SecFetchUser,
    UniCase::ascii("signature-pg") => RequestHeaderName::SignaturePg,
    UniCase::ascii("te") => RequestHeaderName::TE,
    UniCase::ascii("trailer") => RequestHeaderName::Trailer,
    UniCase::ascii("transfer-encoding") => RequestHeaderName::TransferEncoding,
    UniCase::ascii("upgrade") => RequestHeaderName::Upgrade,
    UniCase::ascii("upgrade-insecure-requests") => RequestHeaderName::UpgradeInsecureRequests,
    UniCase::ascii("user-agent") => RequestHeaderName::UserAgent,
    UniCase::ascii("via") => RequestHeaderName::Via,
    UniCase::ascii("warning") => RequestHeaderName::Warning,
    UniCase::ascii("x-forwarded-for") => RequestHeaderName::XForwardedFor,
    UniCase::ascii("x-forwarded-host") => RequestHeaderName::XForwardedHost,
    UniCase::ascii("x-forwarded-proto") => RequestHeaderName::XForwardedProto,
    UniCase::ascii("x-requested-with") => RequestHeaderName::XRequestedWith,

    // Spellings some clients of the checksum protocol send.
    UniCase::ascii("checksum_content") => RequestHeaderName::ChecksumContent,
    UniCase::ascii("checksum_header") => RequestHeaderName::ChecksumHeader,
    UniCase::ascii("checksum_headers") => RequestHeaderName::ChecksumHeaders,

    // Pre-standard name for `Range`, sent by old Netscape-era clients.
    UniCase::ascii("request-range") => RequestHeaderName::Range,
);

impl From<String> for RequestHeaderName {
    #[must_use]
    fn from(mut value: String) -> Self {
        match STRING_TO_REQUEST_HEADER_NAME_MAP.get(&UniCase::ascii(&value)) {
            Some(header_name) => header_name.clone(),
            None => {
                value.make_ascii_lowercase();
                RequestHeaderName::Other(value)
            }
        }
    }
}

impl From<&str> for RequestHeaderName {
    #[must_use]
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl RequestHeaderName {
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, RequestHeaderName::Other(_))
    }

    #[must_use]
    pub fn to_string_h1(&self) -> &str {
        match self {
            RequestHeaderName::Other(str) => str,

            RequestHeaderName::Accept => "Accept",
            RequestHeaderName::AcceptCharset => "Accept-Charset",
            RequestHeaderName::AcceptDatetime => "Accept-Datetime",
            RequestHeaderName::AcceptEncoding => "Accept-Encoding",
            RequestHeaderName::AcceptLanguage => "Accept-Language",
            RequestHeaderName::AccessControlRequestHeaders => "Access-Control-Request-Headers",
            RequestHeaderName::AccessControlRequestMethod => "Access-Control-Request-Method",
            RequestHeaderName::Authorization => "Authorization",
            RequestHeaderName::CacheControl => "Cache-Control",
            RequestHeaderName::ChecksumContent => "Checksum-Content",
            RequestHeaderName::ChecksumHeader => "Checksum-Header",
            RequestHeaderName::ChecksumHeaders => "Checksum-Headers",
            RequestHeaderName::Connection => "Connection",
            RequestHeaderName::ContentEncoding => "Content-Encoding",
            RequestHeaderName::ContentLength => "Content-Length",
            RequestHeaderName::ContentType => "Content-Type",
            RequestHeaderName::Cookie => "Cookie",
            RequestHeaderName::Date => "Date",
            RequestHeaderName::DNT => "DNT",
            RequestHeaderName::EarlyData => "Early-Data",
            RequestHeaderName::Expect => "Expect",
            RequestHeaderName::Forwarded => "Forwarded",
            RequestHeaderName::From => "From",
            RequestHeaderName::Host => "Host",
            RequestHeaderName::IfMatch => "If-Match",
            RequestHeaderName::IfModifiedSince => "If-Modified-Since",
            RequestHeaderName::IfNoneMatch => "If-None-Match",
            RequestHeaderName::IfRange => "If-Range",
            RequestHeaderName::IfUnmodifiedSince => "If-Unmodified-Since",
            RequestHeaderName::KeepAlive => "Keep-Alive",
            RequestHeaderName::MaxForwards => "Max-Forwards",
            RequestHeaderName::Origin => "Origin",
            RequestHeaderName::Pragma => "Pragma",
            RequestHeaderName::ProxyAuthorization => "Proxy-Authorization",
            RequestHeaderName::Purpose => "Purpose",
            RequestHeaderName::Range => "Range",
            RequestHeaderName::Referer => "Referer",
            RequestHeaderName::SecChUa => "Sec-CH-UA",
            RequestHeaderName::SecChUaMobile => "Sec-CH-UA-Mobile",
            RequestHeaderName::SecChUaPlatform => "Sec-CH-UA-Platform",
            RequestHeaderName::SecFetchDest => "Sec-Fetch-Dest",
            RequestHeaderName::SecFetchMode => "Sec-Fetch-Mode",
            RequestHeaderName::SecFetchSite => "Sec-Fetch-Site",
            RequestHeaderName::SecFetchUser => "Sec-Fetch-User",
            RequestHeaderName::SignaturePg => "Signature-PG",
            RequestHeaderName::TE => "TE",
            RequestHeaderName::Trailer => "Trailer",
            RequestHeaderName::TransferEncoding => "Transfer-Encoding",
            RequestHeaderName::Upgrade => "Upgrade",
            RequestHeaderName::UpgradeInsecureRequests => "Upgrade-Insecure-Requests",
            RequestHeaderName::UserAgent => "User-Agent",
            RequestHeaderName::Via => "Via",
            RequestHeaderName::Warning => "Warning",
            RequestHeaderName::XForwardedFor => "X-Forwarded-For",
            RequestHeaderName::XForwardedHost => "X-Forwarded-Host",
            RequestHeaderName::XForwardedProto => "X-Forwarded-Proto",
            RequestHeaderName::XRequestedWith => "X-Requested-With",
        }
    }

    /// The lowercase form, used for internal matching and in log fields.
    pub fn to_string_lowercase(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            RequestHeaderName::Other(str) => return Cow::Owned(str.to_ascii_lowercase()),

            RequestHeaderName::Accept => "accept",
            RequestHeaderName::AcceptCharset => "accept-charset",
            RequestHeaderName::AcceptDatetime => "accept-datetime",
            RequestHeaderName::AcceptEncoding => "accept-encoding",
            RequestHeaderName::AcceptLanguage => "accept-language",
            RequestHeaderName::AccessControlRequestHeaders => "access-control-request-headers",
            RequestHeaderName::AccessControlRequestMethod => "access-control-request-method",
            RequestHeaderName::Authorization => "authorization",
            RequestHeaderName::CacheControl => "cache-control",
            RequestHeaderName::ChecksumContent => "checksum-content",
            RequestHeaderName::ChecksumHeader => "checksum-header",
            RequestHeaderName::ChecksumHeaders => "checksum-headers",
            RequestHeaderName::Connection => "connection",
            RequestHeaderName::ContentEncoding => "content-encoding",
            RequestHeaderName::ContentLength => "content-length",
            RequestHeaderName::ContentType => "content-type",
            RequestHeaderName::Cookie => "cookie",
            RequestHeaderName::Date => "date",
            RequestHeaderName::DNT => "dnt",
            RequestHeaderName::EarlyData => "early-data",
            RequestHeaderName::Expect => "expect",
            RequestHeaderName::Forwarded => "forwarded",
            RequestHeaderName::From => "from",
            RequestHeaderName::Host => "host",
            RequestHeaderName::IfMatch => "if-match",
            RequestHeaderName::IfModifiedSince => "if-modified-since",
            RequestHeaderName::IfNoneMatch => "if-none-match",
            RequestHeaderName::IfRange => "if-range",
            RequestHeaderName::IfUnmodifiedSince => "if-unmodified-since",
            RequestHeaderName::KeepAlive => "keep-alive",
            RequestHeaderName::MaxForwards => "max-forwards",
            RequestHeaderName::Origin => "origin",
            RequestHeaderName::Pragma => "pragma",
            RequestHeaderName::ProxyAuthorization => "proxy-authorization",
            RequestHeaderName::Purpose => "purpose",
            RequestHeaderName::Range => "range",
            RequestHeaderName::Referer => "referer",
            RequestHeaderName::SecChUa => "sec-ch-ua",
            RequestHeaderName::SecChUaMobile => "sec-ch-ua-mobile",
            RequestHeaderName::SecChUaPlatform => "sec-ch-ua-platform",
            RequestHeaderName::SecFetchDest => "sec-fetch-dest",
            RequestHeaderName::SecFetchMode => "sec-fetch-mode",
            RequestHeaderName::SecFetchSite => "sec-fetch-site",
            RequestHeaderName::SecFetchUser => "sec-fetch-user",
            RequestHeaderName::SignaturePg => "signature-pg",
            RequestHeaderName::TE => "te",
            RequestHeaderName::Trailer => "trailer",
            RequestHeaderName::TransferEncoding => "transfer-encoding",
            RequestHeaderName::Upgrade => "upgrade",
            RequestHeaderName::UpgradeInsecureRequests => "upgrade-insecure-requests",
            RequestHeaderName::UserAgent => "user-agent",
            RequestHeaderName::Via => "via",
            RequestHeaderName::Warning => "warning",
            RequestHeaderName::XForwardedFor => "x-forwarded-for",
            RequestHeaderName::XForwardedHost => "x-forwarded-host",
            RequestHeaderName::XForwardedProto => "x-forwarded-proto",
            RequestHeaderName::XRequestedWith => "x-requested-with",
        })
    }
}

/// The response header fields the builder can set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResponseHeaderName {
    AcceptPatch,
    AcceptRanges,
    AccessControlAllowCredentials,
    AccessControlAllowHeaders,
    AccessControlAllowMethods,
    AccessControlAllowOrigin,
    AccessControlExposeHeaders,
    AccessControlMaxAge,
    Age,
    Allow,
    CacheControl,
    ChecksumContent,
    ChecksumHeader,
    ChecksumHeaders,
    Connection,
    ContentDisposition,
    ContentEncoding,
    ContentLanguage,
    ContentLength,
    ContentLocation,
    ContentRange,
    ContentRevision,
    ContentSecurityPolicy,
    ContentType,
    Date,
    DateActual,
    ETag,
    Expires,
    LastModified,
    Link,
    Location,
    Pragma,
    ProxyAuthenticate,
    PublicKeyPins,
    Refresh,
    RetryAfter,
    Server,
    SetCookie,
    Status,
    StrictTransportSecurity,
    Trailer,
    TransferEncoding,
    Upgrade,
    Vary,
    Warning,
    WwwAuthenticate,
    XContentSecurityPolicy,
    XContentTypeOptions,
    XUaCompatible,
}

static STRING_TO_RESPONSE_HEADER_NAME_MAP: phf::Map<UniCase<&'static str>, ResponseHeaderName> = phf_map!(
    UniCase::ascii("accept-patch") => ResponseHeaderName::AcceptPatch,
    UniCase::ascii("accept-ranges") => ResponseHeaderName::AcceptRanges,
    UniCase::ascii("access-control-allow-credentials") => ResponseHeaderName::AccessControlAllowCredentials,
    UniCase::ascii("access-control-allow-headers") => ResponseHeaderName::AccessControlAllowHeaders,
    UniCase::ascii("access-control-allow-methods") => ResponseHeaderName::AccessControlAllowMethods,
    UniCase::ascii("access-control-allow-origin") => ResponseHeaderName::AccessControlAllowOrigin,
    UniCase::ascii("access-control-expose-headers") => ResponseHeaderName::AccessControlExposeHeaders,
    UniCase::ascii("access-control-max-age") => ResponseHeaderName::AccessControlMaxAge,
    UniCase::ascii("age") => ResponseHeaderName::Age,
    UniCase::ascii("allow") => ResponseHeaderName::Allow,
    UniCase::ascii("cache-control") => ResponseHeaderName::CacheControl,
    UniCase::ascii("checksum-content") => ResponseHeaderName::ChecksumContent,
    UniCase::ascii("checksum-header") => ResponseHeaderName::ChecksumHeader,
    UniCase::ascii("checksum-headers") => ResponseHeaderName::ChecksumHeaders,
    UniCase::ascii("connection") => ResponseHeaderName::Connection,
    UniCase::ascii("content-disposition") => ResponseHeaderName::ContentDisposition,
    UniCase::ascii("content-encoding") => ResponseHeaderName::ContentEncoding,
    UniCase::ascii("content-language") => ResponseHeaderName::ContentLanguage,
    UniCase::ascii("content-length") => ResponseHeaderName::ContentLength,
    UniCase::ascii("content-location") => ResponseHeaderName::ContentLocation,
    UniCase::ascii("content-range") => ResponseHeaderName::ContentRange,
    UniCase::ascii("content-revision") => ResponseHeaderName::ContentRevision,
    UniCase::ascii("content-security-policy") => ResponseHeaderName::ContentSecurityPolicy,
    UniCase::ascii("content-type") => ResponseHeaderName::ContentType,
    UniCase::ascii("date") => ResponseHeaderName::Date,
    UniCase::ascii("date-actual") => ResponseHeaderName::DateActual,
    UniCase::ascii("etag") => ResponseHeaderName::ETag,
    UniCase::ascii("expires") => ResponseHeaderName::Expires,
    UniCase::ascii("last-modified") => ResponseHeaderName::LastModified,
    UniCase::ascii("link") => ResponseHeaderName::Link,
    UniCase::ascii("location") => ResponseHeaderName::Location,
    UniCase::ascii("pragma") => ResponseHeaderName::Pragma,
    UniCase::ascii("proxy-authenticate") => ResponseHeaderName::ProxyAuthenticate,
    UniCase::ascii("public-key-pins") => ResponseHeaderName::PublicKeyPins,
    UniCase::ascii("refresh") => ResponseHeaderName::Refresh,
    UniCase::ascii("retry-after") => ResponseHeaderName::RetryAfter,
    UniCase::ascii("server") => ResponseHeaderName::Server,
    UniCase::ascii("set-cookie") => ResponseHeaderName::SetCookie,
    UniCase::ascii("status") => ResponseHeaderName::Status,
    UniCase::ascii("strict-transport-security") => ResponseHeaderName::StrictTransportSecurity,
    UniCase::ascii("trailer") => ResponseHeaderName::Trailer,
    UniCase::ascii("transfer-encoding") => ResponseHeaderName::TransferEncoding,
    UniCase::ascii("upgrade") => ResponseHeaderName::Upgrade,
    UniCase::ascii("vary") => ResponseHeaderName::Vary,
    UniCase::ascii("warning") => ResponseHeaderName::Warning,
    UniCase::ascii("www-authenticate") => ResponseHeaderName::WwwAuthenticate,
    UniCase::ascii("x-content-security-policy") => ResponseHeaderName::XContentSecurityPolicy,
    UniCase::ascii("x-content-type-options") => ResponseHeaderName::XContentTypeOptions,
    UniCase::ascii("x-ua-compatible") => ResponseHeaderName::XUaCompatible,

    UniCase::ascii("checksum_content") => ResponseHeaderName::ChecksumContent,
    UniCase::ascii("checksum_header") => ResponseHeaderName::ChecksumHeader,
    UniCase::ascii("checksum_headers") => ResponseHeaderName::ChecksumHeaders,
    UniCase::ascii("content_revision") => ResponseHeaderName::ContentRevision,
    UniCase::ascii("date_actual") => ResponseHeaderName::DateActual,
);

impl ResponseHeaderName {
    /// Looks up a response header by its name, ignoring case. Used to decode
    /// the names listed in `Checksum-Headers`.
    #[must_use]
    pub fn from_lowercase(name: &str) -> Option<Self> {
        STRING_TO_RESPONSE_HEADER_NAME_MAP.get(&UniCase::ascii(name)).copied()
    }

    #[must_use]
    pub fn to_string_h1(&self) -> &'static str {
        match self {
            ResponseHeaderName::AcceptPatch => "Accept-Patch",
            ResponseHeaderName::AcceptRanges => "Accept-Ranges",
            ResponseHeaderName::AccessControlAllowCredentials => "Access-Control-Allow-Credentials",
            ResponseHeaderName::AccessControlAllowHeaders => "Access-Control-Allow-Headers",
            ResponseHeaderName::AccessControlAllowMethods => "Access-Control-Allow-Methods",
            ResponseHeaderName::AccessControlAllowOrigin => "Access-Control-Allow-Origin",
            ResponseHeaderName::AccessControlExposeHeaders => "Access-Control-Expose-Headers",
            ResponseHeaderName::AccessControlMaxAge => "Access-Control-Max-Age",
            ResponseHeaderName::Age => "Age",
            ResponseHeaderName::Allow => "Allow",
            ResponseHeaderName::CacheControl => "Cache-Control",
            ResponseHeaderName::ChecksumContent => "Checksum-Content",
            ResponseHeaderName::ChecksumHeader => "Checksum-Header",
            ResponseHeaderName::ChecksumHeaders => "Checksum-Headers",
            ResponseHeaderName::Connection => "Connection",
            ResponseHeaderName::ContentDisposition => "Content-Disposition",
            ResponseHeaderName::ContentEncoding => "Content-Encoding",
            ResponseHeaderName::ContentLanguage => "Content-Language",
            ResponseHeaderName::ContentLength => "Content-Length",
            ResponseHeaderName::ContentLocation => "Content-Location",
            ResponseHeaderName::ContentRange => "Content-Range",
            ResponseHeaderName::ContentRevision => "Content-Revision",
            ResponseHeaderName::ContentSecurityPolicy => "Content-Security-Policy",
            ResponseHeaderName::ContentType => "Content-Type",
            ResponseHeaderName::Date => "Date",
            ResponseHeaderName::DateActual => "Date-Actual",
            ResponseHeaderName::ETag => "ETag",
            ResponseHeaderName::Expires => "Expires",
            ResponseHeaderName::LastModified => "Last-Modified",
            ResponseHeaderName::Link => "Link",
            ResponseHeaderName::Location => "Location",
            ResponseHeaderName::Pragma => "Pragma",
            ResponseHeaderName::ProxyAuthenticate => "Proxy-Authenticate",
            ResponseHeaderName::PublicKeyPins => "Public-Key-Pins",
            ResponseHeaderName::Refresh => "Refresh",
            ResponseHeaderName::RetryAfter => "Retry-After",
            ResponseHeaderName::Server => "Server",
            ResponseHeaderName::SetCookie => "Set-Cookie",
            ResponseHeaderName::Status => "Status",
            ResponseHeaderName::StrictTransportSecurity => "Strict-Transport-Security",
            ResponseHeaderName::Trailer => "Trailer",
            ResponseHeaderName::TransferEncoding => "Transfer-Encoding",
            ResponseHeaderName::Upgrade => "Upgrade",
            ResponseHeaderName::Vary => "Vary",
            ResponseHeaderName::Warning => "Warning",
            ResponseHeaderName::WwwAuthenticate => "WWW-Authenticate",
            ResponseHeaderName::XContentSecurityPolicy => "X-Content-Security-Policy",
            ResponseHeaderName::XContentTypeOptions => "X-Content-Type-Options",
            ResponseHeaderName::XUaCompatible => "X-UA-Compatible",
        }
    }

    #[must_use]
    pub fn to_string_lowercase(&self) -> &'static str {
        match self {
            ResponseHeaderName::AcceptPatch => "accept-patch",
            ResponseHeaderName::AcceptRanges => "accept-ranges",
            ResponseHeaderName::AccessControlAllowCredentials => "access-control-allow-credentials",
            ResponseHeaderName::AccessControlAllowHeaders => "access-control-allow-headers",
            ResponseHeaderName::AccessControlAllowMethods => "access-control-allow-methods",
            ResponseHeaderName::AccessControlAllowOrigin => "access-control-allow-origin",
            ResponseHeaderName::AccessControlExposeHeaders => "access-control-expose-headers",
            ResponseHeaderName::AccessControlMaxAge => "access-control-max-age",
            ResponseHeaderName::Age => "age",
            ResponseHeaderName::Allow => "allow",
            ResponseHeaderName::CacheControl => "cache-control",
            ResponseHeaderName::ChecksumContent => "checksum-content",
            ResponseHeaderName::ChecksumHeader => "checksum-header",
            ResponseHeaderName::ChecksumHeaders => "checksum-headers",
            ResponseHeaderName::Connection => "connection",
            ResponseHeaderName::ContentDisposition => "content-disposition",
            ResponseHeaderName::ContentEncoding => "content-encoding",
            ResponseHeaderName::ContentLanguage => "content-language",
            ResponseHeaderName::ContentLength => "content-length",
            ResponseHeaderName::ContentLocation => "content-location",
            ResponseHeaderName::ContentRange => "content-range",
            ResponseHeaderName::ContentRevision => "content-revision",
            ResponseHeaderName::ContentSecurityPolicy => "content-security-policy",
            ResponseHeaderName::ContentType => "content-type",
            ResponseHeaderName::Date => "date",
            ResponseHeaderName::DateActual => "date-actual",
            ResponseHeaderName::ETag => "etag",
            ResponseHeaderName::Expires => "expires",
            ResponseHeaderName::LastModified => "last-modified",
            ResponseHeaderName::Link => "link",
            ResponseHeaderName::Location => "location",
            ResponseHeaderName::Pragma => "pragma",
            ResponseHeaderName::ProxyAuthenticate => "proxy-authenticate",
            ResponseHeaderName::PublicKeyPins => "public-key-pins",
            ResponseHeaderName::Refresh => "refresh",
            ResponseHeaderName::RetryAfter => "retry-after",
            ResponseHeaderName::Server => "server",
            ResponseHeaderName::SetCookie => "set-cookie",
            ResponseHeaderName::Status => "status",
            ResponseHeaderName::StrictTransportSecurity => "strict-transport-security",
            ResponseHeaderName::Trailer => "trailer",
            ResponseHeaderName::TransferEncoding => "transfer-encoding",
            ResponseHeaderName::Upgrade => "upgrade",
            ResponseHeaderName::Vary => "vary",
            ResponseHeaderName::Warning => "warning",
            ResponseHeaderName::WwwAuthenticate => "www-authenticate",
            ResponseHeaderName::XContentSecurityPolicy => "x-content-security-policy",
            ResponseHeaderName::XContentTypeOptions => "x-content-type-options",
            ResponseHeaderName::XUaCompatible => "x-ua-compatible",
        }
    }

    /// Whether the header may appear more than once in a response, each
    /// value on its own line.
    #[must_use]
    pub fn allows_multiple_lines(&self) -> bool {
        matches!(self, ResponseHeaderName::SetCookie | ResponseHeaderName::Link | ResponseHeaderName::Warning)
    }
}
