//! HTTP exchanges against the server-under-test.
//!
//! Most requests go through reqwest. Requests flagged `raw` are written
//! byte-for-byte to a TCP socket so paths like `/../../etc/passwd` reach
//! the server without client-side normalization.

use crate::error::{CheckError, CheckResult};

use std::borrow::Cow;
use std::time::Duration;

use reqwest::Method;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const READ_CHUNK: usize = 8192;

/// One request to send.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    /// Overrides the client's default timeout
    pub timeout: Option<Duration>,
    /// Send over a bare socket, path untouched
    pub raw: bool,
}

impl RequestSpec {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
            timeout: None,
            raw: false,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(Method::POST, path).body(body)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }
}

/// A received response: status, headers (in order) and the full body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpExchange {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpExchange {
    /// First header value matching `name`, case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    authority: String,
    default_timeout: Duration,
    client: reqwest::Client,
}

impl HttpClient {
    /// Client for `base_url` (e.g. `http://127.0.0.1:8080`).
    ///
    /// Connection pooling is disabled so every request opens its own
    /// connection, like independent clients would.
    pub fn new(base_url: &str, default_timeout: Duration) -> CheckResult<Self> {
        let url = reqwest::Url::parse(base_url)
            .map_err(|e| CheckError::malformed(format!("invalid base URL {base_url}: {e}")))?;
        let host = url
            .host_str()
            .ok_or_else(|| CheckError::malformed(format!("base URL {base_url} has no host")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| CheckError::malformed(format!("base URL {base_url} has no port")))?;

        let client = reqwest::Client::builder()
            .timeout(default_timeout)
            .pool_max_idle_per_host(0)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| CheckError::from_reqwest(e, base_url))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            authority: format!("{host}:{port}"),
            default_timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn send(&self, spec: &RequestSpec) -> CheckResult<HttpExchange> {
        if spec.raw {
            self.send_raw(spec).await
        } else {
            self.send_http(spec).await
        }
    }

    async fn send_http(&self, spec: &RequestSpec) -> CheckResult<HttpExchange> {
        let url = self.url(&spec.path);

        let mut request = self.client.request(spec.method.clone(), &url);
        for (name, value) in &spec.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &spec.body {
            request = request.body(body.clone());
        }
        if let Some(timeout) = spec.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| CheckError::from_reqwest(e, &url))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| CheckError::from_reqwest(e, &url))?
            .to_vec();

        Ok(HttpExchange {
            status,
            headers,
            body,
        })
    }

    async fn send_raw(&self, spec: &RequestSpec) -> CheckResult<HttpExchange> {
        let url = self.url(&spec.path);
        let timeout = spec.timeout.unwrap_or(self.default_timeout);

        tokio::time::timeout(timeout, self.exchange_raw(spec))
            .await
            .map_err(|_| CheckError::timeout(&url))?
    }

    async fn exchange_raw(&self, spec: &RequestSpec) -> CheckResult<HttpExchange> {
        let mut stream = TcpStream::connect(&self.authority)
            .await
            .map_err(|e| CheckError::connection(&self.url(&spec.path), e))?;

        stream.write_all(&encode_request(spec, &self.authority)).await?;
        stream.flush().await?;

        let mut buf = Vec::with_capacity(READ_CHUNK);
        let head_len = loop {
            if let Some(pos) = find(&buf, HEADER_TERMINATOR) {
                break pos + HEADER_TERMINATOR.len();
            }
            if read_some(&mut stream, &mut buf).await? == 0 {
                return Err(CheckError::malformed(
                    "connection closed before response headers completed",
                ));
            }
        };

        let (status, headers) = parse_head(&buf[..head_len])?;
        let framing = BodyFraming::from_headers(&headers);

        loop {
            let body = &buf[head_len..];
            let complete = match framing {
                BodyFraming::Length(len) => body.len() >= len,
                BodyFraming::Chunked => {
                    body == b"0\r\n\r\n" || body.ends_with(b"\r\n0\r\n\r\n")
                }
                BodyFraming::UntilClose => false,
            };
            if complete {
                break;
            }
            if read_some(&mut stream, &mut buf).await? == 0 {
                break;
            }
        }

        let raw_body = &buf[head_len..];
        let body = match framing {
            BodyFraming::Length(len) => raw_body[..len.min(raw_body.len())].to_vec(),
            BodyFraming::Chunked => decode_chunked(raw_body)?,
            BodyFraming::UntilClose => raw_body.to_vec(),
        };

        Ok(HttpExchange {
            status,
            headers,
            body,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BodyFraming {
    Length(usize),
    Chunked,
    UntilClose,
}

impl BodyFraming {
    pub(crate) fn from_headers(headers: &[(String, String)]) -> Self {
        let value = |name: &str| {
            headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.trim())
        };

        if value("transfer-encoding").is_some_and(|v| v.eq_ignore_ascii_case("chunked")) {
            return Self::Chunked;
        }
        match value("content-length").and_then(|v| v.parse().ok()) {
            Some(len) => Self::Length(len),
            None => Self::UntilClose,
        }
    }
}

async fn read_some(stream: &mut TcpStream, buf: &mut Vec<u8>) -> CheckResult<usize> {
    let mut chunk = [0u8; READ_CHUNK];
    let n = stream.read(&mut chunk).await?;
    buf.extend_from_slice(&chunk[..n]);
    Ok(n)
}

pub(crate) fn encode_request(spec: &RequestSpec, authority: &str) -> Vec<u8> {
    let mut head = format!(
        "{} {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n",
        spec.method, spec.path, authority
    );
    for (name, value) in &spec.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    if let Some(body) = &spec.body {
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    head.push_str("\r\n");

    let mut bytes = head.into_bytes();
    if let Some(body) = &spec.body {
        bytes.extend_from_slice(body);
    }
    bytes
}

/// Parse the status line and headers (the bytes up to and including the
/// blank line).
pub(crate) fn parse_head(head: &[u8]) -> CheckResult<(u16, Vec<(String, String)>)> {
    let text = String::from_utf8_lossy(head);
    let mut lines = text.split("\r\n");

    let status_line = lines
        .next()
        .ok_or_else(|| CheckError::malformed("empty response"))?;
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(CheckError::malformed(format!(
            "bad status line '{status_line}'"
        )));
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| CheckError::malformed(format!("bad status line '{status_line}'")))?;

    let headers = lines
        .take_while(|line| !line.is_empty())
        .filter_map(|line| {
            line.split_once(':')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect();

    Ok((status, headers))
}

pub(crate) fn decode_chunked(mut data: &[u8]) -> CheckResult<Vec<u8>> {
    let mut body = Vec::new();

    loop {
        let line_end = find(data, b"\r\n")
            .ok_or_else(|| CheckError::malformed("truncated chunk size line"))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| CheckError::malformed(format!("bad chunk size '{size_hex}'")))?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(body);
        }
        if data.len() < size {
            return Err(CheckError::malformed("truncated chunk"));
        }
        body.extend_from_slice(&data[..size]);
        data = data[size..].strip_prefix(b"\r\n").unwrap_or(&data[size..]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
