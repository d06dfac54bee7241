//! Memcached ASCII Protocol Client
//!
//! Minimal blocking client for the `set`, `get` and `delete` commands of
//! the memcached text protocol. Values travel JSON-encoded with zero flags.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::backend::{DaemonClient, DaemonFamily};
use crate::cache::current_timestamp_ms;
use crate::error::{CacheError, Result};

// == Protocol Constants ==
/// Longest key memcached accepts
pub const MAX_KEY_LENGTH: usize = 250;

/// Largest data block accepted in a `VALUE` reply (memcached's default item size)
pub const MAX_VALUE_LENGTH: usize = 1024 * 1024;

/// Longest reply line read before the daemon is considered broken
const MAX_LINE_LENGTH: u64 = 2048;

/// Expiration values above this are read by memcached as absolute Unix time
const RELATIVE_EXPIRY_LIMIT: u64 = 60 * 60 * 24 * 30;

#[derive(Debug)]
struct Connection {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Connection {
    fn open(addr: &str, timeout: Duration) -> Result<Self> {
        let mut last_err = None;
        for socket_addr in addr.to_socket_addrs()? {
            match TcpStream::connect_timeout(&socket_addr, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    stream.set_nodelay(true)?;
                    let reader = BufReader::new(stream.try_clone()?);
                    debug!(%socket_addr, "connected to cache daemon");
                    return Ok(Self {
                        reader,
                        writer: stream,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }

        Err(match last_err {
            Some(err) => err.into(),
            None => CacheError::BackendUnavailable(format!("{addr} resolved to no addresses")),
        })
    }

    fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Reads one `\r\n`-terminated line, without the terminator.
    fn read_line(&mut self) -> Result<String> {
        let mut buf = Vec::new();
        let n = (&mut self.reader)
            .take(MAX_LINE_LENGTH)
            .read_until(b'\n', &mut buf)?;
        if n == 0 {
            return Err(CacheError::BackendUnavailable(
                "cache daemon closed the connection".to_string(),
            ));
        }
        if !buf.ends_with(b"\r\n") {
            return Err(CacheError::Protocol("unterminated response line".to_string()));
        }
        buf.truncate(buf.len() - 2);
        String::from_utf8(buf).map_err(|_| CacheError::Protocol("non-UTF-8 response line".to_string()))
    }

    /// Reads a data block of `len` bytes followed by `\r\n`.
    fn read_block(&mut self, len: usize) -> Result<Vec<u8>> {
        let framed = len
            .checked_add(2)
            .filter(|_| len <= MAX_VALUE_LENGTH)
            .ok_or_else(|| CacheError::Protocol(format!("data block of {len} bytes refused")))?;
        let mut buf = vec![0u8; framed];
        self.reader.read_exact(&mut buf)?;
        if !buf.ends_with(b"\r\n") {
            return Err(CacheError::Protocol("unterminated data block".to_string()));
        }
        buf.truncate(len);
        Ok(buf)
    }
}

// == Memcache Client ==
/// Blocking memcached client holding a single lazily opened connection.
///
/// A failed exchange drops the connection; the next call reconnects.
/// There are no retries.
#[derive(Debug)]
pub struct MemcacheClient {
    addr: String,
    timeout: Duration,
    conn: Mutex<Option<Connection>>,
}

impl MemcacheClient {
    /// Creates a client for `addr` (`host:port`). No connection is opened
    /// until the first command.
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            conn: Mutex::new(None),
        }
    }

    fn exchange<T>(&self, op: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        let mut guard = self.lock();
        if guard.is_none() {
            *guard = Some(Connection::open(&self.addr, self.timeout)?);
        }

        let result = match guard.as_mut() {
            Some(conn) => op(conn),
            None => return Err(CacheError::Internal("connection slot empty".to_string())),
        };
        if result.is_err() {
            *guard = None;
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, Option<Connection>> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DaemonClient for MemcacheClient {
    fn family(&self) -> DaemonFamily {
        DaemonFamily::Memcache
    }

    fn store(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<()> {
        validate_key(key)?;
        let data = serde_json::to_vec(value)
            .map_err(|err| CacheError::InvalidRequest(format!("unencodable value: {err}")))?;
        if data.len() > MAX_VALUE_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "encoded value of {} bytes exceeds the {MAX_VALUE_LENGTH} byte limit",
                data.len()
            )));
        }
        let exptime = expiry_field(ttl_seconds, current_timestamp_ms() / 1000);

        let mut request = format!("set {key} 0 {exptime} {}\r\n", data.len()).into_bytes();
        request.extend_from_slice(&data);
        request.extend_from_slice(b"\r\n");

        self.exchange(|conn| {
            conn.send(&request)?;
            match conn.read_line()?.as_str() {
                "STORED" => Ok(()),
                other => Err(CacheError::Protocol(format!("set rejected: {other}"))),
            }
        })
    }

    fn fetch(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;

        let data = self.exchange(|conn| {
            conn.send(format!("get {key}\r\n").as_bytes())?;
            let header = conn.read_line()?;
            if header == "END" {
                return Ok(None);
            }

            let len = parse_value_header(&header, key)?;
            let data = conn.read_block(len)?;
            match conn.read_line()?.as_str() {
                "END" => Ok(Some(data)),
                other => Err(CacheError::Protocol(format!("expected END, got {other}"))),
            }
        })?;

        data.map(|bytes| {
            serde_json::from_slice::<Value>(&bytes)
                .map_err(|err| CacheError::Protocol(format!("undecodable value: {err}")))
        })
        .transpose()
    }

    fn delete(&self, key: &str) -> Result<bool> {
        validate_key(key)?;

        self.exchange(|conn| {
            conn.send(format!("delete {key}\r\n").as_bytes())?;
            match conn.read_line()?.as_str() {
                "DELETED" => Ok(true),
                "NOT_FOUND" => Ok(false),
                other => Err(CacheError::Protocol(format!("delete rejected: {other}"))),
            }
        })
    }
}

// == Protocol Helpers ==
/// Checks a key against memcached's rules: 1..=250 bytes, no whitespace or
/// control characters.
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() || key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidRequest(format!(
            "key must be 1..={MAX_KEY_LENGTH} bytes"
        )));
    }
    if key.bytes().any(|b| b <= b' ' || b == 0x7f) {
        return Err(CacheError::InvalidRequest(
            "key contains whitespace or control characters".to_string(),
        ));
    }
    Ok(())
}

/// Maps a TTL onto memcached's `exptime` field.
///
/// Zero means "never expires" to memcached, so a zero TTL is sent as `-1`
/// (already expired). TTLs past the 30-day relative limit become absolute.
fn expiry_field(ttl_seconds: u64, now_secs: u64) -> i64 {
    if ttl_seconds == 0 {
        -1
    } else if ttl_seconds > RELATIVE_EXPIRY_LIMIT {
        now_secs.saturating_add(ttl_seconds).min(u32::MAX as u64) as i64
    } else {
        ttl_seconds as i64
    }
}

/// Parses `VALUE <key> <flags> <bytes> [<cas>]` and returns the byte count,
/// refusing blocks larger than [`MAX_VALUE_LENGTH`].
fn parse_value_header(header: &str, key: &str) -> Result<usize> {
    let bad = || CacheError::Protocol(format!("unexpected get response: {header}"));

    let mut parts = header.split(' ');
    if parts.next() != Some("VALUE") || parts.next() != Some(key) {
        return Err(bad());
    }
    let _flags = parts.next().ok_or_else(bad)?;
    let len: usize = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    if len > MAX_VALUE_LENGTH {
        return Err(CacheError::Protocol(format!(
            "value of {len} bytes exceeds the {MAX_VALUE_LENGTH} byte limit"
        )));
    }
    Ok(len)
}
