// URL-safe alphabet: cursors ride in query strings
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

const CURSOR_DELIMITER: &str = "::";

/// A value that can ride inside an opaque pagination cursor.
///
/// Timestamps use RFC 3339 at microsecond precision so they survive a
/// round-trip through Postgres `timestamptz` unchanged.
pub trait CursorKey: Sized {
    fn write_key(&self) -> String;
    fn read_key(raw: &str) -> Option<Self>;
}

impl CursorKey for DateTime<Utc> {
    fn write_key(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn read_key(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }
}

impl CursorKey for i64 {
    fn write_key(&self) -> String {
        self.to_string()
    }

    fn read_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl CursorKey for i32 {
    fn write_key(&self) -> String {
        self.to_string()
    }

    fn read_key(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

impl CursorKey for Uuid {
    fn write_key(&self) -> String {
        self.to_string()
    }

    fn read_key(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok()
    }
}

impl CursorKey for String {
    fn write_key(&self) -> String {
        self.clone()
    }

    fn read_key(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

/// Resume point for a keyset scan: the last-seen sort value plus the id that
/// breaks ties on it. The encoded form is opaque to clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<S, T> {
    pub sort_key: S,
    pub tie_break: T,
}

impl<S: CursorKey, T: CursorKey> Cursor<S, T> {
    pub fn new(sort_key: S, tie_break: T) -> Self {
        Self { sort_key, tie_break }
    }

    pub fn encode(&self) -> String {
        let plain = format!(
            "{}{}{}",
            self.sort_key.write_key(),
            CURSOR_DELIMITER,
            self.tie_break.write_key()
        );
        BASE64.encode(plain)
    }

    /// A cursor that fails to decode is treated as absent: a stale or
    /// corrupted token from a client restarts the scan at page one instead
    /// of failing the request.
    pub fn decode(raw: &str) -> Option<Self> {
        let bytes = BASE64.decode(raw).ok()?;
        let plain = String::from_utf8(bytes).ok()?;
        // The sort key may itself contain the delimiter (timestamps contain
        // colons); the tie-break id never does, so split from the right.
        let (sort_key, tie_break) = plain.rsplit_once(CURSOR_DELIMITER)?;
        Some(Self {
            sort_key: S::read_key(sort_key)?,
            tie_break: T::read_key(tie_break)?,
        })
    }

    pub fn decode_param(raw: Option<&str>) -> Option<Self> {
        raw.filter(|value| !value.is_empty()).and_then(Self::decode)
    }
}

/// Page size clamped to the safe range shared by every listing endpoint.
#[derive(Debug, Clone, Copy)]
pub struct PageLimit(i64);

impl PageLimit {
    pub const MAX: i64 = 50;

    pub fn clamp(requested: i64) -> Self {
        Self(requested.clamp(1, Self::MAX))
    }

    pub fn value(self) -> i64 {
        self.0
    }

    /// Listings fetch one row beyond the page to learn whether a next page
    /// exists without a count query.
    pub fn fetch_size(self) -> i64 {
        self.0 + 1
    }
}

#[derive(Serialize, Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Assemble a page from rows fetched with `limit.fetch_size()`: trim the
    /// probe row and, when it was present, encode the resume cursor from the
    /// last visible row's sort key and id.
    pub fn assemble<S, K>(
        mut rows: Vec<T>,
        limit: PageLimit,
        cursor_of: impl Fn(&T) -> Cursor<S, K>,
    ) -> Self
    where
        S: CursorKey,
        K: CursorKey,
    {
        let has_next = rows.len() as i64 > limit.value();
        if has_next {
            rows.truncate(limit.value() as usize);
        }

        let next_cursor = if has_next {
            rows.last().map(|row| cursor_of(row).encode())
        } else {
            None
        };

        Self {
            items: rows,
            next_cursor,
        }
    }

    /// Convert fetched rows into their response shape after the cursor has
    /// been taken from them.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}
