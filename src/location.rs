//! Location State
//!
//! The search fields are mirrored into a shareable location URL
//! (`<endpoint>/?q=<term>&type=<type>&subtype=<subtype>`) so a search can be
//! bookmarked, pasted back in with `--location`, and revisited with
//! back/forward navigation.

use crate::query::SearchQuery;
use anyhow::{Context, Result};
use url::Url;

const TERM_PARAM: &str = "q";
const TYPE_PARAM: &str = "type";
const SUBTYPE_PARAM: &str = "subtype";

/// Key-value store holding the query fields of the current location
pub trait Location {
    /// Read the query fields of the current entry. Missing fields read as "".
    fn read(&self) -> SearchQuery;

    /// Record a new entry carrying these fields
    fn write(&mut self, query: &SearchQuery);
}

/// Build the location URL for a query on top of `base`
pub fn location_url(base: &Url, query: &SearchQuery) -> Url {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);

    let fields = [
        (TERM_PARAM, &query.term),
        (TYPE_PARAM, &query.resource_type),
        (SUBTYPE_PARAM, &query.subtype),
    ];

    if fields.iter().any(|(_, v)| !v.is_empty()) {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in fields {
            if !value.is_empty() {
                pairs.append_pair(name, value);
            }
        }
    }

    url
}

/// Extract the query fields from a location URL. Later duplicates win.
pub fn query_from_url(url: &Url) -> SearchQuery {
    let mut query = SearchQuery::default();
    for (name, value) in url.query_pairs() {
        match name.as_ref() {
            TERM_PARAM => query.term = value.into_owned(),
            TYPE_PARAM => query.resource_type = value.into_owned(),
            SUBTYPE_PARAM => query.subtype = value.into_owned(),
            _ => {},
        }
    }
    query
}

/// Entries kept in the back/forward history; the oldest are dropped first
pub const MAX_HISTORY_ENTRIES: usize = 100;

/// URL-backed location with a back/forward history
#[derive(Debug, Clone)]
pub struct HistoryLocation {
    entries: Vec<Url>,
    cursor: usize,
}

impl HistoryLocation {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Start from a location string such as a shared link
    pub fn parse(href: &str) -> Result<Self> {
        let url = Url::parse(href).with_context(|| format!("Invalid location: {}", href))?;
        Ok(Self::new(url))
    }

    pub fn current(&self) -> &Url {
        &self.entries[self.cursor]
    }

    pub fn href(&self) -> &str {
        self.current().as_str()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back one entry. Returns false at the oldest entry.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns false at the newest entry.
    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Navigate to an arbitrary location, e.g. a pasted link
    pub fn navigate(&mut self, href: &str) -> Result<()> {
        let url = Url::parse(href).with_context(|| format!("Invalid location: {}", href))?;
        self.push(url);
        Ok(())
    }

    fn push(&mut self, url: Url) {
        if *self.current() == url {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(url);

        let excess = self.entries.len().saturating_sub(MAX_HISTORY_ENTRIES);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        self.cursor = self.entries.len() - 1;
    }
}

impl Location for HistoryLocation {
    fn read(&self) -> SearchQuery {
        query_from_url(self.current())
    }

    fn write(&mut self, query: &SearchQuery) {
        let url = location_url(self.current(), query);
        self.push(url);
    }
}

/// Mirrors the query into a [`Location`] without echoing its own writes.
///
/// `synced` is the last state both sides agree on. Local changes equal to it
/// are not written, and navigation events update it before the caller adopts
/// the navigated state, so adopting never triggers a write.
#[derive(Debug, Clone, Default)]
pub struct LocationSync {
    synced: SearchQuery,
}

impl LocationSync {
    /// Read the location once to seed the initial query
    pub fn init<L: Location>(location: &L) -> (Self, SearchQuery) {
        let query = location.read();
        tracing::debug!("Initial location query: {:?}", query);
        (
            Self {
                synced: query.clone(),
            },
            query,
        )
    }

    /// Write a locally changed query. Returns whether a write happened.
    pub fn on_local_change<L: Location>(&mut self, location: &mut L, query: &SearchQuery) -> bool {
        if *query == self.synced {
            return false;
        }
        location.write(query);
        self.synced = query.clone();
        true
    }

    /// Adopt the location's state after an external navigation
    pub fn on_navigation<L: Location>(&mut self, location: &L) -> SearchQuery {
        let query = location.read();
        tracing::debug!("Navigated to query: {:?}", query);
        self.synced = query.clone();
        query
    }

    pub fn synced(&self) -> &SearchQuery {
        &self.synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HistoryLocation {
        HistoryLocation::parse("http://localhost:8080/").unwrap()
    }

    /// Location stub counting writes
    #[derive(Default)]
    struct RecordingLocation {
        current: SearchQuery,
        writes: usize,
    }

    impl Location for RecordingLocation {
        fn read(&self) -> SearchQuery {
            self.current.clone()
        }

        fn write(&mut self, query: &SearchQuery) {
            self.current = query.clone();
            self.writes += 1;
        }
    }

    #[test]
    fn test_location_url_omits_empty_fields() {
        let url = location_url(
            &Url::parse("http://localhost:8080/?stale=1").unwrap(),
            &SearchQuery::new("bucket-1", "s3", ""),
        );
        assert_eq!(url.as_str(), "http://localhost:8080/?q=bucket-1&type=s3");

        let url = location_url(&url, &SearchQuery::default());
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_location_round_trips_special_characters() {
        let query = SearchQuery::new("my bucket&co=1", "iam", "user");
        let url = location_url(&Url::parse("http://localhost:8080/").unwrap(), &query);
        assert_eq!(query_from_url(&url), query);
    }

    #[test]
    fn test_missing_fields_read_as_empty() {
        let loc = HistoryLocation::parse("http://localhost:8080/?type=dns").unwrap();
        assert_eq!(loc.read(), SearchQuery::new("", "dns", ""));
    }

    #[test]
    fn test_back_and_forward() {
        let mut loc = base();
        loc.write(&SearchQuery::new("a", "", ""));
        loc.write(&SearchQuery::new("ab", "", ""));
        assert_eq!(loc.len(), 3);

        assert!(loc.back());
        assert_eq!(loc.read().term, "a");
        assert!(loc.back());
        assert_eq!(loc.read().term, "");
        assert!(!loc.back());

        assert!(loc.forward());
        assert!(loc.forward());
        assert_eq!(loc.read().term, "ab");
        assert!(!loc.forward());
    }

    #[test]
    fn test_write_after_back_drops_forward_entries() {
        let mut loc = base();
        loc.write(&SearchQuery::new("a", "", ""));
        loc.write(&SearchQuery::new("ab", "", ""));
        loc.back();
        loc.write(&SearchQuery::new("ax", "", ""));

        assert!(!loc.can_go_forward());
        assert_eq!(loc.len(), 3);
        assert_eq!(loc.read().term, "ax");
    }

    #[test]
    fn test_identical_write_is_not_pushed() {
        let mut loc = base();
        loc.write(&SearchQuery::new("a", "", ""));
        loc.write(&SearchQuery::new("a", "", ""));
        assert_eq!(loc.len(), 2);
    }

    #[test]
    fn test_navigate_rejects_garbage() {
        let mut loc = base();
        assert!(loc.navigate("not a url").is_err());
        assert_eq!(loc.len(), 1);
    }

    #[test]
    fn test_history_is_capped() {
        let mut loc = base();
        let mut query = SearchQuery::default();
        for c in "abcdefghij".chars().cycle().take(MAX_HISTORY_ENTRIES + 25) {
            query.term.push(c);
            loc.write(&query);
        }

        assert_eq!(loc.len(), MAX_HISTORY_ENTRIES);
        assert!(!loc.can_go_forward());
        assert_eq!(loc.read(), query);

        let mut steps = 0;
        while loc.back() {
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY_ENTRIES - 1);
        // Oldest surviving entry is 26 keystrokes in
        assert_eq!(loc.read().term.chars().count(), 26);
    }

    #[test]
    fn test_sync_init_reads_once() {
        let loc = HistoryLocation::parse("http://h/?q=i-1234&type=ec2").unwrap();
        let (sync, query) = LocationSync::init(&loc);
        assert_eq!(query, SearchQuery::new("i-1234", "ec2", ""));
        assert_eq!(sync.synced(), &query);
    }

    #[test]
    fn test_sync_writes_only_changes() {
        let mut loc = RecordingLocation::default();
        let (mut sync, mut query) = LocationSync::init(&loc);

        assert!(!sync.on_local_change(&mut loc, &query));
        query.term.push('x');
        assert!(sync.on_local_change(&mut loc, &query));
        assert!(!sync.on_local_change(&mut loc, &query));
        assert_eq!(loc.writes, 1);
    }

    #[test]
    fn test_sync_navigation_does_not_echo() {
        let mut loc = base();
        let (mut sync, mut query) = LocationSync::init(&loc);

        query.term = "a".to_string();
        sync.on_local_change(&mut loc, &query);
        query.term = "ab".to_string();
        sync.on_local_change(&mut loc, &query);
        assert_eq!(loc.len(), 3);

        loc.back();
        let adopted = sync.on_navigation(&loc);
        assert_eq!(adopted.term, "a");

        // Adopting the navigated state must not create a new entry
        assert!(!sync.on_local_change(&mut loc, &adopted));
        assert_eq!(loc.len(), 3);
        assert!(loc.can_go_forward());
    }
}
