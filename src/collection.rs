//! Paginated collections: one REST endpoint, fetched page by page and
//! accumulated in memory.
//!
//! A [`Collection`] owns its cursor, the server-reported total and the items
//! fetched so far. What differs between endpoints (path, filters, where the
//! items live in the response body) is supplied by a [`Resource`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::client::PageSource;
use crate::error::{JulythonError, Result};

/// Server-assigned identity of an item, used to merge pages.
pub trait Keyed {
    fn key(&self) -> String;
}

/// Where the item array and the paging metadata live in a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    /// `{ "objects": [...], "meta": { "total_count", "offset", "limit" } }`
    Tastypie,
    /// A bare JSON array; the page size is known only to the caller.
    BareArray,
    /// `{ "badges": [...] }` without ids; ids are synthesized in order.
    Badges,
}

/// One endpoint and its serialization rules.
pub trait Resource {
    type Item: DeserializeOwned + Keyed;

    fn path(&self) -> String;

    fn default_limit(&self) -> u64;

    fn envelope(&self) -> Envelope {
        Envelope::Tastypie
    }

    /// Active filters as query pairs, already joined into their wire form.
    fn filters(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Pull the items and paging metadata out of a response body. `loaded` is
    /// the number of items the collection will hold before this page is merged.
    fn unwrap(&self, body: Value, loaded: usize) -> Result<Page<Self::Item>> {
        unwrap_envelope(self.envelope(), body, loaded)
    }
}

/// The items of one response plus whatever paging metadata it carried.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
struct TastypieBody<T> {
    objects: Vec<T>,
    meta: Meta,
}

#[derive(Deserialize)]
struct Meta {
    total_count: u64,
    #[serde(default)]
    offset: u64,
}

pub fn unwrap_envelope<T: DeserializeOwned>(
    envelope: Envelope,
    body: Value,
    loaded: usize,
) -> Result<Page<T>> {
    match envelope {
        Envelope::Tastypie => {
            if !body.is_object() {
                return Err(JulythonError::Envelope(
                    "expected an object with 'objects' and 'meta'".to_string(),
                ));
            }
            let parsed: TastypieBody<T> = serde_json::from_value(body)?;
            Ok(Page {
                items: parsed.objects,
                total: Some(parsed.meta.total_count),
                offset: Some(parsed.meta.offset),
            })
        }
        Envelope::BareArray => {
            if !body.is_array() {
                return Err(JulythonError::Envelope("expected a JSON array".to_string()));
            }
            Ok(Page {
                items: serde_json::from_value(body)?,
                total: None,
                offset: None,
            })
        }
        Envelope::Badges => {
            let Value::Object(mut map) = body else {
                return Err(JulythonError::Envelope(
                    "expected an object with 'badges'".to_string(),
                ));
            };
            let Some(Value::Array(mut badges)) = map.remove("badges") else {
                return Err(JulythonError::Envelope("missing 'badges' array".to_string()));
            };
            for (i, badge) in badges.iter_mut().enumerate() {
                if let Value::Object(fields) = badge {
                    fields.insert("id".to_string(), Value::from((loaded + i + 1) as u64));
                }
            }
            let items: Vec<T> = serde_json::from_value(Value::Array(badges))?;
            let total = (loaded + items.len()) as u64;
            Ok(Page {
                items,
                total: Some(total),
                offset: None,
            })
        }
    }
}

/// Request position for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Offset { offset: u64, limit: u64 },
    Page { page: u64, per_page: u64 },
}

impl Cursor {
    fn start(envelope: Envelope, limit: u64) -> Self {
        match envelope {
            Envelope::BareArray => Cursor::Page {
                page: 1,
                per_page: limit,
            },
            Envelope::Tastypie | Envelope::Badges => Cursor::Offset { offset: 0, limit },
        }
    }

    fn pairs(&self) -> [(&'static str, u64); 2] {
        match *self {
            Cursor::Offset { offset, limit } => [("limit", limit), ("offset", offset)],
            Cursor::Page { page, per_page } => [("page", page), ("per_page", per_page)],
        }
    }

    fn limit(&self) -> u64 {
        match *self {
            Cursor::Offset { limit, .. } => limit,
            Cursor::Page { per_page, .. } => per_page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Merge into the current items; nothing is removed.
    Add,
    /// The fetched page replaces the current items.
    Replace,
}

/// Issued by [`Collection::begin`]; a response is only applied if the
/// collection has not been reset since.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Merged { received: usize },
    Stale,
}

pub struct Collection<R: Resource> {
    resource: R,
    items: Vec<R::Item>,
    cursor: Cursor,
    total: u64,
    has_more: bool,
    generation: u64,
}

impl<R: Resource> Collection<R> {
    pub fn new(resource: R) -> Self {
        let limit = resource.default_limit();
        Self::with_limit(resource, limit)
    }

    pub fn with_limit(resource: R, limit: u64) -> Self {
        let cursor = Cursor::start(resource.envelope(), limit.max(1));
        Self {
            resource,
            items: Vec::new(),
            cursor,
            total: 0,
            has_more: true,
            generation: 0,
        }
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut R {
        &mut self.resource
    }

    /// Query string for the next fetch.
    pub fn params(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in self.cursor.pairs() {
            serializer.append_pair(name, &value.to_string());
        }
        for (name, value) in self.resource.filters() {
            serializer.append_pair(name, &value);
        }
        serializer.finish()
    }

    /// Drop everything fetched so far. Responses for tickets issued before
    /// the reset are ignored when they arrive.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = Cursor::start(self.resource.envelope(), self.cursor.limit());
        self.total = 0;
        self.has_more = true;
        self.generation += 1;
    }

    pub fn begin(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.params(),
        }
    }

    /// Apply a response body fetched for `ticket`. On error nothing changes.
    pub fn complete(&mut self, ticket: FetchTicket, body: Value, mode: FetchMode) -> Result<Outcome> {
        if ticket.generation != self.generation {
            warn!(
                path = %self.resource.path(),
                query = %ticket.query,
                "dropping response for a reset collection"
            );
            return Ok(Outcome::Stale);
        }

        let loaded = match mode {
            FetchMode::Add => self.items.len(),
            FetchMode::Replace => 0,
        };
        let page = self.resource.unwrap(body, loaded)?;
        let received = page.items.len();

        match mode {
            FetchMode::Add => self.merge(page.items),
            FetchMode::Replace => self.items = page.items,
        }

        match &mut self.cursor {
            Cursor::Offset { offset, limit } => {
                let base = page.offset.unwrap_or(*offset);
                *offset = (*offset).max(base.saturating_add(*limit));
                self.total = page.total.unwrap_or(self.items.len() as u64);
                // a replaced list only holds the last page, so measure against the cursor
                let seen = match mode {
                    FetchMode::Add => self.items.len() as u64,
                    FetchMode::Replace => *offset,
                };
                self.has_more =
                    self.resource.envelope() != Envelope::Badges && self.total > seen;
            }
            Cursor::Page { page: number, per_page } => {
                *number += 1;
                self.total = page.total.unwrap_or(self.items.len() as u64);
                self.has_more = received as u64 == *per_page;
            }
        }

        debug!(
            path = %self.resource.path(),
            received,
            held = self.items.len(),
            total = self.total,
            has_more = self.has_more,
            "merged page"
        );

        Ok(Outcome::Merged { received })
    }

    pub async fn fetch<S: PageSource>(&mut self, source: &S, mode: FetchMode) -> Result<Outcome> {
        let ticket = self.begin();
        let path = self.resource.path();
        debug!(%path, cursor = ?self.cursor(), "fetching page");

        let body = match source.get_json(&path, &ticket.query).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%path, query = %ticket.query, error = %e, "fetch failed");
                return Err(e);
            }
        };

        self.complete(ticket, body, mode)
    }

    /// Keep fetching additively until the server reports no more pages or
    /// `cap` items are held.
    pub async fn fetch_all<S: PageSource>(&mut self, source: &S, cap: Option<usize>) -> Result<()> {
        while self.has_more && cap.map_or(true, |cap| self.items.len() < cap) {
            if let Outcome::Merged { received: 0 } = self.fetch(source, FetchMode::Add).await? {
                break;
            }
        }
        Ok(())
    }

    fn merge(&mut self, incoming: Vec<R::Item>) {
        for item in incoming {
            let key = item.key();
            match self.items.iter().position(|existing| existing.key() == key) {
                Some(pos) => self.items[pos] = item,
                None => self.items.push(item),
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use serde_json::Value;

    use crate::client::PageSource;
    use crate::error::{JulythonError, Result};

    /// Hands out canned bodies in order and records what was asked for.
    #[derive(Default)]
    pub struct FakeSource {
        responses: RefCell<VecDeque<Result<Value>>>,
        pub requests: RefCell<Vec<(String, String)>>,
    }

    impl FakeSource {
        pub fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: RefCell::new(responses.into_iter().map(Ok).collect()),
                requests: RefCell::default(),
            }
        }

        pub fn push_error(&self, status: u16) {
            self.responses.borrow_mut().push_back(Err(JulythonError::ApiError {
                status,
                message: "boom".to_string(),
            }));
        }
    }

    impl PageSource for FakeSource {
        async fn get_json(&self, path: &str, query: &str) -> Result<Value> {
            self.requests
                .borrow_mut()
                .push((path.to_string(), query.to_string()));
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(Value::Array(Vec::new())))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::testing::FakeSource;
    use super::*;

    #[derive(Deserialize, Debug, Clone, PartialEq)]
    struct Thing {
        id: u64,
        name: String,
    }

    impl Keyed for Thing {
        fn key(&self) -> String {
            self.id.to_string()
        }
    }

    struct Things {
        envelope: Envelope,
        tag: Option<String>,
    }

    impl Things {
        fn tastypie() -> Self {
            Self {
                envelope: Envelope::Tastypie,
                tag: None,
            }
        }
    }

    impl Resource for Things {
        type Item = Thing;

        fn path(&self) -> String {
            "/api/v1/thing/".to_string()
        }

        fn default_limit(&self) -> u64 {
            2
        }

        fn envelope(&self) -> Envelope {
            self.envelope
        }

        fn filters(&self) -> Vec<(&'static str, String)> {
            self.tag.iter().map(|t| ("tag", t.clone())).collect()
        }
    }

    fn tastypie(ids: &[u64], offset: u64, total: u64) -> Value {
        let objects: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "id": id, "name": format!("thing {id}") }))
            .collect();
        json!({ "objects": objects, "meta": { "total_count": total, "offset": offset, "limit": 2 } })
    }

    fn pairs(query: &str) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        pairs.sort();
        pairs
    }

    #[test]
    fn test_params_contains_cursor_and_filters() {
        for (limit, offset) in [(1, 0), (20, 40), (100, 7)] {
            let mut c = Collection::with_limit(
                Things {
                    envelope: Envelope::Tastypie,
                    tag: Some("red".to_string()),
                },
                limit,
            );
            c.cursor = Cursor::Offset { offset, limit };
            assert_eq!(
                pairs(&c.params()),
                vec![
                    ("limit".to_string(), limit.to_string()),
                    ("offset".to_string(), offset.to_string()),
                    ("tag".to_string(), "red".to_string()),
                ]
            );
        }
    }

    #[test]
    fn test_params_page_cursor() {
        let c = Collection::with_limit(
            Things {
                envelope: Envelope::BareArray,
                tag: None,
            },
            30,
        );
        assert_eq!(c.params(), "page=1&per_page=30");
    }

    #[test]
    fn test_complete_advances_offset_and_has_more() {
        let mut c = Collection::new(Things::tastypie());

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1, 2], 0, 5), FetchMode::Add).unwrap();
        assert_eq!(c.cursor(), Cursor::Offset { offset: 2, limit: 2 });
        assert_eq!(c.total(), 5);
        assert!(c.has_more());

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[3, 4], 2, 5), FetchMode::Add).unwrap();
        assert_eq!(c.cursor(), Cursor::Offset { offset: 4, limit: 2 });
        assert!(c.has_more());

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[5], 4, 5), FetchMode::Add).unwrap();
        assert_eq!(c.cursor(), Cursor::Offset { offset: 6, limit: 2 });
        assert_eq!(c.len(), 5);
        assert!(!c.has_more());
    }

    #[test]
    fn test_add_never_removes_items() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1, 2], 0, 4), FetchMode::Add).unwrap();

        let ticket = c.begin();
        let outcome = c.complete(ticket, tastypie(&[], 2, 4), FetchMode::Add).unwrap();
        assert_eq!(outcome, Outcome::Merged { received: 0 });
        assert_eq!(c.len(), 2);
        assert!(c.has_more());
    }

    #[test]
    fn test_add_merges_known_ids_in_place() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1, 2], 0, 3), FetchMode::Add).unwrap();

        let ticket = c.begin();
        let body = json!({
            "objects": [{ "id": 2, "name": "renamed" }, { "id": 3, "name": "thing 3" }],
            "meta": { "total_count": 3, "offset": 2 }
        });
        c.complete(ticket, body, FetchMode::Add).unwrap();

        let names: Vec<&str> = c.items().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["thing 1", "renamed", "thing 3"]);
    }

    #[test]
    fn test_replace_swaps_items() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1, 2], 0, 4), FetchMode::Add).unwrap();

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[3, 4], 2, 4), FetchMode::Replace).unwrap();
        let ids: Vec<u64> = c.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 4]);
        assert!(!c.has_more());
    }

    #[test]
    fn test_replace_paging_stops_at_total() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1, 2], 0, 5), FetchMode::Replace).unwrap();
        assert!(c.has_more());

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[3, 4], 2, 5), FetchMode::Replace).unwrap();
        assert!(c.has_more());

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[5], 4, 5), FetchMode::Replace).unwrap();
        assert_eq!(c.len(), 1);
        assert!(!c.has_more());

        let ticket = c.begin();
        c.complete(ticket, tastypie(&[], 6, 5), FetchMode::Replace).unwrap();
        assert!(!c.has_more());
    }

    #[test]
    fn test_huge_server_offset_saturates() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1], u64::MAX - 1, 10), FetchMode::Add).unwrap();
        assert_eq!(c.cursor(), Cursor::Offset { offset: u64::MAX, limit: 2 });
    }

    #[test]
    fn test_malformed_body_leaves_state_unchanged() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.complete(ticket, tastypie(&[1, 2], 0, 4), FetchMode::Add).unwrap();

        let ticket = c.begin();
        let result = c.complete(ticket, json!([{ "id": 3, "name": "x" }]), FetchMode::Add);
        assert!(matches!(result, Err(JulythonError::Envelope(_))));

        let ticket = c.begin();
        let result = c.complete(ticket, json!({ "objects": [] }), FetchMode::Add);
        assert!(matches!(result, Err(JulythonError::Json(_))));

        assert_eq!(c.len(), 2);
        assert_eq!(c.total(), 4);
        assert_eq!(c.cursor(), Cursor::Offset { offset: 2, limit: 2 });
    }

    #[test]
    fn test_stale_ticket_is_dropped_after_reset() {
        let mut c = Collection::new(Things::tastypie());
        let ticket = c.begin();
        c.reset();

        let outcome = c.complete(ticket, tastypie(&[1, 2], 0, 2), FetchMode::Add).unwrap();
        assert_eq!(outcome, Outcome::Stale);
        assert!(c.is_empty());
        assert_eq!(c.cursor(), Cursor::Offset { offset: 0, limit: 2 });
    }

    #[test]
    fn test_bare_array_has_more_follows_page_size() {
        let mut c = Collection::new(Things {
            envelope: Envelope::BareArray,
            tag: None,
        });

        let ticket = c.begin();
        let full = json!([{ "id": 1, "name": "a" }, { "id": 2, "name": "b" }]);
        c.complete(ticket, full, FetchMode::Add).unwrap();
        assert_eq!(c.cursor(), Cursor::Page { page: 2, per_page: 2 });
        assert!(c.has_more());

        let ticket = c.begin();
        c.complete(ticket, json!([{ "id": 3, "name": "c" }]), FetchMode::Add).unwrap();
        assert_eq!(c.cursor(), Cursor::Page { page: 3, per_page: 2 });
        assert!(!c.has_more());
        assert_eq!(c.total(), 3);
    }

    #[test]
    fn test_badges_envelope_synthesizes_ids() {
        let page: Page<Thing> = unwrap_envelope(
            Envelope::Badges,
            json!({ "badges": [{ "name": "a" }, { "name": "b" }] }),
            3,
        )
        .unwrap();
        let ids: Vec<u64> = page.items.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(page.total, Some(5));
    }

    #[tokio::test]
    async fn test_fetch_requests_next_page() {
        let source = FakeSource::new(vec![tastypie(&[1, 2], 0, 3), tastypie(&[3], 2, 3)]);
        let mut c = Collection::new(Things::tastypie());

        c.fetch(&source, FetchMode::Add).await.unwrap();
        c.fetch(&source, FetchMode::Add).await.unwrap();

        let requests = source.requests.borrow();
        assert_eq!(requests[0], ("/api/v1/thing/".to_string(), "limit=2&offset=0".to_string()));
        assert_eq!(requests[1].1, "limit=2&offset=2");
        assert_eq!(c.len(), 3);
        assert!(!c.has_more());
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_state_unchanged() {
        let source = FakeSource::new(vec![tastypie(&[1, 2], 0, 4)]);
        source.push_error(500);
        let mut c = Collection::new(Things::tastypie());

        c.fetch(&source, FetchMode::Add).await.unwrap();
        let result = c.fetch(&source, FetchMode::Add).await;

        assert!(matches!(result, Err(JulythonError::ApiError { status: 500, .. })));
        assert_eq!(c.len(), 2);
        assert_eq!(c.total(), 4);
        assert_eq!(c.cursor(), Cursor::Offset { offset: 2, limit: 2 });
    }

    #[tokio::test]
    async fn test_fetch_all_respects_cap() {
        let source = FakeSource::new(vec![
            tastypie(&[1, 2], 0, 10),
            tastypie(&[3, 4], 2, 10),
            tastypie(&[5, 6], 4, 10),
        ]);
        let mut c = Collection::new(Things::tastypie());

        c.fetch_all(&source, Some(3)).await.unwrap();
        assert_eq!(c.len(), 4);
        assert_eq!(source.requests.borrow().len(), 2);
    }
}
