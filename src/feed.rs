//! Live view over a [`Collection`]: subscribers are told whenever the item
//! list changes, and scrolling near the end pulls the next page in.

use tokio::sync::watch;
use tracing::debug;

use crate::client::PageSource;
use crate::collection::{Collection, FetchMode, Outcome, Resource};
use crate::error::Result;

/// Rows from the end of the list at which the next page is requested.
pub const DEFAULT_THRESHOLD: usize = 5;

/// Where the reader is in a rendered list, in rows.
#[derive(Debug, Clone, Copy)]
pub struct ScrollPosition {
    pub offset: usize,
    pub viewport: usize,
    pub content: usize,
}

impl ScrollPosition {
    /// The reader is looking at the last `viewport` rows.
    pub fn at_end(content: usize, viewport: usize) -> Self {
        Self {
            offset: content.saturating_sub(viewport),
            viewport,
            content,
        }
    }

    pub fn remaining(&self) -> usize {
        self.content.saturating_sub(self.offset + self.viewport)
    }
}

pub struct Feed<R: Resource> {
    collection: Collection<R>,
    threshold: usize,
    notify: watch::Sender<usize>,
}

impl<R: Resource> Feed<R> {
    pub fn new(collection: Collection<R>) -> Self {
        let (notify, _) = watch::channel(collection.len());
        Self {
            collection,
            threshold: DEFAULT_THRESHOLD,
            notify,
        }
    }

    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Receiver of the current item count, updated after every merge.
    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.notify.subscribe()
    }

    pub fn items(&self) -> &[R::Item] {
        self.collection.items()
    }

    pub fn collection(&self) -> &Collection<R> {
        &self.collection
    }

    pub fn has_more(&self) -> bool {
        self.collection.has_more()
    }

    pub async fn load<S: PageSource>(&mut self, source: &S, mode: FetchMode) -> Result<Outcome> {
        let outcome = self.collection.fetch(source, mode).await?;
        if let Outcome::Merged { .. } = outcome {
            self.notify.send_replace(self.collection.len());
        }
        Ok(outcome)
    }

    /// Fetch the next page additively if the reader is near the end and the
    /// server has more. Returns whether a fetch was made.
    pub async fn scrolled<S: PageSource>(&mut self, source: &S, position: ScrollPosition) -> Result<bool> {
        if position.remaining() > self.threshold || !self.collection.has_more() {
            return Ok(false);
        }

        debug!(
            remaining = position.remaining(),
            held = self.collection.len(),
            "near end of list, fetching more"
        );
        self.load(source, FetchMode::Add).await?;
        Ok(true)
    }
}
