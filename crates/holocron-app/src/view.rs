// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Collection, PageEnvelope, Record, total_pages_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Handle for one in-flight page fetch. The sequence number orders fetches
/// per view; only the latest issued ticket may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub collection: Collection,
    pub page: u32,
    pub seq: u64,
}

/// Per-collection browsing state: current page, loaded records, page count,
/// and fetch status. One view instance exclusively owns one collection's
/// state; there is no concurrent writer.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView {
    collection: Collection,
    pub current_page: u32,
    pub records: Vec<Record>,
    pub total_pages: u32,
    pub status: ViewStatus,
    pub last_error: Option<String>,
    pub selected: Option<Record>,
    latest_seq: u64,
}

impl CollectionView {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            current_page: 1,
            records: Vec::new(),
            total_pages: 0,
            status: ViewStatus::Idle,
            last_error: None,
            selected: None,
            latest_seq: 0,
        }
    }

    pub const fn collection(&self) -> Collection {
        self.collection
    }

    /// Clamps a requested page to `1..=total_pages` once a total is known.
    pub fn clamp_page(&self, page: u32) -> u32 {
        if self.total_pages == 0 {
            page.max(1)
        } else {
            page.clamp(1, self.total_pages)
        }
    }

    /// Transitions to Loading and issues a fetch ticket for `page`. Returns
    /// `None` when the view is already Ready on that page; a view that has
    /// never loaded, or last failed, always re-fetches.
    pub fn request_page(&mut self, page: u32) -> Option<FetchTicket> {
        let page = self.clamp_page(page);
        if self.status == ViewStatus::Ready && page == self.current_page {
            return None;
        }
        Some(self.issue(page))
    }

    /// Unconditionally re-fetches the current page.
    pub fn refresh(&mut self) -> FetchTicket {
        self.issue(self.current_page)
    }

    fn issue(&mut self, page: u32) -> FetchTicket {
        self.current_page = page;
        self.status = ViewStatus::Loading;
        self.latest_seq += 1;
        FetchTicket {
            collection: self.collection,
            page,
            seq: self.latest_seq,
        }
    }

    /// Applies a fetch outcome. Resolutions whose sequence number is not
    /// the latest issued are discarded, so a superseded fetch that arrives
    /// late can never overwrite fresher state. On failure the previously
    /// loaded records stay visible and only `last_error` changes.
    pub fn resolve(&mut self, seq: u64, outcome: Result<PageEnvelope, String>) -> bool {
        if seq != self.latest_seq {
            return false;
        }

        match outcome {
            Ok(envelope) => {
                self.total_pages = total_pages_for(envelope.total_count);
                self.records = envelope.results;
                self.status = ViewStatus::Ready;
                self.last_error = None;
                if self.total_pages > 0 && self.current_page > self.total_pages {
                    self.current_page = self.total_pages;
                }
            }
            Err(message) => {
                self.status = ViewStatus::Failed;
                self.last_error = Some(message);
            }
        }
        true
    }

    /// A loading indicator is only warranted before anything has loaded;
    /// afterwards stale records stay visible through a fetch.
    pub fn has_loaded(&self) -> bool {
        !self.records.is_empty()
    }

    /// Page controls are rendered only when there is more than one page.
    pub fn shows_navigator(&self) -> bool {
        self.total_pages > 1
    }

    pub fn select(&mut self, index: usize) -> Option<&Record> {
        self.selected = self.records.get(index).cloned();
        self.selected.as_ref()
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{CollectionView, ViewStatus};
    use crate::{Collection, FieldValue, PageEnvelope, Record};

    fn named(name: &str) -> Record {
        Record::from_fields([("name", FieldValue::Text(name.to_owned()))])
    }

    fn envelope(total_count: u64, names: &[&str]) -> PageEnvelope {
        PageEnvelope {
            total_count,
            next: None,
            previous: None,
            results: names.iter().map(|name| named(name)).collect(),
        }
    }

    #[test]
    fn first_request_always_fetches() {
        let mut view = CollectionView::new(Collection::People);
        let ticket = view.request_page(1).expect("first request should fetch");
        assert_eq!(ticket.page, 1);
        assert_eq!(view.status, ViewStatus::Loading);
    }

    #[test]
    fn successful_resolve_populates_records_and_page_count() {
        let mut view = CollectionView::new(Collection::People);
        let ticket = view.request_page(1).expect("ticket");

        assert!(view.resolve(ticket.seq, Ok(envelope(82, &["Luke", "Leia"]))));
        assert_eq!(view.status, ViewStatus::Ready);
        assert_eq!(view.total_pages, 9);
        assert_eq!(view.records.len(), 2);
        assert!(view.last_error.is_none());
        assert!(view.shows_navigator());
    }

    #[test]
    fn repeat_request_with_same_envelope_is_idempotent() {
        let mut view = CollectionView::new(Collection::Planets);
        let first = view.request_page(3).expect("first ticket");
        view.resolve(first.seq, Ok(envelope(60, &["Tatooine", "Hoth"])));
        let after_first = view.clone();

        // Ready view ignores a request for the page it already shows.
        assert!(view.request_page(3).is_none());

        // A forced refresh with the same envelope settles to the same state.
        let second = view.refresh();
        view.resolve(second.seq, Ok(envelope(60, &["Tatooine", "Hoth"])));
        assert_eq!(view.records, after_first.records);
        assert_eq!(view.total_pages, after_first.total_pages);
        assert_eq!(view.status, ViewStatus::Ready);
    }

    #[test]
    fn failure_keeps_previous_records_visible() {
        let mut view = CollectionView::new(Collection::Vehicles);
        let first = view.request_page(1).expect("first ticket");
        view.resolve(first.seq, Ok(envelope(39, &["Sand Crawler"])));

        let second = view.request_page(2).expect("second ticket");
        assert!(view.resolve(second.seq, Err("connection refused".to_owned())));

        assert_eq!(view.status, ViewStatus::Failed);
        assert_eq!(view.last_error.as_deref(), Some("connection refused"));
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].name(), Some("Sand Crawler"));
    }

    #[test]
    fn stale_resolution_is_discarded() {
        let mut view = CollectionView::new(Collection::Starships);
        let old = view.request_page(1).expect("old ticket");
        let new = view.request_page(2).expect("new ticket");

        assert!(view.resolve(new.seq, Ok(envelope(36, &["Executor"]))));
        // The superseded fetch arrives late and must not overwrite.
        assert!(!view.resolve(old.seq, Ok(envelope(36, &["Death Star"]))));

        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].name(), Some("Executor"));
        assert_eq!(view.current_page, 2);
    }

    #[test]
    fn failed_view_refetches_its_current_page() {
        let mut view = CollectionView::new(Collection::People);
        let first = view.request_page(1).expect("first ticket");
        view.resolve(first.seq, Err("timeout".to_owned()));

        let retry = view
            .request_page(1)
            .expect("failed view should allow retrying the same page");
        assert_eq!(retry.page, 1);
    }

    #[test]
    fn page_requests_are_clamped_to_known_bounds() {
        let mut view = CollectionView::new(Collection::Planets);
        let first = view.request_page(1).expect("first ticket");
        view.resolve(first.seq, Ok(envelope(25, &["Naboo"])));
        assert_eq!(view.total_pages, 3);

        let over = view.request_page(99).expect("clamped ticket");
        assert_eq!(over.page, 3);

        let under = view.request_page(0).expect("clamped ticket");
        assert_eq!(under.page, 1);
    }

    #[test]
    fn empty_collection_has_no_pages_and_no_navigator() {
        let mut view = CollectionView::new(Collection::People);
        let ticket = view.request_page(1).expect("ticket");
        view.resolve(ticket.seq, Ok(envelope(0, &[])));

        assert_eq!(view.total_pages, 0);
        assert!(view.records.is_empty());
        assert!(!view.shows_navigator());
    }

    #[test]
    fn selection_holds_at_most_one_record() {
        let mut view = CollectionView::new(Collection::People);
        let ticket = view.request_page(1).expect("ticket");
        view.resolve(ticket.seq, Ok(envelope(2, &["Luke", "Leia"])));

        let selected = view.select(1).expect("record at index 1");
        assert_eq!(selected.name(), Some("Leia"));
        assert!(view.select(9).is_none());
        assert!(view.selected.is_none());

        view.select(0);
        view.clear_selection();
        assert!(view.selected.is_none());
    }
}
