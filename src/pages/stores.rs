use log::{debug, error};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::debounce::{Debouncer, RequestSequence, Ticket};
use crate::error::Error;
use crate::stores::{Store, StoreQuery, StoreSort, StoresClient};

/// Public store listing with debounced search and server-side sort.
///
/// Fetches are tagged with a ticket; a result arriving after a newer fetch
/// started is dropped.
pub struct StoresPage {
    client: StoresClient,
    sequence: RequestSequence,
    debouncer: Debouncer<String>,
    settled: mpsc::UnboundedReceiver<String>,
    /// Text currently in the search box
    pub search_input: String,
    /// Parameters of the most recent fetch
    pub query: StoreQuery,
    pub stores: Vec<Store>,
    pub loading: bool,
    pub error: Option<String>,
}

impl StoresPage {
    pub fn new(client: StoresClient, debounce: Duration) -> Self {
        let (debouncer, settled) = Debouncer::new(debounce);
        Self {
            client,
            sequence: RequestSequence::new(),
            debouncer,
            settled,
            search_input: String::new(),
            query: StoreQuery::default(),
            stores: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// A keystroke in the search box. The fetch waits for the quiet period.
    pub fn type_search(&mut self, text: &str) {
        self.search_input = text.to_string();
        self.debouncer.push(text.to_string());
    }

    /// Change the sort order. Takes effect on the next fetch.
    pub fn set_sort(&mut self, sort: StoreSort) {
        self.query.sort_by = sort;
    }

    /// Wait for the search box to settle, then fetch with that query.
    ///
    /// Returns `false` right away when no keystroke is waiting to settle.
    pub async fn next_search(&mut self) -> bool {
        let settled = if self.debouncer.is_pending() {
            self.settled.recv().await
        } else {
            self.settled.try_recv().ok()
        };
        match settled {
            Some(search) => {
                debug!("Search settled on {:?}", search);
                self.query.search = search;
                self.refresh().await;
                true
            }
            None => false,
        }
    }

    /// Mark a fetch as started and hand out what it should request
    pub fn start_fetch(&mut self) -> (Ticket, StoreQuery) {
        self.loading = true;
        (self.sequence.begin(), self.query.clone())
    }

    /// Apply a fetch result unless a newer fetch has started since.
    ///
    /// Returns whether the result was applied.
    pub fn finish_fetch(&mut self, ticket: Ticket, result: Result<Vec<Store>, Error>) -> bool {
        if !self.sequence.is_current(ticket) {
            debug!("Dropping stale store listing {:?}", ticket);
            return false;
        }
        self.loading = false;
        match result {
            Ok(stores) => {
                self.stores = stores;
                self.error = None;
            }
            Err(e) => {
                error!("Error fetching stores: {}", e);
                self.error = Some(e.user_message("Error loading stores"));
            }
        }
        true
    }

    /// Fetch with the current query
    pub async fn refresh(&mut self) {
        let (ticket, query) = self.start_fetch();
        let result = self.client.list(&query).await;
        self.finish_fetch(ticket, result);
    }

    /// Stop pending input and ignore any fetch still in flight
    pub fn close(&mut self) {
        self.debouncer.cancel();
        self.sequence.invalidate();
        self.loading = false;
    }
}
