//! Catalog browsing session: drives the page aggregator against the remote
//! catalog and keeps the stored page cursor in step with it.

use crate::api::CatalogApi;
use crate::prelude::*;
use crate::store::{PageCursorStore, Storage};
use log::{debug, warn};
use rentcat_core::aggregator::{Completion, PageAggregator, PageTicket};
use rentcat_core::catalog::CarSummary;
use rentcat_core::filter::Filter;
use rentcat_core::pagination::MoreDecision;

pub struct CatalogSession<'a, A: CatalogApi, S: Storage> {
    api: &'a A,
    cursor: PageCursorStore<S>,
    aggregator: PageAggregator,
    storage_warning: Option<String>,
}

impl<'a, A: CatalogApi, S: Storage> CatalogSession<'a, A, S> {
    pub fn new(api: &'a A, cursor: PageCursorStore<S>) -> Self {
        Self {
            api,
            cursor,
            aggregator: PageAggregator::new(),
            storage_warning: None,
        }
    }

    /// Switch to `filter` and load its first page.
    ///
    /// Resetting the cursor, remembering the filter and invalidating the previous
    /// session all happen here, before the first request goes out.
    pub async fn change_filter(&mut self, filter: Filter) -> Result<Completion> {
        let saved = self.cursor.set_page(1);
        self.note_saved(saved);
        self.begin(filter).await
    }

    /// Open the catalog for `filter`.
    ///
    /// With `resume`, and when the stored filters equal `filter`, pages are loaded
    /// until the stored cursor is reached again. Otherwise this is
    /// [`CatalogSession::change_filter`].
    pub async fn open(&mut self, filter: Filter, resume: bool) -> Result<Completion> {
        if !resume || self.cursor.remembered_filters() != &filter {
            return self.change_filter(filter).await;
        }

        let target = self.cursor.page();
        debug!("resuming catalog at page {}", target);

        let mut completion = self.begin(filter).await?;
        while self.aggregator.last_page() + 1 < target
            && self.aggregator.has_more()
            && self.aggregator.error().is_none()
        {
            match self.load_more().await? {
                Some(next) => completion = next,
                None => break,
            }
        }

        Ok(completion)
    }

    /// Fetch the next page. `None` when nothing is left or a request is in flight.
    pub async fn load_more(&mut self) -> Result<Option<Completion>> {
        match self.aggregator.load_more() {
            Some(ticket) => self.run(ticket).await.map(Some),
            None => Ok(None),
        }
    }

    async fn begin(&mut self, filter: Filter) -> Result<Completion> {
        let saved = self.cursor.remember_filters(filter.clone());
        self.note_saved(saved);
        let ticket = self.aggregator.start(filter);
        self.run(ticket).await
    }

    async fn run(&mut self, ticket: PageTicket) -> Result<Completion> {
        debug!("requesting page {}", ticket.page());

        let outcome = self
            .api
            .list_cars(ticket.params())
            .await
            .map_err(|err| f!("{err:#}"));
        let completion = self.aggregator.complete(ticket, outcome);

        match &completion {
            Completion::Appended { .. } => {
                let saved = self.cursor.set_page(self.aggregator.last_page() + 1);
                self.note_saved(saved);
            }
            Completion::Failed { page, message } => {
                warn!("page {} failed to load: {}", page, message);
            }
            _ => {}
        }

        Ok(completion)
    }

    /// The catalog keeps working when its position cannot be saved; the failure
    /// is logged and kept as a notice.
    fn note_saved(&mut self, saved: Result<()>) {
        if let Err(err) = saved {
            warn!("could not save catalog position: {:#}", err);
            self.storage_warning = Some(f!("{err:#}"));
        }
    }

    /// Last failure to save the catalog position, if any.
    pub fn storage_warning(&self) -> Option<&str> {
        self.storage_warning.as_deref()
    }

    pub fn items(&self) -> &[CarSummary] {
        self.aggregator.items()
    }

    pub fn has_more(&self) -> bool {
        self.aggregator.has_more()
    }

    pub fn decision(&self) -> Option<MoreDecision> {
        self.aggregator.decision()
    }

    pub fn filter(&self) -> &Filter {
        self.aggregator.filter()
    }

    pub fn pages_loaded(&self) -> u32 {
        self.aggregator.last_page()
    }

    pub fn error(&self) -> Option<&str> {
        self.aggregator.error()
    }

    /// Next page the stored cursor points at.
    pub fn cursor_page(&self) -> u32 {
        self.cursor.page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{car, FakeCatalog};
    use crate::store::memory::MemoryStorage;
    use rentcat_core::catalog::CarsResponse;

    fn page(page: u64, count: usize, total_cars: Option<u64>) -> CarsResponse {
        let start = (page as usize - 1) * 12;
        CarsResponse {
            cars: (start..start + count)
                .map(|i| car(&i.to_string(), "BMW"))
                .collect(),
            total_cars,
            page: Some(page),
            total_pages: total_cars.map(|t| t.div_ceil(12)),
        }
    }

    fn bmw() -> Filter {
        Filter {
            brand: Some("BMW".to_string()),
            ..Default::default()
        }
    }

    /// Storage whose reads succeed and whose writes always fail.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn read(&self, _namespace: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, namespace: &str, _data: &str) -> Result<()> {
            Err(Error::Storage(format!("Failed to write {namespace}.json: read-only")).into())
        }

        fn remove(&self, _namespace: &str) -> Result<()> {
            Ok(())
        }
    }

    fn cursor(storage: &MemoryStorage) -> PageCursorStore<MemoryStorage> {
        PageCursorStore::load(storage.clone())
    }

    #[tokio::test]
    async fn test_single_full_page_stops() {
        let api = FakeCatalog::with_pages(vec![Ok(page(1, 12, Some(12)))]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.change_filter(bmw()).await.unwrap();

        assert_eq!(session.items().len(), 12);
        assert!(!session.has_more());
        assert!(session.load_more().await.unwrap().is_none());
        assert_eq!(api.requested_pages(), vec![Some(1)]);

        let requests = api.requests.borrow();
        let request = &requests[0];
        assert_eq!(request.get("brand"), Some("BMW"));
        assert_eq!(request.get("make"), Some("BMW"));
        assert_eq!(request.get("limit"), Some("12"));
    }

    #[tokio::test]
    async fn test_failed_load_more_changes_nothing() {
        let api = FakeCatalog::with_pages(vec![
            Ok(page(1, 12, Some(30))),
            Err(Error::Network("Failed to fetch cars page 2: HTTP 502".to_string()).into()),
        ]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));
        session.change_filter(bmw()).await.unwrap();

        let items_before = session.items().len();
        let more_before = session.has_more();
        let cursor_before = session.cursor_page();

        let completion = session.load_more().await.unwrap().unwrap();

        assert!(matches!(completion, Completion::Failed { page: 2, .. }));
        assert_eq!(session.items().len(), items_before);
        assert_eq!(session.has_more(), more_before);
        assert_eq!(session.cursor_page(), cursor_before);
        assert!(session.error().unwrap().contains("HTTP 502"));
    }

    #[tokio::test]
    async fn test_retry_after_failure() {
        let api = FakeCatalog::with_pages(vec![
            Ok(page(1, 12, Some(20))),
            Err(eyre!("timed out")),
            Ok(page(2, 8, Some(20))),
        ]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));
        session.change_filter(Filter::default()).await.unwrap();

        session.load_more().await.unwrap();
        session.load_more().await.unwrap();

        assert_eq!(api.requested_pages(), vec![Some(1), Some(2), Some(2)]);
        assert_eq!(session.items().len(), 20);
        assert!(!session.has_more());
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_cursor_follows_appended_pages() {
        let api = FakeCatalog::with_pages(vec![
            Ok(page(1, 12, Some(40))),
            Ok(page(2, 12, Some(40))),
        ]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.change_filter(bmw()).await.unwrap();
        assert_eq!(session.cursor_page(), 2);

        session.load_more().await.unwrap();
        assert_eq!(session.cursor_page(), 3);

        let stored = PageCursorStore::load(storage);
        assert_eq!(stored.page(), 3);
        assert_eq!(stored.remembered_filters(), &bmw());
    }

    #[tokio::test]
    async fn test_change_filter_resets_cursor_and_items() {
        let api = FakeCatalog::with_pages(vec![
            Ok(page(1, 12, Some(40))),
            Ok(page(2, 12, Some(40))),
            Err(eyre!("offline")),
        ]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));
        session.change_filter(Filter::default()).await.unwrap();
        session.load_more().await.unwrap();

        session.change_filter(bmw()).await.unwrap();

        assert!(session.items().is_empty());
        assert_eq!(session.cursor_page(), 1);
        assert_eq!(session.filter(), &bmw());
        assert_eq!(PageCursorStore::load(storage).remembered_filters(), &bmw());
    }

    #[tokio::test]
    async fn test_resume_reloads_up_to_stored_cursor() {
        let storage = MemoryStorage::default();
        {
            let mut stored = cursor(&storage);
            stored.remember_filters(bmw()).unwrap();
            stored.set_page(3).unwrap();
        }

        let api = FakeCatalog::with_pages(vec![
            Ok(page(1, 12, Some(48))),
            Ok(page(2, 12, Some(48))),
        ]);
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.open(bmw(), true).await.unwrap();

        assert_eq!(api.requested_pages(), vec![Some(1), Some(2)]);
        assert_eq!(session.items().len(), 24);
        assert_eq!(session.cursor_page(), 3);
    }

    #[tokio::test]
    async fn test_resume_with_other_filter_starts_over() {
        let storage = MemoryStorage::default();
        {
            let mut stored = cursor(&storage);
            stored.remember_filters(bmw()).unwrap();
            stored.set_page(3).unwrap();
        }

        let api = FakeCatalog::with_pages(vec![Ok(page(1, 12, Some(48)))]);
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.open(Filter::default(), true).await.unwrap();

        assert_eq!(api.requested_pages(), vec![Some(1)]);
        assert_eq!(session.cursor_page(), 2);
    }

    #[tokio::test]
    async fn test_resume_stops_when_catalog_runs_out() {
        let storage = MemoryStorage::default();
        {
            let mut stored = cursor(&storage);
            stored.set_page(5).unwrap();
        }

        let api = FakeCatalog::with_pages(vec![Ok(page(1, 7, Some(7)))]);
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.open(Filter::default(), true).await.unwrap();

        assert_eq!(api.requested_pages(), vec![Some(1)]);
        assert!(!session.has_more());
    }

    #[tokio::test]
    async fn test_total_items_rule_beats_page_count() {
        let mut first = page(1, 12, Some(12));
        first.total_pages = Some(3);
        let api = FakeCatalog::with_pages(vec![Ok(first)]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.change_filter(Filter::default()).await.unwrap();

        assert!(!session.has_more());
    }

    #[tokio::test]
    async fn test_unsaved_cursor_does_not_block_browsing() {
        let api = FakeCatalog::with_pages(vec![
            Ok(page(1, 12, Some(30))),
            Ok(page(2, 12, Some(30))),
        ]);
        let mut session = CatalogSession::new(&api, PageCursorStore::load(ReadOnlyStorage));

        let completion = session.change_filter(bmw()).await.unwrap();
        assert!(matches!(completion, Completion::Appended { .. }));
        assert_eq!(session.items().len(), 12);

        session.load_more().await.unwrap();

        assert_eq!(api.requested_pages(), vec![Some(1), Some(2)]);
        assert_eq!(session.items().len(), 24);
        assert!(session.has_more());
        assert!(session.error().is_none());
        assert!(session.storage_warning().unwrap().contains("read-only"));
    }

    #[tokio::test]
    async fn test_saved_cursor_has_no_storage_warning() {
        let api = FakeCatalog::with_pages(vec![Ok(page(1, 12, Some(12)))]);
        let storage = MemoryStorage::default();
        let mut session = CatalogSession::new(&api, cursor(&storage));

        session.change_filter(bmw()).await.unwrap();

        assert!(session.storage_warning().is_none());
    }
}
