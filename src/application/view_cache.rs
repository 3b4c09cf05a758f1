// View cache - memoized dashboards per city and window
use crate::domain::dashboard::Dashboard;
use crate::domain::telemetry::{RawRecord, TimeWindow};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type ViewKey = (String, TimeWindow);

struct CachedView {
    record: Arc<RawRecord>,
    dashboard: Arc<Dashboard>,
}

/// Memoizes built dashboards per (city, window).
///
/// An entry is only reused while it was derived from the very same record
/// allocation; a refetched record replaces it. The key space is cities x
/// windows, so nothing is evicted.
#[derive(Default)]
pub struct ViewCache {
    entries: Mutex<HashMap<ViewKey, CachedView>>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieve a dashboard built from `record`
    pub fn get(&self, city: &str, window: TimeWindow, record: &Arc<RawRecord>) -> Option<Arc<Dashboard>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(&(city.to_string(), window))
            .filter(|cached| Arc::ptr_eq(&cached.record, record))
            .map(|cached| cached.dashboard.clone())
    }

    /// Store a dashboard together with the record it was built from
    pub fn store(&self, city: &str, window: TimeWindow, record: Arc<RawRecord>, dashboard: Arc<Dashboard>) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert((city.to_string(), window), CachedView { record, dashboard });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
