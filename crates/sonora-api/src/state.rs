use jiff::civil::Date;
use jiff::tz::TimeZone;

use sonora_storage::records::Records;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub records: Records,
    /// Practice time zone; decides what "today" is for undated submissions.
    pub time_zone: TimeZone,
}

impl AppState {
    pub fn new(records: Records, time_zone: TimeZone) -> Self {
        Self {
            records,
            time_zone,
        }
    }

    pub fn today(&self) -> Date {
        jiff::Timestamp::now().to_zoned(self.time_zone.clone()).date()
    }
}
