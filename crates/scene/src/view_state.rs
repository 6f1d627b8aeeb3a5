use chrono::TimeDelta;

use crate::filter::FilterState;
use crate::selection::Selection;
use crate::visibility::DisplayToggles;

/// Historical window shown by the trend panel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    OneHour,
    #[default]
    SixHours,
    TwentyFourHours,
    SevenDays,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::TwentyFourHours,
        TimeRange::SevenDays,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneHour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::TwentyFourHours => "24h",
            TimeRange::SevenDays => "7d",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1h" => Some(TimeRange::OneHour),
            "6h" => Some(TimeRange::SixHours),
            "24h" => Some(TimeRange::TwentyFourHours),
            "7d" => Some(TimeRange::SevenDays),
            _ => None,
        }
    }

    pub fn duration(&self) -> TimeDelta {
        match self {
            TimeRange::OneHour => TimeDelta::hours(1),
            TimeRange::SixHours => TimeDelta::hours(6),
            TimeRange::TwentyFourHours => TimeDelta::hours(24),
            TimeRange::SevenDays => TimeDelta::days(7),
        }
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the user can change. Owned by the viewer; derived
/// collections are recomputed from it, never stored here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub selection: Selection,
    pub filters: FilterState,
    pub display: DisplayToggles,
    pub time_range: TimeRange,
}

impl ViewState {
    pub fn selected_server_id(&self) -> Option<&str> {
        self.selection.id()
    }
}
