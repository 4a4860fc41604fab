use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar of a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// True when every price/volume field holds a real number.
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close, self.volume]
            .iter()
            .all(|v| !v.is_nan())
    }
}

/// The three most recent bars of a series, newest first in naming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentBars {
    pub today: PriceBar,
    pub yesterday: PriceBar,
    pub day_before: PriceBar,
}

impl RecentBars {
    /// Takes the last three bars of an oldest-first slice.
    pub fn from_history(bars: &[PriceBar]) -> Option<Self> {
        match bars {
            [.., day_before, yesterday, today] => Some(Self {
                today: *today,
                yesterday: *yesterday,
                day_before: *day_before,
            }),
            _ => None,
        }
    }
}

/// Closing prices of an oldest-first bar slice.
pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
