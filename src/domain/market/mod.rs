pub mod instruments;
pub mod price_bar;

pub use instruments::{
    COMPANIES, Company, MACRO_SERIES, MacroSeries, MacroTransform, company_by_symbol,
};
pub use price_bar::{PriceBar, RecentBars};
