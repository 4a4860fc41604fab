//! Fixed instrument catalog: the selectable companies and the macro series
//! feeding the auxiliary features.

/// A selectable company and its ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Company {
    pub label: &'static str,
    pub symbol: &'static str,
}

pub const COMPANIES: [Company; 8] = [
    Company { label: "Apple (AAPL)", symbol: "AAPL" },
    Company { label: "Microsoft (MSFT)", symbol: "MSFT" },
    Company { label: "Amazon (AMZN)", symbol: "AMZN" },
    Company { label: "Google (GOOGL)", symbol: "GOOGL" },
    Company { label: "Meta (META)", symbol: "META" },
    Company { label: "Tesla (TSLA)", symbol: "TSLA" },
    Company { label: "NVIDIA (NVDA)", symbol: "NVDA" },
    Company { label: "Netflix (NFLX)", symbol: "NFLX" },
];

/// Looks a company up by ticker (case-insensitive).
pub fn company_by_symbol(symbol: &str) -> Option<&'static Company> {
    COMPANIES
        .iter()
        .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
}

/// How a macro series is turned into a single feature value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroTransform {
    /// Latest day-over-day percentage change of the close.
    PercentChange,
    /// Latest day-over-day difference of the close. Used for yields, which are
    /// already rate levels.
    Difference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacroSeries {
    pub feature: &'static str,
    pub symbol: &'static str,
    pub transform: MacroTransform,
}

/// Auxiliary series in the order they are fetched.
pub const MACRO_SERIES: [MacroSeries; 6] = [
    MacroSeries { feature: "sp500", symbol: "^GSPC", transform: MacroTransform::PercentChange },
    MacroSeries { feature: "ret_petroleo_usd", symbol: "CL=F", transform: MacroTransform::PercentChange },
    MacroSeries { feature: "ret_cobre_usd", symbol: "HG=F", transform: MacroTransform::PercentChange },
    MacroSeries { feature: "ret_usd_yuan", symbol: "CNY=X", transform: MacroTransform::PercentChange },
    MacroSeries { feature: "d_tasa_tesoro_10y", symbol: "^TNX", transform: MacroTransform::Difference },
    MacroSeries { feature: "d_tasa_tesoro_3m", symbol: "^IRX", transform: MacroTransform::Difference },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::feature_registry::FEATURE_NAMES;

    #[test]
    fn test_company_lookup_is_case_insensitive() {
        assert_eq!(company_by_symbol("nvda").map(|c| c.label), Some("NVIDIA (NVDA)"));
        assert!(company_by_symbol("IBM").is_none());
    }

    #[test]
    fn test_macro_features_belong_to_schema() {
        for series in MACRO_SERIES {
            assert!(FEATURE_NAMES.contains(&series.feature), "{}", series.feature);
        }
    }

    #[test]
    fn test_rates_use_differences() {
        let rates: Vec<_> = MACRO_SERIES
            .iter()
            .filter(|s| s.transform == MacroTransform::Difference)
            .map(|s| s.symbol)
            .collect();
        assert_eq!(rates, vec!["^TNX", "^IRX"]);
    }
}
