use crate::domain::errors::FeatureError;
use serde::{Deserialize, Serialize};

/// Ordered list of feature names.
/// This is the column order of the scenario table and the default order of a
/// model bundle that does not carry its own `feature_names`.
pub const FEATURE_NAMES: &[&str] = &[
    "ret_precio_apertura",
    "ret_precio_maximo",
    "ret_precio_minimo",
    "ret_volumen",
    "sp500",
    "ret_petroleo_usd",
    "d_tasa_tesoro_10y",
    "ret_cobre_usd",
    "d_tasa_tesoro_3m",
    "ret_usd_yuan",
];

/// Decimal places kept in an assembled scenario.
pub const SCENARIO_PRECISION: i32 = 6;

/// The fixed-schema record fed to the return model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub ret_precio_apertura: f64,
    pub ret_precio_maximo: f64,
    pub ret_precio_minimo: f64,
    pub ret_volumen: f64,
    pub sp500: f64,
    pub ret_petroleo_usd: f64,
    pub d_tasa_tesoro_10y: f64,
    pub ret_cobre_usd: f64,
    pub d_tasa_tesoro_3m: f64,
    pub ret_usd_yuan: f64,
}

impl FeatureVector {
    /// Values in `FEATURE_NAMES` order.
    pub fn values(&self) -> [f64; 10] {
        [
            self.ret_precio_apertura,
            self.ret_precio_maximo,
            self.ret_precio_minimo,
            self.ret_volumen,
            self.sp500,
            self.ret_petroleo_usd,
            self.d_tasa_tesoro_10y,
            self.ret_cobre_usd,
            self.d_tasa_tesoro_3m,
            self.ret_usd_yuan,
        ]
    }

    /// `(name, value)` pairs in schema order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, f64)> {
        FEATURE_NAMES.iter().copied().zip(self.values())
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Mutable slot for a named feature.
    pub fn slot_mut(&mut self, name: &str) -> Option<&mut f64> {
        match name {
            "ret_precio_apertura" => Some(&mut self.ret_precio_apertura),
            "ret_precio_maximo" => Some(&mut self.ret_precio_maximo),
            "ret_precio_minimo" => Some(&mut self.ret_precio_minimo),
            "ret_volumen" => Some(&mut self.ret_volumen),
            "sp500" => Some(&mut self.sp500),
            "ret_petroleo_usd" => Some(&mut self.ret_petroleo_usd),
            "d_tasa_tesoro_10y" => Some(&mut self.d_tasa_tesoro_10y),
            "ret_cobre_usd" => Some(&mut self.ret_cobre_usd),
            "d_tasa_tesoro_3m" => Some(&mut self.d_tasa_tesoro_3m),
            "ret_usd_yuan" => Some(&mut self.ret_usd_yuan),
            _ => None,
        }
    }

    pub fn set(&mut self, name: &str, value: f64) -> Result<(), FeatureError> {
        let slot = self.slot_mut(name).ok_or_else(|| FeatureError::UnknownFeature {
            name: name.to_string(),
        })?;
        *slot = value;
        Ok(())
    }

    /// Copy with every value rounded to `decimals` places.
    pub fn rounded(&self, decimals: i32) -> Self {
        let mut out = *self;
        for name in FEATURE_NAMES {
            if let Some(slot) = out.slot_mut(name) {
                *slot = round_to(*slot, decimals);
            }
        }
        out
    }

    /// Names of the features holding NaN.
    pub fn missing_features(&self) -> Vec<&'static str> {
        self.entries()
            .filter(|(_, v)| v.is_nan())
            .map(|(n, _)| n)
            .collect()
    }

    /// Values in the caller's order. Models are sensitive to column order and
    /// identity, so an unknown name is an error rather than a skipped column.
    pub fn reindex<S: AsRef<str>>(&self, order: &[S]) -> Result<Vec<f64>, FeatureError> {
        order
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .ok_or_else(|| FeatureError::UnknownFeature {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect()
    }
}

/// Round half to even at the requested decimal, NaN and infinities untouched.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
