// src/processing/wavelet/catalog.rs
//! Orthogonal wavelet filter catalog
//!
//! Only the decomposition low-pass (scaling) filter is stored. The high-pass
//! filter follows from the quadrature-mirror relation
//! `g[n] = (-1)^n * h[L-1-n]`.

/// Scaling filter of one orthogonal wavelet basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveletFilter {
    pub name: &'static str,
    pub low_pass: &'static [f64],
}

impl WaveletFilter {
    /// Number of filter taps
    pub fn len(&self) -> usize {
        self.low_pass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.low_pass.is_empty()
    }

    /// High-pass (wavelet) decomposition filter
    pub fn high_pass(&self) -> Vec<f64> {
        let l = self.low_pass.len();
        (0..l)
            .map(|n| {
                let sign = if n % 2 == 0 { 1.0 } else { -1.0 };
                sign * self.low_pass[l - 1 - n]
            })
            .collect()
    }
}

const HAAR: [f64; 2] = [0.7071067811865476, 0.7071067811865476];

const DB2: [f64; 4] = [
    -0.12940952255126037,
    0.22414386804201339,
    0.8365163037378079,
    0.48296291314453416,
];

const DB3: [f64; 6] = [
    0.03522629188570953,
    -0.08544127388202666,
    -0.13501102001025458,
    0.45987750211849154,
    0.8068915093110925,
    0.33267055295008263,
];

const DB4: [f64; 8] = [
    -0.010597401785069032,
    0.0328830116668852,
    0.030841381835560764,
    -0.18703481171909309,
    -0.027983769416859854,
    0.6308807679298589,
    0.7148465705529157,
    0.2303778133088965,
];

const DB8: [f64; 16] = [
    -0.00011747678412476953,
    0.0006754494064505693,
    -0.00039174037337694705,
    -0.004870352993451574,
    0.008746094047405777,
    0.013981027917398282,
    -0.04408825393079475,
    -0.017369301001807547,
    0.12874742662047847,
    0.0004724845739132828,
    -0.2840155429615469,
    -0.015829105256349306,
    0.5853546836542067,
    0.6756307362972898,
    0.31287159091429995,
    0.05441584224310401,
];

const SYM4: [f64; 8] = [
    -0.07576571478927333,
    -0.02963552764599851,
    0.49761866763201545,
    0.8037387518059161,
    0.29785779560527736,
    -0.09921954357684722,
    -0.012603967262037833,
    0.0322231006040427,
];

/// Every basis the built-in transform understands
pub static CATALOG: [WaveletFilter; 8] = [
    WaveletFilter { name: "haar", low_pass: &HAAR },
    WaveletFilter { name: "db1", low_pass: &HAAR },
    WaveletFilter { name: "db2", low_pass: &DB2 },
    WaveletFilter { name: "db3", low_pass: &DB3 },
    WaveletFilter { name: "db4", low_pass: &DB4 },
    WaveletFilter { name: "db8", low_pass: &DB8 },
    WaveletFilter { name: "sym2", low_pass: &DB2 },
    WaveletFilter { name: "sym4", low_pass: &SYM4 },
];

/// Catalog names, in catalog order
pub const WAVELET_NAMES: [&str; 8] = ["haar", "db1", "db2", "db3", "db4", "db8", "sym2", "sym4"];

/// Look up a basis by its exact (lowercase) name
pub fn lookup(name: &str) -> Option<&'static WaveletFilter> {
    CATALOG.iter().find(|filter| filter.name == name)
}
