//! LAS well-log document parsing and curve extraction
//!
//! LAS is a sectioned ASCII format: `~V` version, `~W` well metadata, `~C`
//! curve definitions, `~P` parameters, `~O` other, and `~A` the data matrix
//! (whitespace-delimited, one column per declared curve, first column is the
//! depth index).
//!
//! Parsing is strict where the spec of the format is strict (a data row must
//! match the declared curve count; the curve section must be present) and
//! tolerant where real-world files are sloppy (well-metadata lines that do
//! not parse are skipped, the well name falls back to a literal).

mod parser;

pub use parser::parse;

use crate::errors::LasResult;

/// Fallback well name when the `~W` section has no usable `WELL` entry.
pub const UNKNOWN_WELL_NAME: &str = "Unknown Well";

/// Common LAS null sentinels recognised even when the file declares none.
const BUILTIN_NULL_SENTINELS: &[f64] = &[-999.25, -9999.0, -9999.25, -999.0];

/// Magnitude above which a value is treated as a `1e30`-style null marker.
const NULL_MAGNITUDE: f64 = 1e29;

/// One declared curve from the `~C` section.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSpec {
    pub mnemonic: String,
    pub unit: Option<String>,
}

/// A parsed LAS document: well metadata, declared curves, and the data matrix.
///
/// Data cells are stored as `f64` with NaN standing in for tokens that did
/// not parse as a number; null-sentinel normalization happens at extraction
/// time so the declared `NULL.` value is honoured.
#[derive(Debug, Clone)]
pub struct LasDocument {
    pub(crate) well_info: Vec<(String, String)>,
    pub(crate) curves: Vec<CurveSpec>,
    pub(crate) null_value: Option<f64>,
    pub(crate) rows: Vec<Vec<f64>>,
}

/// One extracted curve data point, ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub well_id: i32,
    pub depth: f64,
    pub curve_name: String,
    pub value: Option<f64>,
}

impl LasDocument {
    /// Parse the full text of a LAS document.
    pub fn parse(content: &str) -> LasResult<LasDocument> {
        parser::parse(content)
    }

    /// The trimmed `WELL` metadata value, or [`UNKNOWN_WELL_NAME`].
    pub fn well_name(&self) -> String {
        self.well_info
            .iter()
            .find(|(mnemonic, _)| mnemonic == "WELL")
            .map(|(_, value)| value.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| UNKNOWN_WELL_NAME.to_string())
    }

    /// Declared curve mnemonics excluding the leading depth curve.
    pub fn curve_names(&self) -> Vec<String> {
        self.curves
            .iter()
            .skip(1)
            .map(|c| c.mnemonic.clone())
            .collect()
    }

    /// Number of data rows in the `~A` section.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Extract per-depth samples for every non-depth curve.
    ///
    /// The first declared curve supplies the depth axis and is not emitted.
    /// Rows whose depth is not finite are dropped entirely. Null-sentinel and
    /// unparseable curve values are emitted with `value: None` so rows stay
    /// aligned across curves with partial coverage.
    pub fn extract_samples(&self, well_id: i32) -> Vec<Sample> {
        if self.curves.len() < 2 {
            return Vec::new();
        }

        let mut samples = Vec::with_capacity(self.rows.len() * (self.curves.len() - 1));
        for row in &self.rows {
            let depth = row[0];
            if !depth.is_finite() {
                continue;
            }
            for (curve, raw) in self.curves.iter().zip(row.iter()).skip(1) {
                samples.push(Sample {
                    well_id,
                    depth,
                    curve_name: curve.mnemonic.clone(),
                    value: self.normalize(*raw),
                });
            }
        }
        samples
    }

    fn normalize(&self, raw: f64) -> Option<f64> {
        if self.is_null(raw) {
            None
        } else {
            Some(raw)
        }
    }

    fn is_null(&self, value: f64) -> bool {
        if !value.is_finite() || value.abs() >= NULL_MAGNITUDE {
            return true;
        }
        if let Some(null) = self.null_value {
            if value == null {
                return true;
            }
        }
        BUILTIN_NULL_SENTINELS.contains(&value)
    }
}
