//! Per-curve statistics, 2-sigma anomaly flagging, and rule-based insights
//!
//! The textual interpretation is an ordered list of (predicate, template)
//! rules over the uppercase mnemonic, evaluated first-match-wins with a
//! generic fallback. The rules are simple pattern heuristics, not a
//! petrophysical model.

use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::errors::WellResult;
use crate::services::curve_service::CurveService;
use crate::services::well_service::WellService;

/// Anomalies returned to callers are capped at this many lowest-depth
/// entries. Detection itself is unbounded; this caps the response only.
pub const ANOMALY_RESPONSE_CAP: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Deviation {
    High,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub count: usize,
}

impl CurveStats {
    /// Descriptive statistics over present values.
    ///
    /// The standard deviation is the sample deviation and is 0 when fewer
    /// than 2 values exist. That silently disables anomaly detection for
    /// single-sample curves, which mirrors the documented behavior.
    pub fn from_values(values: &[f64]) -> Option<CurveStats> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = sum / count as f64;
        let std = if count < 2 {
            0.0
        } else {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / (count as f64 - 1.0);
            var.sqrt()
        };
        Some(CurveStats {
            min,
            max,
            mean,
            std,
            count,
        })
    }

    fn rounded(&self) -> CurveStats {
        CurveStats {
            min: round4(self.min),
            max: round4(self.max),
            mean: round4(self.mean),
            std: round4(self.std),
            count: self.count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Anomaly {
    pub depth: f64,
    pub curve_name: String,
    pub value: f64,
    pub mean: f64,
    pub deviation: Deviation,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurveInsight {
    pub curve: String,
    pub statistics: CurveStats,
    pub interpretation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub anomalies: Vec<Anomaly>,
    pub insights: Vec<CurveInsight>,
}

struct InterpretationRule {
    applies: fn(&str) -> bool,
    interpret: fn(&CurveStats) -> String,
}

/// Ordered heuristics over the uppercase mnemonic; first match wins.
const INTERPRETATION_RULES: &[InterpretationRule] = &[
    // Gamma ray: lithology commentary gated on mean
    InterpretationRule {
        applies: |name| name.contains("GR"),
        interpret: |stats| {
            if stats.mean > 100.0 {
                "High gamma ray suggests shale-dominated interval.".to_string()
            } else if stats.mean < 50.0 {
                "Low gamma ray suggests clean sand or limestone.".to_string()
            } else {
                "Moderate gamma ray indicates mixed lithology.".to_string()
            }
        },
    },
    // Bulk density: porosity commentary
    InterpretationRule {
        applies: |name| name.contains("RHOB") || name.contains("DEN"),
        interpret: |stats| {
            if stats.mean < 2.0 {
                "Low density may indicate gas or high porosity.".to_string()
            } else if stats.mean > 2.6 {
                "High density suggests dense minerals or tight formation.".to_string()
            } else {
                "Density within typical reservoir range.".to_string()
            }
        },
    },
    // Neutron/total porosity
    InterpretationRule {
        applies: |name| name.contains("NPHI") || name.contains("PHIT"),
        interpret: |stats| {
            if stats.mean > 0.25 {
                "High porosity reading.".to_string()
            } else {
                "Porosity in typical range.".to_string()
            }
        },
    },
];

/// First matching rule's message, or a generic statistical sentence.
pub fn interpret_curve(curve_name: &str, stats: &CurveStats) -> String {
    let upper = curve_name.to_uppercase();
    for rule in INTERPRETATION_RULES {
        if (rule.applies)(&upper) {
            return (rule.interpret)(stats);
        }
    }
    format!(
        "Mean {:.2} with std {:.2}; {} data points.",
        stats.mean, stats.std, stats.count
    )
}

/// Analyze a depth window of samples grouped by curve.
///
/// `points` must be depth-ascending per curve (as produced by the range
/// query). The returned anomaly list is depth-ascending and capped at
/// [`ANOMALY_RESPONSE_CAP`] entries.
pub fn analyze_samples(by_curve: &BTreeMap<String, Vec<(f64, f64)>>) -> AnalysisReport {
    let mut summary_parts = Vec::new();
    let mut anomalies = Vec::new();
    let mut insights = Vec::new();

    for (curve_name, points) in by_curve {
        let values: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
        let Some(stats) = CurveStats::from_values(&values) else {
            continue;
        };

        // The detection band uses the population deviation of the window
        // (boundary values count as anomalous); the reported statistics
        // carry the sample deviation. A zero band means no detection.
        let pop_std = population_std(&values, stats.mean);
        if pop_std > 0.0 {
            let threshold_high = stats.mean + 2.0 * pop_std;
            let threshold_low = stats.mean - 2.0 * pop_std;
            for &(depth, value) in points {
                if value >= threshold_high || value <= threshold_low {
                    anomalies.push(Anomaly {
                        depth,
                        curve_name: curve_name.clone(),
                        value,
                        mean: round4(stats.mean),
                        deviation: if value >= threshold_high {
                            Deviation::High
                        } else {
                            Deviation::Low
                        },
                    });
                }
            }
        }

        summary_parts.push(format!(
            "{}: min={:.2}, max={:.2}, mean={:.2}, std={:.2}",
            curve_name, stats.min, stats.max, stats.mean, stats.std
        ));
        insights.push(CurveInsight {
            curve: curve_name.clone(),
            interpretation: interpret_curve(curve_name, &stats),
            statistics: stats.rounded(),
        });
    }

    anomalies.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    anomalies.truncate(ANOMALY_RESPONSE_CAP);

    AnalysisReport {
        summary: if summary_parts.is_empty() {
            "No data in range.".to_string()
        } else {
            summary_parts.join("; ")
        },
        anomalies,
        insights,
    }
}

#[derive(Clone)]
pub struct AnalysisService {
    wells: WellService,
    curves: CurveService,
}

impl AnalysisService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            wells: WellService::new(db.clone()),
            curves: CurveService::new(db),
        }
    }

    /// Statistics, anomalies, and insights for a well + depth window +
    /// curve set.
    pub async fn analyze(
        &self,
        well_id: i32,
        curve_names: &[String],
        depth_min: f64,
        depth_max: f64,
    ) -> WellResult<AnalysisReport> {
        self.wells.get(well_id).await?;
        let filter = if curve_names.is_empty() {
            None
        } else {
            Some(curve_names)
        };
        let rows = self
            .curves
            .query_range(well_id, depth_min, depth_max, filter)
            .await?;

        let mut by_curve: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
        for row in rows {
            if let Some(value) = row.value.filter(|v| v.is_finite()) {
                by_curve
                    .entry(row.curve_name)
                    .or_default()
                    .push((row.depth, value));
            }
        }
        Ok(analyze_samples(&by_curve))
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}
