//! Depth-aligned series pivot for visualization
//!
//! Source curves may each be sampled on a different subset of depths, so a
//! naive column zip would silently misalign rows. The pivot builds the union
//! grid of distinct depths and fills explicit `None` holes, so every series
//! is positionally aligned to the shared depth axis.

use std::collections::BTreeMap;

use sea_orm::DatabaseConnection;
use serde::Serialize;

use crate::database::entities::curve_samples;
use crate::errors::WellResult;
use crate::services::curve_service::CurveService;
use crate::services::well_service::WellService;

/// Depth-aligned curve series: `series[name][i]` is the value of `name` at
/// `depth[i]`, or `None` where that curve has no sample at that depth.
#[derive(Debug, Clone, Serialize)]
pub struct CurveSeries {
    pub depth: Vec<f64>,
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}

/// Pivot a depth-ordered row set into aligned per-curve series.
///
/// Every requested curve name gets a full-length vector, even when no sample
/// for it appears in the row set. With an empty request the distinct names
/// found in the rows are used.
pub fn pivot_to_series(samples: &[curve_samples::Model], curve_names: &[String]) -> CurveSeries {
    let mut depth: Vec<f64> = samples.iter().map(|s| s.depth).collect();
    depth.sort_by(f64::total_cmp);
    depth.dedup();

    let requested: Vec<String> = if curve_names.is_empty() {
        let mut names: Vec<String> = samples.iter().map(|s| s.curve_name.clone()).collect();
        names.sort();
        names.dedup();
        names
    } else {
        curve_names.to_vec()
    };

    let mut series: BTreeMap<String, Vec<Option<f64>>> = requested
        .iter()
        .map(|name| (name.clone(), vec![None; depth.len()]))
        .collect();

    for sample in samples {
        let Some(values) = series.get_mut(&sample.curve_name) else {
            continue;
        };
        if let Ok(idx) = depth.binary_search_by(|d| d.total_cmp(&sample.depth)) {
            values[idx] = sample.value;
        }
    }

    CurveSeries { depth, series }
}

#[derive(Clone)]
pub struct VisualizationService {
    wells: WellService,
    curves: CurveService,
}

impl VisualizationService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            wells: WellService::new(db.clone()),
            curves: CurveService::new(db),
        }
    }

    /// Fetch curves in a depth window and reshape for charting.
    pub async fn curve_data(
        &self,
        well_id: i32,
        curve_names: &[String],
        depth_min: f64,
        depth_max: f64,
    ) -> WellResult<CurveSeries> {
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
        Ok(pivot_to_series(&rows, curve_names))
    }
}
