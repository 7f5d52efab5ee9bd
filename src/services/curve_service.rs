//! Curve sample persistence and range queries
//!
//! Bulk inserts are chunked to bound transaction size but commit once at the
//! end, so a failure part-way leaves no samples visible. The chunks within
//! one call run sequentially. Per-well serialization of purge+insert is the
//! orchestrator's responsibility, not this layer's.

use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::database::entities::curve_samples;
use crate::las::Sample;

/// Rows per `insert_many` statement inside a bulk insert transaction.
/// Each row binds four parameters; the chunk must stay within SQLite's
/// 32766 per-statement variable limit.
pub const INSERT_CHUNK_SIZE: usize = 5_000;

/// Cumulative progress callback: (inserted_so_far, total).
pub type ProgressFn<'a> = &'a mut dyn FnMut(u64, u64);

#[derive(FromQueryResult)]
struct DepthBounds {
    min_depth: Option<f64>,
    max_depth: Option<f64>,
}

#[derive(Clone)]
pub struct CurveService {
    db: DatabaseConnection,
}

impl CurveService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert samples in chunks inside a single transaction.
    pub async fn bulk_insert(
        &self,
        samples: &[Sample],
        progress: Option<ProgressFn<'_>>,
    ) -> Result<(), DbErr> {
        let txn = self.db.begin().await?;
        Self::bulk_insert_on(&txn, samples, progress).await?;
        txn.commit().await
    }

    /// Chunked insert against a caller-supplied connection or transaction.
    ///
    /// The orchestrator uses this to compose purge-then-insert into one
    /// transaction; the commit (and therefore visibility) stays with the
    /// caller.
    pub async fn bulk_insert_on<C>(
        conn: &C,
        samples: &[Sample],
        mut progress: Option<ProgressFn<'_>>,
    ) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        let total = samples.len() as u64;
        if total == 0 {
            return Ok(());
        }

        let mut inserted: u64 = 0;
        for chunk in samples.chunks(INSERT_CHUNK_SIZE) {
            let models: Vec<curve_samples::ActiveModel> =
                chunk.iter().map(to_active_model).collect();
            curve_samples::Entity::insert_many(models).exec(conn).await?;
            inserted += chunk.len() as u64;
            if let Some(cb) = progress.as_mut() {
                cb(inserted, total);
            }
        }
        Ok(())
    }

    /// Delete all samples for a well in one committed operation.
    pub async fn delete_by_well(&self, well_id: i32) -> Result<u64, DbErr> {
        Self::delete_by_well_on(&self.db, well_id).await
    }

    pub async fn delete_by_well_on<C>(conn: &C, well_id: i32) -> Result<u64, DbErr>
    where
        C: ConnectionTrait,
    {
        let res = curve_samples::Entity::delete_many()
            .filter(curve_samples::Column::WellId.eq(well_id))
            .exec(conn)
            .await?;
        Ok(res.rows_affected)
    }

    /// Samples for a well within `[depth_min, depth_max]` (inclusive both
    /// ends), optionally restricted to the given curve names, ordered by
    /// depth ascending. Depth ties across curves are all returned.
    pub async fn query_range(
        &self,
        well_id: i32,
        depth_min: f64,
        depth_max: f64,
        curve_names: Option<&[String]>,
    ) -> Result<Vec<curve_samples::Model>, DbErr> {
        let mut query = curve_samples::Entity::find()
            .filter(curve_samples::Column::WellId.eq(well_id))
            .filter(curve_samples::Column::Depth.gte(depth_min))
            .filter(curve_samples::Column::Depth.lte(depth_max));

        if let Some(names) = curve_names {
            if !names.is_empty() {
                query = query.filter(curve_samples::Column::CurveName.is_in(names.to_vec()));
            }
        }

        query
            .order_by_asc(curve_samples::Column::Depth)
            .all(&self.db)
            .await
    }

    /// `(min, max)` depth over all curves for a well; `None` when the well
    /// has no samples.
    pub async fn depth_range(&self, well_id: i32) -> Result<Option<(f64, f64)>, DbErr> {
        let bounds = curve_samples::Entity::find()
            .select_only()
            .column_as(curve_samples::Column::Depth.min(), "min_depth")
            .column_as(curve_samples::Column::Depth.max(), "max_depth")
            .filter(curve_samples::Column::WellId.eq(well_id))
            .into_model::<DepthBounds>()
            .one(&self.db)
            .await?;

        Ok(bounds.and_then(|b| match (b.min_depth, b.max_depth) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        }))
    }

    /// Distinct curve names stored for a well.
    pub async fn curve_names(&self, well_id: i32) -> Result<Vec<String>, DbErr> {
        curve_samples::Entity::find()
            .select_only()
            .column(curve_samples::Column::CurveName)
            .filter(curve_samples::Column::WellId.eq(well_id))
            .distinct()
            .order_by_asc(curve_samples::Column::CurveName)
            .into_tuple::<String>()
            .all(&self.db)
            .await
    }
}

fn to_active_model(sample: &Sample) -> curve_samples::ActiveModel {
    curve_samples::ActiveModel {
        well_id: Set(sample.well_id),
        depth: Set(sample.depth),
        curve_name: Set(sample.curve_name.clone()),
        value: Set(sample.value),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use crate::services::well_service::WellService;

    fn sample(well_id: i32, depth: f64, curve: &str, value: Option<f64>) -> Sample {
        Sample {
            well_id,
            depth,
            curve_name: curve.to_string(),
            value,
        }
    }

    async fn make_well(db: &DatabaseConnection, name: &str) -> i32 {
        let (well, _) = WellService::new(db.clone())
            .find_or_create_by_name(name)
            .await
            .unwrap();
        well.id
    }

    #[tokio::test]
    async fn test_bulk_insert_round_trip_depth_ordered() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let samples = vec![
            sample(well_id, 20.0, "GR", Some(80.0)),
            sample(well_id, 10.0, "GR", Some(55.0)),
            sample(well_id, 10.0, "RHOB", None),
        ];
        service.bulk_insert(&samples, None).await.unwrap();

        let rows = service
            .query_range(well_id, 0.0, 100.0, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 3);
        let depths: Vec<f64> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![10.0, 10.0, 20.0]);
        // the sentinel-normalized value comes back as NULL, not zero
        assert!(rows
            .iter()
            .any(|r| r.curve_name == "RHOB" && r.value.is_none()));
    }

    #[tokio::test]
    async fn test_progress_reports_cumulative_counts() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let samples: Vec<Sample> = (0..25)
            .map(|i| sample(well_id, i as f64, "GR", Some(1.0)))
            .collect();

        let mut calls: Vec<(u64, u64)> = Vec::new();
        {
            let mut cb = |done: u64, total: u64| calls.push((done, total));
            service
                .bulk_insert(&samples, Some(&mut cb))
                .await
                .unwrap();
        }
        // 25 samples fit one chunk
        assert_eq!(calls, vec![(25, 25)]);
    }

    #[tokio::test]
    async fn test_multi_chunk_insert_reports_per_chunk_progress() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let total = INSERT_CHUNK_SIZE + 5;
        let samples: Vec<Sample> = (0..total)
            .map(|i| sample(well_id, i as f64, "GR", Some(1.0)))
            .collect();

        let mut calls: Vec<(u64, u64)> = Vec::new();
        {
            let mut cb = |done: u64, total: u64| calls.push((done, total));
            service
                .bulk_insert(&samples, Some(&mut cb))
                .await
                .unwrap();
        }
        assert_eq!(
            calls,
            vec![
                (INSERT_CHUNK_SIZE as u64, total as u64),
                (total as u64, total as u64),
            ]
        );

        let rows = service
            .query_range(well_id, 0.0, total as f64, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), total);
    }

    #[tokio::test]
    async fn test_rolled_back_insert_leaves_nothing_visible() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db.clone());

        let samples = vec![
            sample(well_id, 10.0, "GR", Some(1.0)),
            sample(well_id, 11.0, "GR", Some(2.0)),
        ];
        let txn = db.begin().await.unwrap();
        CurveService::bulk_insert_on(&txn, &samples, None)
            .await
            .unwrap();
        txn.rollback().await.unwrap();

        let rows = service
            .query_range(well_id, 0.0, 100.0, None)
            .await
            .unwrap();
        assert!(rows.is_empty());
        assert_eq!(service.depth_range(well_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_range_bounds_inclusive() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let samples = vec![
            sample(well_id, 10.0, "GR", Some(1.0)),
            sample(well_id, 20.0, "GR", Some(2.0)),
            sample(well_id, 30.0, "GR", Some(3.0)),
        ];
        service.bulk_insert(&samples, None).await.unwrap();

        let rows = service
            .query_range(well_id, 10.0, 20.0, None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[tokio::test]
    async fn test_curve_name_filter() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let samples = vec![
            sample(well_id, 10.0, "GR", Some(1.0)),
            sample(well_id, 10.0, "RHOB", Some(2.3)),
        ];
        service.bulk_insert(&samples, None).await.unwrap();

        let only_gr = service
            .query_range(well_id, 0.0, 100.0, Some(&["GR".to_string()]))
            .await
            .unwrap();
        assert_eq!(only_gr.len(), 1);
        assert_eq!(only_gr[0].curve_name, "GR");
    }

    #[tokio::test]
    async fn test_depth_range_empty_well_is_none() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "EMPTY").await;
        let service = CurveService::new(db);
        assert_eq!(service.depth_range(well_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_depth_range_and_distinct_names() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let samples = vec![
            sample(well_id, 100.0, "GR", Some(1.0)),
            sample(well_id, 250.5, "GR", Some(2.0)),
            sample(well_id, 175.0, "RHOB", Some(2.3)),
        ];
        service.bulk_insert(&samples, None).await.unwrap();

        assert_eq!(
            service.depth_range(well_id).await.unwrap(),
            Some((100.0, 250.5))
        );
        assert_eq!(service.curve_names(well_id).await.unwrap(), ["GR", "RHOB"]);
    }

    #[tokio::test]
    async fn test_delete_by_well() {
        let db = setup_test_db().await;
        let well_id = make_well(&db, "W1").await;
        let service = CurveService::new(db);

        let samples = vec![
            sample(well_id, 10.0, "GR", Some(1.0)),
            sample(well_id, 11.0, "GR", Some(2.0)),
        ];
        service.bulk_insert(&samples, None).await.unwrap();

        assert_eq!(service.delete_by_well(well_id).await.unwrap(), 2);
        assert_eq!(service.depth_range(well_id).await.unwrap(), None);
    }
}
