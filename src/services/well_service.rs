//! Well identity and read operations
//!
//! Well names are the deduplication key. `find_or_create_by_name` is the
//! explicit upsert used by ingestion: a re-uploaded file whose parsed name
//! matches an existing well reuses that well's identity. Two physical wells
//! sharing a name therefore collapse into one logical well; that is the
//! intended product behavior, not an accident.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::database::entities::wells;
use crate::errors::{WellError, WellResult};
use crate::services::curve_service::CurveService;

#[derive(Clone)]
pub struct WellService {
    db: DatabaseConnection,
}

impl WellService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All wells, most recently created first.
    pub async fn list(&self) -> Result<Vec<wells::Model>, DbErr> {
        wells::Entity::find()
            .order_by_desc(wells::Column::CreatedAt)
            .order_by_desc(wells::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn get(&self, well_id: i32) -> WellResult<wells::Model> {
        wells::Entity::find_by_id(well_id)
            .one(&self.db)
            .await?
            .ok_or(WellError::NotFound(well_id))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<wells::Model>, DbErr> {
        wells::Entity::find()
            .filter(wells::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Upsert-by-name. Returns the well and whether it already existed.
    pub async fn find_or_create_by_name(&self, name: &str) -> Result<(wells::Model, bool), DbErr> {
        if let Some(existing) = self.find_by_name(name).await? {
            return Ok((existing, true));
        }
        let well = wells::ActiveModel {
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok((well, false))
    }

    /// Delete a well and its samples.
    pub async fn delete(&self, well_id: i32) -> WellResult<()> {
        let well = self.get(well_id).await?;
        CurveService::new(self.db.clone())
            .delete_by_well(well_id)
            .await?;
        wells::Entity::delete_by_id(well.id).exec(&self.db).await?;
        Ok(())
    }

    /// Distinct curve names for a well; errors if the well does not exist.
    pub async fn curve_names(&self, well_id: i32) -> WellResult<Vec<String>> {
        self.get(well_id).await?;
        let names = CurveService::new(self.db.clone()).curve_names(well_id).await?;
        Ok(names)
    }

    /// Depth span over all curves; `None` for a well with zero samples.
    pub async fn depth_range(&self, well_id: i32) -> WellResult<Option<(f64, f64)>> {
        self.get(well_id).await?;
        let range = CurveService::new(self.db.clone()).depth_range(well_id).await?;
        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_find_or_create_is_idempotent_by_name() {
        let db = setup_test_db().await;
        let service = WellService::new(db);

        let (first, existed) = service.find_or_create_by_name("ANNE-3").await.unwrap();
        assert!(!existed);
        let (second, existed) = service.find_or_create_by_name("ANNE-3").await.unwrap();
        assert!(existed);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_get_missing_well_is_not_found() {
        let db = setup_test_db().await;
        let service = WellService::new(db);
        let err = service.get(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_removes_well_and_samples() {
        let db = setup_test_db().await;
        let service = WellService::new(db.clone());
        let (well, _) = service.find_or_create_by_name("W").await.unwrap();

        let curves = CurveService::new(db);
        curves
            .bulk_insert(
                &[crate::las::Sample {
                    well_id: well.id,
                    depth: 10.0,
                    curve_name: "GR".into(),
                    value: Some(1.0),
                }],
                None,
            )
            .await
            .unwrap();

        service.delete(well.id).await.unwrap();
        assert!(service.get(well.id).await.is_err());
        assert_eq!(curves.depth_range(well.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_depth_range_checks_well_exists() {
        let db = setup_test_db().await;
        let service = WellService::new(db);
        assert!(service.depth_range(404).await.is_err());
    }
}
