use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One curve data point: (well, depth, curve_name, value)
///
/// `value` is `None` where the source file carried a null sentinel or a
/// non-numeric token; the row is still stored so curves sampled on partial
/// depth grids stay alignable. Each ingestion pass replaces a well's samples
/// wholesale, so the table holds only the latest version per well.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "curve_samples")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub well_id: i32,
    pub depth: f64,
    pub curve_name: String,
    pub value: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wells::Entity",
        from = "Column::WellId",
        to = "super::wells::Column::Id"
    )]
    Wells,
}

impl Related<super::wells::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wells.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
