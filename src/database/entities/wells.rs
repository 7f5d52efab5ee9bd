use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Placeholder well that holds uploaded-but-unparsed files.
pub const PLACEHOLDER_WELL_NAME: &str = "Unprocessed";

/// Well entity
///
/// Identity is the name: re-uploading a file whose parsed well name matches
/// an existing well reuses that well and replaces its curve data. A well is
/// removed when its last file is permanently deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wells")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::curve_samples::Entity")]
    CurveSamples,
    #[sea_orm(has_many = "super::files::Entity")]
    Files,
}

impl Related<super::curve_samples::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurveSamples.def()
    }
}

impl Related<super::files::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Files.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
