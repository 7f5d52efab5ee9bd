use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File lifecycle status.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Active,
    Archived,
    Deleted,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Active => "active",
            FileStatus::Archived => "archived",
            FileStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(FileStatus::Active),
            "archived" => Ok(FileStatus::Archived),
            "deleted" => Ok(FileStatus::Deleted),
            other => Err(format!("unknown file status '{other}'")),
        }
    }
}

/// LAS file metadata and blob reference
///
/// `processed = false` means the file is stored but not yet parsed into
/// samples. Many files may point at one well over time; re-processing can
/// move a file off the `Unprocessed` placeholder well once the real well
/// name is known.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub well_id: i32,
    pub blob_key: String,
    pub file_name: String,
    pub uploaded_at: ChronoDateTimeUtc,
    pub status: String,
    pub is_important: bool,
    pub processed: bool,
}

impl Model {
    pub fn status(&self) -> Option<FileStatus> {
        self.status.parse().ok()
    }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [FileStatus::Active, FileStatus::Archived, FileStatus::Deleted] {
            assert_eq!(status.as_str().parse::<FileStatus>().unwrap(), status);
        }
        assert!("missing".parse::<FileStatus>().is_err());
    }
}
