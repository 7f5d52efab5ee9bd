use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create wells table
        manager
            .create_table(
                Table::create()
                    .table(Wells::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wells::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wells::Name).string().not_null())
                    .col(ColumnDef::new(Wells::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wells_name")
                    .table(Wells::Table)
                    .col(Wells::Name)
                    .to_owned(),
            )
            .await?;

        // Create curve_samples table
        manager
            .create_table(
                Table::create()
                    .table(CurveSamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CurveSamples::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CurveSamples::WellId).integer().not_null())
                    .col(ColumnDef::new(CurveSamples::Depth).double().not_null())
                    .col(
                        ColumnDef::new(CurveSamples::CurveName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CurveSamples::Value).double())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_curve_samples_well_id")
                            .from(CurveSamples::Table, CurveSamples::WellId)
                            .to(Wells::Table, Wells::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_curve_samples_well_id")
                    .table(CurveSamples::Table)
                    .col(CurveSamples::WellId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_curve_samples_well_depth")
                    .table(CurveSamples::Table)
                    .col(CurveSamples::WellId)
                    .col(CurveSamples::Depth)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_curve_samples_curve_name")
                    .table(CurveSamples::Table)
                    .col(CurveSamples::CurveName)
                    .to_owned(),
            )
            .await?;

        // Create files table
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::WellId).integer().not_null())
                    .col(ColumnDef::new(Files::BlobKey).string().not_null())
                    .col(ColumnDef::new(Files::FileName).string().not_null())
                    .col(ColumnDef::new(Files::UploadedAt).timestamp().not_null())
                    .col(
                        ColumnDef::new(Files::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Files::IsImportant)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Files::Processed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_files_well_id")
                            .from(Files::Table, Files::WellId)
                            .to(Wells::Table, Wells::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_files_well_id")
                    .table(Files::Table)
                    .col(Files::WellId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_files_status")
                    .table(Files::Table)
                    .col(Files::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CurveSamples::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wells::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Wells {
    Table,
    Id,
    Name,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CurveSamples {
    Table,
    Id,
    WellId,
    Depth,
    CurveName,
    Value,
}

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    WellId,
    BlobKey,
    FileName,
    UploadedAt,
    Status,
    IsImportant,
    Processed,
}
