//! File upload and ingestion orchestration
//!
//! Per-file state machine: uploaded-unprocessed -> processing -> processed,
//! with failure leaving the record unprocessed and no partial sample state
//! visible. The purge-then-insert sequence for a well runs inside a single
//! transaction and under a per-well-name advisory lock, so two concurrent
//! re-ingestions of the same well cannot interleave deletes and inserts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::database::entities::files::FileStatus;
use crate::database::entities::wells::PLACEHOLDER_WELL_NAME;
use crate::database::entities::{curve_samples, files, wells};
use crate::errors::{IngestError, IngestResult};
use crate::events::{ProcessEvent, ProcessStep, ProgressSink};
use crate::las::LasDocument;
use crate::services::curve_service::CurveService;
use crate::services::well_service::WellService;
use crate::storage::{blob_key, BlobStore};

/// Floor for the insert-progress emission interval; at most ~20 insert
/// events are emitted per file regardless of sample count.
const PROGRESS_EMIT_FLOOR: u64 = 50_000;

/// Advisory locks keyed by well name, serialising purge+insert per well.
#[derive(Default)]
struct WellLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl WellLocks {
    fn lock_for(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = self.inner.lock().expect("well lock map poisoned");
        map.entry(name.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// Result of a successful processing run.
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    pub well: wells::Model,
    pub file: files::Model,
    pub sample_count: usize,
}

pub struct FileService {
    db: DatabaseConnection,
    blobs: Arc<dyn BlobStore>,
    sink: Arc<dyn ProgressSink>,
    locks: WellLocks,
}

impl FileService {
    pub fn new(
        db: DatabaseConnection,
        blobs: Arc<dyn BlobStore>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            db,
            blobs,
            sink,
            locks: WellLocks::default(),
        }
    }

    fn wells(&self) -> WellService {
        WellService::new(self.db.clone())
    }

    fn emit(&self, file_id: i32, step: ProcessStep, message: impl Into<String>) {
        let message = message.into();
        info!(file_id, step = step.as_str(), "{message}");
        self.sink.emit(ProcessEvent::new(file_id, step, message));
    }

    /// Store a file without parsing its data section.
    ///
    /// The header is parsed best-effort so the record lands on the right
    /// well from the start; if the document cannot be read at all, the file
    /// is parked on the `Unprocessed` placeholder well until processing.
    pub async fn upload(&self, file_name: &str, bytes: &[u8]) -> IngestResult<files::Model> {
        let content = String::from_utf8_lossy(bytes);
        let well_name = match LasDocument::parse(&content) {
            Ok(doc) => doc.well_name(),
            Err(_) => PLACEHOLDER_WELL_NAME.to_string(),
        };
        let (well, _) = self.wells().find_or_create_by_name(&well_name).await?;

        let key = blob_key(well.id, file_name);
        self.blobs.put(&key, bytes).await?;

        let file = files::ActiveModel {
            well_id: Set(well.id),
            blob_key: Set(key),
            file_name: Set(file_name.to_string()),
            uploaded_at: Set(Utc::now()),
            status: Set(FileStatus::Active.as_str().to_string()),
            is_important: Set(false),
            processed: Set(false),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;
        Ok(file)
    }

    /// Parse a stored file into samples and mark it processed.
    pub async fn process_file(&self, file_id: i32) -> IngestResult<ProcessOutcome> {
        self.emit(file_id, ProcessStep::Start, "Starting processing");
        match self.process_inner(file_id).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.emit(file_id, ProcessStep::Error, e.to_string());
                Err(e)
            }
        }
    }

    async fn process_inner(&self, file_id: i32) -> IngestResult<ProcessOutcome> {
        let file = files::Entity::find_by_id(file_id)
            .one(&self.db)
            .await?
            .ok_or(IngestError::FileNotFound(file_id))?;
        if file.processed {
            return Err(IngestError::AlreadyProcessed(file_id));
        }
        let old_well_id = file.well_id;

        self.emit(
            file_id,
            ProcessStep::Download,
            format!("Downloading {}", file.blob_key),
        );
        let bytes = self.blobs.get(&file.blob_key).await?;
        let content = String::from_utf8_lossy(&bytes);

        self.emit(
            file_id,
            ProcessStep::Parse,
            format!("Parsing LAS ({} chars)", content.len()),
        );
        let doc = LasDocument::parse(&content)?;
        let well_name = doc.well_name();
        self.emit(
            file_id,
            ProcessStep::Well,
            format!("Well name from LAS: {well_name:?}"),
        );

        let (well, existed) = self.wells().find_or_create_by_name(&well_name).await?;
        if existed {
            self.emit(
                file_id,
                ProcessStep::Well,
                format!("Using existing well id={}, replacing its curves", well.id),
            );
        } else {
            self.emit(
                file_id,
                ProcessStep::Well,
                format!("Created new well id={} name={well_name:?}", well.id),
            );
        }

        let samples = doc.extract_samples(well.id);
        let total = samples.len() as u64;
        self.emit(
            file_id,
            ProcessStep::Curves,
            format!("Extracted {total} curve samples"),
        );

        // Serialise purge+insert per well name, then run both inside one
        // transaction: a failure after several chunks leaves nothing visible.
        let lock = self.locks.lock_for(&well.name);
        let _guard = lock.lock().await;

        let emit_interval = PROGRESS_EMIT_FLOOR.max(total / 20);
        let mut last_emitted: u64 = 0;
        let sink = &self.sink;
        let mut on_progress = |inserted: u64, total: u64| {
            if inserted == total || inserted - last_emitted >= emit_interval {
                last_emitted = inserted;
                let mut event = ProcessEvent::new(
                    file_id,
                    ProcessStep::Insert,
                    format!("Inserting samples {inserted}/{total}"),
                );
                event.inserted = Some(inserted);
                event.total = Some(total);
                sink.emit(event);
            }
        };

        let txn = self.db.begin().await?;
        if existed {
            CurveService::delete_by_well_on(&txn, well.id).await?;
        }
        CurveService::bulk_insert_on(&txn, &samples, Some(&mut on_progress)).await?;
        txn.commit().await?;

        self.emit(
            file_id,
            ProcessStep::CurvesDone,
            "Inserted samples into store",
        );

        let mut active: files::ActiveModel = file.into();
        active.well_id = Set(well.id);
        active.processed = Set(true);
        let file = active.update(&self.db).await?;

        if old_well_id != well.id {
            self.cleanup_placeholder(file_id, old_well_id).await?;
        }

        let mut done = ProcessEvent::new(file_id, ProcessStep::Done, "Done.");
        done.well_id = Some(well.id);
        info!(file_id, well_id = well.id, "processing complete");
        self.sink.emit(done);

        Ok(ProcessOutcome {
            well,
            file,
            sample_count: samples.len(),
        })
    }

    /// Drop the `Unprocessed` placeholder well once nothing points at it.
    async fn cleanup_placeholder(&self, file_id: i32, old_well_id: i32) -> IngestResult<()> {
        let files_left = files::Entity::find()
            .filter(files::Column::WellId.eq(old_well_id))
            .count(&self.db)
            .await?;
        if files_left > 0 {
            return Ok(());
        }
        if let Some(old_well) = wells::Entity::find_by_id(old_well_id).one(&self.db).await? {
            if old_well.name == PLACEHOLDER_WELL_NAME {
                CurveService::new(self.db.clone())
                    .delete_by_well(old_well_id)
                    .await?;
                wells::Entity::delete_by_id(old_well_id)
                    .exec(&self.db)
                    .await?;
                self.emit(file_id, ProcessStep::Well, "Removed empty placeholder well");
            }
        }
        Ok(())
    }

    pub async fn get(&self, file_id: i32) -> IngestResult<files::Model> {
        files::Entity::find_by_id(file_id)
            .one(&self.db)
            .await?
            .ok_or(IngestError::FileNotFound(file_id))
    }

    /// Files for a well, most recent first.
    pub async fn files_for_well(&self, well_id: i32) -> IngestResult<Vec<files::Model>> {
        let files = files::Entity::find()
            .filter(files::Column::WellId.eq(well_id))
            .order_by_desc(files::Column::UploadedAt)
            .order_by_desc(files::Column::Id)
            .all(&self.db)
            .await?;
        Ok(files)
    }

    /// Recent files. `status: None` means active + archived (deleted files
    /// are excluded); `important_only` further restricts the listing.
    pub async fn recent_files(
        &self,
        limit: u64,
        status: Option<FileStatus>,
        important_only: bool,
    ) -> IngestResult<Vec<files::Model>> {
        let mut query = files::Entity::find()
            .order_by_desc(files::Column::UploadedAt)
            .order_by_desc(files::Column::Id);
        query = match status {
            Some(status) => query.filter(files::Column::Status.eq(status.as_str())),
            None => query.filter(files::Column::Status.is_in([
                FileStatus::Active.as_str(),
                FileStatus::Archived.as_str(),
            ])),
        };
        if important_only {
            query = query.filter(files::Column::IsImportant.eq(true));
        }
        let files = query.limit(limit).all(&self.db).await?;
        Ok(files)
    }

    /// Update lifecycle fields on one file, optionally reassigning it to a
    /// different well.
    pub async fn update_file(
        &self,
        file_id: i32,
        status: Option<FileStatus>,
        is_important: Option<bool>,
        well_id: Option<i32>,
    ) -> IngestResult<files::Model> {
        let file = self.get(file_id).await?;
        if let Some(well_id) = well_id {
            let exists = wells::Entity::find_by_id(well_id).one(&self.db).await?;
            if exists.is_none() {
                return Err(IngestError::WellNotFound(well_id));
            }
        }
        let mut active: files::ActiveModel = file.into();
        if let Some(status) = status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(important) = is_important {
            active.is_important = Set(important);
        }
        if let Some(well_id) = well_id {
            active.well_id = Set(well_id);
        }
        let file = active.update(&self.db).await?;
        Ok(file)
    }

    /// Update lifecycle fields on many files; returns the number touched.
    pub async fn bulk_update(
        &self,
        file_ids: &[i32],
        status: Option<FileStatus>,
        is_important: Option<bool>,
    ) -> IngestResult<usize> {
        if file_ids.is_empty() || (status.is_none() && is_important.is_none()) {
            return Ok(0);
        }
        let files = files::Entity::find()
            .filter(files::Column::Id.is_in(file_ids.to_vec()))
            .all(&self.db)
            .await?;
        let count = files.len();
        for file in files {
            let mut active: files::ActiveModel = file.into();
            if let Some(status) = status {
                active.status = Set(status.as_str().to_string());
            }
            if let Some(important) = is_important {
                active.is_important = Set(important);
            }
            active.update(&self.db).await?;
        }
        Ok(count)
    }

    /// Permanently remove a file: blob, record, and (when it was the well's
    /// last file) the well itself with all its samples.
    pub async fn delete_permanent(&self, file_id: i32) -> IngestResult<()> {
        let file = self.get(file_id).await?;
        let well_id = file.well_id;

        if let Err(e) = self.blobs.delete(&file.blob_key).await {
            // The record still goes away; an orphaned blob is recoverable,
            // a dangling record is not.
            warn!(file_id, key = %file.blob_key, "blob delete failed: {e}");
        }
        files::Entity::delete_by_id(file_id).exec(&self.db).await?;

        let remaining = files::Entity::find()
            .filter(files::Column::WellId.eq(well_id))
            .count(&self.db)
            .await?;
        if remaining == 0 {
            CurveService::new(self.db.clone())
                .delete_by_well(well_id)
                .await?;
            wells::Entity::delete_by_id(well_id).exec(&self.db).await?;
            info!(well_id, "removed well after its last file was deleted");
        }
        Ok(())
    }

    /// Sample count for a well, mostly for diagnostics and tests.
    pub async fn sample_count(&self, well_id: i32) -> IngestResult<u64> {
        let count = curve_samples::Entity::find()
            .filter(curve_samples::Column::WellId.eq(well_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
