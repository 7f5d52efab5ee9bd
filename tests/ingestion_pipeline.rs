//! End-to-end ingestion pipeline tests over in-memory SQLite.

use std::sync::{Arc, Mutex};

use welllog::database::entities::wells::PLACEHOLDER_WELL_NAME;
use welllog::database::test_utils::setup_test_db;
use welllog::errors::IngestError;
use welllog::events::{ProcessEvent, ProcessStep, ProgressSink};
use welllog::services::{CurveService, FileService, VisualizationService, WellService};
use welllog::storage::{BlobStore, MemoryBlobStore};

/// Sink that records every event for assertions.
#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<ProcessEvent>>,
}

impl RecordingSink {
    fn steps(&self) -> Vec<ProcessStep> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.step)
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: ProcessEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn las(well: &str, curve_block: &str, data: &str) -> String {
    format!(
        "~Version\n VERS. 2.0 : las\n~Well\n NULL. -999.25 : null\n WELL. {well} : well name\n~Curve\n DEPT.M : Depth\n{curve_block}~ASCII\n{data}"
    )
}

fn gr_rhob_file(well: &str) -> String {
    las(
        well,
        " GR  .GAPI : Gamma Ray\n RHOB.K/M3 : Density\n",
        " 1000.0  55.0  2.30\n 1000.5  -999.25  2.35\n 1001.0  110.0  2.40\n",
    )
}

struct Harness {
    files: FileService,
    wells: WellService,
    curves: CurveService,
    viz: VisualizationService,
    sink: Arc<RecordingSink>,
    blobs: Arc<MemoryBlobStore>,
}

async fn harness() -> Harness {
    let db = setup_test_db().await;
    let sink = Arc::new(RecordingSink::default());
    let blobs = Arc::new(MemoryBlobStore::new());
    Harness {
        files: FileService::new(db.clone(), blobs.clone(), sink.clone()),
        wells: WellService::new(db.clone()),
        curves: CurveService::new(db.clone()),
        viz: VisualizationService::new(db),
        sink,
        blobs,
    }
}

#[tokio::test]
async fn upload_then_process_round_trip() {
    let h = harness().await;

    let record = h
        .files
        .upload("anne3.las", gr_rhob_file("ANNE-3").as_bytes())
        .await
        .unwrap();
    assert!(!record.processed);
    assert_eq!(h.blobs.len(), 1);

    let outcome = h.files.process_file(record.id).await.unwrap();
    assert_eq!(outcome.well.name, "ANNE-3");
    // 2 curves x 3 rows
    assert_eq!(outcome.sample_count, 6);
    assert!(outcome.file.processed);

    let rows = h
        .curves
        .query_range(outcome.well.id, 1000.0, 1001.0, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 6);
    let depths: Vec<f64> = rows.iter().map(|r| r.depth).collect();
    let mut sorted = depths.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(depths, sorted, "rows come back depth-ascending");

    // sentinel value stored as absent, not as the literal number
    let gr_gap = rows
        .iter()
        .find(|r| r.curve_name == "GR" && r.depth == 1000.5)
        .unwrap();
    assert_eq!(gr_gap.value, None);

    let steps = h.sink.steps();
    assert_eq!(steps.first(), Some(&ProcessStep::Start));
    assert_eq!(steps.last(), Some(&ProcessStep::Done));
    assert!(steps.contains(&ProcessStep::Parse));
    assert!(steps.contains(&ProcessStep::CurvesDone));
}

#[tokio::test]
async fn reingestion_replaces_not_merges() {
    let h = harness().await;

    let first = h
        .files
        .upload("run1.las", gr_rhob_file("NORTH-1").as_bytes())
        .await
        .unwrap();
    let outcome = h.files.process_file(first.id).await.unwrap();
    let well_id = outcome.well.id;
    assert_eq!(h.files.sample_count(well_id).await.unwrap(), 6);

    // second file, same well name, different curve set and depths
    let second_las = las(
        "NORTH-1",
        " DT. : Sonic\n",
        " 2000.0  80.0\n 2001.0  85.0\n",
    );
    let second = h
        .files
        .upload("run2.las", second_las.as_bytes())
        .await
        .unwrap();
    let outcome2 = h.files.process_file(second.id).await.unwrap();
    assert_eq!(outcome2.well.id, well_id, "same name reuses the well");

    // only the second ingestion's samples remain
    assert_eq!(h.files.sample_count(well_id).await.unwrap(), 2);
    assert_eq!(h.curves.curve_names(well_id).await.unwrap(), ["DT"]);
    assert_eq!(
        h.curves.depth_range(well_id).await.unwrap(),
        Some((2000.0, 2001.0))
    );
}

#[tokio::test]
async fn processing_twice_is_rejected_without_mutation() {
    let h = harness().await;
    let record = h
        .files
        .upload("a.las", gr_rhob_file("W").as_bytes())
        .await
        .unwrap();
    h.files.process_file(record.id).await.unwrap();

    let err = h.files.process_file(record.id).await.unwrap_err();
    assert!(matches!(err, IngestError::AlreadyProcessed(_)));
    assert!(h.sink.steps().contains(&ProcessStep::Error));

    let well = h.wells.find_by_name("W").await.unwrap().unwrap();
    assert_eq!(h.files.sample_count(well.id).await.unwrap(), 6);
}

#[tokio::test]
async fn parse_failure_leaves_file_unprocessed_and_no_samples() {
    let h = harness().await;
    // a short data row fails the document parse, so the upload parks the
    // file on the placeholder well and processing later fails the same way
    let bad = las(
        "BROKEN-1",
        " GR. : Gamma\n",
        " 100.0 1.0\n 101.0\n",
    );
    let record = h.files.upload("bad.las", bad.as_bytes()).await.unwrap();
    assert_eq!(
        record.well_id,
        h.wells
            .find_by_name(PLACEHOLDER_WELL_NAME)
            .await
            .unwrap()
            .unwrap()
            .id
    );

    let err = h.files.process_file(record.id).await.unwrap_err();
    assert!(matches!(err, IngestError::Parse(_)));

    let record = h.files.get(record.id).await.unwrap();
    assert!(!record.processed);
    assert_eq!(h.files.sample_count(record.well_id).await.unwrap(), 0);
    assert!(h.wells.find_by_name("BROKEN-1").await.unwrap().is_none());
    assert_eq!(h.sink.steps().last(), Some(&ProcessStep::Error));
}

#[tokio::test]
async fn unparseable_upload_parks_on_placeholder_then_moves() {
    let h = harness().await;

    // upload bytes that are not LAS at all: parked on the placeholder well
    let record = h.files.upload("junk.las", b"not a log").await.unwrap();
    let placeholder = h
        .wells
        .find_by_name(PLACEHOLDER_WELL_NAME)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.well_id, placeholder.id);

    // replace the blob with a valid document and process: the file moves to
    // the parsed well and the now-empty placeholder is removed
    h.blobs
        .put(&record.blob_key, gr_rhob_file("MOVED-1").as_bytes())
        .await
        .unwrap();
    let outcome = h.files.process_file(record.id).await.unwrap();
    assert_eq!(outcome.well.name, "MOVED-1");
    assert_ne!(outcome.well.id, placeholder.id);
    assert!(h
        .wells
        .find_by_name(PLACEHOLDER_WELL_NAME)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn missing_blob_aborts_without_mutation() {
    let h = harness().await;
    let record = h
        .files
        .upload("gone.las", gr_rhob_file("G").as_bytes())
        .await
        .unwrap();
    h.blobs.delete(&record.blob_key).await.unwrap();

    let err = h.files.process_file(record.id).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(!h.files.get(record.id).await.unwrap().processed);
}

#[tokio::test]
async fn deleting_last_file_removes_well_and_samples() {
    let h = harness().await;
    let first = h
        .files
        .upload("run1.las", gr_rhob_file("DEL-1").as_bytes())
        .await
        .unwrap();
    h.files.process_file(first.id).await.unwrap();
    let well_id = h.wells.find_by_name("DEL-1").await.unwrap().unwrap().id;

    let second = h
        .files
        .upload("run2.las", gr_rhob_file("DEL-1").as_bytes())
        .await
        .unwrap();
    assert_eq!(second.well_id, well_id);

    // deleting a non-last file keeps the well and its samples
    h.files.delete_permanent(second.id).await.unwrap();
    assert!(h.wells.get(well_id).await.is_ok());
    assert_eq!(h.files.sample_count(well_id).await.unwrap(), 6);

    // deleting the last file cascades to samples and the well record
    h.files.delete_permanent(first.id).await.unwrap();
    assert!(h.wells.get(well_id).await.is_err());
    assert!(h.blobs.is_empty());
}

#[tokio::test]
async fn pivot_over_ingested_data_is_depth_aligned() {
    let h = harness().await;
    let record = h
        .files
        .upload("v.las", gr_rhob_file("VIZ-1").as_bytes())
        .await
        .unwrap();
    let outcome = h.files.process_file(record.id).await.unwrap();

    let names = vec!["GR".to_string(), "RHOB".to_string()];
    let series = h
        .viz
        .curve_data(outcome.well.id, &names, 1000.0, 1001.0)
        .await
        .unwrap();

    assert_eq!(series.depth, vec![1000.0, 1000.5, 1001.0]);
    assert_eq!(series.series["GR"], vec![Some(55.0), None, Some(110.0)]);
    assert_eq!(
        series.series["RHOB"],
        vec![Some(2.30), Some(2.35), Some(2.40)]
    );
}

#[tokio::test]
async fn file_listing_and_lifecycle_updates() {
    let h = harness().await;
    let a = h
        .files
        .upload("a.las", gr_rhob_file("L-1").as_bytes())
        .await
        .unwrap();
    let b = h
        .files
        .upload("b.las", gr_rhob_file("L-2").as_bytes())
        .await
        .unwrap();

    use welllog::database::entities::files::FileStatus;
    h.files
        .update_file(a.id, Some(FileStatus::Archived), Some(true), None)
        .await
        .unwrap();

    let all = h.files.recent_files(10, None, false).await.unwrap();
    assert_eq!(all.len(), 2);

    let archived = h
        .files
        .recent_files(10, Some(FileStatus::Archived), false)
        .await
        .unwrap();
    assert_eq!(archived.len(), 1);
    assert_eq!(archived[0].id, a.id);

    let important = h.files.recent_files(10, None, true).await.unwrap();
    assert_eq!(important.len(), 1);

    // soft-deleted files drop out of the default listing
    let updated = h
        .files
        .bulk_update(&[a.id, b.id], Some(FileStatus::Deleted), None)
        .await
        .unwrap();
    assert_eq!(updated, 2);
    assert!(h.files.recent_files(10, None, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn file_can_be_reassigned_to_another_well() {
    let h = harness().await;
    let record = h
        .files
        .upload("a.las", gr_rhob_file("R-1").as_bytes())
        .await
        .unwrap();
    let (other, _) = h.wells.find_or_create_by_name("R-2").await.unwrap();

    let moved = h
        .files
        .update_file(record.id, None, None, Some(other.id))
        .await
        .unwrap();
    assert_eq!(moved.well_id, other.id);

    let err = h
        .files
        .update_file(record.id, None, None, Some(9999))
        .await
        .unwrap_err();
    assert!(matches!(err, IngestError::WellNotFound(9999)));
}

#[tokio::test]
async fn insert_progress_events_carry_cumulative_counts() {
    let h = harness().await;

    // small files emit a single final insert event (inserted == total)
    let record = h
        .files
        .upload("p.las", gr_rhob_file("P-1").as_bytes())
        .await
        .unwrap();
    h.files.process_file(record.id).await.unwrap();

    let events = h.sink.events.lock().unwrap();
    let inserts: Vec<&ProcessEvent> = events
        .iter()
        .filter(|e| e.step == ProcessStep::Insert)
        .collect();
    assert_eq!(inserts.len(), 1);
    assert_eq!(inserts[0].inserted, Some(6));
    assert_eq!(inserts[0].total, Some(6));
}
