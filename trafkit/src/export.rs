//! CSV export of a record collection or a single record. The delivery side
//! effect (the browser-download analog) sits behind `ExportSink`.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::errors::KitError;

/// Delivery boundary for exported files.
pub trait ExportSink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), KitError>;
}

/// Writes exports into a download directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DownloadDir {
    dir: PathBuf,
}

impl DownloadDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DownloadDir {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), KitError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "export written");
        Ok(())
    }
}

/// Captures exports in memory; used by tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub files: Vec<(String, Vec<u8>)>,
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), KitError> {
        self.files.push((file_name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

fn to_csv<T: Serialize>(records: &[T]) -> Result<Vec<u8>, KitError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| KitError::Export(e.to_string()))
}

/// Exports a collection as `<logical_name>.csv`: one header line of field
/// names, then one line per record in input order. An empty collection is a
/// no-op; no file is produced and `Ok(false)` is returned.
pub fn export_collection<T: Serialize>(
    records: &[T],
    logical_name: &str,
    sink: &mut dyn ExportSink,
) -> Result<bool, KitError> {
    if records.is_empty() {
        return Ok(false);
    }
    let bytes = to_csv(records)?;
    sink.deliver(&format!("{}.csv", logical_name), &bytes)?;
    Ok(true)
}

/// Exports a single record as `<logical_name>.csv` (header plus one line).
pub fn export_record<T: Serialize>(
    record: &T,
    logical_name: &str,
    sink: &mut dyn ExportSink,
) -> Result<(), KitError> {
    let bytes = to_csv(std::slice::from_ref(record))?;
    sink.deliver(&format!("{}.csv", logical_name), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestRow {
        id: u32,
        name: &'static str,
    }

    #[test]
    fn test_collection_export_is_header_plus_rows_in_order() {
        let rows = vec![
            TestRow { id: 1, name: "alpha" },
            TestRow { id: 2, name: "beta" },
            TestRow { id: 3, name: "gamma" },
        ];
        let mut sink = MemorySink::default();
        assert!(export_collection(&rows, "rows", &mut sink).unwrap());

        assert_eq!(sink.files.len(), 1);
        let (name, bytes) = &sink.files[0];
        assert_eq!(name, "rows.csv");
        let text = String::from_utf8(bytes.clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["id,name", "1,alpha", "2,beta", "3,gamma"]);
    }

    #[test]
    fn test_empty_collection_is_a_no_op() {
        let rows: Vec<TestRow> = Vec::new();
        let mut sink = MemorySink::default();
        assert!(!export_collection(&rows, "rows", &mut sink).unwrap());
        assert!(sink.files.is_empty());
    }

    #[test]
    fn test_single_record_export() {
        let row = TestRow { id: 7, name: "solo" };
        let mut sink = MemorySink::default();
        export_record(&row, "Report-7", &mut sink).unwrap();
        let (name, bytes) = &sink.files[0];
        assert_eq!(name, "Report-7.csv");
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["id,name", "7,solo"]);
    }

    #[test]
    fn test_embedded_delimiters_are_quoted() {
        #[derive(Serialize)]
        struct Tricky {
            id: u32,
            note: &'static str,
        }
        let rows = vec![Tricky { id: 1, note: "stalled, lane 2" }];
        let mut sink = MemorySink::default();
        export_collection(&rows, "tricky", &mut sink).unwrap();
        let text = String::from_utf8(sink.files[0].1.clone()).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec!["id,note", "1,\"stalled, lane 2\""]
        );
    }

    #[test]
    fn test_download_dir_writes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DownloadDir::new(tmp.path().join("exports"));
        let rows = vec![TestRow { id: 1, name: "alpha" }];
        assert!(export_collection(&rows, "cameras", &mut sink).unwrap());

        let written = fs::read_to_string(tmp.path().join("exports").join("cameras.csv")).unwrap();
        assert!(written.starts_with("id,name"));
    }

    #[test]
    fn test_domain_records_serialize() {
        use crate::sample;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(4);
        let cams = sample::cameras(&mut rng, 3);
        let mut sink = MemorySink::default();
        export_collection(&cams, "cameras", &mut sink).unwrap();
        let text = String::from_utf8(sink.files[0].1.clone()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,location,status,uptime,alert_count")
        );
        assert_eq!(lines.count(), 3);
    }
}
