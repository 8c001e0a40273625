use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use linkmill_core::LinkRecord;

use crate::error::StorageError;

pub const TSV_HEADER: &str = "id\turl\tcreated_at";

/// Flat-file TSV store rooted at the data directory: one `output_YYYYMMDD.tsv`
/// per day, plus a merged/deduplicated combined file.
pub struct TsvStore {
    data_dir: PathBuf,
}

impl TsvStore {
    pub fn new(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the daily output file for `date`.
    pub fn daily_path(&self, date: NaiveDate) -> PathBuf {
        self.data_dir
            .join(format!("output_{}.tsv", date.format("%Y%m%d")))
    }

    /// Path of the merged/deduplicated combined file.
    pub fn combined_path(&self) -> PathBuf {
        self.data_dir.join("combined.tsv")
    }

    /// Next record id: the last id in the file plus one, or 0 for a file
    /// that does not exist yet.
    pub fn next_id(&self, path: &Path) -> Result<u64, StorageError> {
        if !path.exists() {
            return Ok(0);
        }
        let reader = BufReader::new(File::open(path)?);
        let mut last = None;
        for line in reader.lines() {
            let line = line?;
            if line.is_empty() || line == TSV_HEADER {
                continue;
            }
            last = Some(line);
        }
        match last {
            None => Ok(0),
            Some(line) => {
                let record = LinkRecord::from_tsv_line(&line).ok_or_else(|| {
                    StorageError::MalformedRow {
                        path: path.display().to_string(),
                        line: line.clone(),
                    }
                })?;
                Ok(record.id + 1)
            }
        }
    }

    /// Append records, writing the header only when creating the file.
    pub fn append(&self, path: &Path, records: &[LinkRecord]) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }
        let fresh = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if fresh {
            writeln!(file, "{TSV_HEADER}")?;
        }
        for record in records {
            writeln!(file, "{}", record.to_tsv_line())?;
        }
        info!(path = %path.display(), rows = records.len(), "appended records");
        Ok(())
    }

    /// Daily output files currently in the data dir, sorted by name
    /// (which is also date order).
    pub fn daily_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name();
            let is_daily = name.to_str().map(is_daily_file_name).unwrap_or(false);
            if path.is_file() && is_daily {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Merge `sources` into `dest`, dropping duplicate urls (first
    /// occurrence wins) and rewriting `dest` from scratch.
    /// Returns the number of rows written. Malformed rows are skipped.
    pub fn merge_dedup(&self, sources: &[PathBuf], dest: &Path) -> Result<usize, StorageError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged: Vec<LinkRecord> = Vec::new();

        for source in sources {
            let reader = BufReader::new(File::open(source)?);
            for line in reader.lines() {
                let line = line?;
                if line.is_empty() || line == TSV_HEADER {
                    continue;
                }
                match LinkRecord::from_tsv_line(&line) {
                    Some(record) => {
                        if seen.insert(record.url.clone()) {
                            merged.push(record);
                        }
                    }
                    None => {
                        warn!(path = %source.display(), %line, "skipping malformed row");
                    }
                }
            }
        }

        let mut writer = BufWriter::new(File::create(dest)?);
        writeln!(writer, "{TSV_HEADER}")?;
        for record in &merged {
            writeln!(writer, "{}", record.to_tsv_line())?;
        }
        writer.flush()?;
        info!(
            dest = %dest.display(),
            sources = sources.len(),
            rows = merged.len(),
            "merged daily files"
        );
        Ok(merged.len())
    }
}

/// Matches the `output_YYYYMMDD.tsv` daily file shape.
fn is_daily_file_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("output_") else {
        return false;
    };
    let Some(digits) = rest.strip_suffix(".tsv") else {
        return false;
    };
    digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: u64, url: &str) -> LinkRecord {
        LinkRecord {
            id,
            url: url.to_string(),
            created_at: NaiveDate::from_ymd_opt(2021, 4, 19)
                .unwrap()
                .and_hms_opt(0, 8, 0)
                .unwrap(),
        }
    }

    fn temp_store(tag: &str) -> TsvStore {
        let dir = std::env::temp_dir().join(format!("linkmill-tsv-{tag}-{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        TsvStore::new(&dir).unwrap()
    }

    #[test]
    fn daily_path_shape() {
        let store = temp_store("path");
        let date = NaiveDate::from_ymd_opt(2021, 4, 19).unwrap();
        assert!(store
            .daily_path(date)
            .ends_with(Path::new("output_20210419.tsv")));
        fs::remove_dir_all(store.data_dir()).ok();
    }

    #[test]
    fn next_id_starts_at_zero_and_continues() {
        let store = temp_store("nextid");
        let path = store.data_dir().join("output_20210419.tsv");

        assert_eq!(store.next_id(&path).unwrap(), 0);

        store
            .append(&path, &[record(0, "https://a/"), record(1, "https://b/")])
            .unwrap();
        assert_eq!(store.next_id(&path).unwrap(), 2);

        store.append(&path, &[record(2, "https://c/")]).unwrap();
        assert_eq!(store.next_id(&path).unwrap(), 3);

        fs::remove_dir_all(store.data_dir()).ok();
    }

    #[test]
    fn header_written_once() {
        let store = temp_store("header");
        let path = store.data_dir().join("output_20210419.tsv");
        store.append(&path, &[record(0, "https://a/")]).unwrap();
        store.append(&path, &[record(1, "https://b/")]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches(TSV_HEADER).count(), 1);
        assert_eq!(text.lines().count(), 3);

        fs::remove_dir_all(store.data_dir()).ok();
    }

    #[test]
    fn daily_files_filters_by_name_shape() {
        let store = temp_store("daily");
        for name in [
            "output_20210418.tsv",
            "output_20210419.tsv",
            "combined.tsv",
            "output_2021.tsv",
            "notes.txt",
        ] {
            fs::write(store.data_dir().join(name), "").unwrap();
        }

        let files: Vec<String> = store
            .daily_files()
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(files, vec!["output_20210418.tsv", "output_20210419.tsv"]);

        fs::remove_dir_all(store.data_dir()).ok();
    }

    #[test]
    fn merge_drops_duplicate_urls_keeping_first() {
        let store = temp_store("merge");
        let day1 = store.data_dir().join("output_20210418.tsv");
        let day2 = store.data_dir().join("output_20210419.tsv");
        store
            .append(&day1, &[record(0, "https://a/"), record(1, "https://b/")])
            .unwrap();
        store
            .append(&day2, &[record(0, "https://b/"), record(1, "https://c/")])
            .unwrap();

        let dest = store.combined_path();
        let rows = store
            .merge_dedup(&[day1.clone(), day2.clone()], &dest)
            .unwrap();
        assert_eq!(rows, 3);

        let text = fs::read_to_string(&dest).unwrap();
        let urls: Vec<&str> = text
            .lines()
            .skip(1)
            .map(|l| l.split('\t').nth(1).unwrap())
            .collect();
        assert_eq!(urls, vec!["https://a/", "https://b/", "https://c/"]);

        fs::remove_dir_all(store.data_dir()).ok();
    }

    #[test]
    fn merge_skips_malformed_rows() {
        let store = temp_store("malformed");
        let day = store.data_dir().join("output_20210419.tsv");
        fs::write(
            &day,
            format!("{TSV_HEADER}\n0\thttps://a/\t2021-04-19T00:08:00\nnot a row\n"),
        )
        .unwrap();

        let dest = store.combined_path();
        let rows = store.merge_dedup(&[day], &dest).unwrap();
        assert_eq!(rows, 1);

        fs::remove_dir_all(store.data_dir()).ok();
    }
}
