use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::error::StorageError;

/// Shelve `path` as a compressed backup when it has grown past `max_bytes`.
///
/// Duplicate scans slow down as the live file grows, so oversized files are
/// renamed to `<name>_<YYYYmmddHHMMSS>.bak`, zstd-compressed to `.bak.zst`,
/// and the uncompressed intermediate removed. Returns whether a rotation
/// happened; a missing file is simply "no".
pub fn rotate_if_large(path: &Path, max_bytes: u64) -> Result<bool, StorageError> {
    let Ok(meta) = fs::metadata(path) else {
        return Ok(false);
    };
    if meta.len() <= max_bytes {
        return Ok(false);
    }

    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("rotated");
    let bak = path.with_file_name(format!("{name}_{stamp}.bak"));
    fs::rename(path, &bak)?;

    let zst = PathBuf::from(format!("{}.zst", bak.display()));
    let mut reader = BufReader::new(File::open(&bak)?);
    let writer = BufWriter::new(File::create(&zst)?);
    let mut encoder = zstd::Encoder::new(writer, 3)?;
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;
    fs::remove_file(&bak)?;

    info!(from = %path.display(), to = %zst.display(), bytes = meta.len(), "rotated oversized file");
    Ok(true)
}
