//! Exchange package: a zip archive holding one full store file.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::Result;
use crate::schema::FILE_EXCHANGE_DAT;

/// Compresses the store file at `snapshot` into `package` under the fixed
/// entry name. An existing package is overwritten.
pub fn write_package(snapshot: &Path, package: &Path) -> Result<()> {
    let data = std::fs::read(snapshot)?;
    if let Some(parent) = package.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = ZipWriter::new(File::create(package)?);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(FILE_EXCHANGE_DAT, options)?;
    writer.write_all(&data)?;
    writer.finish()?;

    info!(package = %package.display(), bytes = data.len(), "Wrote exchange package");
    Ok(())
}

/// Extracts the store file from `package` to `snapshot`, replacing it
pub fn extract_package(package: &Path, snapshot: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(File::open(package)?)?;
    let mut entry = archive.by_name(FILE_EXCHANGE_DAT)?;
    let mut out = File::create(snapshot)?;
    let bytes = std::io::copy(&mut entry, &mut out)?;

    info!(package = %package.display(), bytes, "Extracted exchange package");
    Ok(())
}
