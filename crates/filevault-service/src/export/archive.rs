//! ZIP assembly and entry naming.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use bytes::Bytes;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use filevault_core::error::{AppError, ErrorKind};
use filevault_core::result::AppResult;
use filevault_storage::naming::split_extension;

/// Hands out unique archive entry names.
///
/// The first use of a name keeps it; later ones become `"name (2).ext"`,
/// `"name (3).ext"` and so on, skipping anything already handed out.
#[derive(Debug, Default)]
pub struct EntryNamer {
    taken: HashSet<String>,
}

impl EntryNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a unique name derived from `name`.
    pub fn assign(&mut self, name: &str) -> String {
        if self.taken.insert(name.to_string()) {
            return name.to_string();
        }

        let (stem, ext) = split_extension(name);
        let mut n = 2u32;
        loop {
            let candidate = match ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

fn zip_error(e: impl std::error::Error + Send + Sync + 'static) -> AppError {
    AppError::with_source(ErrorKind::Internal, "Failed to build archive", e)
}

/// Write `entries` into an in-memory ZIP archive, in order.
pub(crate) fn build_zip(entries: &[(String, Bytes)]) -> AppResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for (name, data) in entries {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(data.len() as u64 >= u64::from(u32::MAX));
        writer.start_file(name.as_str(), options).map_err(zip_error)?;
        writer.write_all(data).map_err(zip_error)?;
    }

    Ok(writer.finish().map_err(zip_error)?.into_inner())
}
