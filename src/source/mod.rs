//! Read regulation JSON from a plain file or from inside a .zip bundle.

use crate::config::MAX_REGULATION_FILE_BYTES;
use crate::registry::LoadError;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Preferred entry name inside a bundle.
const REGULATION_ENTRY_NAME: &str = "regulation.json";
const JSON_SUFFIX: &str = ".json";

fn too_large(path: &Path, size: u64) -> LoadError {
    LoadError::TooLarge {
        path: path.to_path_buf(),
        size,
        max: MAX_REGULATION_FILE_BYTES,
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the regulation JSON text at `path`. A `.zip` file is searched for
/// `regulation.json`, or its only `.json` entry.
pub fn read_regulation_source(path: &Path) -> Result<String, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if ext == "zip" {
        return read_from_zip(path);
    }
    let size = fs::metadata(path).map_err(|e| io_error(path, e))?.len();
    if size > MAX_REGULATION_FILE_BYTES {
        return Err(too_large(path, size));
    }
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "read regulation file");
    Ok(text)
}

fn read_from_zip(zip_path: &Path) -> Result<String, LoadError> {
    let file = fs::File::open(zip_path).map_err(|e| io_error(zip_path, e))?;
    let mut zip = zip::ZipArchive::new(file)?;

    let mut candidates = Vec::new();
    for i in 0..zip.len() {
        let entry = zip.by_index(i)?;
        let name = entry.name().to_string();
        if entry.is_dir() || name.contains("__MACOSX") || !name.ends_with(JSON_SUFFIX) {
            continue;
        }
        candidates.push((i, name));
    }
    let index = candidates
        .iter()
        .find(|(_, name)| {
            Path::new(name)
                .file_name()
                .map(|f| f == REGULATION_ENTRY_NAME)
                .unwrap_or(false)
        })
        .or(if candidates.len() == 1 {
            candidates.first()
        } else {
            None
        })
        .map(|(i, _)| *i)
        .ok_or_else(|| LoadError::MissingEntry {
            path: zip_path.to_path_buf(),
            entry: REGULATION_ENTRY_NAME.to_string(),
        })?;

    let entry = zip.by_index(index)?;
    if entry.size() > MAX_REGULATION_FILE_BYTES {
        return Err(too_large(zip_path, entry.size()));
    }
    let name = entry.name().to_string();
    let mut buf = String::with_capacity(entry.size() as usize);
    entry
        .take(MAX_REGULATION_FILE_BYTES + 1)
        .read_to_string(&mut buf)
        .map_err(|e| io_error(zip_path, e))?;
    if buf.len() as u64 > MAX_REGULATION_FILE_BYTES {
        return Err(too_large(zip_path, buf.len() as u64));
    }
    tracing::debug!(path = %zip_path.display(), entry = %name, bytes = buf.len(), "read regulation from bundle");
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn reads_plain_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regulation.json");
        fs::write(&path, r#"{"weapons":[]}"#).unwrap();
        assert_eq!(read_regulation_source(&path).unwrap(), r#"{"weapons":[]}"#);
    }

    #[test]
    fn reads_named_entry_from_zip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        write_zip(
            &path,
            &[
                ("README.txt", "hi"),
                ("extra.json", "{}"),
                ("data/regulation.json", r#"{"weapons":[]}"#),
            ],
        );
        assert_eq!(read_regulation_source(&path).unwrap(), r#"{"weapons":[]}"#);
    }

    #[test]
    fn single_json_entry_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.ZIP");
        write_zip(&path, &[("patch-1.10.json", "{}")]);
        assert_eq!(read_regulation_source(&path).unwrap(), "{}");
    }

    #[test]
    fn ambiguous_zip_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        write_zip(&path, &[("a.json", "{}"), ("b.json", "{}")]);
        assert!(matches!(
            read_regulation_source(&path),
            Err(LoadError::MissingEntry { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_regulation_source(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
