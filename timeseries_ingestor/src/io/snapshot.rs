//! Indented JSON snapshot files.
//!
//! Snapshots are written with four-space indentation so they diff and read
//! well by hand. Writes go through a temporary sibling file that is renamed
//! into place, so a failed write never leaves a truncated snapshot behind.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::ser::{PrettyFormatter, Serializer};
use snafu::ResultExt;

use crate::io::sink::{DecodeSnafu, EncodeSnafu, IoSnafu, SinkError};

const INDENT: &[u8] = b"    ";

/// Serializes `value` as indented JSON into `path`, creating parent
/// directories as needed.
pub fn write_json_snapshot<T: Serialize + ?Sized>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<PathBuf, SinkError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context(IoSnafu { path: parent })?;
    }

    let tmp = path.with_extension("json.partial");
    let file = File::create(&tmp).context(IoSnafu { path: &tmp })?;
    let mut writer = BufWriter::new(file);
    {
        let mut ser = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(INDENT));
        value.serialize(&mut ser).context(EncodeSnafu { path })?;
    }
    writer.write_all(b"\n").context(IoSnafu { path: &tmp })?;
    writer.flush().context(IoSnafu { path: &tmp })?;
    drop(writer);

    fs::rename(&tmp, path).context(IoSnafu { path })?;
    Ok(path.to_path_buf())
}

/// Reads a JSON snapshot written by [`write_json_snapshot`] (or any JSON
/// file of the same shape).
pub fn read_json_snapshot<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, SinkError> {
    let path = path.as_ref();
    let file = File::open(path).context(IoSnafu { path })?;
    serde_json::from_reader(BufReader::new(file)).context(DecodeSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample::Sample;

    #[test]
    fn writes_four_space_indent_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("raw_data.json");
        let samples = vec![Sample::empty(0), Sample::empty(300)];

        let written = write_json_snapshot(&path, &samples).unwrap();
        assert_eq!(written, path);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n    {\n        \"timestamp\": 0,"));
        assert!(!path.with_extension("json.partial").exists());

        let back: Vec<Sample> = read_json_snapshot(&path).unwrap();
        assert_eq!(back, samples);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_json_snapshot::<Vec<Sample>>(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SinkError::Io { .. }));
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_json_snapshot::<Vec<Sample>>(&path).unwrap_err();
        assert!(matches!(err, SinkError::Decode { .. }));
    }
}
