// src/store/container.rs
// Single-file store container: fixed header + gzip-compressed bincode payload.
// Every load verifies magic, format version and the SHA-256 payload checksum.

use super::constants::{FORMAT_VERSION, HEADER_SIZE, STORE_MAGIC};
use super::records::Root;
use crate::exceptions::{Result, StoreError};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::{debug, trace};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Read and verify the container at `path`, returning the frame collection
pub(crate) fn load(path: &Path) -> Result<Root> {
    if !path.is_file() {
        return Err(StoreError::StoreUnavailable(format!(
            "backing file {} does not exist",
            path.display()
        )));
    }

    let raw = fs::read(path).map_err(|e| {
        StoreError::StoreUnavailable(format!("cannot open {}: {e}", path.display()))
    })?;
    trace!("Read {} bytes from {}", raw.len(), path.display());

    if raw.len() < HEADER_SIZE {
        return Err(StoreError::StoreUnavailable(format!(
            "truncated header: {} bytes",
            raw.len()
        )));
    }
    if &raw[..4] != STORE_MAGIC {
        return Err(StoreError::StoreUnavailable(
            "missing 🎞 magic at start of file".into(),
        ));
    }

    let version = u32::from_le_bytes(
        raw[4..8]
            .try_into()
            .map_err(|_| StoreError::StoreUnavailable("invalid version bytes".into()))?,
    );
    if version != FORMAT_VERSION {
        return Err(StoreError::StoreUnavailable(format!(
            "unsupported format version {version:#06x}"
        )));
    }

    let payload_len = u64::from_le_bytes(
        raw[8..16]
            .try_into()
            .map_err(|_| StoreError::StoreUnavailable("invalid payload length bytes".into()))?,
    ) as usize;
    let expected: [u8; 32] = raw[16..HEADER_SIZE]
        .try_into()
        .map_err(|_| StoreError::StoreUnavailable("invalid checksum bytes".into()))?;

    let payload = &raw[HEADER_SIZE..];
    if payload.len() != payload_len {
        return Err(StoreError::StoreUnavailable(format!(
            "payload length mismatch: header says {payload_len}, file has {}",
            payload.len()
        )));
    }

    let actual: [u8; 32] = Sha256::digest(payload).into();
    if actual != expected {
        return Err(StoreError::StoreUnavailable(format!(
            "payload checksum mismatch: expected {}, got {}",
            hex::encode(expected),
            hex::encode(actual)
        )));
    }
    trace!("Payload checksum verified (SHA-256)");

    let mut decoder = GzDecoder::new(payload);
    let mut encoded = Vec::new();
    decoder.read_to_end(&mut encoded)?;
    let root: Root = bincode::deserialize(&encoded)?;
    debug!(
        "Loaded store {} ({} frames)",
        path.display(),
        root.frames.len()
    );
    Ok(root)
}

/// Serialize the frame collection and atomically replace the container.
///
/// The payload is written to a temp file in the target directory and renamed
/// over the store, so a crash mid-write never leaves a half-written container.
pub(crate) fn commit(path: &Path, root: &Root) -> Result<()> {
    let encoded = bincode::serialize(root)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&encoded)?;
    let payload = encoder.finish()?;
    let checksum: [u8; 32] = Sha256::digest(&payload).into();

    let mut header = [0u8; HEADER_SIZE];
    header[..4].copy_from_slice(STORE_MAGIC);
    header[4..8].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
    header[8..16].copy_from_slice(&(payload.len() as u64).to_le_bytes());
    header[16..HEADER_SIZE].copy_from_slice(&checksum);

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or_else(|| Path::new(".")))?;
    tmp.write_all(&header)?;
    tmp.write_all(&payload)?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    debug!(
        "Committed store {} ({} frames, {} payload bytes)",
        path.display(),
        root.frames.len(),
        payload.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::records::FrameRecord;
    use ndarray::{ArrayD, IxDyn};
    use tempfile::TempDir;

    fn sample_root() -> Root {
        let mut root = Root::default();
        root.frames.insert(
            "frame_000".to_string(),
            FrameRecord::new(ArrayD::zeros(IxDyn(&[8, 8, 3]))),
        );
        root
    }

    #[test]
    fn test_commit_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frames.fdb");

        commit(&path, &sample_root()).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.frames.len(), 1);
        let frame = &loaded.frames["frame_000"];
        assert_eq!(frame.image.shape(), &[8, 8, 3]);
        assert!(frame.annotation.is_none());
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("nope.fdb")).unwrap_err();
        assert!(matches!(err, StoreError::StoreUnavailable(_)));
    }

    #[test]
    fn test_wrong_magic_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frames.fdb");
        commit(&path, &sample_root()).unwrap();

        let mut raw = fs::read(&path).unwrap();
        raw[0] ^= 0xFF;
        fs::write(&path, &raw).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::StoreUnavailable(_)));
    }

    #[test]
    fn test_corrupted_payload_fails_checksum() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frames.fdb");
        commit(&path, &sample_root()).unwrap();

        let mut raw = fs::read(&path).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xFF;
        fs::write(&path, &raw).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::StoreUnavailable(_)));
    }

    #[test]
    fn test_truncated_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frames.fdb");
        fs::write(&path, [0u8; 10]).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::StoreUnavailable(_)));
    }
}
