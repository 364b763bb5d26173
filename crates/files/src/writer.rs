//! Collision-safe rename service
//!
//! [`RenameWriter`] is bound to one destination directory and moves source documents into
//! it under their synthesised names.
//!
//! # Atomicity
//!
//! A destination name is claimed with a hard link, which fails rather than replaces when
//! the name is already taken. The source is only removed once the link exists, so there is
//! never a moment where a destination name refers to a truncated file. When the source sits
//! on another filesystem the bytes are first written to a hidden staging file inside the
//! destination directory, synced, and then linked into place.
//!
//! # Logging
//!
//! Log events carry the source file name, the short fingerprint and the resolution only.
//! Destination names embed patient names and are never logged.

use crate::{ContentFingerprint, FilesError};
use chartname_types::NonEmptyText;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// How the destination name was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResolution {
    /// The exact destination name was free.
    Direct,
    /// The exact name was taken by an unrelated file; the fingerprinted alternate was used.
    Fingerprinted,
    /// An occupant already held byte-identical content; the source was dropped.
    MatchedExisting,
    /// The source already was the destination file.
    AlreadyInPlace,
}

impl CollisionResolution {
    pub fn label(&self) -> &'static str {
        match self {
            CollisionResolution::Direct => "direct",
            CollisionResolution::Fingerprinted => "fingerprinted",
            CollisionResolution::MatchedExisting => "matched_existing",
            CollisionResolution::AlreadyInPlace => "already_in_place",
        }
    }
}

/// Record of a completed placement.
///
/// `final_path` contains the patient name. It is returned to the caller for display and
/// must not be written to logs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct WriteReceipt {
    /// SHA-256 of the placed bytes
    pub fingerprint: ContentFingerprint,

    /// Where the document now lives
    pub final_path: PathBuf,

    /// How the destination name was settled
    pub resolution: CollisionResolution,

    /// Size of the document in bytes
    pub size_bytes: u64,

    /// Detected media type (MIME type), if available
    ///
    /// Best-effort detection; a document without a recognisable header yields `None`.
    pub media_type: Option<NonEmptyText>,

    /// File name of the source document before the rename
    pub original_filename: NonEmptyText,

    /// UTC timestamp of the placement
    pub written_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Placed,
    MatchedExisting,
    Occupied,
}

/// Service that places documents into a single destination directory.
#[derive(Debug)]
pub struct RenameWriter {
    destination_dir: PathBuf,
}

impl RenameWriter {
    /// Creates a writer for `destination_dir`.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::InvalidDirectory` if the directory does not exist, is not a
    /// directory, or cannot be canonicalised.
    pub fn new(destination_dir: &Path) -> Result<Self, FilesError> {
        if !destination_dir.exists() {
            return Err(FilesError::InvalidDirectory(format!(
                "Directory does not exist: {}",
                destination_dir.display()
            )));
        }

        if !destination_dir.is_dir() {
            return Err(FilesError::InvalidDirectory(format!(
                "Path is not a directory: {}",
                destination_dir.display()
            )));
        }

        let destination_dir = destination_dir.canonicalize().map_err(|e| {
            FilesError::InvalidDirectory(format!(
                "Cannot canonicalize path {}: {}",
                destination_dir.display(),
                e
            ))
        })?;

        Ok(Self { destination_dir })
    }

    /// Returns the canonicalised destination directory.
    #[must_use]
    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    /// Moves `source_path` into the destination directory as `file_name`.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - `file_name` is empty or contains a path separator
    /// - the source cannot be read or removed (I/O)
    /// - both the exact name and the fingerprinted alternate hold unrelated files
    pub fn place(&self, source_path: &Path, file_name: &str) -> Result<WriteReceipt, FilesError> {
        validate_file_name(file_name)?;

        let original_filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| NonEmptyText::new(n).ok())
            .ok_or_else(|| {
                FilesError::InvalidPath(format!(
                    "source has no usable file name: {}",
                    source_path.display()
                ))
            })?;

        let bytes = fs::read(source_path).map_err(|e| {
            FilesError::Io(io::Error::new(
                e.kind(),
                format!("Failed to read source file {}: {}", source_path.display(), e),
            ))
        })?;
        let fingerprint = ContentFingerprint::of_bytes(&bytes);

        let candidate = self.destination_dir.join(file_name);

        let (final_path, resolution) = if is_same_file(source_path, &candidate) {
            (candidate, CollisionResolution::AlreadyInPlace)
        } else {
            match self.try_place(source_path, &candidate, &bytes, &fingerprint)? {
                Placement::Placed => (candidate, CollisionResolution::Direct),
                Placement::MatchedExisting => (candidate, CollisionResolution::MatchedExisting),
                Placement::Occupied => {
                    tracing::warn!(
                        source = %original_filename,
                        fingerprint = fingerprint.short(),
                        "destination occupied by unrelated file"
                    );
                    let alternate = self.alternate_path(file_name, &fingerprint);
                    match self.try_place(source_path, &alternate, &bytes, &fingerprint)? {
                        Placement::Placed => (alternate, CollisionResolution::Fingerprinted),
                        Placement::MatchedExisting => {
                            (alternate, CollisionResolution::MatchedExisting)
                        }
                        Placement::Occupied => {
                            tracing::error!(
                                source = %original_filename,
                                fingerprint = fingerprint.short(),
                                "CollisionExhausted"
                            );
                            return Err(FilesError::CollisionExhausted {
                                fingerprint: fingerprint.short().to_owned(),
                            });
                        }
                    }
                }
            }
        };

        tracing::info!(
            source = %original_filename,
            fingerprint = fingerprint.short(),
            resolution = resolution.label(),
            "document placed"
        );

        let media_type = infer::get(&bytes).and_then(|kind| NonEmptyText::new(kind.mime_type()).ok());

        Ok(WriteReceipt {
            fingerprint,
            final_path,
            resolution,
            size_bytes: bytes.len() as u64,
            media_type,
            original_filename,
            written_at: Utc::now(),
        })
    }

    /// Builds `<stem>_<short fingerprint>.<ext>` next to the exact destination.
    fn alternate_path(&self, file_name: &str, fingerprint: &ContentFingerprint) -> PathBuf {
        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        let alternate = match name.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}_{}.{}", stem, fingerprint.short(), ext),
            None => format!("{}_{}", stem, fingerprint.short()),
        };
        self.destination_dir.join(alternate)
    }

    /// Claims `destination` for the source, or reports who holds it.
    fn try_place(
        &self,
        source_path: &Path,
        destination: &Path,
        bytes: &[u8],
        fingerprint: &ContentFingerprint,
    ) -> Result<Placement, FilesError> {
        let claim = self.link_no_clobber(source_path, destination, bytes, fingerprint);
        self.settle(source_path, destination, fingerprint, claim)
    }

    /// Turns the outcome of a claim on `destination` into a placement, removing the source
    /// once its bytes live at the destination.
    fn settle(
        &self,
        source_path: &Path,
        destination: &Path,
        fingerprint: &ContentFingerprint,
        claim: io::Result<()>,
    ) -> Result<Placement, FilesError> {
        match claim {
            Ok(()) => {
                remove_source(source_path)?;
                Ok(Placement::Placed)
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if occupant_matches(destination, fingerprint)? {
                    remove_source(source_path)?;
                    Ok(Placement::MatchedExisting)
                } else {
                    Ok(Placement::Occupied)
                }
            }
            Err(e) => Err(FilesError::Io(io::Error::new(
                e.kind(),
                format!("Failed to write into {}: {}", self.destination_dir.display(), e),
            ))),
        }
    }

    /// Creates `destination` holding the source bytes, failing with `AlreadyExists` if taken.
    fn link_no_clobber(
        &self,
        source_path: &Path,
        destination: &Path,
        bytes: &[u8],
        fingerprint: &ContentFingerprint,
    ) -> io::Result<()> {
        match fs::hard_link(source_path, destination) {
            Err(e) if e.kind() != ErrorKind::AlreadyExists => {
                self.stage_and_link(destination, bytes, fingerprint)
            }
            other => other,
        }
    }

    /// Fallback for sources on another filesystem.
    fn stage_and_link(
        &self,
        destination: &Path,
        bytes: &[u8],
        fingerprint: &ContentFingerprint,
    ) -> io::Result<()> {
        let staging = self
            .destination_dir
            .join(format!(".{}.partial", fingerprint.short()));

        {
            let mut file = fs::File::create(&staging)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }

        let result = match fs::hard_link(&staging, destination) {
            // Filesystems without hard links.
            Err(e) if e.kind() != ErrorKind::AlreadyExists => rename_no_clobber(&staging, destination),
            other => other,
        };

        if staging.exists() {
            if let Err(e) = fs::remove_file(&staging) {
                tracing::warn!(
                    fingerprint = fingerprint.short(),
                    "failed to remove staging file: {}",
                    e.kind()
                );
            }
        }

        result
    }
}

/// Check-then-rename. Not atomic against a concurrent writer taking `destination`.
fn rename_no_clobber(staging: &Path, destination: &Path) -> io::Result<()> {
    if destination.exists() {
        Err(io::Error::new(ErrorKind::AlreadyExists, "destination occupied"))
    } else {
        fs::rename(staging, destination)
    }
}

fn validate_file_name(file_name: &str) -> Result<(), FilesError> {
    if file_name.trim().is_empty() {
        return Err(FilesError::InvalidPath(
            "destination file name is empty".into(),
        ));
    }

    if file_name == "." || file_name == ".." {
        return Err(FilesError::InvalidPath(
            "destination file name must not be a relative directory".into(),
        ));
    }

    if file_name.contains(['/', '\\', '\0']) {
        return Err(FilesError::InvalidPath(
            "destination file name contains a path separator".into(),
        ));
    }

    Ok(())
}

fn is_same_file(source_path: &Path, candidate: &Path) -> bool {
    match (source_path.canonicalize(), candidate.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn occupant_matches(destination: &Path, fingerprint: &ContentFingerprint) -> Result<bool, FilesError> {
    let existing = fs::read(destination).map_err(|e| {
        FilesError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read existing destination file: {}", e),
        ))
    })?;
    Ok(ContentFingerprint::of_bytes(&existing) == *fingerprint)
}

fn remove_source(source_path: &Path) -> Result<(), FilesError> {
    fs::remove_file(source_path).map_err(|e| {
        FilesError::Io(io::Error::new(
            e.kind(),
            format!(
                "Document placed but source {} could not be removed: {}",
                source_path.display(),
                e
            ),
        ))
    })
}
