//! GRIB file access: scan once on open, decode on demand.

use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use grib_common::{Field, FieldMetadata};
use tracing::{debug, info, warn};

use crate::decode;
use crate::error::{ReadError, ReadResult};
use crate::index::{read_location, MessageIndex, MessageLocation};
use crate::source::FieldSource;
use crate::tables::Grib2Tables;

/// One selectable field: a submessage of an indexed message.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub location: MessageLocation,
    /// Position of the enclosing message in the file
    pub message: usize,
    /// Submessage number within the enclosing message
    pub submessage: usize,
    pub metadata: FieldMetadata,
    /// Why the metadata could not be read, if it could not
    pub decode_error: Option<String>,
}

/// An opened GRIB file.
///
/// Messages are located by a single scan when the file is opened. Only the
/// metadata of each submessage is decoded up front; values are decoded when
/// a field is requested, by seeking straight to the message.
pub struct GribFile<R = BufReader<File>> {
    reader: R,
    path: Option<PathBuf>,
    index: MessageIndex,
    entries: Vec<IndexEntry>,
    tables: Arc<Grib2Tables>,
}

impl<R> fmt::Debug for GribFile<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GribFile")
            .field("path", &self.path)
            .field("messages", &self.index.len())
            .field("fields", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl GribFile {
    /// Open and index a file using the default parameter tables.
    pub fn open(path: impl AsRef<Path>) -> ReadResult<Self> {
        Self::open_with_tables(path, Arc::new(Grib2Tables::with_defaults()))
    }

    pub fn open_with_tables(path: impl AsRef<Path>, tables: Arc<Grib2Tables>) -> ReadResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let bytes = file.metadata().map(|m| m.len()).unwrap_or(0);

        let mut grib = Self::from_reader(BufReader::new(file), tables)?;
        grib.path = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            bytes,
            messages = grib.index.len(),
            fields = grib.entries.len(),
            "Opened GRIB file"
        );
        Ok(grib)
    }
}

impl<R: Read + Seek> GribFile<R> {
    /// Index any seekable byte source.
    pub fn from_reader(mut reader: R, tables: Arc<Grib2Tables>) -> ReadResult<Self> {
        let index = MessageIndex::scan(&mut reader)?;
        let mut entries = Vec::with_capacity(index.len());

        for (message, location) in index.iter().enumerate() {
            if location.edition != 2 {
                entries.push(IndexEntry {
                    location: *location,
                    message,
                    submessage: 0,
                    metadata: FieldMetadata {
                        edition: location.edition,
                        ..FieldMetadata::default()
                    },
                    decode_error: None,
                });
                continue;
            }

            let data = read_location(&mut reader, location)?;
            match decode::decode_metadata(&data, &tables) {
                Ok(submessages) => {
                    for (submessage, metadata) in submessages.into_iter().enumerate() {
                        entries.push(IndexEntry {
                            location: *location,
                            message,
                            submessage,
                            metadata,
                            decode_error: None,
                        });
                    }
                }
                Err(reason) => {
                    warn!(message, offset = location.offset, error = %reason, "Cannot read message metadata");
                    entries.push(IndexEntry {
                        location: *location,
                        message,
                        submessage: 0,
                        metadata: FieldMetadata {
                            edition: location.edition,
                            ..FieldMetadata::default()
                        },
                        decode_error: Some(reason),
                    });
                }
            }
        }

        Ok(Self {
            reader,
            path: None,
            index,
            entries,
            tables,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn index(&self) -> &MessageIndex {
        &self.index
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> ReadResult<&IndexEntry> {
        self.entries.get(index).ok_or(ReadError::IndexOutOfRange {
            index,
            count: self.entries.len(),
        })
    }

    pub fn tables(&self) -> &Grib2Tables {
        &self.tables
    }
}

impl<R: Read + Seek> FieldSource for GribFile<R> {
    fn count(&self) -> usize {
        self.entries.len()
    }

    fn metadata(&self, index: usize) -> ReadResult<&FieldMetadata> {
        self.entry(index).map(|entry| &entry.metadata)
    }

    fn field(&mut self, index: usize) -> ReadResult<Field> {
        let entry = self.entry(index)?.clone();

        if entry.location.edition != 2 {
            return Err(ReadError::UnsupportedEdition {
                index,
                edition: entry.location.edition,
            });
        }
        if let Some(reason) = entry.decode_error {
            return Err(ReadError::Decode { index, reason });
        }

        let data = read_location(&mut self.reader, &entry.location)?;
        let values = decode::decode_values(&data, entry.submessage, entry.metadata.num_points())
            .map_err(|reason| ReadError::Decode { index, reason })?;

        let field = Field::new(entry.metadata, values).map_err(|source| ReadError::Field { index, source })?;
        debug!(
            index,
            message = entry.message,
            submessage = entry.submessage,
            width = field.width(),
            height = field.height(),
            min = field.min(),
            max = field.max(),
            "Decoded field"
        );
        Ok(field)
    }
}
