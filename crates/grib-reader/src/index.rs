//! Byte-offset index of the messages in a GRIB file.
//!
//! Section 0 (Indicator) layout:
//! - Octets 1-4: "GRIB"
//! - GRIB1: octets 5-7 total message length (24-bit), octet 8 edition
//! - GRIB2: octet 7 discipline, octet 8 edition, octets 9-16 total length (64-bit)
//!
//! Every message ends with the "7777" marker (Section 8 / Section 5 in GRIB1).

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::{ReadError, ReadResult};

pub const MAGIC: &[u8; 4] = b"GRIB";
pub const END_MARKER: &[u8; 4] = b"7777";

/// Bytes read per step while searching for the next message start
const SCAN_CHUNK: usize = 64 * 1024;

/// Smallest possible message: indicator plus end marker
const GRIB1_MIN_LENGTH: u64 = 8 + 4;
const GRIB2_MIN_LENGTH: u64 = 16 + 4;

/// Location of one message inside the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageLocation {
    /// Byte offset of the "GRIB" magic
    pub offset: u64,
    /// Total message length in bytes, including Section 0 and the end marker
    pub length: u64,
    pub edition: u8,
}

impl MessageLocation {
    pub fn end(&self) -> u64 {
        self.offset + self.length
    }
}

/// Offsets of every message in a file, in file order. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageIndex {
    messages: Vec<MessageLocation>,
}

impl MessageIndex {
    /// Scan `reader` from the start and record every message boundary.
    ///
    /// Bytes between messages that do not start a message are skipped. A
    /// message whose declared length runs past the end of the input, or that
    /// lacks its end marker, is an error.
    pub fn scan<R: Read + Seek>(reader: &mut R) -> ReadResult<Self> {
        let file_len = reader.seek(SeekFrom::End(0))?;
        let mut messages = Vec::new();
        let mut pos = 0u64;

        while let Some(start) = find_magic(reader, pos)? {
            reader.seek(SeekFrom::Start(start))?;
            let mut header = [0u8; 16];
            let available = read_up_to(reader, &mut header)?;
            if available < 8 {
                return Err(ReadError::InvalidMessage {
                    offset: start,
                    reason: format!("truncated indicator section ({} bytes)", available),
                });
            }

            let edition = header[7];
            let length = match edition {
                1 => u64::from(u32::from_be_bytes([0, header[4], header[5], header[6]])),
                2 if available == 16 => u64::from_be_bytes([
                    header[8], header[9], header[10], header[11], header[12], header[13],
                    header[14], header[15],
                ]),
                2 => {
                    return Err(ReadError::InvalidMessage {
                        offset: start,
                        reason: format!("truncated indicator section ({} bytes)", available),
                    })
                }
                _ => {
                    // "GRIB" inside unrelated bytes
                    trace!(offset = start, edition, "Skipping bytes that only look like a message start");
                    pos = start + 1;
                    continue;
                }
            };

            let min_length = if edition == 1 { GRIB1_MIN_LENGTH } else { GRIB2_MIN_LENGTH };
            if length < min_length {
                return Err(ReadError::InvalidMessage {
                    offset: start,
                    reason: format!("declared length {} is too short", length),
                });
            }
            let end = match start.checked_add(length) {
                Some(end) if end <= file_len => end,
                _ => {
                    return Err(ReadError::InvalidMessage {
                        offset: start,
                        reason: format!(
                            "declared length {} exceeds remaining {} bytes",
                            length,
                            file_len - start
                        ),
                    })
                }
            };

            // length >= min_length, so the marker lies inside the message
            reader.seek(SeekFrom::Start(end - END_MARKER.len() as u64))?;
            let mut marker = [0u8; 4];
            reader.read_exact(&mut marker)?;
            if &marker != END_MARKER {
                return Err(ReadError::InvalidMessage {
                    offset: start,
                    reason: "missing end marker".to_string(),
                });
            }

            messages.push(MessageLocation {
                offset: start,
                length,
                edition,
            });
            pos = end;
        }

        debug!(messages = messages.len(), bytes = file_len, "Indexed GRIB messages");
        Ok(Self { messages })
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MessageLocation> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageLocation> {
        self.messages.iter()
    }

    /// Read the raw bytes of message `index` by seeking straight to its offset.
    pub fn read_message<R: Read + Seek>(&self, reader: &mut R, index: usize) -> ReadResult<Bytes> {
        let location = self.get(index).ok_or(ReadError::IndexOutOfRange {
            index,
            count: self.len(),
        })?;
        read_location(reader, location)
    }
}

/// Read exactly the bytes covered by `location`.
pub fn read_location<R: Read + Seek>(reader: &mut R, location: &MessageLocation) -> ReadResult<Bytes> {
    let length = usize::try_from(location.length).map_err(|_| ReadError::InvalidMessage {
        offset: location.offset,
        reason: format!("message length {} does not fit in memory", location.length),
    })?;
    reader.seek(SeekFrom::Start(location.offset))?;
    let mut data = vec![0u8; length];
    reader.read_exact(&mut data)?;
    Ok(Bytes::from(data))
}

/// Find the offset of the next "GRIB" magic at or after `from`.
fn find_magic<R: Read + Seek>(reader: &mut R, from: u64) -> std::io::Result<Option<u64>> {
    reader.seek(SeekFrom::Start(from))?;
    let mut buf = vec![0u8; SCAN_CHUNK];
    // File offset of buf[0]
    let mut base = from;
    // Bytes carried over from the previous chunk so a magic split across
    // two reads is still found
    let mut carry = 0usize;

    loop {
        let n = read_up_to(reader, &mut buf[carry..])?;
        let filled = carry + n;

        if let Some(pos) = buf[..filled].windows(MAGIC.len()).position(|w| w == MAGIC) {
            return Ok(Some(base + pos as u64));
        }
        if n == 0 {
            return Ok(None);
        }

        let keep = filled.min(MAGIC.len() - 1);
        buf.copy_within(filled - keep..filled, 0);
        base += (filled - keep) as u64;
        carry = keep;
    }
}

/// Fill as much of `buf` as the reader allows; returns bytes read (0 at EOF).
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
