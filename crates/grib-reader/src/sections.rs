//! Raw GRIB2 section lookups for the few octets the viewer reads itself.
//!
//! Value decoding and product/grid templates are handled by the `grib`
//! crate. This module only walks the section headers to pick out the
//! identification block (centre, reference time) and the scanning mode of
//! the grid definition, which decide how rows are oriented on screen.

use chrono::{DateTime, NaiveDate, Utc};

/// Offset of Section 1, directly after the 16-byte indicator
const SECTION_START: usize = 16;

/// Scanning mode flag: points of the first row are southernmost (+j)
const SCAN_J_POSITIVE: u8 = 0b0100_0000;

/// Find a section by number within a GRIB2 message.
///
/// Returns the byte offset of the section's length field.
pub fn find_section(data: &[u8], section_num: u8) -> Option<usize> {
    let mut offset = SECTION_START;

    while offset + 5 <= data.len() {
        if &data[offset..offset + 4] == b"7777" {
            return None;
        }

        let section_length = u32::from_be_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]) as usize;

        if section_length < 5 || offset + section_length > data.len() {
            return None;
        }

        if data[offset + 4] == section_num {
            return Some(offset);
        }

        offset += section_length;
    }

    None
}

/// Originating centre from Section 1.
pub fn centre(data: &[u8]) -> Option<u16> {
    let offset = find_section(data, 1)?;
    let sec = data.get(offset + 5..offset + 7)?;
    Some(u16::from_be_bytes([sec[0], sec[1]]))
}

/// Reference time from Section 1 (octets 13-19).
pub fn reference_time(data: &[u8]) -> Option<DateTime<Utc>> {
    let offset = find_section(data, 1)?;
    let sec = data.get(offset + 12..offset + 19)?;

    let year = u16::from_be_bytes([sec[0], sec[1]]);
    let (month, day, hour, minute, second) = (sec[2], sec[3], sec[4], sec[5], sec[6]);

    let naive = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
        .and_then(|date| date.and_hms_opt(hour as u32, minute as u32, second as u32))?;

    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Scanning mode flags of the first grid definition in the message.
///
/// Only grid templates whose scanning-mode octet position is known are
/// supported; others return `None`.
pub fn scanning_mode(data: &[u8]) -> Option<u8> {
    let offset = find_section(data, 3)?;

    // Octet of the scanning mode within Section 3, per template
    let octet = match grid_template(data, offset)? {
        0..=3 | 40..=43 => 72, // lat/lon and Gaussian
        10 => 60,              // Mercator
        20 | 30 | 31 => 65,    // polar stereographic, Lambert conformal, Albers
        _ => return None,
    };

    data.get(offset + octet - 1).copied()
}

/// Grid dimensions (Ni, Nj) read directly from Section 3.
///
/// All supported templates store Ni/Nj (or Nx/Ny) at octets 31-38.
pub fn grid_size(data: &[u8]) -> Option<(usize, usize)> {
    let offset = find_section(data, 3)?;
    match grid_template(data, offset)? {
        0..=3 | 10 | 20 | 30 | 31 | 40..=43 => {}
        _ => return None,
    }
    let sec = data.get(offset + 30..offset + 38)?;
    let ni = u32::from_be_bytes([sec[0], sec[1], sec[2], sec[3]]) as usize;
    let nj = u32::from_be_bytes([sec[4], sec[5], sec[6], sec[7]]) as usize;
    Some((ni, nj))
}

fn grid_template(data: &[u8], offset: usize) -> Option<u16> {
    Some(u16::from_be_bytes([*data.get(offset + 12)?, *data.get(offset + 13)?]))
}

/// Whether the first row of values is the southernmost one.
///
/// Defaults to `false` (north to south) when the scanning mode is unknown.
pub fn rows_south_to_north(data: &[u8]) -> bool {
    scanning_mode(data)
        .map(|mode| mode & SCAN_J_POSITIVE != 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with_sections(sections: &[Vec<u8>]) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"GRIB");
        data.extend_from_slice(&[0, 0, 0, 2]);
        data.extend_from_slice(&0u64.to_be_bytes());
        for section in sections {
            data.extend_from_slice(section);
        }
        data.extend_from_slice(b"7777");
        data
    }

    fn section(number: u8, body: &[u8]) -> Vec<u8> {
        let mut sec = Vec::new();
        sec.extend_from_slice(&((body.len() + 5) as u32).to_be_bytes());
        sec.push(number);
        sec.extend_from_slice(body);
        sec
    }

    fn identification(centre: u16) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&centre.to_be_bytes());
        body.extend_from_slice(&[0, 0, 2, 1, 1]);
        body.extend_from_slice(&2024u16.to_be_bytes());
        body.extend_from_slice(&[3, 15, 6, 30, 0, 0, 1]);
        section(1, &body)
    }

    fn latlon_grid(scanning_mode: u8) -> Vec<u8> {
        // 14-octet header + 58-octet template 3.0
        let mut body = vec![0u8; 72 - 5];
        body[12 - 5] = 0;
        body[13 - 5] = 0;
        body[30 - 5..34 - 5].copy_from_slice(&8u32.to_be_bytes());
        body[34 - 5..38 - 5].copy_from_slice(&6u32.to_be_bytes());
        body[71 - 5] = scanning_mode;
        section(3, &body)
    }

    #[test]
    fn test_find_section() {
        let data = message_with_sections(&[identification(7), latlon_grid(0)]);
        assert_eq!(find_section(&data, 1), Some(16));
        assert_eq!(find_section(&data, 3), Some(16 + 21));
        assert_eq!(find_section(&data, 4), None);
    }

    #[test]
    fn test_identification_fields() {
        let data = message_with_sections(&[identification(98)]);
        assert_eq!(centre(&data), Some(98));

        let time = reference_time(&data).unwrap();
        assert_eq!(time.to_rfc3339(), "2024-03-15T06:30:00+00:00");
    }

    #[test]
    fn test_scanning_direction() {
        let north_first = message_with_sections(&[identification(7), latlon_grid(0)]);
        assert_eq!(scanning_mode(&north_first), Some(0));
        assert!(!rows_south_to_north(&north_first));

        let south_first = message_with_sections(&[identification(7), latlon_grid(0b0100_0000)]);
        assert!(rows_south_to_north(&south_first));
    }

    #[test]
    fn test_grid_size() {
        let data = message_with_sections(&[identification(7), latlon_grid(0)]);
        assert_eq!(grid_size(&data), Some((8, 6)));

        let no_grid = message_with_sections(&[identification(7)]);
        assert_eq!(grid_size(&no_grid), None);
    }

    #[test]
    fn test_truncated_section_is_ignored() {
        let mut data = message_with_sections(&[identification(7)]);
        data.truncate(20);
        assert_eq!(find_section(&data, 1), None);
        assert_eq!(reference_time(&data), None);
    }
}
