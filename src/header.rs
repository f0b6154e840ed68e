//! Parses the fixed preamble of a DAT container (spec §4.2).

use std::io::{Read, Seek};
use crate::error::{Error, Result};
use crate::format::{self, DatFileType};
use crate::io::ByteCursor;


/// The decoded fixed preamble: the validated file size and the eight
/// absolute offsets of the per-category index tables, in header order.
#[derive(Debug, Clone)]
pub struct Header {
    pub file_size: u32,
    pub category_table_offsets: [u32; 8],
}

impl Header {
    /// Read and validate the preamble at the current cursor position (offset 0).
    /// `actual_file_length` is compared against the header's `file_size` field;
    /// a mismatch is fatal (`Error::LengthMismatch`), per spec §4.2 and §7.
    pub fn read<R: Read + Seek>(
        cursor: &mut ByteCursor<R>,
        file_type: DatFileType,
        actual_file_length: u64,
    ) -> Result<Header> {
        cursor.expect(&format::FILE_START1, "FILE_START1 literal")?;
        cursor.expect(&file_type.start_magic(), "pixel-format magic")?;
        cursor.expect(&format::FILE_START2, "FILE_START2 literal")?;

        let file_size = cursor.read_u32()?;
        if u64::from(file_size) != actual_file_length {
            return Err(Error::LengthMismatch { expected: u64::from(file_size), actual: actual_file_length });
        }

        let mut category_table_offsets = [0_u32; 8];
        for offset in category_table_offsets.iter_mut() {
            *offset = cursor.read_u32()?;
        }

        cursor.expect(&format::FILE_HEADER_END, "FILE_HEADER_END literal")?;

        Ok(Header { file_size, category_table_offsets })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn valid_header_bytes(file_size: u32, offsets: [u32; 8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&format::FILE_START1);
        bytes.extend_from_slice(&DatFileType::Settlers4.start_magic());
        bytes.extend_from_slice(&format::FILE_START2);
        bytes.extend_from_slice(&file_size.to_le_bytes());
        for offset in &offsets {
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        bytes.extend_from_slice(&format::FILE_HEADER_END);
        bytes
    }

    #[test]
    fn reads_valid_header() {
        let offsets = [100, 200, 300, 400, 500, 600, 700, 800];
        let bytes = valid_header_bytes(1000, offsets);
        let length = bytes.len() as u64;

        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        let header = Header::read(&mut cursor, DatFileType::Settlers4, length).unwrap();

        assert_eq!(header.file_size as u64, length);
        assert_eq!(header.category_table_offsets, offsets);
    }

    #[test]
    fn rejects_wrong_start_literal() {
        let mut bytes = valid_header_bytes(1000, [0; 8]);
        bytes[0] ^= 0xFF;
        let length = bytes.len() as u64;

        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        let result = Header::read(&mut cursor, DatFileType::Settlers4, length);
        assert!(matches!(result, Err(Error::FormatMismatch(_))));
    }

    #[test]
    fn rejects_wrong_pixel_format_magic() {
        let bytes = valid_header_bytes(1000, [0; 8]);
        let length = bytes.len() as u64;

        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        // the bytes were built with Settlers4's magic, so requesting the other variant must fail
        let result = Header::read(&mut cursor, DatFileType::SettlersHistoryEdition, length);
        assert!(matches!(result, Err(Error::FormatMismatch(_))));
    }

    #[test]
    fn rejects_length_mismatch() {
        let bytes = valid_header_bytes(1000, [0; 8]);
        let mut cursor = ByteCursor::new(Cursor::new(bytes.clone()));

        let result = Header::read(&mut cursor, DatFileType::Settlers4, bytes.len() as u64 + 1);
        assert!(matches!(result, Err(Error::LengthMismatch { .. })));
    }

    #[test]
    fn rejects_truncated_header() {
        let bytes = valid_header_bytes(1000, [0; 8]);
        let truncated = bytes[..bytes.len() - 5].to_vec();
        let length = truncated.len() as u64;

        let mut cursor = ByteCursor::new(Cursor::new(truncated));
        let result = Header::read(&mut cursor, DatFileType::Settlers4, length);
        assert!(result.is_err());
    }
}
