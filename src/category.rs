//! Parses a single per-category index table (spec §4.3).

use std::io::{Read, Seek};
use smallvec::SmallVec;
use crate::error::{Error, Result};
use crate::format::{self, Category};
use crate::io::ByteCursor;


/// Ordered vector of absolute file offsets, one per sequence, for a single
/// category. Empty if the file lacks that category or if parsing the slot
/// failed (spec §4.8: per-slot errors are demoted to an empty table). Most
/// categories hold only a handful of sequences, so this stays inline rather
/// than allocating.
pub type CategoryTable = SmallVec<[u32; 8]>;


/// Result of parsing one of the eight header slots.
pub enum ParsedSlot {
    /// The slot named a recognized category; here is its offset table.
    Table(Category, CategoryTable),
    /// The slot's tag was `ID_NONE` or `ID_PALETTE`: intentionally empty, not an error.
    Skipped,
    /// The slot's tag was not recognized. Logged by the caller, not fatal.
    UnknownTag(u32),
}

/// Parse the per-category index table at absolute offset `offset`.
///
/// Per spec §4.3: seeks to `offset`, reads the category tag, and if it names
/// a known category, reads `pointer_count` absolute offsets after validating
/// `byte_count == 4*pointer_count + 8`. A validation failure returns `Err`;
/// the caller (the container constructor) is responsible for demoting that
/// to an empty table and continuing with the remaining slots.
pub fn read_index_table<R: Read + Seek>(cursor: &mut ByteCursor<R>, offset: u32) -> Result<ParsedSlot> {
    cursor.seek(u64::from(offset))?;
    let category_tag = cursor.read_u32()?;

    if category_tag == format::ID_NONE || category_tag == format::ID_PALETTE {
        return Ok(ParsedSlot::Skipped);
    }

    let category = match Category::from_tag(category_tag) {
        Some(category) => category,
        None => return Ok(ParsedSlot::UnknownTag(category_tag)),
    };

    let byte_count = cursor.read_u16()?;
    let pointer_count = cursor.read_u16()?;

    let expected_byte_count = 4_u32 * u32::from(pointer_count) + 8;
    if u32::from(byte_count) != expected_byte_count {
        return Err(Error::format_mismatch(format!(
            "index table at offset {}: byte_count {} does not match 4*pointer_count+8 ({})",
            offset, byte_count, expected_byte_count
        )));
    }

    let mut table: CategoryTable = SmallVec::with_capacity(usize::from(pointer_count));
    for _ in 0..pointer_count {
        table.push(cursor.read_u32()?);
    }

    Ok(ParsedSlot::Table(category, table))
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn table_bytes(tag: u32, pointers: &[u32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&tag.to_le_bytes());
        let byte_count = (4 * pointers.len() + 8) as u16;
        bytes.extend_from_slice(&byte_count.to_le_bytes());
        bytes.extend_from_slice(&(pointers.len() as u16).to_le_bytes());
        for pointer in pointers {
            bytes.extend_from_slice(&pointer.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn reads_body_table() {
        let bytes = table_bytes(format::ID_SETTLERS, &[10, 20, 30]);
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        match read_index_table(&mut cursor, 0).unwrap() {
            ParsedSlot::Table(Category::Body, table) => assert_eq!(table.as_slice(), [10, 20, 30]),
            _ => panic!("expected a Body table"),
        }
    }

    #[test]
    fn empty_table_is_allowed() {
        let bytes = table_bytes(format::ID_LANDSCAPE, &[]);
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        match read_index_table(&mut cursor, 0).unwrap() {
            ParsedSlot::Table(Category::Landscape, table) => assert!(table.is_empty()),
            _ => panic!("expected an empty Landscape table"),
        }
    }

    #[test]
    fn none_and_palette_tags_are_skipped() {
        for tag in [format::ID_NONE, format::ID_PALETTE] {
            let bytes = table_bytes(tag, &[1, 2, 3]);
            let mut cursor = ByteCursor::new(Cursor::new(bytes));
            assert!(matches!(read_index_table(&mut cursor, 0).unwrap(), ParsedSlot::Skipped));
        }
    }

    #[test]
    fn unknown_tag_is_reported_not_fatal() {
        let bytes = table_bytes(0xDEAD_BEEF, &[1]);
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        match read_index_table(&mut cursor, 0).unwrap() {
            ParsedSlot::UnknownTag(tag) => assert_eq!(tag, 0xDEAD_BEEF),
            _ => panic!("expected UnknownTag"),
        }
    }

    #[test]
    fn mismatched_byte_count_is_format_mismatch() {
        let mut bytes = table_bytes(format::ID_SETTLERS, &[1, 2]);
        // byte_count is at offset 4..6; corrupt it to `4*N+4` as spec's boundary test describes
        bytes[4] -= 4;
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        let result = read_index_table(&mut cursor, 0);
        assert!(matches!(result, Err(Error::FormatMismatch(_))));
    }
}
