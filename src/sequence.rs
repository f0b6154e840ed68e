//! Parses a single sequence's frame-offset table (spec §4.4).

use std::io::{Read, Seek};
use crate::error::Result;
use crate::format::SEQUENCE_START;
use crate::io::ByteCursor;


/// Read the frame-offset vector for the sequence at absolute offset `sequence_offset`.
///
/// Per spec §4.4: the sequence header starts with the 7-byte `SEQUENCE_START`
/// literal, then a `u8` frame count, then that many `u32` deltas. Deltas are
/// relative to the sequence's own offset and are rebased here into absolute
/// file positions before being returned - callers never see the raw deltas.
pub fn read_frame_offsets<R: Read + Seek>(
    cursor: &mut ByteCursor<R>,
    sequence_offset: u32,
) -> Result<Vec<u32>> {
    cursor.seek(u64::from(sequence_offset))?;
    cursor.expect(&SEQUENCE_START, "sequence header START literal")?;

    let frame_count = cursor.read_u8()?;
    let mut frame_offsets = Vec::with_capacity(usize::from(frame_count));

    for _ in 0..frame_count {
        let delta = cursor.read_u32()?;
        frame_offsets.push(delta.wrapping_add(sequence_offset));
    }

    Ok(frame_offsets)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sequence_bytes(deltas: &[u32]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&SEQUENCE_START);
        bytes.push(deltas.len() as u8);
        for delta in deltas {
            bytes.extend_from_slice(&delta.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn rebases_deltas_onto_sequence_offset() {
        let bytes = sequence_bytes(&[0, 50, 120]);
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        let offsets = read_frame_offsets(&mut cursor, 1000).unwrap();
        assert_eq!(offsets, vec![1000, 1050, 1120]);
    }

    #[test]
    fn zero_frame_count_yields_empty_vector() {
        let bytes = sequence_bytes(&[]);
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        let offsets = read_frame_offsets(&mut cursor, 500).unwrap();
        assert!(offsets.is_empty());
    }

    #[test]
    fn rejects_wrong_start_literal() {
        let mut bytes = sequence_bytes(&[1]);
        bytes[0] ^= 0xFF;
        let mut cursor = ByteCursor::new(Cursor::new(bytes));
        assert!(read_frame_offsets(&mut cursor, 0).is_err());
    }
}
