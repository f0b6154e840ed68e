//! Builds composite actor frames from parallel Body/Torso/Shadow tables (spec §4.6).

use crate::category::CategoryTable;


/// A Body frame with optional Torso and Shadow overlays. `T` is the frame's
/// representation at whatever stage this appears: a raw file offset while
/// resolving which frames to decode, or a decoded `Image` once the
/// container has run the bitmap translators over them.
#[derive(Debug, Clone)]
pub struct CompositeFrame<T> {
    pub body: T,
    pub torso: Option<T>,
    pub shadow: Option<T>,
}


/// Right-align a shorter overlay table (Torso or Shadow) against the Body
/// table, per spec §4.6's alignment policy and §9's rationale (the
/// authoring tool appended new body sequences without extending the
/// overlay tables).
///
/// Returns a vector of length `body_table_len`: index `k` is the overlay
/// table's offset for body sequence `k`, or `None` (the "-1" sentinel) if
/// no overlay exists for that body sequence.
///
/// When `override_differences` is false, no alignment is performed: body
/// sequence `k` maps directly to overlay table index `k`, so only the
/// overlapping index range ever has an overlay (spec §8 boundary test).
pub fn align_category_table(
    body_table_len: usize,
    overlay_table: &CategoryTable,
    override_differences: bool,
) -> Vec<Option<u32>> {
    let overlay_len = overlay_table.len();

    if override_differences && overlay_len < body_table_len {
        let diff = body_table_len - overlay_len;
        let mut aligned = Vec::with_capacity(body_table_len);
        aligned.extend(std::iter::repeat(None).take(diff));
        aligned.extend(overlay_table.iter().map(|&offset| Some(offset)));
        aligned
    } else {
        (0..body_table_len).map(|index| overlay_table.get(index).copied()).collect()
    }
}


/// Zip a body sequence's frame offsets with its (possibly absent) torso and
/// shadow frame offsets, per spec §4.6 steps 2-4. A body frame beyond the
/// overlay table's length has no overlay attached; this is not an error.
pub fn zip_frame_offsets(
    body_frame_offsets: &[u32],
    torso_frame_offsets: Option<&[u32]>,
    shadow_frame_offsets: Option<&[u32]>,
) -> Vec<CompositeFrame<u32>> {
    body_frame_offsets.iter().enumerate()
        .map(|(index, &body_offset)| CompositeFrame {
            body: body_offset,
            torso: torso_frame_offsets.and_then(|table| table.get(index).copied()),
            shadow: shadow_frame_offsets.and_then(|table| table.get(index).copied()),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_differences_right_aligns_shorter_table() {
        // Body has 5 sequences, Torso only has 3: the first 2 body sequences get no torso.
        let torso_table: CategoryTable = CategoryTable::from_slice(&[10, 20, 30]);
        let aligned = align_category_table(5, &torso_table, true);

        assert_eq!(aligned, vec![None, None, Some(10), Some(20), Some(30)]);
    }

    #[test]
    fn without_override_only_overlap_range_has_overlay() {
        let torso_table: CategoryTable = CategoryTable::from_slice(&[10, 20, 30]);
        let aligned = align_category_table(5, &torso_table, false);

        assert_eq!(aligned, vec![Some(10), Some(20), Some(30), None, None]);
    }

    #[test]
    fn overlay_table_at_least_as_long_as_body_is_unaffected_by_the_flag() {
        let torso_table: CategoryTable = CategoryTable::from_slice(&[10, 20, 30, 40, 50, 60]);

        let with_override = align_category_table(4, &torso_table, true);
        let without_override = align_category_table(4, &torso_table, false);

        assert_eq!(with_override, vec![Some(10), Some(20), Some(30), Some(40)]);
        assert_eq!(with_override, without_override);
    }

    #[test]
    fn zip_attaches_overlays_only_within_their_tables_length() {
        let body = vec![1, 2, 3, 4];
        let torso = vec![11, 12];
        let shadow = vec![21, 22, 23];

        let frames = zip_frame_offsets(&body, Some(&torso), Some(&shadow));

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].torso, Some(11));
        assert_eq!(frames[1].torso, Some(12));
        assert_eq!(frames[2].torso, None);
        assert_eq!(frames[3].torso, None);

        assert_eq!(frames[0].shadow, Some(21));
        assert_eq!(frames[2].shadow, Some(23));
        assert_eq!(frames[3].shadow, None);
    }

    #[test]
    fn zip_with_no_overlay_table_leaves_every_frame_bare() {
        let body = vec![1, 2, 3];
        let frames = zip_frame_offsets(&body, None, None);

        assert!(frames.iter().all(|frame| frame.torso.is_none() && frame.shadow.is_none()));
    }
}
