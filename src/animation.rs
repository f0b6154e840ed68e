//! Decodes the animation-script category into frame records and resolves
//! those records into composed actor images, possibly across files (spec §4.7).

use std::io::{Read, Seek};
use std::sync::Arc;
use crate::error::Result;
use crate::io::ByteCursor;
use crate::translator::Image;


/// A single line of an animation script: a position plus six cross-file
/// sequence/frame references (actor, torso, shadow) and two sound flags.
/// A pure value - it owns no data from any container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationRecord {
    pub pos_x: i16,
    pub pos_y: i16,
    pub object_id: u16,
    pub object_file: u16,
    pub torso_id: u16,
    pub torso_file: u16,
    pub shadow_id: u16,
    pub shadow_file: u16,
    pub object_frame: u16,
    pub torso_frame: u16,
    pub sound_flag_1: i16,
    pub sound_flag_2: i16,
}

/// A `torsoId`/`shadowId` value of `0xFFFF` means "no torso"; `0` also means
/// "no torso" (spec §8 scenario 6 and §4.7).
const TORSO_ID_NONE: u16 = 0;
const TORSO_ID_NONE_SENTINEL: u16 = 0xFFFF;

impl AnimationRecord {
    fn read<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<AnimationRecord> {
        Ok(AnimationRecord {
            pos_x: cursor.read_i16()?,
            pos_y: cursor.read_i16()?,
            object_id: cursor.read_u16()?,
            object_file: cursor.read_u16()?,
            torso_id: cursor.read_u16()?,
            torso_file: cursor.read_u16()?,
            shadow_id: cursor.read_u16()?,
            shadow_file: cursor.read_u16()?,
            object_frame: cursor.read_u16()?,
            torso_frame: cursor.read_u16()?,
            sound_flag_1: cursor.read_i16()?,
            sound_flag_2: cursor.read_i16()?,
        })
    }

    fn has_torso(&self) -> bool {
        self.torso_id != TORSO_ID_NONE && self.torso_id != TORSO_ID_NONE_SENTINEL
    }

    fn has_shadow(&self) -> bool {
        self.shadow_id > 0
    }
}

/// Read the animation script at the current cursor position: a `u32` record
/// count followed by that many 24-byte records. The on-disk order is
/// playback-reverse, so the returned vector is the element-wise reverse of
/// what was on disk (spec §4.7, preserved exactly per spec §9).
pub fn read_animation_script<R: Read + Seek>(cursor: &mut ByteCursor<R>) -> Result<Vec<AnimationRecord>> {
    let frame_count = cursor.read_u32()?;
    let mut records = Vec::with_capacity(frame_count as usize);

    for _ in 0..frame_count {
        records.push(AnimationRecord::read(cursor)?);
    }

    records.reverse();
    Ok(records)
}


/// Resolves a numeric `FileId` to the `Container` it names. Cross-file
/// animation resolution is modeled as an injected resolver rather than
/// global state, so containers never import each other transitively
/// (spec §9). The concurrency of the underlying map is the caller's concern.
pub trait FileResolver<T> {
    fn resolve(&self, file_id: u16) -> Option<Arc<crate::container::Container<T>>>;
}

/// The result of resolving one `AnimationRecord`: the actor body frame plus
/// whichever overlays were available. Each slot is an `Image`, so absence is
/// always an explicit `Image::Null` rather than a missing `Option`.
#[derive(Debug, Clone)]
pub struct ComposedActorFrame<T> {
    pub position: (i16, i16),
    pub actor: Arc<Image<T>>,
    pub torso: Arc<Image<T>>,
    pub shadow: Arc<Image<T>>,
}

/// Resolve an `AnimationRecord` into a composed image, per spec §4.7.
///
/// - The actor frame always comes from `objectFile`'s Body table at
///   `objectId`/`objectFrame`.
/// - The torso overlay is included only if `torsoId` is neither `0` nor
///   `0xFFFF`, the cross-file Torso table's `torsoId`-th (aligned) entry is
///   not the `-1` sentinel, and that sequence has enough frames.
/// - The shadow overlay uses `objectFrame` as its frame index (not
///   `torsoFrame`, a deliberate quirk preserved from the source format -
///   spec §9), and requires `shadowId > 0` plus a nonzero sequence offset.
///
/// Any cross-file reference that cannot be resolved is logged and the
/// corresponding slot becomes `Image::Null`; this never fails the call.
pub fn resolve_record<T>(
    record: &AnimationRecord,
    resolver: &dyn FileResolver<T>,
) -> ComposedActorFrame<T> {
    let actor = match resolver.resolve(record.object_file) {
        Some(container) => container.get_body_frame(record.object_id as usize, record.object_frame as usize),
        None => {
            eprintln!("dat: animation record references missing object file {}", record.object_file);
            Arc::new(Image::Null)
        }
    };

    let torso = if !record.has_torso() {
        Arc::new(Image::Null)
    } else {
        match resolver.resolve(record.torso_file) {
            Some(container) if container.has_aligned_torso_sequence(record.torso_id as usize) =>
                container.get_aligned_torso_frame(record.torso_id as usize, record.torso_frame as usize),
            Some(_) => {
                eprintln!("dat: animation record's torso sequence {} is absent (alignment sentinel)", record.torso_id);
                Arc::new(Image::Null)
            }
            None => {
                eprintln!("dat: animation record references missing torso file {}", record.torso_file);
                Arc::new(Image::Null)
            }
        }
    };

    // Deliberate: the shadow overlay reuses the object's frame index, not a
    // dedicated shadow frame index (spec §4.7, §9).
    let shadow = if !record.has_shadow() {
        Arc::new(Image::Null)
    } else {
        match resolver.resolve(record.shadow_file) {
            Some(container) if container.has_nonzero_shadow_sequence(record.shadow_id as usize) =>
                container.get_aligned_shadow_frame(record.shadow_id as usize, record.object_frame as usize),
            Some(_) => {
                eprintln!("dat: animation record's shadow sequence {} has a zero offset", record.shadow_id);
                Arc::new(Image::Null)
            }
            None => {
                eprintln!("dat: animation record references missing shadow file {}", record.shadow_file);
                Arc::new(Image::Null)
            }
        }
    };

    ComposedActorFrame { position: (record.pos_x, record.pos_y), actor, torso, shadow }
}
