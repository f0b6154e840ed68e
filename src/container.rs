//! The catalog over a single DAT file: header, per-category index tables,
//! composite-frame assembly, and lazy translated-image caching (spec §4.5, §5).

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::animation::{self, AnimationRecord};
use crate::category::{self, CategoryTable, ParsedSlot};
use crate::composite::{self, CompositeFrame};
use crate::error::{Error, Result};
use crate::format::{Category, DatFileType};
use crate::header::Header;
use crate::io::ByteCursor;
use crate::sequence;
use crate::translator::{BitmapTranslator, Image};


/// The five bitmap decoders a `Container` needs, one per category that
/// carries pixel data. Held as trait objects so `Container` is generic only
/// over the decoded image type, not over five separate translator types.
pub struct Translators<T> {
    pub settler: Box<dyn BitmapTranslator<Output = T> + Send + Sync>,
    pub torso: Box<dyn BitmapTranslator<Output = T> + Send + Sync>,
    pub landscape: Box<dyn BitmapTranslator<Output = T> + Send + Sync>,
    pub shadow: Box<dyn BitmapTranslator<Output = T> + Send + Sync>,
    pub gui: Box<dyn BitmapTranslator<Output = T> + Send + Sync>,
}

/// Everything behind the single mutex: the shared cursor plus every lazy
/// cache. One critical region encloses seek, read, translate and cache
/// insertion for a frame, so two threads racing on the same frame never
/// decode it twice (spec §5).
struct Inner<T> {
    cursor: ByteCursor<BufReader<File>>,
    frame_cache: HashMap<(Category, u32), Arc<Image<T>>>,
    settler_cache: HashMap<usize, Arc<Vec<CompositeFrame<Arc<Image<T>>>>>>,
    animation_cache: HashMap<usize, Arc<Vec<AnimationRecord>>>,
}

/// A single opened DAT container: the parsed header, the eight per-category
/// index tables, and lazy access to every frame they name.
pub struct Container<T> {
    file_type: DatFileType,
    tables: [CategoryTable; 8],
    /// Torso offsets, right-aligned against the Body table per spec §4.6's
    /// policy. `None` is the "-1" no-overlay sentinel.
    aligned_torso: Vec<Option<u32>>,
    /// Shadow offsets, aligned the same way.
    aligned_shadow: Vec<Option<u32>>,
    translators: Translators<T>,
    inner: Mutex<Inner<T>>,
}

impl<T> Container<T> {
    /// Open and validate a DAT container at `path`.
    ///
    /// Per spec §4.8's partial-failure policy: a per-slot index table
    /// failure (an unrecognized tag, or a malformed table) is logged and
    /// demoted to an empty table rather than failing the whole open. Only a
    /// failure in the fixed preamble (`Header::read`) is fatal.
    pub fn open(
        path: impl AsRef<Path>,
        file_type: DatFileType,
        override_differences: bool,
        translators: Translators<T>,
    ) -> Result<Container<T>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let actual_file_length = file.metadata()?.len();
        let mut cursor = ByteCursor::new(BufReader::new(file));

        let header = Header::read(&mut cursor, file_type, actual_file_length)?;

        let mut tables: [CategoryTable; 8] = [
            CategoryTable::new(), CategoryTable::new(), CategoryTable::new(), CategoryTable::new(),
            CategoryTable::new(), CategoryTable::new(), CategoryTable::new(), CategoryTable::new(),
        ];

        for &slot_offset in &header.category_table_offsets {
            match category::read_index_table(&mut cursor, slot_offset) {
                Ok(ParsedSlot::Table(category, table)) => tables[category.index()] = table,
                Ok(ParsedSlot::Skipped) => {}
                Ok(ParsedSlot::UnknownTag(tag)) => {
                    eprintln!("dat: slot at offset {} names unrecognized category tag {:#x}, skipping", slot_offset, tag);
                }
                Err(err) => {
                    eprintln!("dat: slot at offset {} is malformed, demoting to empty: {}", slot_offset, err);
                }
            }
        }

        let body_len = tables[Category::Body.index()].len();
        let aligned_torso = composite::align_category_table(body_len, &tables[Category::Torso.index()], override_differences);
        let aligned_shadow = composite::align_category_table(body_len, &tables[Category::Shadow.index()], override_differences);

        Ok(Container {
            file_type,
            tables,
            aligned_torso,
            aligned_shadow,
            translators,
            inner: Mutex::new(Inner {
                cursor,
                frame_cache: HashMap::new(),
                settler_cache: HashMap::new(),
                animation_cache: HashMap::new(),
            }),
        })
    }

    /// Number of sequences recorded for `category`.
    pub fn sequence_count(&self, category: Category) -> usize {
        self.tables[category.index()].len()
    }

    /// Raw absolute frame offsets for a sequence, for tooling that wants to
    /// inspect the container without decoding pixels.
    pub fn raw_pointers(&self, category: Category, index: usize) -> Result<Vec<u64>> {
        let table = &self.tables[category.index()];
        let &sequence_offset = table.get(index).ok_or_else(|| Error::IndexOutOfRange {
            category: category.name(),
            index,
            len: table.len(),
        })?;

        let mut inner = self.inner.lock().unwrap();
        let offsets = sequence::read_frame_offsets(&mut inner.cursor, sequence_offset)?;
        Ok(offsets.into_iter().map(u64::from).collect())
    }

    fn translator_for(&self, category: Category) -> Option<&(dyn BitmapTranslator<Output = T> + Send + Sync)> {
        match category {
            Category::Body => Some(self.translators.settler.as_ref()),
            Category::Torso => Some(self.translators.torso.as_ref()),
            Category::Landscape => Some(self.translators.landscape.as_ref()),
            Category::Shadow => Some(self.translators.shadow.as_ref()),
            Category::Gui => Some(self.translators.gui.as_ref()),
            Category::AnimationScript | Category::Unused1 | Category::Unused2 => None,
        }
    }

    /// Decode (or fetch from cache) the frame payload at `absolute_offset`.
    /// Any failure - a bad seek, a translator rejection - is logged and
    /// absorbed into `Image::Null` (spec §4.8); this never returns an error.
    fn decode_payload_at(&self, inner: &mut Inner<T>, category: Category, absolute_offset: u32) -> Arc<Image<T>> {
        let key = (category, absolute_offset);
        if let Some(cached) = inner.frame_cache.get(&key) {
            return cached.clone();
        }

        let image = match inner.cursor.seek(u64::from(absolute_offset)) {
            Err(err) => {
                eprintln!("dat: failed to seek to {} frame at offset {}: {}", category.name(), absolute_offset, err);
                Image::Null
            }
            Ok(()) => match self.translator_for(category) {
                None => Image::Null,
                Some(translator) => match translator.translate(inner.cursor.as_read(), self.file_type) {
                    Ok(value) => Image::Decoded(value),
                    Err(message) => {
                        eprintln!("dat: translator rejected {} frame at offset {}: {}", category.name(), absolute_offset, message);
                        Image::Null
                    }
                },
            },
        };

        let arc = Arc::new(image);
        inner.frame_cache.insert(key, arc.clone());
        arc
    }

    /// Decode sequence `seq_index`, frame `frame_index` of `category`.
    /// Out of range, or any read failure along the way, yields `Image::Null`.
    fn decode_frame(&self, category: Category, seq_index: usize, frame_index: usize) -> Arc<Image<T>> {
        let mut inner = self.inner.lock().unwrap();

        let &sequence_offset = match self.tables[category.index()].get(seq_index) {
            Some(offset) => offset,
            None => return Arc::new(Image::Null),
        };

        let frame_offsets = match sequence::read_frame_offsets(&mut inner.cursor, sequence_offset) {
            Ok(offsets) => offsets,
            Err(err) => {
                eprintln!("dat: failed to read {} sequence {}: {}", category.name(), seq_index, err);
                return Arc::new(Image::Null);
            }
        };

        let &frame_offset = match frame_offsets.get(frame_index) {
            Some(offset) => offset,
            None => return Arc::new(Image::Null),
        };

        self.decode_payload_at(&mut inner, category, frame_offset)
    }

    /// Decode Body sequence `seq`, frame `frame`. Used directly by animation
    /// record resolution (spec §4.7), and indirectly by `get_settler_sequence`.
    pub fn get_body_frame(&self, seq: usize, frame: usize) -> Arc<Image<T>> {
        self.decode_frame(Category::Body, seq, frame)
    }

    /// Decode Torso sequence `seq`, frame `frame`, indexing the raw Torso
    /// category table directly (not the §4.6-aligned view). For cross-file
    /// animation resolution, where `torsoId` addresses the aligned table,
    /// use `get_aligned_torso_frame` instead.
    pub fn get_torso_frame(&self, seq: usize, frame: usize) -> Arc<Image<T>> {
        self.decode_frame(Category::Torso, seq, frame)
    }

    /// Decode Shadow sequence `seq`, frame `frame`, indexing the raw Shadow
    /// category table directly (not the §4.6-aligned view). For cross-file
    /// animation resolution, where `shadowId` addresses the aligned table,
    /// use `get_aligned_shadow_frame` instead.
    pub fn get_shadow_frame(&self, seq: usize, frame: usize) -> Arc<Image<T>> {
        self.decode_frame(Category::Shadow, seq, frame)
    }

    /// Decode the Torso frame that aligned index `torso_id` names, per the
    /// §4.6 alignment policy. Unlike `get_torso_frame`, `torso_id` addresses
    /// `aligned_torso` (the view animation records and the composite
    /// assembler both use), not the raw Torso category table - the two
    /// diverge whenever the alignment policy has shifted entries. Absent
    /// (sentinel) entries and out-of-range frames both yield `Image::Null`.
    pub fn get_aligned_torso_frame(&self, torso_id: usize, frame: usize) -> Arc<Image<T>> {
        self.decode_aligned_frame(Category::Torso, &self.aligned_torso, torso_id, frame)
    }

    /// Decode the Shadow frame that aligned index `shadow_id` names, per the
    /// §4.6 alignment policy. See `get_aligned_torso_frame` for why this
    /// differs from `get_shadow_frame`.
    pub fn get_aligned_shadow_frame(&self, shadow_id: usize, frame: usize) -> Arc<Image<T>> {
        self.decode_aligned_frame(Category::Shadow, &self.aligned_shadow, shadow_id, frame)
    }

    fn decode_aligned_frame(&self, category: Category, aligned: &[Option<u32>], index: usize, frame_index: usize) -> Arc<Image<T>> {
        let sequence_offset = match aligned.get(index).copied().flatten() {
            Some(offset) => offset,
            None => return Arc::new(Image::Null),
        };

        let mut inner = self.inner.lock().unwrap();
        let frame_offsets = match sequence::read_frame_offsets(&mut inner.cursor, sequence_offset) {
            Ok(offsets) => offsets,
            Err(err) => {
                eprintln!("dat: failed to read aligned {} sequence at offset {}: {}", category.name(), sequence_offset, err);
                return Arc::new(Image::Null);
            }
        };

        let &frame_offset = match frame_offsets.get(frame_index) {
            Some(offset) => offset,
            None => return Arc::new(Image::Null),
        };

        self.decode_payload_at(&mut inner, category, frame_offset)
    }

    /// A Landscape sequence holds exactly one image; decode it.
    pub fn get_landscape(&self, index: usize) -> Arc<Image<T>> {
        self.decode_frame(Category::Landscape, index, 0)
    }

    pub fn try_get_landscape(&self, index: usize) -> Result<Arc<Image<T>>> {
        self.checked(Category::Landscape, index).map(|()| self.get_landscape(index))
    }

    /// A Gui sequence holds exactly one image; decode it.
    pub fn get_gui(&self, index: usize) -> Arc<Image<T>> {
        self.decode_frame(Category::Gui, index, 0)
    }

    pub fn try_get_gui(&self, index: usize) -> Result<Arc<Image<T>>> {
        self.checked(Category::Gui, index).map(|()| self.get_gui(index))
    }

    fn checked(&self, category: Category, index: usize) -> Result<()> {
        let len = self.tables[category.index()].len();
        if index >= len {
            Err(Error::IndexOutOfRange { category: category.name(), index, len })
        } else {
            Ok(())
        }
    }

    /// Whether aligned Torso sequence `torso_id` exists (is not the `-1`
    /// alignment sentinel). Used by animation record resolution (spec §4.7);
    /// does not by itself guarantee a requested frame index exists.
    pub fn has_aligned_torso_sequence(&self, torso_id: usize) -> bool {
        matches!(self.aligned_torso.get(torso_id), Some(Some(_)))
    }

    /// Whether aligned Shadow sequence `shadow_id` exists and has a nonzero
    /// offset (spec §4.7's "missing file offset of 0" rule).
    pub fn has_nonzero_shadow_sequence(&self, shadow_id: usize) -> bool {
        matches!(self.aligned_shadow.get(shadow_id), Some(Some(offset)) if *offset != 0)
    }

    /// Assemble (or fetch from cache) every Body frame of sequence `index`
    /// with its Torso and Shadow overlays attached where present (spec §4.6).
    /// An out-of-range index yields an empty sequence, not an error.
    pub fn get_settler_sequence(&self, index: usize) -> Arc<Vec<CompositeFrame<Arc<Image<T>>>>> {
        let body_len = self.tables[Category::Body.index()].len();
        if index >= body_len {
            return Arc::new(Vec::new());
        }

        let mut inner = self.inner.lock().unwrap();
        if let Some(cached) = inner.settler_cache.get(&index) {
            return cached.clone();
        }

        let frames = self.build_settler_sequence(&mut inner, index);
        let arc = Arc::new(frames);
        inner.settler_cache.insert(index, arc.clone());
        arc
    }

    pub fn try_get_settler_sequence(&self, index: usize) -> Result<Arc<Vec<CompositeFrame<Arc<Image<T>>>>>> {
        self.checked(Category::Body, index).map(|()| self.get_settler_sequence(index))
    }

    fn build_settler_sequence(&self, inner: &mut Inner<T>, index: usize) -> Vec<CompositeFrame<Arc<Image<T>>>> {
        let body_offset = self.tables[Category::Body.index()][index];
        let body_frame_offsets = match sequence::read_frame_offsets(&mut inner.cursor, body_offset) {
            Ok(offsets) => offsets,
            Err(err) => {
                eprintln!("dat: failed to read body sequence {}: {}", index, err);
                return Vec::new();
            }
        };

        let torso_frame_offsets = self.aligned_torso.get(index).copied().flatten().and_then(|offset| {
            sequence::read_frame_offsets(&mut inner.cursor, offset)
                .map_err(|err| eprintln!("dat: failed to read torso overlay for body sequence {}: {}", index, err))
                .ok()
        });

        let shadow_frame_offsets = self.aligned_shadow.get(index).copied().flatten()
            .filter(|&offset| offset != 0)
            .and_then(|offset| {
                sequence::read_frame_offsets(&mut inner.cursor, offset)
                    .map_err(|err| eprintln!("dat: failed to read shadow overlay for body sequence {}: {}", index, err))
                    .ok()
            });

        let zipped = composite::zip_frame_offsets(
            &body_frame_offsets,
            torso_frame_offsets.as_deref(),
            shadow_frame_offsets.as_deref(),
        );

        zipped.into_iter().map(|frame| CompositeFrame {
            body: self.decode_payload_at(inner, Category::Body, frame.body),
            torso: frame.torso.map(|offset| self.decode_payload_at(inner, Category::Torso, offset)),
            shadow: frame.shadow.map(|offset| self.decode_payload_at(inner, Category::Shadow, offset)),
        }).collect()
    }

    /// Decode (or fetch from cache) the animation script at sequence `index`.
    /// Per spec §4.7: the record order on disk is reversed before being
    /// returned. A read failure is logged and absorbed into an empty script.
    pub fn get_animation_script(&self, index: usize) -> Arc<Vec<AnimationRecord>> {
        let table = &self.tables[Category::AnimationScript.index()];
        let &offset = match table.get(index) {
            Some(offset) => offset,
            None => return Arc::new(Vec::new()),
        };

        let mut inner = self.inner.lock().unwrap();
        if let Some(cached) = inner.animation_cache.get(&index) {
            return cached.clone();
        }

        let result = inner.cursor.seek(u64::from(offset)).and_then(|()| animation::read_animation_script(&mut inner.cursor));

        let records = match result {
            Ok(records) => records,
            Err(err) => {
                eprintln!("dat: failed to read animation script {}: {}", index, err);
                Vec::new()
            }
        };

        let arc = Arc::new(records);
        inner.animation_cache.insert(index, arc.clone());
        arc
    }

    pub fn try_get_animation_script(&self, index: usize) -> Result<Arc<Vec<AnimationRecord>>> {
        self.checked(Category::AnimationScript, index).map(|()| self.get_animation_script(index))
    }
}
