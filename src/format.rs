//! Fixed literals and tag constants that define the container's on-disk layout.

/// The fixed 33-byte literal that opens every DAT container.
pub const FILE_START1: [u8; 33] = [
    0x53, 0x45, 0x54, 0x54, 0x4C, 0x45, 0x52, 0x53, 0x44, 0x41, 0x54, 0x34, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// The fixed 10-byte literal following the pixel-format magic.
pub const FILE_START2: [u8; 10] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x48, 0x44, 0x52, 0x00];

/// The fixed 12-byte literal closing the header, just before the per-category tables.
pub const FILE_HEADER_END: [u8; 12] =
    [0x45, 0x4E, 0x44, 0x4F, 0x46, 0x48, 0x45, 0x41, 0x44, 0x45, 0x52, 0x00];

/// The fixed 7-byte literal opening every sequence header.
pub const SEQUENCE_START: [u8; 7] = [0x02, 0x14, 0x00, 0x00, 0x08, 0x00, 0x00];

/// Category tag carrying "no data here" - the slot is skipped without error.
pub const ID_NONE: u32 = 0x1904;

/// Category tag carrying palette data - out of this core's scope, skipped without error.
pub const ID_PALETTE: u32 = 0x2607;

pub const ID_SETTLERS: u32 = 0x106;
pub const ID_TORSOS: u32 = 0x3112;
pub const ID_LANDSCAPE: u32 = 0x2412;
pub const ID_SHADOWS: u32 = 0x5982;
pub const ID_GUIS: u32 = 0x11306;
pub const ID_ANIMATIONINFO: u32 = 0x21702;


/// One of the eight header slots a DAT container reserves for per-category
/// index tables. Two slots carry no category this core recognizes; they are
/// kept as named variants so a slot index always maps to a `Category` rather
/// than a raw integer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Category {
    Body,
    Torso,
    Shadow,
    Landscape,
    Gui,
    AnimationScript,
    Unused1,
    Unused2,
}

impl Category {
    /// All eight header slots, in header order.
    pub const ALL: [Category; 8] = [
        Category::Body, Category::Torso, Category::Shadow, Category::Landscape,
        Category::Gui, Category::AnimationScript, Category::Unused1, Category::Unused2,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&category| category == self).unwrap()
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Body => "body",
            Category::Torso => "torso",
            Category::Shadow => "shadow",
            Category::Landscape => "landscape",
            Category::Gui => "gui",
            Category::AnimationScript => "animation_script",
            Category::Unused1 => "unused1",
            Category::Unused2 => "unused2",
        }
    }

    /// Map an on-disk category tag to a `Category`, if this core recognizes it.
    /// `ID_NONE` and `ID_PALETTE` intentionally have no mapping: the caller
    /// must special-case them before calling this (see `IndexTableParser`).
    pub fn from_tag(tag: u32) -> Option<Category> {
        match tag {
            ID_SETTLERS => Some(Category::Body),
            ID_TORSOS => Some(Category::Torso),
            ID_SHADOWS => Some(Category::Shadow),
            ID_LANDSCAPE => Some(Category::Landscape),
            ID_GUIS => Some(Category::Gui),
            ID_ANIMATIONINFO => Some(Category::AnimationScript),
            _ => None,
        }
    }
}


/// Pixel-format discriminator. Each variant carries the 2-byte "start magic"
/// injected into the header literal sequence (spec §4.2 step 2) and selects
/// which translator a `Container` hands a given frame payload to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DatFileType {
    /// Original 16-bit RGB555-style Settlers II bitmaps.
    Settlers4,
    /// The remastered "Settlers II (History Edition)" bitmap layout.
    SettlersHistoryEdition,
}

impl DatFileType {
    /// The 2-byte magic this variant expects between `FILE_START1` and `FILE_START2`.
    pub fn start_magic(self) -> [u8; 2] {
        match self {
            DatFileType::Settlers4 => [0x00, 0x00],
            DatFileType::SettlersHistoryEdition => [0x01, 0x00],
        }
    }
}
