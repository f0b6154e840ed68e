

#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused_extern_crates,
    unused,

    missing_copy_implementations,
    missing_debug_implementations,

    clippy::all,
    clippy::pedantic,
)]

#![deny(
    unused_variables,
    unused_assignments,
    dead_code,
    unused_must_use,
    trivial_numeric_casts,
    redundant_semicolon
)]

#![forbid(unsafe_code)]

// TODO #![warn(missing_docs)]


pub mod io; // public to allow for custom attribute byte parsing

pub mod error;
pub mod format;
pub mod header;
pub mod category;
pub mod sequence;
pub mod translator;
pub mod composite;
pub mod animation;
pub mod container;

/// Re-exports of the types most callers need to open a container and read frames.
pub mod prelude {
    // main exports
    pub use crate::container::{Container, Translators};
    pub use crate::translator::{BitmapTranslator, Image};

    // secondary data types
    pub use crate::format::{Category, DatFileType};
    pub use crate::composite::CompositeFrame;
    pub use crate::animation::{AnimationRecord, ComposedActorFrame, FileResolver, resolve_record};

    pub use crate::error;
    pub use error::{Result, Error};
}



