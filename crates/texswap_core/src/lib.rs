//! Converts PS2 texture replacement dumps between regional releases of a game.
//!
//! A [`MappingTable`] tells which source file becomes which destination file
//! for each language variant. Files the table does not know are renamed with
//! the positional rule in [`fallback`].

pub mod error;
pub mod fallback;
pub mod language;
pub mod mapping;
pub mod resolver;
pub mod swap;

pub use error::{FallbackError, FileError, LanguageError, MappingError, SwapError};
pub use fallback::{fallback_name, FallbackMode};
pub use language::Language;
pub use mapping::{Ambiguity, Claim, MappingEntry, MappingMatch, MappingTable};
pub use resolver::{resolve_file_name, Origin, Resolution, Resolver, SkipReason};
pub use swap::{swap_textures, CopiedFile, SkippedFile, SwapOptions, SwapReport};
