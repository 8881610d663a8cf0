//! Domain Services
//!
//! Path translation between platform conventions and checkpoint discovery.

mod checkpoint_locator;
mod path_translator;

pub use checkpoint_locator::{mark_checkpoint, CheckpointRootLocator, CHECKPOINT_MARKER};
pub use path_translator::{strip_file_scheme, PathTranslator};
