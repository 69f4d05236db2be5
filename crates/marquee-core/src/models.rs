pub mod library;
pub mod media;

pub use library::{Bookmark, ContinueEntry, ListKind};
pub use media::{MediaKind, MediaRef};
