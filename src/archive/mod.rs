pub mod listing;
pub mod reader;

pub use listing::ArchiveListing;
pub use reader::{Archive, ArchiveReader};
