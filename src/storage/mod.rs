//! Draft persistence
//!
//! The wizard only sees the [`DraftStore`] trait; any durable medium can
//! sit behind it.

mod file;
mod memory;
mod traits;

pub use file::FileDraftStore;
pub use memory::MemoryDraftStore;
pub use traits::DraftStore;

#[cfg(test)]
pub use traits::MockDraftStore;
