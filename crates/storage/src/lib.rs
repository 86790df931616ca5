#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;
pub mod store;

pub use repository::{
    ModuleProgressRecord, PathProgressRecord, ProgressRepository, SectionProgressRecord, Storage,
    StorageError,
};
pub use store::ProgressStore;
