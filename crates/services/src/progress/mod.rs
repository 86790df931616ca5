mod service;
mod view;

// Public API of the progress subsystem.
pub use service::ProgressService;
pub use view::{ModuleProgressView, PathOverview, SectionProgressView, SectionUpdate};
