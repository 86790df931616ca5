#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod progress;
pub mod resolver;

pub use academy_core::Clock;

pub use app_services::AppServices;
pub use error::AppServicesError;
pub use progress::{
    ModuleProgressView, PathOverview, ProgressService, SectionProgressView, SectionUpdate,
};
pub use resolver::{ContentRegistry, ContentSource, ResolvedContent, SectionContext};
