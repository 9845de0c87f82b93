//! File domain entities.

pub mod model;
pub mod projection;

pub use model::{CreateFileRecord, FileRecord};
pub use projection::FileSummary;
