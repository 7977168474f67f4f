pub mod resume;

pub use resume::{validate_year, EntryCategory, ResumeEntry, ResumeRecord};
