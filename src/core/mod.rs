pub mod cache;
pub mod loader;
pub mod search;
pub mod sort;

pub use crate::domain::model::{
    AutocompleteIndex, CourseInfo, GradesIndex, InfoIndex, Match, SearchCriteria, SearchResult,
    Semester, SemesterCatalog,
};
pub use crate::domain::ports::{ConfigProvider, Fetch, StateStore};
pub use crate::utils::error::Result;
