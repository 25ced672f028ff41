use crate::domain::model::Match;
use crate::utils::error::SearchError;
use std::fmt;
use std::str::FromStr;

/// Result ordering strategy, stored in the `sortBy` state value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMethod {
    /// Identity: the engine already concatenates newest-first.
    #[default]
    SemesterDescending,
    SemesterAscending,
    CourseName,
    FacultyName,
}

impl SortMethod {
    pub const ALL: [SortMethod; 4] = [
        SortMethod::SemesterDescending,
        SortMethod::SemesterAscending,
        SortMethod::CourseName,
        SortMethod::FacultyName,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMethod::SemesterDescending => "semesterDescending",
            SortMethod::SemesterAscending => "semesterAscending",
            SortMethod::CourseName => "courseName",
            SortMethod::FacultyName => "facultyName",
        }
    }
}

impl fmt::Display for SortMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMethod {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| SearchError::InvalidConfigValue {
                field: "sortBy".to_string(),
                value: s.to_string(),
                reason: "Unknown sort method".to_string(),
            })
    }
}

/// Reorders a result set. `sort_by` is stable, so courses with equal keys
/// keep their engine-produced relative order.
pub fn sort_results(mut matches: Vec<Match>, method: SortMethod) -> Vec<Match> {
    match method {
        SortMethod::SemesterDescending => matches,
        SortMethod::SemesterAscending => {
            matches.reverse();
            matches
        }
        SortMethod::CourseName => {
            matches.sort_by(|a, b| a.course.name.cmp(&b.course.name));
            matches
        }
        SortMethod::FacultyName => {
            matches.sort_by(|a, b| a.course.faculty.cmp(&b.course.faculty));
            matches
        }
    }
}
