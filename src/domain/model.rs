use crate::domain::ports::StateStore;
use crate::utils::error::SearchError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// One course as it appears in a per-semester catalog file. Catalog files
/// are sparse; every field tolerates absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub exam_links: Vec<String>,
}

impl CourseInfo {
    /// Distinct lecturer names across all groups, sorted. Group lecturer
    /// strings may hold several names joined by ", ".
    pub fn lecturers(&self) -> BTreeSet<&str> {
        self.groups
            .iter()
            .filter_map(|g| g.lecturer.as_deref())
            .filter(|l| !l.is_empty())
            .flat_map(|l| l.split(", "))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    #[serde(default)]
    pub moed: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub hour: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub lecturer: Option<String>,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub day: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub room: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Course number → course, for one (year, semester) catalog file. BTreeMap
/// keeps the scan order deterministic across searches.
pub type SemesterCatalog = BTreeMap<String, CourseInfo>;

/// A teaching semester. The catalog files use the code ("a"/"b"), the UI
/// state uses the Hebrew label, the university's own form uses "1"/"2".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Semester {
    A,
    B,
}

impl Semester {
    /// Descending by label, so year-major iteration yields newest-first.
    pub const DESCENDING: [Semester; 2] = [Semester::B, Semester::A];

    pub fn label(self) -> &'static str {
        match self {
            Semester::A => "א׳",
            Semester::B => "ב׳",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Semester::A => "a",
            Semester::B => "b",
        }
    }

    pub fn university_code(self) -> &'static str {
        match self {
            Semester::A => "1",
            Semester::B => "2",
        }
    }

    pub fn parse(s: &str) -> Option<Semester> {
        match s {
            "a" | "א׳" | "א" => Some(Semester::A),
            "b" | "ב׳" | "ב" => Some(Semester::B),
            _ => None,
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Semester {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Semester::parse(s).ok_or_else(|| SearchError::InvalidConfigValue {
            field: "semester".to_string(),
            value: s.to_string(),
            reason: "Expected א׳/ב׳ or a/b".to_string(),
        })
    }
}

/// User-entered search filters. Empty string means "no filter". Each field
/// maps 1:1 onto a state-store key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    pub year: String,
    pub semester: String,
    pub lecturer: String,
    pub course_name: String,
    pub course_number: String,
    pub faculty: String,
    pub building: String,
    pub room: String,
}

impl SearchCriteria {
    pub const STATE_KEYS: [&'static str; 8] = [
        "year",
        "semester",
        "lecturer",
        "courseName",
        "courseNumber",
        "faculty",
        "building",
        "room",
    ];

    pub fn from_state<S: StateStore + ?Sized>(store: &S) -> Self {
        Self {
            year: store.get("year"),
            semester: store.get("semester"),
            lecturer: store.get("lecturer"),
            course_name: store.get("courseName"),
            course_number: store.get("courseNumber"),
            faculty: store.get("faculty"),
            building: store.get("building"),
            room: store.get("room"),
        }
    }

    pub fn write_state<S: StateStore + ?Sized>(&self, store: &mut S) {
        store.set("year", &self.year);
        store.set("semester", &self.semester);
        store.set("lecturer", &self.lecturer);
        store.set("courseName", &self.course_name);
        store.set("courseNumber", &self.course_number);
        store.set("faculty", &self.faculty);
        store.set("building", &self.building);
        store.set("room", &self.room);
    }

    pub fn is_unconstrained(&self) -> bool {
        self.year.is_empty()
            && self.semester.is_empty()
            && self.lecturer.is_empty()
            && self.course_name.is_empty()
            && self.course_number.is_empty()
            && self.faculty.is_empty()
            && self.building.is_empty()
            && self.room.is_empty()
    }
}

/// One matching course, tagged with the catalog it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub course_id: String,
    pub year: String,
    pub semester: Semester,
    pub course: CourseInfo,
}

/// Replaces any prior result set entirely; the generation token orders
/// result sets produced by overlapping searches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    pub generation: u64,
    pub matches: Vec<Match>,
    pub failed_pairs: usize,
}

/// One course in the all-time aggregate index (`courses.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub faculty: String,
    #[serde(default)]
    pub lecturers: Vec<String>,
}

/// Deduplicated, sorted suggestion lists for interactive completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutocompleteIndex {
    pub course_numbers: Vec<String>,
    pub course_names: Vec<String>,
    pub lecturers: Vec<String>,
    pub faculties: Vec<String>,
}

impl AutocompleteIndex {
    pub fn from_courses(courses: &BTreeMap<String, CourseSummary>) -> Self {
        let mut course_names = BTreeSet::new();
        let mut lecturers = BTreeSet::new();
        let mut faculties = BTreeSet::new();
        for course in courses.values() {
            if !course.name.is_empty() {
                course_names.insert(course.name.clone());
            }
            if !course.faculty.is_empty() {
                faculties.insert(course.faculty.clone());
            }
            for lecturer in &course.lecturers {
                if !lecturer.is_empty() {
                    lecturers.insert(lecturer.clone());
                }
            }
        }
        Self {
            // BTreeMap keys are already unique and sorted.
            course_numbers: courses.keys().cloned().collect(),
            course_names: course_names.into_iter().collect(),
            lecturers: lecturers.into_iter().collect(),
            faculties: faculties.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.course_numbers.is_empty()
            && self.course_names.is_empty()
            && self.lecturers.is_empty()
            && self.faculties.is_empty()
    }
}

/// One grade-distribution entry for a (course, semester key, group).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeRecord {
    #[serde(default)]
    pub moed: i64,
    #[serde(default)]
    pub distribution: Vec<f64>,
    #[serde(default)]
    pub limits: Vec<f64>,
}

/// Course number → semester key → group → grade entries (`grades.json`).
pub type GradesIndex = BTreeMap<String, BTreeMap<String, BTreeMap<String, Vec<GradeRecord>>>>;

/// General catalog metadata (`info.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoIndex {
    #[serde(default)]
    pub semesters: Vec<String>,
}

impl InfoIndex {
    /// Years appearing in the known semester keys ("2025a" → "2025"),
    /// deduplicated and sorted descending.
    pub fn years_descending(&self) -> Vec<String> {
        let years: BTreeSet<String> = self
            .semesters
            .iter()
            .map(|key| key.trim_end_matches(|c: char| c.is_ascii_alphabetic()))
            .filter(|year| year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .collect();
        years.into_iter().rev().collect()
    }
}
