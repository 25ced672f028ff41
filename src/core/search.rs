use crate::core::cache::FetchCache;
use crate::core::loader::courses_url;
use crate::domain::model::{
    CourseInfo, Lesson, Match, SearchCriteria, SearchResult, Semester, SemesterCatalog,
};
use crate::domain::ports::{ConfigProvider, Fetch};
use crate::utils::error::Result;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// True when `haystack` contains every whitespace-separated token of
/// `query`, in any order.
pub(crate) fn contains_all_tokens(haystack: &str, query: &str) -> bool {
    let haystack = haystack.to_lowercase();
    query
        .split_whitespace()
        .all(|token| haystack.contains(&token.to_lowercase()))
}

fn any_lesson(course: &CourseInfo, pred: impl Fn(&Lesson) -> bool) -> bool {
    course
        .groups
        .iter()
        .flat_map(|group| &group.lessons)
        .any(pred)
}

/// All active filters must pass; filters with an empty criterion are
/// skipped. The lecturer rule is AND-of-tokens over OR-of-lecturers:
/// names are commonly entered family-first or given-first, so token order
/// must not matter.
pub(crate) fn matches_criteria(
    course_id: &str,
    course: &CourseInfo,
    criteria: &SearchCriteria,
) -> bool {
    if !criteria.course_name.is_empty() && !contains_ci(&course.name, &criteria.course_name) {
        return false;
    }
    if !criteria.course_number.is_empty() && !contains_ci(course_id, &criteria.course_number) {
        return false;
    }
    if !criteria.faculty.is_empty() && !contains_ci(&course.faculty, &criteria.faculty) {
        return false;
    }
    if !criteria.building.is_empty()
        && !any_lesson(course, |lesson| contains_ci(&lesson.building, &criteria.building))
    {
        return false;
    }
    if !criteria.room.is_empty()
        && !any_lesson(course, |lesson| contains_ci(&lesson.room, &criteria.room))
    {
        return false;
    }
    if !criteria.lecturer.is_empty() {
        let found = course
            .groups
            .iter()
            .filter_map(|group| group.lecturer.as_deref())
            .flat_map(|lecturer| lecturer.split(", "))
            .any(|name| contains_all_tokens(name, &criteria.lecturer));
        if !found {
            return false;
        }
    }
    true
}

/// Filters semester catalogs against user criteria.
///
/// Candidate (year, semester) pairs are fixed up-front and their fetches
/// run through an ordered bounded stream, so the concatenated result order
/// is the deterministic pair order regardless of network timing. A failed
/// pair contributes nothing and never aborts its siblings.
pub struct SearchEngine<F: Fetch + 'static> {
    cache: Arc<FetchCache<F>>,
    base_url: String,
    years: Vec<String>,
    concurrency: usize,
    generation: AtomicU64,
}

impl<F: Fetch + 'static> SearchEngine<F> {
    pub fn new(
        cache: Arc<FetchCache<F>>,
        base_url: impl Into<String>,
        years: Vec<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            cache,
            base_url: base_url.into(),
            years,
            concurrency,
            generation: AtomicU64::new(0),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(
        cache: Arc<FetchCache<F>>,
        config: &C,
        years: Vec<String>,
    ) -> Self {
        Self::new(
            cache,
            config.base_url(),
            years,
            config.concurrent_requests(),
        )
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult> {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;

        let years: Vec<String> = if criteria.year.is_empty() {
            self.years.clone()
        } else {
            vec![criteria.year.clone()]
        };
        let semesters: Vec<Semester> = if criteria.semester.is_empty() {
            Semester::DESCENDING.to_vec()
        } else {
            vec![criteria.semester.parse()?]
        };

        let mut pairs = Vec::with_capacity(years.len() * semesters.len());
        for year in &years {
            for semester in &semesters {
                pairs.push((year.clone(), *semester));
            }
        }

        let fetches: Vec<_> = pairs
            .iter()
            .map(|(year, semester)| self.pair_matches(year.clone(), *semester, criteria))
            .collect();
        let outcomes = stream::iter(fetches)
            .buffered(self.concurrency.max(1))
            .collect::<Vec<_>>()
            .await;

        let mut matches = Vec::new();
        let mut failed_pairs = 0;
        for ((year, semester), outcome) in pairs.iter().zip(outcomes) {
            match outcome {
                Ok(mut pair_matches) => matches.append(&mut pair_matches),
                Err(err) => {
                    failed_pairs += 1;
                    tracing::warn!("Skipping {} {}: {}", year, semester, err);
                }
            }
        }

        tracing::debug!(
            "Search generation {} matched {} courses ({} failed catalogs)",
            generation,
            matches.len(),
            failed_pairs
        );
        Ok(SearchResult {
            generation,
            matches,
            failed_pairs,
        })
    }

    async fn pair_matches(
        &self,
        year: String,
        semester: Semester,
        criteria: &SearchCriteria,
    ) -> Result<Vec<Match>> {
        let url = courses_url(&self.base_url, &year, semester);
        let value = self.cache.get(&url).await?;
        let catalog = SemesterCatalog::deserialize(&*value)?;
        Ok(catalog
            .into_iter()
            .filter(|(course_id, course)| matches_criteria(course_id, course, criteria))
            .map(|(course_id, course)| Match {
                course_id,
                year: year.clone(),
                semester,
                course,
            })
            .collect())
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

/// Holds the latest accepted result set. Searches are never cancelled, so
/// a slow one can finish after its successor; publishing rejects any
/// result whose generation is not strictly newer than the last accepted.
#[derive(Debug, Default)]
pub struct ResultBoard {
    latest_generation: u64,
    matches: Vec<Match>,
    failed_pairs: usize,
}

impl ResultBoard {
    pub fn publish(&mut self, result: SearchResult) -> bool {
        if result.generation <= self.latest_generation {
            tracing::debug!(
                "Discarding stale search generation {} (latest {})",
                result.generation,
                self.latest_generation
            );
            return false;
        }
        self.latest_generation = result.generation;
        self.matches = result.matches;
        self.failed_pairs = result.failed_pairs;
        true
    }

    pub fn generation(&self) -> u64 {
        self.latest_generation
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn failed_pairs(&self) -> usize {
        self.failed_pairs
    }

    pub fn into_matches(self) -> Vec<Match> {
        self.matches
    }
}
