use crate::core::cache::FetchCache;
use crate::core::search::{contains_all_tokens, contains_ci};
use crate::domain::model::{
    AutocompleteIndex, CourseSummary, GradesIndex, InfoIndex, Semester,
};
use crate::domain::ports::Fetch;
use crate::utils::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

/// Catalog years to fall back on when `info.json` is unreachable.
const FALLBACK_YEARS: [&str; 7] = ["2025", "2024", "2023", "2022", "2021", "2020", "2019"];

pub fn courses_url(base_url: &str, year: &str, semester: Semester) -> String {
    format!("{}/courses-{}{}.json", base_url, year, semester.code())
}

/// Fetches the catalog's side files (all-time index, metadata, grades) and
/// warms the shared cache so interactive searches hit memory.
///
/// Everything here is best-effort: a missing side file degrades to an empty
/// index and the app keeps working.
pub struct CatalogLoader<F: Fetch + 'static> {
    cache: Arc<FetchCache<F>>,
    base_url: String,
}

impl<F: Fetch + 'static> CatalogLoader<F> {
    pub fn new(cache: Arc<FetchCache<F>>, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            base_url: base_url.into(),
        }
    }

    pub async fn load_autocomplete(&self) -> AutocompleteIndex {
        match self.fetch_autocomplete().await {
            Ok(index) => index,
            Err(err) => {
                tracing::warn!("Autocomplete index unavailable: {}", err);
                AutocompleteIndex::default()
            }
        }
    }

    async fn fetch_autocomplete(&self) -> Result<AutocompleteIndex> {
        let url = format!("{}/courses.json", self.base_url);
        let value = self.cache.get(&url).await?;
        let courses = BTreeMap::<String, CourseSummary>::deserialize(&*value)?;
        Ok(AutocompleteIndex::from_courses(&courses))
    }

    pub async fn load_info(&self) -> InfoIndex {
        let url = format!("{}/info.json", self.base_url);
        match self.fetch_info(&url).await {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!("Catalog metadata unavailable: {}", err);
                InfoIndex::default()
            }
        }
    }

    async fn fetch_info(&self, url: &str) -> Result<InfoIndex> {
        let value = self.cache.get(url).await?;
        Ok(InfoIndex::deserialize(&*value)?)
    }

    /// Known catalog years, newest first. Derived from `info.json` when
    /// reachable, otherwise the built-in span.
    pub async fn known_years(&self) -> Vec<String> {
        let years = self.load_info().await.years_descending();
        if years.is_empty() {
            FALLBACK_YEARS.iter().map(|y| y.to_string()).collect()
        } else {
            years
        }
    }

    /// Prefetch every (year, semester) catalog through the cache. Failures
    /// are swallowed; returns how many catalogs were actually warmed.
    pub async fn warm_up(&self, years: &[String]) -> usize {
        let mut fetches = Vec::with_capacity(years.len() * Semester::DESCENDING.len());
        for year in years {
            for semester in Semester::DESCENDING {
                let url = courses_url(&self.base_url, year, semester);
                fetches.push(async move { self.cache.get(&url).await });
            }
        }

        let total = fetches.len();
        let warmed = futures::future::join_all(fetches)
            .await
            .into_iter()
            .filter(|outcome| {
                if let Err(err) = outcome {
                    tracing::debug!("Warm-up fetch skipped: {}", err);
                }
                outcome.is_ok()
            })
            .count();
        tracing::debug!("Warmed {}/{} semester catalogs", warmed, total);
        warmed
    }

    pub async fn load_grades(&self) -> GradesIndex {
        let url = format!("{}/grades.json", self.base_url);
        match self.fetch_grades(&url).await {
            Ok(grades) => grades,
            Err(err) => {
                tracing::warn!("Grades dataset unavailable: {}", err);
                GradesIndex::default()
            }
        }
    }

    async fn fetch_grades(&self, url: &str) -> Result<GradesIndex> {
        let value = self.cache.get(url).await?;
        Ok(GradesIndex::deserialize(&*value)?)
    }
}

/// Suggestion list selector for interactive completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestField {
    Lecturer,
    CourseName,
    CourseNumber,
    Faculty,
}

impl FromStr for SuggestField {
    type Err = crate::utils::error::SearchError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lecturer" => Ok(SuggestField::Lecturer),
            "course-name" | "courseName" => Ok(SuggestField::CourseName),
            "course-number" | "courseNumber" => Ok(SuggestField::CourseNumber),
            "faculty" => Ok(SuggestField::Faculty),
            other => Err(crate::utils::error::SearchError::InvalidConfigValue {
                field: "suggest".to_string(),
                value: other.to_string(),
                reason: "Expected lecturer, course-name, course-number or faculty".to_string(),
            }),
        }
    }
}

/// Up to `limit` completions for a partially typed value. Lecturer names
/// match when they contain every entered token in any order; the other
/// fields use a plain case-insensitive substring match.
pub fn suggest<'a>(
    index: &'a AutocompleteIndex,
    field: SuggestField,
    query: &str,
    limit: usize,
) -> Vec<&'a str> {
    let (candidates, tokenized): (&[String], bool) = match field {
        SuggestField::Lecturer => (&index.lecturers, true),
        SuggestField::CourseName => (&index.course_names, false),
        SuggestField::CourseNumber => (&index.course_numbers, false),
        SuggestField::Faculty => (&index.faculties, false),
    };

    let mut results = Vec::new();
    for candidate in candidates {
        if results.len() >= limit {
            break;
        }
        let hit = if tokenized {
            contains_all_tokens(candidate, query)
        } else {
            contains_ci(candidate, query)
        };
        if hit {
            results.push(candidate.as_str());
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::SearchError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;

    struct MapFetcher {
        responses: HashMap<String, Value>,
    }

    impl MapFetcher {
        fn new(entries: Vec<(&str, Value)>) -> Self {
            Self {
                responses: entries
                    .into_iter()
                    .map(|(url, value)| (url.to_string(), value))
                    .collect(),
            }
        }
    }

    #[async_trait]
    impl Fetch for MapFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value> {
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| SearchError::Fetch {
                    url: url.to_string(),
                    reason: "not found".to_string(),
                })
        }
    }

    fn loader_with(entries: Vec<(&str, Value)>) -> CatalogLoader<MapFetcher> {
        let cache = Arc::new(FetchCache::new(MapFetcher::new(entries)));
        CatalogLoader::new(cache, "http://x")
    }

    #[tokio::test]
    async fn test_autocomplete_from_all_time_index() {
        let loader = loader_with(vec![(
            "http://x/courses.json",
            json!({
                "0366-1101": {
                    "name": "חדו״א 1",
                    "faculty": "מדעים מדויקים",
                    "lecturers": ["דוד כהן", "אבי לוי"]
                },
                "0366-2102": {
                    "name": "אלגברה",
                    "faculty": "מדעים מדויקים",
                    "lecturers": ["דוד כהן"]
                }
            }),
        )]);

        let index = loader.load_autocomplete().await;
        assert_eq!(index.course_numbers, vec!["0366-1101", "0366-2102"]);
        assert_eq!(index.course_names, vec!["אלגברה", "חדו״א 1"]);
        assert_eq!(index.lecturers, vec!["אבי לוי", "דוד כהן"]);
        assert_eq!(index.faculties, vec!["מדעים מדויקים"]);
    }

    #[tokio::test]
    async fn test_autocomplete_degrades_to_empty() {
        let loader = loader_with(vec![]);
        let index = loader.load_autocomplete().await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn test_known_years_from_info() {
        let loader = loader_with(vec![(
            "http://x/info.json",
            json!({ "semesters": ["2024a", "2024b", "2025a"] }),
        )]);
        assert_eq!(loader.known_years().await, vec!["2025", "2024"]);
    }

    #[tokio::test]
    async fn test_known_years_falls_back_when_info_is_down() {
        let loader = loader_with(vec![]);
        let years = loader.known_years().await;
        assert_eq!(years.first().map(String::as_str), Some("2025"));
        assert_eq!(years.len(), FALLBACK_YEARS.len());
    }

    #[tokio::test]
    async fn test_warm_up_is_best_effort() {
        // Only one of the four catalogs exists; warm-up must not error.
        let loader = loader_with(vec![("http://x/courses-2025b.json", json!({}))]);
        let warmed = loader
            .warm_up(&["2025".to_string(), "2024".to_string()])
            .await;
        assert_eq!(warmed, 1);
    }

    #[tokio::test]
    async fn test_load_grades() {
        let loader = loader_with(vec![(
            "http://x/grades.json",
            json!({
                "0366-1101": {
                    "2024a": {
                        "01": [
                            { "moed": 1, "distribution": [0.0, 2.0, 5.0], "limits": [0.0, 60.0, 100.0] }
                        ]
                    }
                }
            }),
        )]);

        let grades = loader.load_grades().await;
        let entries = &grades["0366-1101"]["2024a"]["01"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].moed, 1);
        assert_eq!(entries[0].distribution, vec![0.0, 2.0, 5.0]);
    }

    #[test]
    fn test_suggest_lecturer_tokens_in_any_order() {
        let index = AutocompleteIndex {
            lecturers: vec!["דוד כהן".to_string(), "דוד לוי".to_string()],
            ..Default::default()
        };
        assert_eq!(
            suggest(&index, SuggestField::Lecturer, "כהן דוד", 20),
            vec!["דוד כהן"]
        );
    }

    #[test]
    fn test_suggest_respects_limit() {
        let index = AutocompleteIndex {
            course_names: (0..30).map(|i| format!("קורס {}", i)).collect(),
            ..Default::default()
        };
        assert_eq!(suggest(&index, SuggestField::CourseName, "קורס", 20).len(), 20);
    }
}
