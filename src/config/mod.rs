pub mod profile;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://arazim-project.com/courses";
pub const DEFAULT_CONCURRENT_REQUESTS: usize = 5;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "course-search")]
#[command(about = "Search publicly hosted university course catalogs")]
pub struct CliConfig {
    /// Raw query string, e.g. "year=2024&lecturer=%D7%9B%D7%94%D7%9F"
    /// (a shared deep link); individual flags override its fields.
    #[arg(long)]
    pub query: Option<String>,

    #[arg(long)]
    pub year: Option<String>,

    /// Semester label (א׳/ב׳) or code (a/b).
    #[arg(long)]
    pub semester: Option<String>,

    /// Lecturer name tokens, in any order.
    #[arg(long)]
    pub lecturer: Option<String>,

    #[arg(long)]
    pub course_name: Option<String>,

    #[arg(long)]
    pub course_number: Option<String>,

    #[arg(long)]
    pub faculty: Option<String>,

    #[arg(long)]
    pub building: Option<String>,

    #[arg(long)]
    pub room: Option<String>,

    /// semesterDescending, semesterAscending, courseName or facultyName.
    #[arg(long)]
    pub sort_by: Option<String>,

    #[arg(long)]
    pub page: Option<usize>,

    #[arg(long, help = "Show only courses with published exam material")]
    pub only_with_exams: bool,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub years: Vec<String>,

    #[arg(long)]
    pub concurrent_requests: Option<usize>,

    /// TOML profile file; explicit flags win over it.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FIELD",
        help = "Print completions for lecturer, course-name, course-number or faculty"
    )]
    pub suggest: Option<String>,

    #[arg(long, help = "Annotate result cards with grade-distribution counts")]
    pub with_grades: bool,

    #[arg(long, help = "Print the university search form payload instead of searching")]
    pub show_university_form: bool,

    #[arg(long, help = "Skip prefetching all semester catalogs")]
    pub skip_warm_up: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Resolved runtime settings: CLI flag, then profile file, then built-in
/// default.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub years: Vec<String>,
    pub concurrent_requests: usize,
}

impl Settings {
    #[cfg(feature = "cli")]
    pub fn resolve(cli: &CliConfig, profile: Option<&profile::ProfileConfig>) -> Self {
        let catalog = profile.and_then(|p| p.catalog.as_ref());
        let search = profile.and_then(|p| p.search.as_ref());
        Self {
            base_url: cli
                .base_url
                .clone()
                .or_else(|| catalog.and_then(|c| c.base_url.clone()))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            years: if !cli.years.is_empty() {
                cli.years.clone()
            } else {
                catalog.and_then(|c| c.years.clone()).unwrap_or_default()
            },
            concurrent_requests: cli
                .concurrent_requests
                .or_else(|| search.and_then(|s| s.concurrent_requests))
                .unwrap_or(DEFAULT_CONCURRENT_REQUESTS),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            years: Vec::new(),
            concurrent_requests: DEFAULT_CONCURRENT_REQUESTS,
        }
    }
}

impl ConfigProvider for Settings {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn years(&self) -> &[String] {
        &self.years
    }

    fn concurrent_requests(&self) -> usize {
        self.concurrent_requests
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("base_url", &self.base_url)?;
        validation::validate_positive_number(
            "concurrent_requests",
            self.concurrent_requests,
            1,
        )?;
        for year in &self.years {
            validation::validate_year("years", year)?;
        }
        Ok(())
    }
}
