use clap::Parser;
use course_search::config::DEFAULT_BASE_URL;
use course_search::utils::validation::Validate;
use course_search::{CliConfig, ProfileConfig, Settings};
use std::io::Write;
use tempfile::NamedTempFile;

fn profile_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_profile_file_fills_unset_settings() {
    let file = profile_file(
        r#"
        [catalog]
        base_url = "https://mirror.example.com/courses"
        years = ["2024", "2023"]

        [search]
        concurrent_requests = 8
        "#,
    );

    let profile = ProfileConfig::load(file.path()).unwrap();
    let cli = CliConfig::parse_from(["course-search", "--lecturer", "כהן"]);
    let settings = Settings::resolve(&cli, Some(&profile));

    assert_eq!(settings.base_url, "https://mirror.example.com/courses");
    assert_eq!(settings.years, vec!["2024", "2023"]);
    assert_eq!(settings.concurrent_requests, 8);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_explicit_flags_win_over_the_profile() {
    let file = profile_file(
        r#"
        [catalog]
        base_url = "https://mirror.example.com/courses"

        [search]
        concurrent_requests = 8
        "#,
    );

    let profile = ProfileConfig::load(file.path()).unwrap();
    let cli = CliConfig::parse_from([
        "course-search",
        "--base-url",
        "https://other.example.com/courses",
        "--concurrent-requests",
        "2",
        "--years",
        "2025",
    ]);
    let settings = Settings::resolve(&cli, Some(&profile));

    assert_eq!(settings.base_url, "https://other.example.com/courses");
    assert_eq!(settings.years, vec!["2025"]);
    assert_eq!(settings.concurrent_requests, 2);
}

#[test]
fn test_builtin_defaults_apply_without_a_profile() {
    let cli = CliConfig::parse_from(["course-search"]);
    let settings = Settings::resolve(&cli, None);

    assert_eq!(settings.base_url, DEFAULT_BASE_URL);
    assert!(settings.years.is_empty());
    assert_eq!(settings.concurrent_requests, 5);
}

#[test]
fn test_malformed_profile_is_an_error() {
    let file = profile_file("[catalog\nbase_url = 3");
    assert!(ProfileConfig::load(file.path()).is_err());
}

#[test]
fn test_missing_profile_file_is_an_error() {
    assert!(ProfileConfig::load(std::path::Path::new("/nonexistent/profile.toml")).is_err());
}
