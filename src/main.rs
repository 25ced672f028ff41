use clap::Parser;
use course_search::adapters::university::{university_form_fields, UNIVERSITY_SEARCH_URL};
use course_search::config::profile::ProfileConfig;
use course_search::core::loader::{suggest, SuggestField};
use course_search::core::GradesIndex;
use course_search::utils::{logger, validation::Validate};
use course_search::{
    sort_results, CatalogLoader, CliConfig, ConfigProvider, FetchCache, HttpFetcher, Match,
    QueryStateStore, ResultBoard, SearchCriteria, SearchEngine, Settings, SortMethod, StateStore,
};
use std::sync::Arc;
use std::time::Instant;

const RESULTS_PER_PAGE: usize = 10;
const SUGGEST_LIMIT: usize = 20;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting course-search");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let profile = match &cli.profile {
        Some(path) => Some(ProfileConfig::load(path)?),
        None => None,
    };
    let settings = Settings::resolve(&cli, profile.as_ref());
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // The query string is the source of truth for search state; individual
    // flags are applied on top of it as explicit sets.
    let mut state = match &cli.query {
        Some(query) => QueryStateStore::from_query(query),
        None => QueryStateStore::with_standard_fields(),
    };

    let criteria_flags = [
        ("year", &cli.year),
        ("semester", &cli.semester),
        ("lecturer", &cli.lecturer),
        ("courseName", &cli.course_name),
        ("courseNumber", &cli.course_number),
        ("faculty", &cli.faculty),
        ("building", &cli.building),
        ("room", &cli.room),
    ];
    let mut flagged = false;
    for (key, flag) in criteria_flags {
        if let Some(value) = flag {
            state.set(key, value);
            flagged = true;
        }
    }
    if let Some(sort_by) = &cli.sort_by {
        state.set("sortBy", sort_by);
    }
    if let Some(page) = cli.page {
        state.set("page", &page.to_string());
    }
    if cli.only_with_exams {
        state.set("showOnlyWithExams", "true");
    }
    let requested_search = flagged || state.has_explicit_params();

    let cache = Arc::new(FetchCache::new(HttpFetcher::new()));
    let loader = CatalogLoader::new(Arc::clone(&cache), settings.base_url.clone());
    let criteria = SearchCriteria::from_state(&state);

    if let Some(field) = &cli.suggest {
        let field: SuggestField = field.parse()?;
        let needle = match field {
            SuggestField::Lecturer => &criteria.lecturer,
            SuggestField::CourseName => &criteria.course_name,
            SuggestField::CourseNumber => &criteria.course_number,
            SuggestField::Faculty => &criteria.faculty,
        };
        tracing::info!("Loading the all-time course index for completions...");
        let index = loader.load_autocomplete().await;
        for completion in suggest(&index, field, needle, SUGGEST_LIMIT) {
            println!("{}", completion);
        }
        return Ok(());
    }

    if cli.show_university_form {
        println!("POST {}", UNIVERSITY_SEARCH_URL);
        for (name, value) in university_form_fields(&criteria) {
            println!("  {}={}", name, value);
        }
        return Ok(());
    }

    if !requested_search {
        println!("No search criteria given; pass filter flags or --query to search.");
        return Ok(());
    }

    let years = if settings.years().is_empty() {
        loader.known_years().await
    } else {
        settings.years().to_vec()
    };
    if !cli.skip_warm_up {
        tracing::info!("Prefetching {} catalog years to speed up the search...", years.len());
        loader.warm_up(&years).await;
    }

    let engine = SearchEngine::from_config(Arc::clone(&cache), &settings, years);

    let started = Instant::now();
    let result = engine.search(&criteria).await?;
    let elapsed = started.elapsed();

    let mut board = ResultBoard::default();
    board.publish(result);
    if board.failed_pairs() > 0 {
        tracing::warn!(
            "{} semester catalogs could not be fetched; results are partial",
            board.failed_pairs()
        );
    }

    let mut matches = board.into_matches();
    if state.get("showOnlyWithExams") == "true" {
        matches.retain(|m| !m.course.exam_links.is_empty());
    }

    let sort_method: SortMethod = state.get("sortBy").parse()?;
    let matches = sort_results(matches, sort_method);

    if matches.is_empty() {
        println!("לא נמצאו תוצאות.");
        return Ok(());
    }

    let page: usize = state.get("page").parse().unwrap_or(1).max(1);
    let total_pages = matches.len().div_ceil(RESULTS_PER_PAGE);

    println!(
        "מספר תוצאות: {} (זמן חיפוש: {:.2}s)",
        matches.len(),
        elapsed.as_secs_f64()
    );
    if total_pages > 1 {
        println!("עמוד {} מתוך {}", page.min(total_pages), total_pages);
    }

    let grades = if cli.with_grades {
        Some(loader.load_grades().await)
    } else {
        None
    };

    for result in matches
        .iter()
        .skip(RESULTS_PER_PAGE * (page - 1))
        .take(RESULTS_PER_PAGE)
    {
        print_card(result, grades.as_ref());
    }

    Ok(())
}

fn print_card(result: &Match, grades: Option<&GradesIndex>) {
    let course = &result.course;
    println!();
    println!(
        "{} ({}) [{} {}]",
        course.name, course.faculty, result.year, result.semester
    );

    let lecturers: Vec<&str> = course.lecturers().into_iter().collect();
    if !lecturers.is_empty() {
        println!("מרצים: {}", lecturers.join(", "));
    }

    for exam in &course.exams {
        println!("מועד {}': {} ב-{}", exam.moed, exam.date, exam.hour);
    }

    if let Some(grades) = grades {
        let semester_key = format!("{}{}", result.year, result.semester.code());
        if let Some(groups) = grades
            .get(&result.course_id)
            .and_then(|semesters| semesters.get(&semester_key))
        {
            let entries: usize = groups.values().map(Vec::len).sum();
            if entries > 0 {
                println!("התפלגויות ציונים: {}", entries);
            }
        }
    }

    println!("{}", result.course_id);
}
