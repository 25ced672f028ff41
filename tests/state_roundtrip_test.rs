use course_search::{QueryStateStore, SearchCriteria, StateStore};

#[test]
fn test_year_round_trips_through_the_query_string() {
    let mut store = QueryStateStore::with_standard_fields();
    store.set("year", "2024");

    let reloaded = QueryStateStore::from_query(&store.query_string());
    assert_eq!(reloaded.get("year"), "2024");
}

#[test]
fn test_default_value_deletes_the_parameter() {
    let mut store = QueryStateStore::with_standard_fields();
    store.set("year", "2024");
    store.set("sortBy", "courseName");
    store.set("year", "2025");
    store.set("sortBy", "semesterDescending");

    assert_eq!(store.query_string(), "");
    assert_eq!(store.get("year"), "2025");
    assert_eq!(store.get("sortBy"), "semesterDescending");
}

#[test]
fn test_criteria_bind_to_state_keys_one_to_one() {
    let mut store = QueryStateStore::with_standard_fields();
    let criteria = SearchCriteria {
        year: "2024".to_string(),
        semester: "ב׳".to_string(),
        lecturer: "דוד כהן".to_string(),
        course_name: "אלגברה".to_string(),
        course_number: "0366".to_string(),
        faculty: "מדעים".to_string(),
        building: "אורנשטיין".to_string(),
        room: "111".to_string(),
    };
    criteria.write_state(&mut store);

    let reloaded = QueryStateStore::from_query(&store.query_string());
    assert_eq!(SearchCriteria::from_state(&reloaded), criteria);
}

#[test]
fn test_back_walks_through_search_states() {
    let mut store = QueryStateStore::with_standard_fields();
    store.set("lecturer", "כהן");
    store.set("semester", "א׳");

    assert_eq!(store.get("semester"), "א׳");
    assert!(store.back());
    assert_eq!(store.get("semester"), "");
    assert_eq!(store.get("lecturer"), "כהן");
    assert!(store.back());
    assert_eq!(store.get("lecturer"), "");
    assert!(!store.back());
}

#[test]
fn test_empty_query_means_idle_start() {
    let store = QueryStateStore::from_query("");
    assert!(!store.has_explicit_params());
    assert!(SearchCriteria::from_state(&store).year == "2025");
}
