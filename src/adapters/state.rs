use crate::domain::ports::StateStore;
use std::collections::BTreeMap;
use url::form_urlencoded;

/// Every persisted UI field and its default. A field whose stored value
/// equals its default is dropped from the query string, keeping shared
/// URLs canonical and short.
pub const STANDARD_FIELDS: [(&str, &str); 14] = [
    ("year", "2025"),
    ("semester", ""),
    ("lecturer", ""),
    ("courseName", ""),
    ("courseNumber", ""),
    ("faculty", ""),
    ("building", ""),
    ("room", ""),
    ("compactView", "false"),
    ("showOnlyWithExams", "false"),
    ("showTAUFactor", "false"),
    ("sortBy", "semesterDescending"),
    ("page", "1"),
    ("edit", ""),
];

/// Query-string-backed key-value store. The query string is the sole
/// persisted state; every `set` pushes a new entry onto a history stack so
/// `back` can walk through earlier search states, mirroring browser
/// history navigation.
#[derive(Debug, Clone)]
pub struct QueryStateStore {
    defaults: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    history: Vec<String>,
}

impl QueryStateStore {
    pub fn new() -> Self {
        Self {
            defaults: BTreeMap::new(),
            values: BTreeMap::new(),
            history: vec![String::new()],
        }
    }

    pub fn with_standard_fields() -> Self {
        let mut store = Self::new();
        for (name, default) in STANDARD_FIELDS {
            store.register(name, default);
        }
        store
    }

    pub fn from_query(query: &str) -> Self {
        let mut store = Self::with_standard_fields();
        store.load_query(query);
        store
    }

    pub fn register(&mut self, name: &str, default: &str) {
        self.defaults.insert(name.to_string(), default.to_string());
    }

    /// Replace the whole state from a query string (initial page load or a
    /// shared deep link). Resets history to this single state.
    pub fn load_query(&mut self, query: &str) {
        self.apply_query(query);
        self.history = vec![self.query_string()];
    }

    fn apply_query(&mut self, query: &str) {
        self.values.clear();
        let raw = query.trim_start_matches('?');
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            self.values.insert(key.into_owned(), value.into_owned());
        }
    }

    /// Canonical query string: sorted keys, percent-encoded.
    pub fn query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.values {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }

    /// True when any parameter is explicitly present; a freshly opened app
    /// with an empty query string starts idle.
    pub fn has_explicit_params(&self) -> bool {
        !self.values.is_empty()
    }

    /// Step back to the previous history entry, restoring its state.
    pub fn back(&mut self) -> bool {
        if self.history.len() <= 1 {
            return false;
        }
        self.history.pop();
        let previous = self.history.last().cloned().unwrap_or_default();
        self.apply_query(&previous);
        true
    }
}

impl Default for QueryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for QueryStateStore {
    fn get(&self, name: &str) -> String {
        self.values
            .get(name)
            .or_else(|| self.defaults.get(name))
            .cloned()
            .unwrap_or_default()
    }

    fn set(&mut self, name: &str, value: &str) {
        let default = self.defaults.get(name).map(String::as_str).unwrap_or("");
        if value == default {
            self.values.remove(name);
        } else {
            self.values.insert(name.to_string(), value.to_string());
        }
        let query = self.query_string();
        self.history.push(query);
    }
}
