use crate::domain::model::{SearchCriteria, Semester};

pub const UNIVERSITY_SEARCH_URL: &str = "https://www.ims.tau.ac.il/tal/kr/Search_L.aspx";

/// Field payload for the university's own search form. The university
/// counts academic years from their calendar start, hence the offset by
/// one. This is a one-way handoff: the caller POSTs it, no response is
/// consumed.
pub fn university_form_fields(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
    let year = criteria
        .year
        .parse::<i32>()
        .map(|y| (y - 1).to_string())
        .unwrap_or_default();
    let semester = Semester::parse(&criteria.semester)
        .map(|s| s.university_code().to_string())
        .unwrap_or_default();

    let mut fields = vec![
        ("lstYear1", year),
        ("ckSem", semester),
        ("txtShemMore", criteria.lecturer.clone()),
        ("txtShemKurs", criteria.course_name.clone()),
    ];
    if !criteria.course_number.is_empty() {
        fields.push(("txtKurs", criteria.course_number.clone()));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field<'a>(fields: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_year_is_offset_by_one() {
        let criteria = SearchCriteria {
            year: "2025".to_string(),
            ..Default::default()
        };
        let fields = university_form_fields(&criteria);
        assert_eq!(field(&fields, "lstYear1"), Some("2024"));
    }

    #[test]
    fn test_semester_uses_university_code() {
        let criteria = SearchCriteria {
            semester: "ב׳".to_string(),
            ..Default::default()
        };
        let fields = university_form_fields(&criteria);
        assert_eq!(field(&fields, "ckSem"), Some("2"));
    }

    #[test]
    fn test_empty_criteria_produce_blank_fields() {
        let fields = university_form_fields(&SearchCriteria::default());
        assert_eq!(field(&fields, "lstYear1"), Some(""));
        assert_eq!(field(&fields, "ckSem"), Some(""));
        assert_eq!(field(&fields, "txtShemMore"), Some(""));
        assert_eq!(field(&fields, "txtKurs"), None);
    }

    #[test]
    fn test_course_number_included_only_when_set() {
        let criteria = SearchCriteria {
            course_number: "0366-1101".to_string(),
            lecturer: "דוד כהן".to_string(),
            ..Default::default()
        };
        let fields = university_form_fields(&criteria);
        assert_eq!(field(&fields, "txtKurs"), Some("0366-1101"));
        assert_eq!(field(&fields, "txtShemMore"), Some("דוד כהן"));
    }
}
