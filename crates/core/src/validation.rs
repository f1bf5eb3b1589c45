// SPDX-License-Identifier: MIT
// Copyright (c) 2026 The AIM Authors

//! Character-class validation for identifiers accepted from the HTTP surface.

/// A valid project ID is lowercase alphanumeric plus hyphen and underscore,
/// matching the URL character class the HTTP surface accepts.
pub fn is_valid_project_id(project_id: &str) -> bool {
    !project_id.is_empty()
        && project_id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_alphanumeric_with_separators() {
        assert!(is_valid_project_id("my-app_1"));
    }

    #[test]
    fn rejects_empty_string() {
        assert!(!is_valid_project_id(""));
    }

    #[test]
    fn rejects_uppercase_and_other_characters() {
        assert!(!is_valid_project_id("MyApp"));
        assert!(!is_valid_project_id("app.name"));
        assert!(!is_valid_project_id("app/name"));
    }
}
