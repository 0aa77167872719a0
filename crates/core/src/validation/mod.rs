//! Rule-based validation of engine findings.
//!
//! Each [`ValidationKind`] checks one property of an [`Issue`]. The
//! full ordered list is [`IssueValidations::validations`].

mod location;

use serde_json::Value;
use std::path::{Component, Path, PathBuf};

use crate::domain::Issue;

/// Categories an issue may be filed under.
pub const CATEGORIES: &[&str] = &[
    "Bug Risk",
    "Clarity",
    "Compatibility",
    "Complexity",
    "Duplication",
    "Performance",
    "Security",
    "Style",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationKind {
    Category,
    CheckNamePresence,
    DescriptionPresence,
    LocationFormat,
    OtherLocationsFormat,
    PathExistence,
    PathIsFile,
    PathPresence,
    RelativePath,
    Type,
}

impl ValidationKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Category => "CategoryValidation",
            Self::CheckNamePresence => "CheckNamePresenceValidation",
            Self::DescriptionPresence => "DescriptionPresenceValidation",
            Self::LocationFormat => "LocationFormatValidation",
            Self::OtherLocationsFormat => "OtherLocationsFormatValidation",
            Self::PathExistence => "PathExistenceValidation",
            Self::PathIsFile => "PathIsFileValidation",
            Self::PathPresence => "PathPresenceValidation",
            Self::RelativePath => "RelativePathValidation",
            Self::Type => "TypeValidation",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Category => "Category must be at least one of the allowed categories",
            Self::CheckNamePresence => "Check name must be present",
            Self::DescriptionPresence => "Description must be present",
            Self::LocationFormat => "Location is not formatted correctly",
            Self::OtherLocationsFormat => "Other locations are not formatted correctly",
            Self::PathExistence => "File does not exist",
            Self::PathIsFile => "Path is not a file",
            Self::PathPresence => "Path must be present",
            Self::RelativePath => "Path must be relative to the project directory",
            Self::Type => "Type field must be 'issue'",
        }
    }

    /// Run this check against `issue`, resolving paths under `root`.
    pub fn is_valid(&self, issue: &Issue, root: &Path) -> bool {
        match self {
            Self::Category => has_valid_categories(issue),
            Self::CheckNamePresence => is_present(issue.get("check_name")),
            Self::DescriptionPresence => is_present(issue.get("description")),
            Self::LocationFormat => issue
                .location()
                .map(location::is_valid_location)
                .unwrap_or(false),
            Self::OtherLocationsFormat => match issue.get("other_locations") {
                None => true,
                Some(Value::Array(locations)) => locations.iter().all(location::is_valid_location),
                Some(_) => false,
            },
            Self::PathExistence => issue
                .path()
                .map(|path| root.join(path).exists())
                .unwrap_or(false),
            Self::PathIsFile => issue
                .path()
                .map(|path| root.join(path).is_file())
                .unwrap_or(false),
            Self::PathPresence => issue.path().map(|path| !path.is_empty()).unwrap_or(false),
            Self::RelativePath => issue.path().map(stays_relative).unwrap_or(false),
            Self::Type => issue.is_issue(),
        }
    }
}

/// A failed check, as reported for an invalid issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub kind: ValidationKind,
    pub message: &'static str,
}

/// Applies every [`ValidationKind`] to issues produced for one source tree.
#[derive(Debug, Clone)]
pub struct IssueValidations {
    root: PathBuf,
}

impl IssueValidations {
    const ALL: [ValidationKind; 10] = [
        ValidationKind::Category,
        ValidationKind::CheckNamePresence,
        ValidationKind::DescriptionPresence,
        ValidationKind::LocationFormat,
        ValidationKind::OtherLocationsFormat,
        ValidationKind::PathExistence,
        ValidationKind::PathIsFile,
        ValidationKind::PathPresence,
        ValidationKind::RelativePath,
        ValidationKind::Type,
    ];

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// All validation kinds, in the order they are applied.
    pub fn validations() -> &'static [ValidationKind] {
        &Self::ALL
    }

    /// Every failing check for `issue`; empty when the issue is valid.
    pub fn validate(&self, issue: &Issue) -> Vec<Validation> {
        Self::validations()
            .iter()
            .filter(|kind| !kind.is_valid(issue, &self.root))
            .map(|kind| Validation {
                kind: *kind,
                message: kind.message(),
            })
            .collect()
    }

    pub fn is_valid(&self, issue: &Issue) -> bool {
        Self::validations()
            .iter()
            .all(|kind| kind.is_valid(issue, &self.root))
    }
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

fn has_valid_categories(issue: &Issue) -> bool {
    match issue.get("categories") {
        Some(Value::Array(categories)) if !categories.is_empty() => {
            categories.iter().all(|category| {
                category
                    .as_str()
                    .map(|name| CATEGORIES.contains(&name))
                    .unwrap_or(false)
            })
        }
        _ => false,
    }
}

fn stays_relative(path: &str) -> bool {
    let path = Path::new(path);
    if path.is_absolute() {
        return false;
    }

    let mut depth: usize = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return false;
                }
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn valid_issue() -> Issue {
        Issue::from_value(json!({
            "type": "issue",
            "check_name": "Style/StringLiterals",
            "description": "Prefer double quotes",
            "categories": ["Style"],
            "location": { "path": "lib/a.rb", "lines": { "begin": 1, "end": 1 } }
        }))
        .unwrap()
    }

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(dir.path().join("lib/a.rb"), "puts 'a'\n").unwrap();
        dir
    }

    #[test]
    fn test_validations_order() {
        let names: Vec<&str> = IssueValidations::validations()
            .iter()
            .map(ValidationKind::name)
            .collect();

        assert_eq!(
            names,
            vec![
                "CategoryValidation",
                "CheckNamePresenceValidation",
                "DescriptionPresenceValidation",
                "LocationFormatValidation",
                "OtherLocationsFormatValidation",
                "PathExistenceValidation",
                "PathIsFileValidation",
                "PathPresenceValidation",
                "RelativePathValidation",
                "TypeValidation",
            ]
        );
    }

    #[test]
    fn test_valid_issue_passes() {
        let dir = project();
        let validations = IssueValidations::new(dir.path());

        assert!(validations.validate(&valid_issue()).is_empty());
        assert!(validations.is_valid(&valid_issue()));
    }

    #[test]
    fn test_unknown_category_fails() {
        let dir = project();
        let mut value = valid_issue().into_value();
        value["categories"] = json!(["Style", "Vibes"]);
        let issue = Issue::from_value(value).unwrap();

        let failures = IssueValidations::new(dir.path()).validate(&issue);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, ValidationKind::Category);
    }

    #[test]
    fn test_missing_path_fails_path_checks() {
        let dir = project();
        let mut value = valid_issue().into_value();
        value["location"] = json!({ "lines": { "begin": 1, "end": 1 } });
        let issue = Issue::from_value(value).unwrap();

        let kinds: Vec<ValidationKind> = IssueValidations::new(dir.path())
            .validate(&issue)
            .into_iter()
            .map(|failure| failure.kind)
            .collect();

        assert!(kinds.contains(&ValidationKind::LocationFormat));
        assert!(kinds.contains(&ValidationKind::PathPresence));
        assert!(kinds.contains(&ValidationKind::PathExistence));
        assert!(kinds.contains(&ValidationKind::RelativePath));
    }

    #[test]
    fn test_directory_path_is_not_a_file() {
        let dir = project();
        let mut value = valid_issue().into_value();
        value["location"]["path"] = json!("lib");
        let issue = Issue::from_value(value).unwrap();

        let failures = IssueValidations::new(dir.path()).validate(&issue);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, ValidationKind::PathIsFile);
    }

    #[test]
    fn test_relative_path_rules() {
        assert!(stays_relative("lib/a.rb"));
        assert!(stays_relative("./lib/../a.rb"));
        assert!(!stays_relative("/etc/passwd"));
        assert!(!stays_relative("../outside.rb"));
        assert!(!stays_relative("lib/../../outside.rb"));
    }

    #[test]
    fn test_other_locations() {
        let dir = project();
        let mut value = valid_issue().into_value();
        value["other_locations"] = json!([{ "path": "lib/a.rb", "lines": { "begin": 2, "end": 3 } }]);
        let issue = Issue::from_value(value.clone()).unwrap();
        assert!(IssueValidations::new(dir.path()).is_valid(&issue));

        value["other_locations"] = json!({ "path": "lib/a.rb" });
        let issue = Issue::from_value(value).unwrap();
        let failures = IssueValidations::new(dir.path()).validate(&issue);
        assert_eq!(failures[0].kind, ValidationKind::OtherLocationsFormat);
    }

    #[test]
    fn test_type_is_case_insensitive() {
        let dir = project();
        let mut value = valid_issue().into_value();
        value["type"] = json!("Issue");
        assert!(IssueValidations::new(dir.path()).is_valid(&Issue::from_value(value.clone()).unwrap()));

        value["type"] = json!("measurement");
        let failures = IssueValidations::new(dir.path()).validate(&Issue::from_value(value).unwrap());
        assert_eq!(failures[0].kind, ValidationKind::Type);
    }

    #[test]
    fn test_blank_description_fails() {
        let dir = project();
        let mut value = valid_issue().into_value();
        value["description"] = json!("   ");
        let failures =
            IssueValidations::new(dir.path()).validate(&Issue::from_value(value).unwrap());
        assert_eq!(failures[0].kind, ValidationKind::DescriptionPresence);
        assert_eq!(failures[0].message, "Description must be present");
    }
}
