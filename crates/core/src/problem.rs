use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A single anomaly record reported by detection. Opaque to the notifier.
pub type Problem = serde_json::Value;

/// Ordered collection of problems produced by one detection cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemSet(Vec<Problem>);

impl ProblemSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of problem records.
    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CoreError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Problem> {
        self.0.iter()
    }
}

impl From<Vec<Problem>> for ProblemSet {
    fn from(problems: Vec<Problem>) -> Self {
        Self(problems)
    }
}

impl FromIterator<Problem> for ProblemSet {
    fn from_iter<I: IntoIterator<Item = Problem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ProblemSet {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn parses_array_of_records() {
        let set = ProblemSet::from_json_str(
            r#"[{"host": "db1", "metric": "disk_pct", "value": 97}, {"host": "web2"}]"#,
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().next().unwrap()["host"], "db1");
    }

    #[test]
    fn keeps_field_insertion_order() {
        let set = ProblemSet::from_json_str(r#"[{"zeta": 1, "alpha": 2, "mid": 3}]"#).unwrap();
        let first = set.iter().next().unwrap();
        let keys: Vec<&str> = first
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn rejects_non_array_input() {
        let err = ProblemSet::from_json_str(r#"{"host": "db1"}"#).unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn serializes_as_plain_array() {
        let set: ProblemSet = vec![json!({"host": "db1"})].into();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"[{"host":"db1"}]"#);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"host": "db1"}}]"#).unwrap();
        let set = ProblemSet::from_file(file.path()).unwrap();
        assert_eq!(set, ProblemSet::from(vec![json!({"host": "db1"})]));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ProblemSet::from_file(Path::new("/nonexistent/problems.json")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
