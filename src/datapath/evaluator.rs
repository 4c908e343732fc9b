//! Data path traversal over nested values.

use super::ast::{DataPath, Modifier, Segment};
use super::error::DataPathError;
use super::parser::Parser;

/// A value whose children can be looked up by a string key.
///
/// Mappings look up by key; sequences parse the key as an index.
pub trait Indexable {
    /// Returns the child stored under `key`, if there is one.
    fn lookup(&self, key: &str) -> Option<&Self>;

    /// Whether this value counts as "no value" (e.g. `null`).
    fn is_null(&self) -> bool;
}

/// Parses a canonical non-negative decimal index such as `0` or `12`.
///
/// `"01"`, `"+1"` and `"-1"` are not indexes.
fn parse_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

impl Indexable for serde_json::Value {
    fn lookup(&self, key: &str) -> Option<&Self> {
        match self {
            serde_json::Value::Object(map) => map.get(key),
            serde_json::Value::Array(items) => parse_index(key).and_then(|i| items.get(i)),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        self.is_null()
    }
}

impl Indexable for serde_yaml::Value {
    fn lookup(&self, key: &str) -> Option<&Self> {
        use serde_yaml::Value;

        match self {
            Value::Mapping(map) => map.get(key).or_else(|| {
                // YAML keys like `1:` or `true:` are not strings
                map.iter()
                    .find(|(k, _)| match k {
                        Value::Number(n) => n.to_string() == key,
                        Value::Bool(b) => b.to_string() == key,
                        _ => false,
                    })
                    .map(|(_, v)| v)
            }),
            Value::Sequence(items) => parse_index(key).and_then(|i| items.get(i)),
            Value::Tagged(tagged) => tagged.value.lookup(key),
            _ => None,
        }
    }

    fn is_null(&self) -> bool {
        self.is_null()
    }
}

/// Walks a value one segment at a time.
pub struct Evaluator<'a, V: Indexable> {
    root: &'a V,
}

impl<'a, V: Indexable> Evaluator<'a, V> {
    pub fn new(root: &'a V) -> Self {
        Evaluator { root }
    }

    /// Resolves `segments` against the root.
    ///
    /// Returns `Ok(None)` when an optional segment finds nothing, and the
    /// last resolved node when a "maybe" segment finds nothing.
    pub fn evaluate(&self, segments: &[Segment]) -> Result<Option<&'a V>, DataPathError> {
        let mut current = self.root;
        let mut visited: Vec<&str> = Vec::with_capacity(segments.len());

        for segment in segments {
            visited.push(&segment.token);
            match current.lookup(&segment.token).filter(|v| !v.is_null()) {
                Some(next) => current = next,
                None => match segment.modifier {
                    Modifier::Maybe => return Ok(Some(current)),
                    Modifier::Optional => return Ok(None),
                    Modifier::None => return Err(DataPathError::traversal(&visited)),
                },
            }
        }

        Ok(Some(current))
    }

    /// Resolves a pre-parsed [`DataPath`] against the root.
    pub fn evaluate_path(&self, path: &DataPath) -> Result<Option<&'a V>, DataPathError> {
        self.evaluate(&path.segments)
    }
}

/// Looks up the value at `path` inside `data`.
///
/// ```
/// use badger::datapath::data_path;
/// use serde_json::json;
///
/// let data = json!({ "animal": [{ "name": "Derek", "type": "Dog" }] });
/// assert_eq!(data_path(&data, "animal/0/name").unwrap(), Some(&json!("Derek")));
/// assert_eq!(data_path(&data, "animal/0/missing?").unwrap(), None);
/// assert_eq!(
///     data_path(&data, "animal/0/missing").unwrap_err().to_string(),
///     "No value for data at path: animal/0/missing"
/// );
/// ```
pub fn data_path<'a, V: Indexable>(
    data: &'a V,
    path: &str,
) -> Result<Option<&'a V>, DataPathError> {
    let segments = Parser::parse(path)?;
    Evaluator::new(data).evaluate(&segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_data() -> serde_json::Value {
        json!({
            "foo": "The foo item",
            "bar": {
                "baz": "The bar/baz item",
                "boz": "The bar/boz item",
                "buz": {
                    "wig": "The bar/buz/wig item",
                    "wam": "The bar/buz/wam item",
                    "bam": "The bar/buz/bam item"
                }
            },
            "animal": [
                "aardvark",
                "badger",
                ["colin", "cat"],
                { "name": "Derek", "type": "Dog" }
            ],
            "nothing": null
        })
    }

    fn resolve(path: &str) -> Option<serde_json::Value> {
        data_path(&test_data(), path).unwrap().cloned()
    }

    fn failure(path: &str) -> String {
        data_path(&test_data(), path).unwrap_err().to_string()
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("0"), Some(0));
        assert_eq!(parse_index("12"), Some(12));
        assert_eq!(parse_index("01"), None);
        assert_eq!(parse_index("-1"), None);
        assert_eq!(parse_index("+1"), None);
        assert_eq!(parse_index(""), None);
        assert_eq!(parse_index("1a"), None);
    }

    #[test]
    fn test_resolves_nested_objects() {
        assert_eq!(resolve("foo"), Some(json!("The foo item")));
        assert_eq!(resolve("bar/baz"), Some(json!("The bar/baz item")));
        assert_eq!(resolve("bar/boz"), Some(json!("The bar/boz item")));
        assert_eq!(resolve("bar/buz/wig"), Some(json!("The bar/buz/wig item")));
        assert_eq!(resolve("bar/buz/wam"), Some(json!("The bar/buz/wam item")));
    }

    #[test]
    fn test_resolves_sequences() {
        assert_eq!(resolve("animal/0"), Some(json!("aardvark")));
        assert_eq!(resolve("animal/1"), Some(json!("badger")));
        assert_eq!(resolve("animal/2/0"), Some(json!("colin")));
        assert_eq!(resolve("animal/2/1"), Some(json!("cat")));
        assert_eq!(resolve("animal/3/name"), Some(json!("Derek")));
        assert_eq!(resolve("animal/3/type"), Some(json!("Dog")));
    }

    #[test]
    fn test_empty_path_returns_root() {
        assert_eq!(resolve(""), Some(test_data()));
        assert_eq!(resolve("/"), Some(test_data()));
    }

    #[test]
    fn test_missing_reports_visited_path() {
        assert_eq!(failure("missing"), "No value for data at path: missing");
        assert_eq!(failure("missing/thing"), "No value for data at path: missing");
        assert_eq!(failure("foo/wibble"), "No value for data at path: foo/wibble");
        assert_eq!(failure("animal/4"), "No value for data at path: animal/4");
        assert_eq!(failure("animal/01"), "No value for data at path: animal/01");
    }

    #[test]
    fn test_null_counts_as_missing() {
        assert_eq!(failure("nothing"), "No value for data at path: nothing");
        assert_eq!(resolve("nothing?"), None);
    }

    #[test]
    fn test_optional_returns_none() {
        assert_eq!(resolve("missing?"), None);
        assert_eq!(resolve("missing?/thing"), None);
        assert_eq!(resolve("bar/wibble?"), None);
        assert_eq!(resolve("foo/bar?"), None);
    }

    #[test]
    fn test_optional_only_guards_its_own_segment() {
        assert_eq!(failure("food/wibble?"), "No value for data at path: food");
        assert_eq!(failure("foo?d/wibble"), "No value for data at path: foo/d");
    }

    #[test]
    fn test_maybe_returns_last_resolved_node() {
        let data = json!({ "foo": {} });
        assert_eq!(data_path(&data, "?missing/thing").unwrap(), Some(&data));
        assert_eq!(data_path(&data, "foo/?missing").unwrap(), Some(&json!({})));
        assert_eq!(resolve("bar/?wibble/wobble"), Some(test_data()["bar"].clone()));
    }

    #[test]
    fn test_maybe_present_descends() {
        assert_eq!(resolve("?bar/baz"), Some(json!("The bar/baz item")));
    }

    #[test]
    fn test_parse_error_propagates() {
        let err = data_path(&test_data(), "bar/'baz").unwrap_err();
        assert!(matches!(err, DataPathError::Parse { .. }));
    }

    #[test]
    fn test_idempotent() {
        let data = test_data();
        let first = data_path(&data, "animal/3/name").unwrap();
        let second = data_path(&data, "animal/3/name").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluator_reuses_parsed_path() {
        let data = test_data();
        let path = DataPath::parse("bar/buz/bam").unwrap();
        let evaluator = Evaluator::new(&data);
        assert_eq!(
            evaluator.evaluate_path(&path).unwrap(),
            Some(&json!("The bar/buz/bam item"))
        );
    }

    #[test]
    fn test_yaml_values() {
        let data: serde_yaml::Value = serde_yaml::from_str(
            "
animal:
  - name: Derek
    type: Dog
ports:
  80: http
  443: https
flags:
  true: yes please
",
        )
        .unwrap();

        assert_eq!(
            data_path(&data, "animal/0/name").unwrap(),
            Some(&serde_yaml::Value::from("Derek"))
        );
        assert_eq!(
            data_path(&data, "ports/443").unwrap(),
            Some(&serde_yaml::Value::from("https"))
        );
        assert_eq!(
            data_path(&data, "flags/true").unwrap(),
            Some(&serde_yaml::Value::from("yes please"))
        );
        assert_eq!(
            data_path(&data, "animal/0/missing").unwrap_err().to_string(),
            "No value for data at path: animal/0/missing"
        );
    }
}
