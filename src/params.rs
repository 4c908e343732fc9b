//! Assertions for required values in parameter maps.

use crate::text::{join_list_or, split_list};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("Missing value for required parameter: {0}")]
    Missing(String),

    #[error("Missing value for one of: {0}")]
    MissingAny(String),
}

/// Returns the named parameter, which must be present and not null.
///
/// ```
/// use badger::params::required_param;
/// use serde_json::json;
///
/// let params = json!({ "foo": 10 });
/// let params = params.as_object().unwrap();
/// assert_eq!(required_param(params, "foo").unwrap(), &json!(10));
/// assert!(required_param(params, "bar").is_err());
/// ```
pub fn required_param<'a>(
    params: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a Value, ParamError> {
    match params.get(name) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(ParamError::Missing(name.to_string())),
    }
}

/// Returns all the parameters named in a comma/whitespace separated list.
pub fn required_params<'a>(
    params: &'a Map<String, Value>,
    names: &str,
) -> Result<Vec<&'a Value>, ParamError> {
    split_list(names)
        .iter()
        .map(|name| required_param(params, name))
        .collect()
}

/// Returns the named parameters, at least one of which must have a value.
pub fn any_params<'a>(
    params: &'a Map<String, Value>,
    names: &str,
) -> Result<Vec<Option<&'a Value>>, ParamError> {
    let names = split_list(names);
    let values: Vec<Option<&Value>> = names
        .iter()
        .map(|name| params.get(name).filter(|v| !v.is_null()))
        .collect();

    if values.iter().any(Option::is_some) {
        Ok(values)
    } else {
        Err(ParamError::MissingAny(join_list_or(&names)))
    }
}
