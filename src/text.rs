//! Small text helpers for lists and names.

/// Splits a string on commas and/or whitespace, dropping empty items.
///
/// ```
/// use badger::text::split_list;
///
/// assert_eq!(split_list("yaml, json toml"), vec!["yaml", "json", "toml"]);
/// ```
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins items with `joint`, using `last_joint` before the final item.
pub fn join_list<S: AsRef<str>>(items: &[S], joint: &str, last_joint: &str) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let init: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}{}{}", init.join(joint), last_joint, last.as_ref())
        }
    }
}

/// `a, b and c`
pub fn join_list_and<S: AsRef<str>>(items: &[S]) -> String {
    join_list(items, ", ", " and ")
}

/// `a, b or c`
pub fn join_list_or<S: AsRef<str>>(items: &[S]) -> String {
    join_list(items, ", ", " or ")
}

/// Upper cases the first character and lower cases the rest.
pub fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// Converts each `snake_case` part of a slash separated name to `CamelCase`.
///
/// ```
/// use badger::text::snake_up;
///
/// assert_eq!(snake_up("my_module/foo_bar"), "MyModule/FooBar");
/// ```
pub fn snake_up(uri: &str) -> String {
    uri.split('/')
        .map(|segment| segment.split('_').map(capitalise).collect::<String>())
        .collect::<Vec<_>>()
        .join("/")
}
