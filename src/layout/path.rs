// Thu Aug 06 2026 - Alex

use once_cell::sync::Lazy;
use regex::Regex;

// A member path carries a data type: root, one or more commas, and a
// dot-separated type.name in the last segment
static MEMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^.+,.+\..+$").expect("member pattern is a valid regex"));

// First member of an array: every trailing index is [0]
static FIRST_ARRAY_MEMBER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.+?)(?:\[0\])+$").expect("array pattern is a valid regex"));

/// True if the path names a variable member (root structure paths carry no
/// data type segment)
pub fn is_member_path(path: &str) -> bool {
    MEMBER_PATTERN.is_match(path)
}

/// Data type of the last path segment: the text between the final comma
/// and the final dot. Only meaningful for member paths.
pub fn data_type_of(path: &str) -> &str {
    let start = path.rfind(',').map(|i| i + 1).unwrap_or(0);
    let end = path.rfind('.').unwrap_or(path.len());

    if start <= end {
        &path[start..end]
    } else {
        ""
    }
}

/// Split a path at its bit length suffix, if any
pub fn split_bit_length(path: &str) -> (&str, Option<&str>) {
    match path.find(':') {
        Some(index) => (&path[..index], Some(&path[index + 1..])),
        None => (path, None),
    }
}

/// True for the first member of an array (all trailing indices zero)
pub fn is_first_array_member(path: &str) -> bool {
    FIRST_ARRAY_MEMBER_PATTERN.is_match(path)
}

/// Array definition path: the member path with its trailing zero indices
/// removed
pub fn array_definition_path(path: &str) -> &str {
    FIRST_ARRAY_MEMBER_PATTERN
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_path_shape() {
        assert!(is_member_path("Root,uint8.counter"));
        assert!(is_member_path("Root,Inner.sub,uint16.word"));
        assert!(!is_member_path("Root"));
        assert!(!is_member_path("Root,plain"));
    }

    #[test]
    fn test_data_type_extraction() {
        assert_eq!(data_type_of("Root,uint8.counter"), "uint8");
        assert_eq!(data_type_of("Root,Inner.sub,uint16.word"), "uint16");
        assert_eq!(data_type_of("Root,uint16.arr[0]"), "uint16");
    }

    #[test]
    fn test_bit_length_split() {
        assert_eq!(
            split_bit_length("Root,uint8.flags:4"),
            ("Root,uint8.flags", Some("4"))
        );
        assert_eq!(split_bit_length("Root,uint8.flags"), ("Root,uint8.flags", None));
    }

    #[test]
    fn test_first_array_member() {
        assert!(is_first_array_member("Root,uint16.arr[0]"));
        assert!(is_first_array_member("Root,uint16.grid[0][0]"));
        assert!(!is_first_array_member("Root,uint16.arr[1]"));
        assert!(!is_first_array_member("Root,uint16.arr"));
        // A row start deeper in the array still counts
        assert!(is_first_array_member("Root,uint16.grid[1][0]"));
    }

    #[test]
    fn test_array_definition_path() {
        assert_eq!(array_definition_path("Root,uint16.arr[0]"), "Root,uint16.arr");
        assert_eq!(
            array_definition_path("Root,uint16.grid[0][0]"),
            "Root,uint16.grid"
        );
        assert_eq!(
            array_definition_path("Root,uint16.grid[1][0]"),
            "Root,uint16.grid[1]"
        );
    }
}
