/// Split a raw header line on commas and normalize each token:
/// lowercase, spaces → underscores. Tokens are *not* trimmed, so a
/// header like `"First Name "` becomes `"first_name_"`.
pub fn normalize_headers(line: &str) -> Vec<String> {
    line.split(',')
        .map(|h| h.to_lowercase().replace(' ', "_"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_underscores() {
        assert_eq!(
            normalize_headers("Full Name,Age"),
            vec!["full_name".to_string(), "age".to_string()]
        );
    }

    #[test]
    fn keeps_duplicates_positional() {
        assert_eq!(normalize_headers("a,a,b"), vec!["a", "a", "b"]);
    }

    #[test]
    fn does_not_trim() {
        assert_eq!(normalize_headers(" Id ,Name"), vec!["_id_", "name"]);
    }

    #[test]
    fn empty_line_is_one_empty_header() {
        assert_eq!(normalize_headers(""), vec![""]);
    }
}
