/// Turn a DBF attribute value into a bare identifier.
///
/// Newlines become a literal `\n`, then every run of non-letter characters
/// is removed from both ends. Interior characters are kept as they are.
pub fn wash_shape_name(raw: &str) -> String {
    let escaped = raw.replace('\n', "\\n");
    escaped
        .trim_end_matches(|c: char| !c.is_alphabetic())
        .trim_start_matches(|c: char| !c.is_alphabetic())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_non_letters_at_both_ends() {
        assert_eq!(wash_shape_name("  'John's Town!!  "), "John's Town");
        assert_eq!(wash_shape_name("12 Main St."), "Main St");
        assert_eq!(wash_shape_name("Göteborg"), "Göteborg");
        assert_eq!(wash_shape_name("«Île-de-France»"), "Île-de-France");
    }

    #[test]
    fn test_newline_becomes_escape() {
        assert_eq!(wash_shape_name("North\nSea"), "North\\nSea");
        // The escape ends in a letter, so only its backslash can be trimmed
        assert_eq!(wash_shape_name("Sea\n"), "Sea\\n");
        assert_eq!(wash_shape_name("\nSea"), "nSea");
    }

    #[test]
    fn test_no_letters() {
        assert_eq!(wash_shape_name("1234"), "");
        assert_eq!(wash_shape_name(""), "");
    }
}
