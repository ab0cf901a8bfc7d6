/// Reduce a client-supplied filename to a safe ASCII form: path
///  separators become underscores, anything outside `[A-Za-z0-9_.-]`
///  is dropped, and leading/trailing dots and underscores are trimmed.
///  May return an empty string.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(secure_filename("report.pdf"), "report.pdf");
        assert_eq!(secure_filename("q3-summary_v2.txt"), "q3-summary_v2.txt");
    }

    #[test]
    fn test_whitespace_becomes_underscore() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("  padded   name.txt "), "padded_name.txt");
    }

    #[test]
    fn test_path_components_flattened() {
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename("C:\\Users\\alice\\notes.txt"), "C_Users_alice_notes.txt");
    }

    #[test]
    fn test_unsafe_characters_dropped() {
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_mluts.txt");
        assert_eq!(secure_filename("a\"b<c>d;e.txt"), "abcde.txt");
    }

    #[test]
    fn test_may_be_empty() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename("../"), "");
        assert_eq!(secure_filename("\u{65e5}\u{672c}"), "");
    }
}
