/// First non-empty line of a generated analysis; the nickname line is all
/// that ever gets stored.
pub fn first_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_the_first_non_empty_line() {
        let text = "\n\n  Rainbow Radiance  \n\nHi! I think you are...";
        assert_eq!(first_line(text), Some("Rainbow Radiance".to_string()));
    }

    #[test]
    fn single_line_input_works() {
        assert_eq!(first_line("Grain Guru"), Some("Grain Guru".to_string()));
    }

    #[test]
    fn blank_input_yields_none() {
        assert_eq!(first_line(""), None);
        assert_eq!(first_line("\n  \n\t\n"), None);
    }
}
