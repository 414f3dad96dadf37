/// Splits `text` on every run of characters outside `[A-Za-z0-9]` and lowercases the pieces.
///
/// Leading, trailing and doubled delimiters would produce empty pieces; those are dropped so
/// the empty string never reaches the counters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|character: char| !character.is_ascii_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .map(str::to_ascii_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn splits_on_punctuation_and_lowercases() {
        assert_eq!(
            tokenize("It is a truth, universally ACKNOWLEDGED!"),
            vec!["it", "is", "a", "truth", "universally", "acknowledged"]
        );
    }

    #[test]
    fn drops_empty_pieces_around_delimiters() {
        assert_eq!(tokenize("  --Mr.  Darcy--  "), vec!["mr", "darcy"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("...!?").is_empty());
    }

    #[test]
    fn keeps_digits_and_treats_non_ascii_as_delimiters() {
        assert_eq!(tokenize("chapter 12"), vec!["chapter", "12"]);
        assert_eq!(tokenize("café au lait"), vec!["caf", "au", "lait"]);
    }

    #[test]
    fn apostrophes_split_words() {
        assert_eq!(tokenize("Don't"), vec!["don", "t"]);
    }
}
