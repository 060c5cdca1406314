//! Work titles derived from corpus file names.
//!
//! Corpus files follow the Folger Shakespeare naming scheme, e.g.
//! `romeo-and-juliet_TXT_FolgerShakespeare.txt`. The title shown to the model
//! (and stored as the `source` of every chunk) is derived from that name.

use std::path::Path;

/// Suffix of every file in the Folger plain-text distribution.
pub const FOLGER_SUFFIX: &str = "_TXT_FolgerShakespeare.txt";

/// Derives a human-readable work title from a corpus file path.
///
/// The Folger suffix (or, failing that, a plain `.txt` extension) is removed,
/// dashes become spaces, and the result is title-cased.
///
/// ```
/// use folio_context::work_title;
/// use std::path::Path;
///
/// let title = work_title(Path::new("data/romeo-and-juliet_TXT_FolgerShakespeare.txt"));
/// assert_eq!(title, "Romeo And Juliet");
/// ```
pub fn work_title(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let stem = match file_name.strip_suffix(FOLGER_SUFFIX) {
        Some(stem) => stem,
        None => file_name.strip_suffix(".txt").unwrap_or(&file_name),
    };

    title_case(&stem.replace('-', " "))
}

/// Uppercases every letter that follows a non-letter and lowercases the rest.
///
/// Apostrophes count as word boundaries, so `"night's"` becomes `"Night'S"`.
/// Titles stored in existing collections were produced with this rule.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folger_file_names() {
        assert_eq!(
            work_title(Path::new("hamlet_TXT_FolgerShakespeare.txt")),
            "Hamlet"
        );
        assert_eq!(
            work_title(Path::new(
                "/corpus/a-midsummer-nights-dream_TXT_FolgerShakespeare.txt"
            )),
            "A Midsummer Nights Dream"
        );
        assert_eq!(
            work_title(Path::new("henry-iv-part-1_TXT_FolgerShakespeare.txt")),
            "Henry Iv Part 1"
        );
    }

    #[test]
    fn test_plain_text_file_names() {
        assert_eq!(work_title(Path::new("data/the-tempest.txt")), "The Tempest");
        assert_eq!(work_title(Path::new("notes")), "Notes");
    }

    #[test]
    fn test_title_case_rules() {
        assert_eq!(title_case("MUCH ado about nothing"), "Much Ado About Nothing");
        assert_eq!(title_case("love's labor's lost"), "Love'S Labor'S Lost");
        assert_eq!(title_case("12th night"), "12Th Night");
        assert_eq!(title_case(""), "");
    }
}
