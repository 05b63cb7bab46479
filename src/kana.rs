// Answer input filtering. The game dictionary is Hiragana-only, so free-text
// input keeps Hiragana and the long-vowel mark, folds Katakana to Hiragana,
// and drops everything else. Callers must skip the filter while IME
// composition is in progress; the transform itself is pure and idempotent.

const HIRAGANA_FIRST: char = '\u{3041}'; // ぁ
const HIRAGANA_LAST: char = '\u{3096}'; // ゖ
const KATAKANA_FIRST: char = '\u{30A1}'; // ァ
const KATAKANA_LAST: char = '\u{30F6}'; // ヶ
const LONG_VOWEL_MARK: char = '\u{30FC}'; // ー

// The two kana blocks are laid out in parallel 0x60 apart.
const KATAKANA_TO_HIRAGANA_OFFSET: u32 = 0x60;

pub fn fold_answer_char(ch: char) -> Option<char> {
    match ch {
        HIRAGANA_FIRST..=HIRAGANA_LAST | LONG_VOWEL_MARK => Some(ch),
        KATAKANA_FIRST..=KATAKANA_LAST => char::from_u32(ch as u32 - KATAKANA_TO_HIRAGANA_OFFSET),
        _ => None,
    }
}

pub fn normalize_answer(input: &str) -> String {
    input.chars().filter_map(fold_answer_char).collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_hiragana_and_long_vowel_mark() {
        assert_eq!(normalize_answer("しりとり"), "しりとり");
        assert_eq!(normalize_answer("らーめん"), "らーめん");
    }

    #[test]
    fn folds_katakana_to_hiragana() {
        assert_eq!(normalize_answer("ア"), "あ");
        assert_eq!(normalize_answer("ラーメン"), "らーめん");
        assert_eq!(normalize_answer("ヶ"), "ゖ");
    }

    #[test]
    fn drops_everything_else() {
        assert_eq!(normalize_answer("a"), "");
        assert_eq!(normalize_answer("abcりnご123"), "りご");
        assert_eq!(normalize_answer("漢字"), "");
        assert_eq!(normalize_answer(""), "");
    }

    #[test]
    fn is_idempotent() {
        for input in ["ラーメンとRustとすし", "しりとり", "12345", "アアアー"] {
            let once = normalize_answer(input);
            assert_eq!(normalize_answer(&once), once);
        }
    }
}
