//! Greedy word wrapping for BibTeX field values.
//!
//! Text is split into chunks: whitespace runs, words, and word fragments
//! ending in a hyphen (`self-` / `consistent`). Chunks are packed into lines
//! no wider than the target; words longer than a line are split, preferring
//! a hyphen inside the word. Whitespace at line edges is dropped.

/// Wrap `text` into lines of at most `width` characters
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let text: String = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();

    let mut chunks: Vec<Vec<char>> = split_chunks(&text);
    chunks.reverse();

    let mut lines = Vec::new();
    while !chunks.is_empty() {
        let mut line: Vec<Vec<char>> = Vec::new();
        let mut line_len = 0;

        if !lines.is_empty() && chunks.last().is_some_and(|c| is_blank(c)) {
            chunks.pop();
        }

        while let Some(chunk) = chunks.last() {
            if line_len + chunk.len() > width {
                break;
            }
            line_len += chunk.len();
            if let Some(chunk) = chunks.pop() {
                line.push(chunk);
            }
        }

        if chunks.last().is_some_and(|c| c.len() > width) {
            split_long_word(&mut chunks, &mut line, line_len, width);
        }

        if line.last().is_some_and(|c| is_blank(c)) {
            line.pop();
        }

        if !line.is_empty() {
            lines.push(line.concat().into_iter().collect());
        }
    }
    lines
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|c| *c == ' ')
}

/// Move as much of the oversized next chunk as fits onto the current line.
///
/// The split lands after the last hyphen that fits, unless only hyphens
/// precede it; otherwise at the line width. A full line takes nothing.
fn split_long_word(
    chunks: &mut Vec<Vec<char>>,
    line: &mut Vec<Vec<char>>,
    line_len: usize,
    width: usize,
) {
    let space_left = width.saturating_sub(line_len);
    let Some(chunk) = chunks.last_mut() else {
        return;
    };
    if space_left == 0 {
        return;
    }

    let mut end = space_left;
    if let Some(hyphen) = chunk[..space_left.min(chunk.len())]
        .iter()
        .rposition(|c| *c == '-')
    {
        if hyphen > 0 && chunk[..hyphen].iter().any(|c| *c != '-') {
            end = hyphen + 1;
        }
    }

    let rest = chunk.split_off(end.min(chunk.len()));
    let head = std::mem::replace(chunk, rest);
    line.push(head);
}

/// Letters for the purpose of hyphen breaking: alphabetic or underscore
fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_word_punct(c: char) -> bool {
    is_word_char(c) || matches!(c, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}

fn split_chunks(text: &str) -> Vec<Vec<char>> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        if chars[start] == ' ' {
            let end = chars[start..]
                .iter()
                .position(|c| *c != ' ')
                .map_or(chars.len(), |p| start + p);
            chunks.push(chars[start..end].to_vec());
            start = end;
            continue;
        }

        if let Some(end) = em_dash_end(&chars, start) {
            chunks.push(chars[start..end].to_vec());
            start = end;
            continue;
        }

        let end = word_end(&chars, start);
        chunks.push(chars[start..end].to_vec());
        start = end;
    }
    chunks
}

/// `--` (or longer) between a word and the next word forms its own chunk
fn em_dash_end(chars: &[char], start: usize) -> Option<usize> {
    if start == 0 || !is_word_punct(chars[start - 1]) {
        return None;
    }
    let run = chars[start..].iter().take_while(|c| **c == '-').count();
    if run < 2 {
        return None;
    }
    let after = chars.get(start + run).copied()?;
    is_word_char(after).then_some(start + run)
}

/// End of the word chunk beginning at `start`
fn word_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        if c == ' ' {
            return i;
        }
        if c == '-' {
            if breaks_after_hyphen(chars, i) {
                return i + 1;
            }
            if em_dash_end(chars, i).is_some() {
                return i;
            }
        }
        i += 1;
    }
    chars.len()
}

/// A hyphen splits a word when at least two letters precede it
/// (or `letter-letter` does) and a letter, optional hyphen, letter follows.
fn breaks_after_hyphen(chars: &[char], i: usize) -> bool {
    let at = |j: usize| chars.get(j).copied();
    let letter_at = |j: usize| at(j).is_some_and(is_letter);

    let behind = (i >= 2 && letter_at(i - 2) && letter_at(i - 1))
        || (i >= 3 && letter_at(i - 3) && at(i - 2) == Some('-') && letter_at(i - 1));
    let ahead = letter_at(i + 1)
        && (letter_at(i + 2) || (at(i + 2) == Some('-') && letter_at(i + 3)));
    behind && ahead
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks(text: &str) -> Vec<String> {
        split_chunks(text)
            .into_iter()
            .map(|c| c.into_iter().collect())
            .collect()
    }

    #[test]
    fn test_chunks_break_after_hyphen() {
        assert_eq!(
            chunks("self-consistent field"),
            vec!["self-", "consistent", " ", "field"]
        );
        assert_eq!(chunks("ANI-1x"), vec!["ANI-1x"]);
        assert_eq!(chunks("a-b"), vec!["a-b"]);
        assert_eq!(chunks("QM/MM-based"), vec!["QM/MM-", "based"]);
    }

    #[test]
    fn test_chunks_em_dash() {
        assert_eq!(chunks("word--next"), vec!["word", "--", "next"]);
        assert_eq!(chunks("1261--1275"), vec!["1261", "--", "1275"]);
    }

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap("short", 70), vec!["short"]);
        assert!(wrap("", 70).is_empty());
        assert!(wrap("   ", 70).is_empty());
    }

    #[test]
    fn test_wrap_greedy() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
    }

    #[test]
    fn test_wrap_breaks_at_hyphen() {
        let lines = wrap("we use a deep-learning model", 18);
        assert_eq!(lines, vec!["we use a deep-", "learning model"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_long_word_prefers_hyphen() {
        let lines = wrap("1234-6789012", 7);
        assert_eq!(lines, vec!["1234-", "6789012"]);

        let lines = wrap("xx-yyyyyyyy", 5);
        assert_eq!(lines, vec!["xx-yy", "yyyyy", "y"]);
    }

    #[test]
    fn test_word_longer_than_line() {
        let word = format!("{}-{}", "1".repeat(40), "2".repeat(39));
        let lines = wrap(&format!("see {}", word), 70);
        assert_eq!(lines, vec![format!("see {}-", "1".repeat(40)), "2".repeat(39)]);

        let lines = wrap(&format!("see {}", "x".repeat(80)), 70);
        assert_eq!(lines, vec![format!("see {}", "x".repeat(66)), "x".repeat(14)]);
    }

    #[test]
    fn test_full_line_leaves_long_word_whole() {
        let lines = wrap("abcdefghi klmnopqrstuvwxyz", 10);
        assert_eq!(lines, vec!["abcdefghi", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_lines_respect_width() {
        let text = "Machine learning potentials are trained on quantum mechanical \
                    reference data and reproduce potential energy surfaces at a \
                    fraction of the cost of the reference method.";
        for line in wrap(text, 70) {
            assert!(line.chars().count() <= 70, "{}", line);
            assert!(!line.starts_with(' ') && !line.ends_with(' '));
        }
    }
}
