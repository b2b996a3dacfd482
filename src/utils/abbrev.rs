//! ISO 4 journal title abbreviation.
//!
//! [`Abbreviator`] applies the word table in [`super::ltwa`] to a title.
//! [`Abbreviator::journal_abbreviation`] wraps it with the policy used for
//! citations: preprint servers pass through, stylized names keep their
//! casing, and names that already look abbreviated are returned verbatim.

use std::collections::{HashMap, HashSet};

use super::latex::{collapse_whitespace, unaccent};
use super::ltwa::{LTWA_ENTRIES, PREPRINT_SERVERS, STOPWORDS, STYLIZED_PREFIXES};

/// ISO 4 title-word abbreviator.
///
/// Built once from the embedded table and shared by reference; abbreviation
/// itself has no side effects.
#[derive(Debug, Clone)]
pub struct Abbreviator {
    words: HashMap<&'static str, Option<&'static str>>,
    /// Stems sorted longest first
    stems: Vec<(&'static str, Option<&'static str>)>,
    stopwords: HashSet<&'static str>,
}

impl Default for Abbreviator {
    fn default() -> Self {
        Self::new()
    }
}

impl Abbreviator {
    /// Create an abbreviator over the embedded word list
    pub fn new() -> Self {
        let mut words = HashMap::new();
        let mut stems = Vec::new();
        for (pattern, abbreviation) in LTWA_ENTRIES {
            match pattern.strip_suffix('-') {
                Some(stem) => stems.push((stem, *abbreviation)),
                None => {
                    words.insert(*pattern, *abbreviation);
                }
            }
        }
        stems.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));

        Self {
            words,
            stems,
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Abbreviate a journal name for citation.
    ///
    /// The name is title-cased before abbreviation, except for acronyms and
    /// camel-cased words. Preprint servers pass through unchanged. Names whose
    /// abbreviation only differs in dots and commas are already abbreviated
    /// and come back title-cased only.
    pub fn journal_abbreviation(&self, journal: &str) -> String {
        let journal = journal.trim();
        if PREPRINT_SERVERS
            .iter()
            .any(|server| server.eq_ignore_ascii_case(journal))
        {
            return journal.to_string();
        }

        let titled = restore_stylized_prefix(&title_case_journal(journal));
        let abbreviation = self.abbreviate(&titled);
        if without_dots(&abbreviation) == without_dots(&titled) {
            return titled;
        }
        reappend_series_letter(&titled, abbreviation)
    }

    /// Abbreviate a title word by word.
    ///
    /// Stopwords are dropped, punctuation other than colons is removed, and
    /// single-word titles are kept whole.
    pub fn abbreviate(&self, title: &str) -> String {
        let significant: Vec<&str> = title
            .split_whitespace()
            .filter(|token| !self.is_stopword(token))
            .collect();

        match significant.as_slice() {
            [] => collapse_whitespace(title),
            [only] => only.trim_end_matches([',', ';']).to_string(),
            tokens => tokens
                .iter()
                .map(|token| self.abbreviate_token(token))
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    fn is_stopword(&self, token: &str) -> bool {
        let bare = token.trim_end_matches([',', ';', ':']);
        self.stopwords
            .contains(unaccent(&bare.to_lowercase()).as_str())
    }

    fn abbreviate_token(&self, token: &str) -> String {
        let token = token.trim_end_matches([',', ';']);
        let (core, colon) = match token.strip_suffix(':') {
            Some(core) => (core, ":"),
            None => (token, ""),
        };
        if core.ends_with('.') {
            return format!("{}{}", core, colon);
        }

        let abbreviated = core
            .split('-')
            .map(|part| self.abbreviate_word(part))
            .collect::<Vec<_>>()
            .join("-");
        format!("{}{}", abbreviated, colon)
    }

    fn abbreviate_word(&self, word: &str) -> String {
        if word.is_empty() {
            return String::new();
        }
        let key = unaccent(&word.to_lowercase());
        let Some(abbreviation) = self.lookup(&key) else {
            return word.to_string();
        };
        if abbreviation.trim_end_matches('.').len() >= key.len() {
            return word.to_string();
        }
        match word.chars().next() {
            Some(first) if first.is_uppercase() => capitalize(abbreviation),
            _ => abbreviation.to_string(),
        }
    }

    /// Abbreviation for a lowercase, unaccented word.
    ///
    /// Whole-word entries win over stems; among stems the longest wins.
    /// Words the list marks as not abbreviated return `None`.
    fn lookup(&self, word: &str) -> Option<&'static str> {
        if let Some(entry) = self.words.get(word) {
            return *entry;
        }
        self.stems
            .iter()
            .find(|(stem, _)| word.starts_with(stem))
            .and_then(|(_, abbreviation)| *abbreviation)
    }
}

/// Title-case every word: first cased letter upper, the rest lower
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_cased = false;
    for c in text.chars() {
        if previous_cased {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        previous_cased = c.is_alphabetic();
    }
    out
}

/// Title-case a journal name, keeping "PCCP" or "ChemPhysChem" as written.
///
/// A name in all capitals is title-cased throughout.
fn title_case_journal(journal: &str) -> String {
    let journal = collapse_whitespace(journal).replace(" :", ":");
    if !journal.chars().any(char::is_lowercase) {
        return title_case(&journal);
    }
    journal
        .split(' ')
        .map(|token| {
            if token.chars().skip(1).any(char::is_uppercase) {
                token.to_string()
            } else {
                title_case(token)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "Npj Computational Materials" -> "npj Computational Materials"
fn restore_stylized_prefix(titled: &str) -> String {
    let (first, rest) = match titled.split_once(' ') {
        Some((first, rest)) => (first, Some(rest)),
        None => (titled, None),
    };
    let Some(stylized) = STYLIZED_PREFIXES
        .iter()
        .find(|prefix| prefix.eq_ignore_ascii_case(first))
    else {
        return titled.to_string();
    };
    match rest {
        Some(rest) => format!("{} {}", stylized, rest),
        None => stylized.to_string(),
    }
}

/// "Physical Review B" must abbreviate to "Phys. Rev. B", never "Phys. Rev."
fn reappend_series_letter(titled: &str, abbreviation: String) -> String {
    let Some(last) = titled.split_whitespace().last() else {
        return abbreviation;
    };
    let is_series_letter = last.len() == 1 && last.chars().all(|c| c.is_ascii_uppercase());
    if is_series_letter && abbreviation.split_whitespace().last() != Some(last) {
        format!("{} {}", abbreviation, last)
    } else {
        abbreviation
    }
}

fn without_dots(text: &str) -> String {
    collapse_whitespace(&text.replace(['.', ','], ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(
            title_case("Journal of chemical theory and computation"),
            "Journal Of Chemical Theory And Computation"
        );
        assert_eq!(title_case("ACS catalysis"), "Acs Catalysis");
        assert_eq!(title_case("j. chem. phys."), "J. Chem. Phys.");
        assert_eq!(title_case("3d printing"), "3D Printing");
    }

    #[test]
    fn test_journal_abbreviations() {
        let abbreviator = Abbreviator::new();
        let cases = [
            ("Journal of chemical theory and computation", "J. Chem. Theory Comput."),
            ("Computer Physics Communications", "Comput. Phys. Commun."),
            ("Physical chemistry chemical physics", "Phys. Chem. Chem. Phys."),
            ("Journal of the American Chemical Society", "J. Am. Chem. Soc."),
            ("The Journal of Physical Chemistry Letters", "J. Phys. Chem. Lett."),
            ("Nature Communications", "Nat. Commun."),
            (
                "Proceedings of the National Academy of Sciences",
                "Proc. Natl. Acad. Sci.",
            ),
            ("Nucleic Acids Research", "Nucleic Acids Res."),
            ("Journal of Physics: Condensed Matter", "J. Phys.: Condens. Matter"),
            ("Physical Review Letters", "Phys. Rev. Lett."),
            (
                "Angewandte Chemie International Edition",
                "Angew. Chem. Int. Ed.",
            ),
            (
                "Machine Learning: Science and Technology",
                "Mach. Learn.: Sci. Technol.",
            ),
            ("Cell Reports", "Cell Rep."),
            ("Zeitschrift fur Physikalische Chemie", "Z. Phys. Chem."),
        ];
        for (journal, expected) in cases {
            assert_eq!(abbreviator.journal_abbreviation(journal), expected, "{}", journal);
        }
    }

    #[test]
    fn test_single_word_titles_are_kept() {
        let abbreviator = Abbreviator::new();
        assert_eq!(abbreviator.journal_abbreviation("Nature"), "Nature");
        assert_eq!(abbreviator.journal_abbreviation("Science"), "Science");
    }

    #[test]
    fn test_preprint_servers_pass_through() {
        let abbreviator = Abbreviator::new();
        assert_eq!(abbreviator.journal_abbreviation("arXiv"), "arXiv");
        assert_eq!(abbreviator.journal_abbreviation("ChemRxiv"), "ChemRxiv");
        assert_eq!(abbreviator.journal_abbreviation("bioRxiv"), "bioRxiv");
    }

    #[test]
    fn test_stylized_prefix() {
        let abbreviator = Abbreviator::new();
        assert_eq!(
            abbreviator.journal_abbreviation("npj Computational Materials"),
            "npj Comput. Mater."
        );
        assert_eq!(abbreviator.journal_abbreviation("eLife"), "eLife");
    }

    #[test]
    fn test_already_abbreviated_is_verbatim() {
        let abbreviator = Abbreviator::new();
        assert_eq!(
            abbreviator.journal_abbreviation("J. Chem. Theory Comput."),
            "J. Chem. Theory Comput."
        );
        assert_eq!(abbreviator.journal_abbreviation("ACS Catal."), "ACS Catal.");
        assert_eq!(abbreviator.journal_abbreviation("PCCP"), "PCCP");
    }

    #[test]
    fn test_lowercase_abbreviation_is_title_cased() {
        let abbreviator = Abbreviator::new();
        assert_eq!(abbreviator.journal_abbreviation("nature"), "Nature");
        assert_eq!(
            abbreviator.journal_abbreviation("j. chem. phys."),
            "J. Chem. Phys."
        );
    }

    #[test]
    fn test_acronyms_keep_their_case() {
        let abbreviator = Abbreviator::new();
        assert_eq!(
            abbreviator.journal_abbreviation("Physical chemistry chemical physics : PCCP"),
            "Phys. Chem. Chem. Phys.: PCCP"
        );
        assert_eq!(abbreviator.journal_abbreviation("ACS Catalysis"), "ACS Catal.");
        assert_eq!(
            abbreviator.journal_abbreviation("JOURNAL OF CHEMICAL PHYSICS"),
            "J. Chem. Phys."
        );
    }

    #[test]
    fn test_series_letter_is_kept() {
        let abbreviator = Abbreviator::new();
        assert_eq!(
            abbreviator.journal_abbreviation("Physical Review B"),
            "Phys. Rev. B"
        );
        assert_eq!(
            reappend_series_letter("Physical Review B", "Phys. Rev.".to_string()),
            "Phys. Rev. B"
        );
        assert_eq!(
            reappend_series_letter("Physical Review B", "Phys. Rev. B".to_string()),
            "Phys. Rev. B"
        );
    }

    #[test]
    fn test_word_lookup_precedence() {
        let abbreviator = Abbreviator::new();
        assert_eq!(abbreviator.abbreviate_word("Theory"), "Theory");
        assert_eq!(abbreviator.abbreviate_word("Theoretical"), "Theor.");
        assert_eq!(abbreviator.abbreviate_word("quantum"), "quantum");
        assert_eq!(abbreviator.abbreviate_word("Quantitative"), "Quant.");
        assert_eq!(abbreviator.abbreviate_word("Molecular"), "Mol.");
        assert_eq!(abbreviator.abbreviate_word("Model"), "Model");
    }

    #[test]
    fn test_hyphenated_words() {
        let abbreviator = Abbreviator::new();
        assert_eq!(
            abbreviator.abbreviate("Physical-Chemical Reviews"),
            "Phys.-Chem. Rev."
        );
    }
}
