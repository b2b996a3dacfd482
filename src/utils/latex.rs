//! Text cleanup for citation output.
//!
//! Provider text arrives as HTML/JATS fragments with entities, typographic
//! punctuation and arbitrary Unicode. BibTeX output needs plain ASCII with
//! LaTeX commands; markdown and text output only need the markup removed.

use scraper::Html;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Remove markup tags and decode HTML entities
pub fn strip_markup(text: &str) -> String {
    if !text.contains('<') && !text.contains('&') {
        return text.to_string();
    }
    let fragment = Html::parse_fragment(text);
    fragment.root_element().text().collect()
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Markup-free, whitespace-normalized text for plain output formats
pub fn plain_text(text: &str) -> String {
    collapse_whitespace(&strip_markup(text))
}

/// Full BibTeX value pipeline: strip markup, transliterate punctuation, escape
pub fn to_latex(text: &str) -> String {
    latex_escape(&transliterate(&plain_text(text)))
}

/// Replace typographic punctuation with its ASCII spelling
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ascii_punctuation(c) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(c),
        }
    }
    out
}

fn ascii_punctuation(c: char) -> Option<&'static str> {
    let replacement = match c {
        '\u{2018}' | '\u{201B}' => "`",
        '\u{2019}' | '\u{201A}' | '\u{2032}' => "'",
        '\u{201C}' | '\u{201F}' => "``",
        '\u{201D}' | '\u{201E}' | '\u{2033}' => "''",
        '\u{2010}' | '\u{2011}' | '\u{2212}' => "-",
        '\u{2012}' | '\u{2013}' => "--",
        '\u{2014}' | '\u{2015}' => "---",
        '\u{2026}' => "...",
        '\u{00A0}' | '\u{2002}' | '\u{2003}' | '\u{2009}' | '\u{200A}' | '\u{202F}' => " ",
        '\u{200B}' | '\u{00AD}' => "",
        '\u{FB00}' => "ff",
        '\u{FB01}' => "fi",
        '\u{FB02}' => "fl",
        '\u{FB03}' => "ffi",
        '\u{FB04}' => "ffl",
        _ => return None,
    };
    Some(replacement)
}

/// Escape LaTeX specials and non-ASCII characters.
///
/// Every replacement is wrapped in braces (`{\&}`, `{\'e}`,
/// `{\ensuremath{\pi}}`). Characters without a known spelling are kept.
pub fn latex_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfc() {
        push_escaped(&mut out, c);
    }
    out
}

fn push_escaped(out: &mut String, c: char) {
    if c.is_ascii() {
        match ascii_special(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
        return;
    }
    if let Some(symbol) = latex_symbol(c) {
        out.push_str(symbol);
        return;
    }
    match accented_letter(c) {
        Some(accented) => out.push_str(&accented),
        None => out.push(c),
    }
}

fn ascii_special(c: char) -> Option<&'static str> {
    let escaped = match c {
        '#' => "{\\#}",
        '$' => "{\\$}",
        '%' => "{\\%}",
        '&' => "{\\&}",
        '_' => "{\\_}",
        '{' => "{\\{}",
        '}' => "{\\}}",
        '~' => "{\\textasciitilde}",
        '^' => "{\\textasciicircum}",
        '\\' => "{\\textbackslash}",
        _ => return None,
    };
    Some(escaped)
}

/// Letter plus combining accents, e.g. `é` -> `{\'e}`, `č` -> `{\v c}`
fn accented_letter(c: char) -> Option<String> {
    let mut decomposed = std::iter::once(c).nfd();
    let base = decomposed.next()?;
    if !base.is_ascii_alphabetic() {
        return None;
    }
    let marks: Vec<char> = decomposed.collect();
    if marks.is_empty() {
        return None;
    }

    let mut accented = base.to_string();
    for mark in marks {
        let command = accent_command(mark)?;
        accented = if command.chars().all(|c| c.is_ascii_alphabetic()) {
            format!("{{\\{} {}}}", command, accented)
        } else {
            format!("{{\\{}{}}}", command, accented)
        };
    }
    Some(accented)
}

fn accent_command(mark: char) -> Option<&'static str> {
    let command = match mark {
        '\u{0300}' => "`",
        '\u{0301}' => "'",
        '\u{0302}' => "^",
        '\u{0303}' => "~",
        '\u{0304}' => "=",
        '\u{0306}' => "u",
        '\u{0307}' => ".",
        '\u{0308}' => "\"",
        '\u{030A}' => "r",
        '\u{030B}' => "H",
        '\u{030C}' => "v",
        '\u{0323}' => "d",
        '\u{0327}' => "c",
        '\u{0328}' => "k",
        _ => return None,
    };
    Some(command)
}

fn latex_symbol(c: char) -> Option<&'static str> {
    let symbol = match c {
        // Letters without a decomposition
        'ß' => "{\\ss}",
        'æ' => "{\\ae}",
        'Æ' => "{\\AE}",
        'œ' => "{\\oe}",
        'Œ' => "{\\OE}",
        'ø' => "{\\o}",
        'Ø' => "{\\O}",
        'ł' => "{\\l}",
        'Ł' => "{\\L}",
        'ı' => "{\\i}",
        'ð' => "{\\dh}",
        'Ð' => "{\\DH}",
        'þ' => "{\\th}",
        'Þ' => "{\\TH}",
        'Å' | '\u{212B}' => "{\\AA}",
        'å' => "{\\aa}",

        // Greek
        'α' => "{\\ensuremath{\\alpha}}",
        'β' => "{\\ensuremath{\\beta}}",
        'γ' => "{\\ensuremath{\\gamma}}",
        'δ' => "{\\ensuremath{\\delta}}",
        'ε' => "{\\ensuremath{\\varepsilon}}",
        'ϵ' => "{\\ensuremath{\\epsilon}}",
        'ζ' => "{\\ensuremath{\\zeta}}",
        'η' => "{\\ensuremath{\\eta}}",
        'θ' => "{\\ensuremath{\\theta}}",
        'ϑ' => "{\\ensuremath{\\vartheta}}",
        'ι' => "{\\ensuremath{\\iota}}",
        'κ' => "{\\ensuremath{\\kappa}}",
        'λ' => "{\\ensuremath{\\lambda}}",
        'μ' | 'µ' => "{\\ensuremath{\\mu}}",
        'ν' => "{\\ensuremath{\\nu}}",
        'ξ' => "{\\ensuremath{\\xi}}",
        'π' => "{\\ensuremath{\\pi}}",
        'ϖ' => "{\\ensuremath{\\varpi}}",
        'ρ' => "{\\ensuremath{\\rho}}",
        'ϱ' => "{\\ensuremath{\\varrho}}",
        'σ' => "{\\ensuremath{\\sigma}}",
        'ς' => "{\\ensuremath{\\varsigma}}",
        'τ' => "{\\ensuremath{\\tau}}",
        'υ' => "{\\ensuremath{\\upsilon}}",
        'φ' => "{\\ensuremath{\\varphi}}",
        'ϕ' => "{\\ensuremath{\\phi}}",
        'χ' => "{\\ensuremath{\\chi}}",
        'ψ' => "{\\ensuremath{\\psi}}",
        'ω' => "{\\ensuremath{\\omega}}",
        'Γ' => "{\\ensuremath{\\Gamma}}",
        'Δ' | '∆' => "{\\ensuremath{\\Delta}}",
        'Θ' => "{\\ensuremath{\\Theta}}",
        'Λ' => "{\\ensuremath{\\Lambda}}",
        'Ξ' => "{\\ensuremath{\\Xi}}",
        'Π' => "{\\ensuremath{\\Pi}}",
        'Σ' => "{\\ensuremath{\\Sigma}}",
        'Υ' => "{\\ensuremath{\\Upsilon}}",
        'Φ' => "{\\ensuremath{\\Phi}}",
        'Ψ' => "{\\ensuremath{\\Psi}}",
        '\u{03A9}' | '\u{2126}' => "{\\ensuremath{\\Omega}}",

        // Math
        '×' => "{\\ensuremath{\\times}}",
        '÷' => "{\\ensuremath{\\div}}",
        '±' => "{\\ensuremath{\\pm}}",
        '∓' => "{\\ensuremath{\\mp}}",
        '·' | '⋅' => "{\\ensuremath{\\cdot}}",
        '≤' => "{\\ensuremath{\\leq}}",
        '≥' => "{\\ensuremath{\\geq}}",
        '≠' => "{\\ensuremath{\\neq}}",
        '≈' => "{\\ensuremath{\\approx}}",
        '≡' => "{\\ensuremath{\\equiv}}",
        '∼' => "{\\ensuremath{\\sim}}",
        '∝' => "{\\ensuremath{\\propto}}",
        '∞' => "{\\ensuremath{\\infty}}",
        '∂' => "{\\ensuremath{\\partial}}",
        '∇' => "{\\ensuremath{\\nabla}}",
        '∑' => "{\\ensuremath{\\sum}}",
        '∏' => "{\\ensuremath{\\prod}}",
        '∫' => "{\\ensuremath{\\int}}",
        '√' => "{\\ensuremath{\\surd}}",
        '∈' => "{\\ensuremath{\\in}}",
        '∉' => "{\\ensuremath{\\notin}}",
        '⊂' => "{\\ensuremath{\\subset}}",
        '∪' => "{\\ensuremath{\\cup}}",
        '∩' => "{\\ensuremath{\\cap}}",
        '∀' => "{\\ensuremath{\\forall}}",
        '∃' => "{\\ensuremath{\\exists}}",
        '→' => "{\\ensuremath{\\rightarrow}}",
        '←' => "{\\ensuremath{\\leftarrow}}",
        '↔' => "{\\ensuremath{\\leftrightarrow}}",
        '⇒' => "{\\ensuremath{\\Rightarrow}}",
        '⇌' => "{\\ensuremath{\\rightleftharpoons}}",
        '↑' => "{\\ensuremath{\\uparrow}}",
        '↓' => "{\\ensuremath{\\downarrow}}",
        '⟨' => "{\\ensuremath{\\langle}}",
        '⟩' => "{\\ensuremath{\\rangle}}",
        'ℏ' => "{\\ensuremath{\\hbar}}",
        '⁰' => "{\\ensuremath{^0}}",
        '¹' => "{\\ensuremath{^1}}",
        '²' => "{\\ensuremath{^2}}",
        '³' => "{\\ensuremath{^3}}",
        '⁴' => "{\\ensuremath{^4}}",
        '⁵' => "{\\ensuremath{^5}}",
        '⁶' => "{\\ensuremath{^6}}",
        '⁷' => "{\\ensuremath{^7}}",
        '⁸' => "{\\ensuremath{^8}}",
        '⁹' => "{\\ensuremath{^9}}",
        '⁺' => "{\\ensuremath{^+}}",
        '⁻' => "{\\ensuremath{^-}}",
        '₀' => "{\\ensuremath{_0}}",
        '₁' => "{\\ensuremath{_1}}",
        '₂' => "{\\ensuremath{_2}}",
        '₃' => "{\\ensuremath{_3}}",
        '₄' => "{\\ensuremath{_4}}",
        '₅' => "{\\ensuremath{_5}}",
        '₆' => "{\\ensuremath{_6}}",
        '₇' => "{\\ensuremath{_7}}",
        '₈' => "{\\ensuremath{_8}}",
        '₉' => "{\\ensuremath{_9}}",

        // Text symbols
        '°' => "{\\textdegree}",
        '©' => "{\\textcopyright}",
        '®' => "{\\textregistered}",
        '™' => "{\\texttrademark}",
        '§' => "{\\S}",
        '¶' => "{\\P}",
        '†' => "{\\dag}",
        '‡' => "{\\ddag}",
        '•' => "{\\textbullet}",
        '‰' => "{\\textperthousand}",
        '€' => "{\\texteuro}",
        '£' => "{\\pounds}",
        '¡' => "{\\textexclamdown}",
        '¿' => "{\\textquestiondown}",
        '«' => "{\\guillemotleft}",
        '»' => "{\\guillemotright}",
        _ => return None,
    };
    Some(symbol)
}

/// ASCII approximation for citation keys: accents dropped, special letters spelled out
pub fn unaccent(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfkd() {
        if is_combining_mark(c) {
            continue;
        }
        match c {
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'ø' => out.push('o'),
            'Ø' => out.push('O'),
            'ł' => out.push('l'),
            'Ł' => out.push('L'),
            'đ' | 'ð' => out.push('d'),
            'Đ' | 'Ð' => out.push('D'),
            'þ' => out.push_str("th"),
            'Þ' => out.push_str("Th"),
            'ı' => out.push('i'),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_markup() {
        assert_eq!(
            strip_markup("<jats:p>Deep <i>potential</i> models</jats:p>"),
            "Deep potential models"
        );
        assert_eq!(strip_markup("Science &amp; Technology"), "Science & Technology");
        assert_eq!(strip_markup("plain text"), "plain text");
    }

    #[test]
    fn test_plain_text_collapses_whitespace() {
        assert_eq!(
            plain_text("<jats:p>\n   First line\n   second line</jats:p>"),
            "First line second line"
        );
    }

    #[test]
    fn test_transliterate_punctuation() {
        assert_eq!(transliterate("“quoted” – it’s…"), "``quoted'' -- it's...");
        assert_eq!(transliterate("e\u{FB03}cient"), "efficient");
    }

    #[test]
    fn test_escape_specials() {
        assert_eq!(latex_escape("A & B"), "A {\\&} B");
        assert_eq!(latex_escape("50% of $x_1$"), "50{\\%} of {\\$}x{\\_}1{\\$}");
        assert_eq!(latex_escape("a{b}"), "a{\\{}b{\\}}");
    }

    #[test]
    fn test_escape_accents() {
        assert_eq!(latex_escape("Schrödinger"), "Schr{\\\"o}dinger");
        assert_eq!(latex_escape("Poincaré"), "Poincar{\\'e}");
        assert_eq!(latex_escape("Dvořák"), "Dvo{\\v r}{\\'a}k");
        assert_eq!(latex_escape("Façade"), "Fa{\\c c}ade");
        assert_eq!(latex_escape("Ørsted"), "{\\O}rsted");
    }

    #[test]
    fn test_escape_combining_sequence() {
        assert_eq!(latex_escape("e\u{0301}"), "{\\'e}");
    }

    #[test]
    fn test_escape_greek_and_math() {
        assert_eq!(latex_escape("QDπ"), "QD{\\ensuremath{\\pi}}");
        assert_eq!(latex_escape("Δ-MLP"), "{\\ensuremath{\\Delta}}-MLP");
        assert_eq!(latex_escape("10 Å"), "10 {\\AA}");
        assert_eq!(latex_escape("H₂O"), "H{\\ensuremath{_2}}O");
    }

    #[test]
    fn test_unknown_characters_are_kept() {
        assert_eq!(latex_escape("分子"), "分子");
    }

    #[test]
    fn test_to_latex_pipeline() {
        assert_eq!(
            to_latex("<i>Ab initio</i> “QDπ” &amp; co"),
            "Ab initio ``QD{\\ensuremath{\\pi}}'' {\\&} co"
        );
    }

    #[test]
    fn test_unaccent() {
        assert_eq!(unaccent("Gödel"), "Godel");
        assert_eq!(unaccent("Łukasiewicz"), "Lukasiewicz");
        assert_eq!(unaccent("Weiß"), "Weiss");
        assert_eq!(unaccent("Zeng"), "Zeng");
    }
}
