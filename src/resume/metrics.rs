use crate::resume::renderer::FontWeight;

// Helvetica advance widths (1/1000 em) for ' '..='~', from the standard AFM files.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const FALLBACK_WIDTH: u16 = 556;

/// The builtin PDF fonts only cover a Latin charset, so typographic
/// punctuation and accents are transliterated to ASCII first.
pub fn to_builtin_charset(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    unidecode::unidecode(text)
}

fn char_width(c: char, weight: FontWeight) -> u16 {
    let table = match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    };
    match c as u32 {
        code @ 32..=126 => table[(code - 32) as usize],
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in points.
pub fn text_width(text: &str, size: f64, weight: FontWeight) -> f64 {
    let units: u32 = text.chars().map(|c| char_width(c, weight) as u32).sum();
    units as f64 * size / 1000.0
}

/// Greedy word wrap to `max_width` points. Words wider than a whole line are
/// split between characters. Always returns at least one line.
///
/// Lines come back in the builtin charset, measured as they will be printed.
pub fn wrap_text(text: &str, size: f64, weight: FontWeight, max_width: f64) -> Vec<String> {
    let text = to_builtin_charset(text);
    let mut lines: Vec<String> = vec![];
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };

        if text_width(&candidate, size, weight) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, size, weight) <= max_width {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            let mut next = current.clone();
            next.push(c);
            if !current.is_empty() && text_width(&next, size, weight) > max_width {
                lines.push(std::mem::take(&mut current));
                current.push(c);
            } else {
                current = next;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        // "Hi" = H(722) + i(222)
        let width = text_width("Hi", 10.0, FontWeight::Regular);
        assert!((width - 9.44).abs() < 1e-9);

        assert!(text_width("Resume", 12.0, FontWeight::Bold) > text_width("Resume", 12.0, FontWeight::Regular));
    }

    #[test]
    fn test_wrap_fits_width() {
        let text = "Drive product vision and strategy for an open-source API definition language transforming API development.";
        let max_width = 200.0;
        let lines = wrap_text(text, 11.0, FontWeight::Regular, max_width);
        assert!(lines.len() > 1);
        for line in lines.iter() {
            assert!(text_width(line, 11.0, FontWeight::Regular) <= max_width, "too wide: {}", line);
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_short_and_empty() {
        assert_eq!(wrap_text("short", 11.0, FontWeight::Regular, 495.0), vec!["short"]);
        assert_eq!(wrap_text("", 11.0, FontWeight::Regular, 495.0), vec![""]);
        assert_eq!(wrap_text("a   b\n c", 11.0, FontWeight::Regular, 495.0), vec!["a b c"]);
    }

    #[test]
    fn test_wrap_breaks_long_word() {
        let word = "x".repeat(100);
        let lines = wrap_text(&word, 11.0, FontWeight::Regular, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in lines.iter() {
            assert!(text_width(line, 11.0, FontWeight::Regular) <= 50.0);
        }
    }

    #[test]
    fn test_wrap_measures_transliterated_text() {
        let text = "\u{20ac}\u{20ac}\u{20ac}\u{20ac}\u{20ac}\u{20ac} budget \u{2014} done \u{2014} shipped \u{2026} \u{201c}on time\u{201d} \u{20ac}\u{20ac}\u{20ac}";
        let max_width = 200.0;
        let lines = wrap_text(text, 11.0, FontWeight::Regular, max_width);
        assert!(lines.len() > 1);
        for line in lines.iter() {
            assert!(line.is_ascii(), "not transliterated: {}", line);
            let printed = to_builtin_charset(line);
            assert!(text_width(&printed, 11.0, FontWeight::Regular) <= max_width, "too wide: {}", printed);
        }
        assert!(lines.concat().contains("EUR"));
        assert!(lines.concat().contains("--"));
    }

    #[test]
    fn test_to_builtin_charset() {
        assert_eq!(to_builtin_charset("plain"), "plain");
        let converted = to_builtin_charset("TypeSpec\u{2014}a \u{201c}language\u{201d} caf\u{e9}");
        assert!(converted.is_ascii());
        assert!(converted.contains("cafe"));
        assert!(converted.contains("\"language\""));
    }
}
