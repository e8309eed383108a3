//! Contact-field extraction from plain resume text.
//!
//! Operates on text that has already been through OCR or was pasted by the
//! user. Every field is best effort: anything not found is `None`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email pattern")
});

// Group 1 is the number; the outer guards reject windows inside longer digit runs.
static PHONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:^|[^\d+])((?:\+\d{1,3}[\s.-]?)?(?:\(\d{3}\)|\d{3})[\s.-]?\d{3}[\s.-]?\d{4})(?:$|\D)",
    )
    .expect("valid phone pattern")
});

const MAX_NAME_CHARS: usize = 60;

/// Contact fields pulled out of a resume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ResumeFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Extracts name, email and phone from resume text.
pub fn parse_resume_text(text: &str) -> ResumeFields {
    ResumeFields {
        name: text
            .lines()
            .map(str::trim)
            .find(|l| looks_like_name(l))
            .map(String::from),
        email: EMAIL.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string()),
    }
}

/// Two to four words of letters, optionally joined by `'`, `-` or `.`.
fn looks_like_name(line: &str) -> bool {
    if line.is_empty() || line.chars().count() > MAX_NAME_CHARS {
        return false;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len())
        && words.iter().all(|w| {
            w.chars().any(char::is_alphabetic)
                && w.chars()
                    .all(|c| c.is_alphabetic() || matches!(c, '\'' | '-' | '.'))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
        Jane Q. Doe
        Senior Software Engineer
        jane.doe+jobs@example.co.uk | +1 (555) 123-4567
        Portland, OR
    ";

    #[test]
    fn extracts_all_fields() {
        let fields = parse_resume_text(SAMPLE);
        assert_eq!(fields.name.as_deref(), Some("Jane Q. Doe"));
        assert_eq!(fields.email.as_deref(), Some("jane.doe+jobs@example.co.uk"));
        assert_eq!(fields.phone.as_deref(), Some("+1 (555) 123-4567"));
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(parse_resume_text(""), ResumeFields::default());
        assert_eq!(parse_resume_text("   \n\t\n"), ResumeFields::default());
    }

    #[test]
    fn phone_formats() {
        for (text, expected) in [
            ("call 555-123-4567 now", "555-123-4567"),
            ("tel: 555.123.4567", "555.123.4567"),
            ("5551234567", "5551234567"),
            ("+49 555 123 4567", "+49 555 123 4567"),
        ] {
            let phone = parse_resume_text(text).phone;
            assert_eq!(phone.as_deref(), Some(expected), "input: {text}");
        }

        assert_eq!(parse_resume_text("born 1990, zip 97201").phone, None);
    }

    #[test]
    fn phone_ignores_longer_digit_runs() {
        assert_eq!(parse_resume_text("Employee ID 4412345678901234").phone, None);
        assert_eq!(parse_resume_text("ref 55512345678").phone, None);

        let text = "Badge 4412345678901234\nMobile: 555-123-4567";
        assert_eq!(
            parse_resume_text(text).phone.as_deref(),
            Some("555-123-4567")
        );
    }

    #[test]
    fn name_skips_lines_that_are_not_names() {
        let text = "john@example.com\n555-123-4567\nResume\nMaria Garcia-Lopez\n";
        assert_eq!(
            parse_resume_text(text).name.as_deref(),
            Some("Maria Garcia-Lopez")
        );
    }

    #[test]
    fn name_rejects_long_or_numeric_lines() {
        assert!(!looks_like_name("Summary of 10 years"));
        assert!(!looks_like_name(&"Abc ".repeat(20)));
        assert!(!looks_like_name("One Two Three Four Five"));
        assert!(!looks_like_name("- -"));
        assert!(looks_like_name("O'Brien Smith"));
    }
}
