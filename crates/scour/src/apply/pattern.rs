//! Regex compilation, start-anchored matching and replacement templates.
//!
//! Rule authors write replacement templates with backslash group references
//! (`\1`, `\g<2>`, `\g<name>`). The `regex` crate expects `$` references, so
//! templates are translated once per (rule, column) before substitution.

use regex::Regex;

use crate::error::{Result, ScourError};

/// Compile a rule pattern, attributing failures to the rule.
pub fn compile(rule_id: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| ScourError::PatternCompile {
        rule_id: rule_id.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// True if the pattern matches at the very beginning of `text`.
///
/// Leftmost-first search reports a match at offset 0 whenever one exists, so
/// checking the start of the first match is equivalent to anchoring.
pub fn matches_at_start(regex: &Regex, text: &str) -> bool {
    regex.find(text).is_some_and(|m| m.start() == 0)
}

/// Translate a backslash-style replacement template into `regex` syntax.
///
/// Group references are checked against the compiled pattern; unknown
/// letter escapes and dangling backslashes are rejected.
pub fn translate_replacement(rule_id: &str, regex: &Regex, template: &str) -> Result<String> {
    let invalid = |message: String| ScourError::InvalidReplacement {
        rule_id: rule_id.to_string(),
        replacement: template.to_string(),
        message,
    };
    let group_count = regex.captures_len() - 1;
    let check_number = |n: usize| {
        if n == 0 || n > group_count {
            Err(invalid(format!("invalid group reference {n}")))
        } else {
            Ok(format!("${{{n}}}"))
        }
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => {
                let Some(next) = chars.next() else {
                    return Err(invalid("bad escape (end of template)".to_string()));
                };
                match next {
                    '0' => {
                        let mut code = 0;
                        for _ in 0..2 {
                            match chars.peek().and_then(|d| d.to_digit(8)) {
                                Some(d) => {
                                    code = code * 8 + d;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        push_code(&mut out, code);
                    }
                    '1'..='9' => {
                        let first = next.to_digit(10).unwrap_or_default();
                        let Some(second) = chars.peek().and_then(|d| d.to_digit(10)) else {
                            out.push_str(&check_number(first as usize)?);
                            continue;
                        };
                        chars.next();
                        match chars.peek().and_then(|d| d.to_digit(8)) {
                            Some(third) if first < 8 && second < 8 => {
                                chars.next();
                                let code = first * 64 + second * 8 + third;
                                if code > 0o377 {
                                    return Err(invalid(format!(
                                        "octal escape \\{first}{second}{third} out of range"
                                    )));
                                }
                                push_code(&mut out, code);
                            }
                            _ => out.push_str(&check_number((first * 10 + second) as usize)?),
                        }
                    }
                    'g' => {
                        if chars.next() != Some('<') {
                            return Err(invalid("missing '<' after \\g".to_string()));
                        }
                        let name: String = chars.by_ref().take_while(|&ch| ch != '>').collect();
                        if name.is_empty() {
                            return Err(invalid("empty group reference".to_string()));
                        }
                        if let Ok(n) = name.parse::<usize>() {
                            if n == 0 {
                                out.push_str("${0}");
                            } else {
                                out.push_str(&check_number(n)?);
                            }
                        } else if regex.capture_names().flatten().any(|g| g == name) {
                            out.push_str(&format!("${{{name}}}"));
                        } else {
                            return Err(invalid(format!("unknown group name '{name}'")));
                        }
                    }
                    '\\' => out.push('\\'),
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'f' => out.push('\x0c'),
                    'v' => out.push('\x0b'),
                    'a' => out.push('\x07'),
                    'b' => out.push('\x08'),
                    letter if letter.is_ascii_alphanumeric() => {
                        return Err(invalid(format!("bad escape \\{letter}")));
                    }
                    other => {
                        out.push('\\');
                        if other == '$' {
                            out.push_str("$$");
                        } else {
                            out.push(other);
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Append the character of an octal escape to a translated template.
fn push_code(out: &mut String, code: u32) {
    match char::from_u32(code) {
        Some('$') => out.push_str("$$"),
        Some(ch) => out.push(ch),
        None => {}
    }
}

/// A pattern plus its translated replacement, ready to rewrite text.
#[derive(Debug, Clone)]
pub struct Substitution {
    regex: Regex,
    template: String,
}

impl Substitution {
    /// Compile `pattern` and translate `replacement` for use with it.
    pub fn new(rule_id: &str, pattern: &str, replacement: &str) -> Result<Self> {
        let regex = compile(rule_id, pattern)?;
        let template = translate_replacement(rule_id, &regex, replacement)?;
        Ok(Self { regex, template })
    }

    /// Replace every match in `text`.
    ///
    /// An empty match directly after a non-empty one is replaced too, so
    /// `x*` over `abxd` yields `-a-b--d-`. `Regex::replace_all` would skip it.
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut pos = 0;
        let mut after_empty = false;

        while let Some(caps) = self.regex.captures_at(text, pos) {
            let Some(m) = caps.get(0) else { break };
            if after_empty && m.is_empty() && m.start() == pos {
                // no second empty match at the same offset
                let Some(ch) = text[pos..].chars().next() else { break };
                pos += ch.len_utf8();
                after_empty = false;
                continue;
            }
            out.push_str(&text[copied..m.start()]);
            caps.expand(&self.template, &mut out);
            copied = m.end();
            pos = m.end();
            after_empty = m.is_empty();
        }

        out.push_str(&text[copied..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(pattern: &str, template: &str) -> Result<String> {
        translate_replacement("r", &Regex::new(pattern).unwrap(), template)
    }

    #[test]
    fn test_matches_at_start() {
        let re = Regex::new(r"\d+").unwrap();
        assert!(matches_at_start(&re, "12abc"));
        assert!(!matches_at_start(&re, "abc12"));
        let empty = Regex::new(r"^(nan|None|\s*)$").unwrap();
        assert!(matches_at_start(&empty, ""));
        assert!(matches_at_start(&empty, "None"));
        assert!(!matches_at_start(&empty, "Item_1"));
    }

    #[test]
    fn test_translate_group_references() {
        assert_eq!(translate(r"(\d{3})-(\d{4})", r"+1-\1-\2").unwrap(), "+1-${1}-${2}");
        assert_eq!(translate(r"(?P<area>\d{3})", r"\g<area>").unwrap(), "${area}");
        assert_eq!(translate(r"(a)", r"\g<1>0").unwrap(), "${1}0");
        assert_eq!(translate(r"(a)", r"costs $5").unwrap(), "costs $$5");
        assert_eq!(translate(r"a", r"x\\y").unwrap(), r"x\y");
        assert_eq!(translate(r"a", r"\&").unwrap(), r"\&");
    }

    #[test]
    fn test_translate_rejects_bad_templates() {
        assert!(matches!(
            translate(r"(a)", r"\2"),
            Err(ScourError::InvalidReplacement { .. })
        ));
        assert!(translate(r"a", r"\d").is_err());
        assert!(translate(r"a", "trailing\\").is_err());
        assert!(translate(r"(a)", r"\g<nope>").is_err());
        assert!(translate(r"(a)", r"\477").is_err());
    }

    #[test]
    fn test_translate_octal_escapes() {
        assert_eq!(translate(r"a", r"\0").unwrap(), "\0");
        assert_eq!(translate(r"a", r"x\012y").unwrap(), "x\ny");
        assert_eq!(translate(r"a", r"\101").unwrap(), "A");
        assert_eq!(translate(r"a", r"\044").unwrap(), "$$");
        // two digits then a non-octal digit stay a group reference
        let twelve = format!("({})", ["(a)"; 12].concat());
        assert_eq!(translate(&twelve, r"\128").unwrap(), "${12}8");
    }

    #[test]
    fn test_empty_match_after_non_empty_match() {
        let sub = Substitution::new("r", "x*", "-").unwrap();
        assert_eq!(sub.apply("abxd"), "-a-b--d-");
        assert_eq!(sub.apply(""), "-");
        let nul = Substitution::new("r", "b", r"\0").unwrap();
        assert_eq!(nul.apply("abc"), "a\0c");
    }

    #[test]
    fn test_substitution_applies_globally() {
        let sub = Substitution::new("r", r"(\w+)@(\w+)", r"\2 at \1").unwrap();
        assert_eq!(sub.apply("a@b c@d"), "b at a d at c");
        let title = Substitution::new("r", r"^(.*)$", r"\1").unwrap();
        assert_eq!(title.apply("food"), "food");
    }

    #[test]
    fn test_compile_error_names_rule() {
        let err = compile("bad_rule", "invalid[regex").unwrap_err();
        match err {
            ScourError::PatternCompile { rule_id, pattern, .. } => {
                assert_eq!(rule_id, "bad_rule");
                assert_eq!(pattern, "invalid[regex");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
