//! Percent-style numeric format templates (`%.2f`, `%05d`, `%+.3e`, ...).

use thiserror::Error;

/// Why a template could not be parsed or applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("template has no format directive")]
    NoDirective,
    #[error("template has more than one value directive")]
    TooManyDirectives,
    #[error("incomplete format directive")]
    Incomplete,
    #[error("unsupported format character '{0}'")]
    Unsupported(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
    Integer,
    Fixed { upper: bool },
    Exponent { upper: bool },
    General { upper: bool },
    Str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Flags {
    left_align: bool,
    plus_sign: bool,
    space_sign: bool,
    zero_pad: bool,
    alternate: bool,
    width: usize,
    precision: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Directive(Flags, Conversion),
}

/// A parsed template with exactly one value directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentFormat {
    pieces: Vec<Piece>,
}

impl PercentFormat {
    /// Parse a template. `%%` is a literal percent sign.
    pub fn parse(template: &str) -> Result<Self, FormatError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut directives = 0;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                literal.push('%');
                continue;
            }

            let mut flags = Flags::default();
            while let Some(&flag) = chars.peek() {
                match flag {
                    '-' => flags.left_align = true,
                    '+' => flags.plus_sign = true,
                    ' ' => flags.space_sign = true,
                    '0' => flags.zero_pad = true,
                    '#' => flags.alternate = true,
                    _ => break,
                }
                chars.next();
            }
            flags.width = take_number(&mut chars).unwrap_or(0);
            if chars.peek() == Some(&'.') {
                chars.next();
                flags.precision = Some(take_number(&mut chars).unwrap_or(0));
            }
            let conversion = match chars.next().ok_or(FormatError::Incomplete)? {
                'd' | 'i' | 'u' => Conversion::Integer,
                'f' => Conversion::Fixed { upper: false },
                'F' => Conversion::Fixed { upper: true },
                'e' => Conversion::Exponent { upper: false },
                'E' => Conversion::Exponent { upper: true },
                'g' => Conversion::General { upper: false },
                'G' => Conversion::General { upper: true },
                's' => Conversion::Str,
                other => return Err(FormatError::Unsupported(other)),
            };

            directives += 1;
            if directives > 1 {
                return Err(FormatError::TooManyDirectives);
            }
            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Directive(flags, conversion));
        }

        if directives == 0 {
            return Err(FormatError::NoDirective);
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { pieces })
    }

    /// Format a number with the template.
    pub fn format(&self, value: f64) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Directive(flags, conversion) => out.push_str(&render(flags, *conversion, value)),
            }
        }
        out
    }
}

/// Returns true if the template contains a `%` directive marker.
pub fn has_directive(template: &str) -> bool {
    template.contains('%')
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        digits.push(d);
        chars.next();
    }
    digits.parse().ok()
}

fn render(flags: &Flags, conversion: Conversion, value: f64) -> String {
    if !value.is_finite() {
        let text = if value.is_nan() {
            "nan"
        } else if value > 0.0 {
            "inf"
        } else {
            "-inf"
        };
        let text = match conversion {
            Conversion::Fixed { upper: true }
            | Conversion::Exponent { upper: true }
            | Conversion::General { upper: true } => text.to_uppercase(),
            _ => text.to_string(),
        };
        return pad(flags, String::new(), text, false);
    }

    let negative = value.is_sign_negative() && value != 0.0;
    let magnitude = value.abs();
    let body = match conversion {
        Conversion::Integer => format!("{}", magnitude.trunc()),
        Conversion::Fixed { upper: _ } => format!("{:.*}", flags.precision.unwrap_or(6), magnitude),
        Conversion::Exponent { upper } => {
            exponent(magnitude, flags.precision.unwrap_or(6), upper)
        }
        Conversion::General { upper } => general(magnitude, flags.precision.unwrap_or(6), upper, flags.alternate),
        Conversion::Str => {
            let text = crate::table::Value::Float(magnitude).to_text();
            match flags.precision {
                Some(p) => text.chars().take(p).collect(),
                None => text,
            }
        }
    };

    let sign = if negative {
        "-"
    } else if flags.plus_sign && conversion != Conversion::Str {
        "+"
    } else if flags.space_sign && conversion != Conversion::Str {
        " "
    } else {
        ""
    };
    let numeric = conversion != Conversion::Str;
    pad(flags, sign.to_string(), body, numeric)
}

/// Apply width, alignment and zero padding.
fn pad(flags: &Flags, sign: String, body: String, numeric: bool) -> String {
    let len = sign.chars().count() + body.chars().count();
    if len >= flags.width {
        return sign + &body;
    }
    let fill = flags.width - len;
    if flags.left_align {
        format!("{sign}{body}{}", " ".repeat(fill))
    } else if flags.zero_pad && numeric {
        format!("{sign}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{sign}{body}", " ".repeat(fill))
    }
}

/// `d.ddde+XX` with at least two exponent digits.
fn exponent(magnitude: f64, precision: usize, upper: bool) -> String {
    let raw = format!("{:.*e}", precision, magnitude);
    let (mantissa, exp) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if exp < 0 { '-' } else { '+' };
    let marker = if upper { 'E' } else { 'e' };
    format!("{mantissa}{marker}{sign}{:02}", exp.abs())
}

/// `%g`: fixed or exponent notation depending on the decimal exponent,
/// trailing zeros removed unless `#` is given.
fn general(magnitude: f64, precision: usize, upper: bool, alternate: bool) -> String {
    let precision = precision.max(1);
    if magnitude == 0.0 {
        return if alternate {
            format!("{:.*}", precision - 1, 0.0)
        } else {
            "0".to_string()
        };
    }

    // Exponent after rounding to `precision` significant digits.
    let rounded = format!("{:.*e}", precision - 1, magnitude);
    let exp: i32 = rounded
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    let text = if exp < -4 || exp >= precision as i32 {
        exponent(magnitude, precision - 1, upper)
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        format!("{:.*}", decimals, magnitude)
    };

    if alternate {
        return text;
    }
    strip_trailing_zeros(&text)
}

fn strip_trailing_zeros(text: &str) -> String {
    let (number, suffix) = match text.find(['e', 'E']) {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    };
    let number = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    format!("{number}{suffix}")
}
