//! printf-style rendering of translation templates
//!
//! Supports the verbs `%s %v %d %f %q %x %X %c %t %%`, the `-` and `0`
//! flags, a width and a `.precision`. Nothing here panics: an argument that
//! does not fit its verb, a missing or surplus argument, or a dangling `%`
//! are rendered inline as `%!` markers.

use std::fmt::{self, Write};

/// Largest width or precision accepted before `%!(BADWIDTH)`/`%!(BADPREC)`.
const MAX_PADDING: usize = 1_000_000;

/// Default digits after the point for `%f`.
const DEFAULT_FLOAT_PRECISION: usize = 6;

/// A value substituted into a template.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatArg {
    Str(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl FormatArg {
    /// Type label used in mismatch markers.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Float(_) => "float64",
            Self::Bool(_) => "bool",
            Self::Char(_) => "char",
        }
    }
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Float(x) => f.write_str(&float_special(*x).unwrap_or_else(|| x.to_string())),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "{c}"),
        }
    }
}

impl From<&str> for FormatArg {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for FormatArg {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for FormatArg {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

macro_rules! impl_from_widening {
    ($variant:ident: $target:ty => $($ty:ty),*) => {
        $(
            impl From<$ty> for FormatArg {
                fn from(value: $ty) -> Self {
                    Self::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from_widening!(Int: i64 => i8, i16, i32, i64);
impl_from_widening!(Uint: u64 => u8, u16, u32, u64);
impl_from_widening!(Float: f64 => f32, f64);

impl From<isize> for FormatArg {
    fn from(value: isize) -> Self {
        i64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<usize> for FormatArg {
    fn from(value: usize) -> Self {
        u64::try_from(value).map_or_else(|_| Self::Str(value.to_string()), Self::Uint)
    }
}

impl From<bool> for FormatArg {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<char> for FormatArg {
    fn from(value: char) -> Self {
        Self::Char(value)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    minus: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// A rendered argument before padding.
struct Rendered {
    text: String,
    /// The `0` flag pads with zeros after the sign.
    zero_pad: bool,
}

impl Rendered {
    fn text(text: String) -> Self {
        Self {
            text,
            zero_pad: false,
        }
    }

    fn number(text: String) -> Self {
        Self {
            text,
            zero_pad: true,
        }
    }

    /// An explicit precision already fixes the digit count of an integer.
    fn integer(negative: bool, digits: &str, spec: &Spec) -> Self {
        let mut text = String::new();
        if negative {
            text.push('-');
        }
        if let Some(min) = spec.precision {
            text.extend(std::iter::repeat_n('0', min.saturating_sub(digits.len())));
        }
        text.push_str(digits);
        Self {
            text,
            zero_pad: spec.precision.is_none(),
        }
    }

    fn float(x: f64, precision: usize) -> Self {
        match float_special(x) {
            Some(text) => Self::text(text),
            None => Self::number(format!("{x:.precision$}")),
        }
    }
}

/// Substitute `args` into `template`.
///
/// # Example
///
/// ```
/// use pocatalog::provider::format::{format, FormatArg};
///
/// let args: [FormatArg; 2] = ["Bob".into(), 3.into()];
/// assert_eq!(format("%s has %03d items", &args), "Bob has 003 items");
/// assert_eq!(format("%d", &[]), "%!d(MISSING)");
/// ```
#[must_use]
pub fn format(template: &str, args: &[FormatArg]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = Spec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '0' => spec.zero = true,
                _ => break,
            }
            chars.next();
        }

        if let Some(width) = take_number(&mut chars) {
            if width > MAX_PADDING {
                out.push_str("%!(BADWIDTH)");
            } else {
                spec.width = Some(width);
            }
        }
        if chars.peek() == Some(&'.') {
            chars.next();
            let precision = take_number(&mut chars).unwrap_or(0);
            if precision > MAX_PADDING {
                out.push_str("%!(BADPREC)");
            } else {
                spec.precision = Some(precision);
            }
        }

        let Some(verb) = chars.next() else {
            out.push_str("%!(NOVERB)");
            break;
        };
        if verb == '%' {
            out.push('%');
            continue;
        }

        let Some(arg) = args.get(next_arg) else {
            let _ = write!(out, "%!{verb}(MISSING)");
            continue;
        };
        next_arg += 1;

        match render(verb, &spec, arg) {
            Some(rendered) => pad_into(&mut out, &rendered, &spec),
            None => {
                let _ = write!(out, "%!{verb}({}={arg})", arg.type_name());
            }
        }
    }

    if next_arg < args.len() {
        out.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let _ = write!(out, "{}={arg}", arg.type_name());
        }
        out.push(')');
    }

    out
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut value: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(digit as usize),
        );
    }
    value
}

fn render(verb: char, spec: &Spec, arg: &FormatArg) -> Option<Rendered> {
    use FormatArg::{Bool, Char, Float, Int, Str, Uint};

    let rendered = match (verb, arg) {
        ('v', Str(s)) | ('s', Str(s)) => Rendered::text(truncate(s, spec.precision)),
        ('s', Char(c)) => Rendered::text(c.to_string()),
        ('v', Float(x)) => match spec.precision {
            Some(p) => Rendered::float(*x, p),
            None if float_special(*x).is_some() => Rendered::text(arg.to_string()),
            None => Rendered::number(arg.to_string()),
        },
        ('v', Int(_) | Uint(_)) => Rendered::number(arg.to_string()),
        ('v', Bool(_) | Char(_)) => Rendered::text(arg.to_string()),

        ('d', Int(n)) => Rendered::integer(n.is_negative(), &n.unsigned_abs().to_string(), spec),
        ('d', Uint(n)) => Rendered::integer(false, &n.to_string(), spec),
        ('d', Char(c)) => Rendered::integer(false, &u32::from(*c).to_string(), spec),

        ('f', Float(x)) => Rendered::float(*x, spec.precision.unwrap_or(DEFAULT_FLOAT_PRECISION)),

        ('q', Str(s)) => Rendered::text(format!("{:?}", truncate(s, spec.precision))),
        ('q', Char(c)) => Rendered::text(format!("{c:?}")),
        ('q', Int(_) | Uint(_)) => Rendered::text(format!("{:?}", to_char(arg)?)),

        ('x' | 'X', Str(s)) => {
            let bytes = s.as_bytes();
            let bytes = match spec.precision {
                Some(p) => &bytes[..p.min(bytes.len())],
                None => bytes,
            };
            let mut hex = String::with_capacity(bytes.len() * 2);
            for byte in bytes {
                let _ = if verb == 'x' {
                    write!(hex, "{byte:02x}")
                } else {
                    write!(hex, "{byte:02X}")
                };
            }
            Rendered::text(hex)
        }
        ('x' | 'X', Int(n)) => Rendered::integer(n.is_negative(), &hex(n.unsigned_abs(), verb), spec),
        ('x' | 'X', Uint(n)) => Rendered::integer(false, &hex(*n, verb), spec),
        ('x' | 'X', Char(c)) => Rendered::integer(false, &hex(u64::from(u32::from(*c)), verb), spec),

        ('c', Char(c)) => Rendered::text(c.to_string()),
        ('c', Int(_) | Uint(_)) => Rendered::text(to_char(arg)?.to_string()),

        ('t', Bool(b)) => Rendered::text(b.to_string()),

        _ => return None,
    };
    Some(rendered)
}

/// Code point of an integer argument, `U+FFFD` when out of range.
fn to_char(arg: &FormatArg) -> Option<char> {
    let code = match arg {
        FormatArg::Int(n) => u32::try_from(*n).ok(),
        FormatArg::Uint(n) => u32::try_from(*n).ok(),
        _ => return None,
    };
    Some(code.and_then(char::from_u32).unwrap_or(char::REPLACEMENT_CHARACTER))
}

fn hex(n: u64, verb: char) -> String {
    if verb == 'X' {
        format!("{n:X}")
    } else {
        format!("{n:x}")
    }
}

fn float_special(x: f64) -> Option<String> {
    if x.is_nan() {
        Some("NaN".to_string())
    } else if x.is_infinite() {
        Some(if x > 0.0 { "+Inf" } else { "-Inf" }.to_string())
    } else {
        None
    }
}

fn truncate(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    }
}

fn pad_into(out: &mut String, rendered: &Rendered, spec: &Spec) {
    let len = rendered.text.chars().count();
    let fill = spec.width.unwrap_or(0).saturating_sub(len);
    if fill == 0 {
        out.push_str(&rendered.text);
        return;
    }

    if spec.minus {
        out.push_str(&rendered.text);
        out.extend(std::iter::repeat_n(' ', fill));
    } else if spec.zero && rendered.zero_pad {
        let digits = match rendered.text.strip_prefix('-') {
            Some(rest) => {
                out.push('-');
                rest
            }
            None => rendered.text.as_str(),
        };
        out.extend(std::iter::repeat_n('0', fill));
        out.push_str(digits);
    } else {
        out.extend(std::iter::repeat_n(' ', fill));
        out.push_str(&rendered.text);
    }
}
