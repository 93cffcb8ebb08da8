//! Primitive argument types.
//!
//! Thin adapters over the standard library parsers. Each one reads a value
//! from the front of the remaining input and reports how many bytes it
//! consumed, so the engine can continue matching after it.

use std::fmt::Debug;
use std::str::FromStr;

use crate::context::ArgumentValue;
use crate::error::ArgumentError;

/// A parser for one typed argument position.
pub trait ArgumentType: Send + Sync + Debug {
    /// Parse a value from the start of `input`.
    ///
    /// Returns the value and the number of bytes consumed.
    fn parse(&self, input: &str) -> Result<(ArgumentValue, usize), ArgumentError>;

    /// Human-readable type name (e.g. "integer").
    fn type_name(&self) -> &'static str;
}

/// Everything up to the next space.
fn read_word(input: &str) -> &str {
    let end = input.find(' ').unwrap_or(input.len());
    &input[..end]
}

fn parse_number<T>(input: &str, expected: &'static str) -> Result<(T, usize), ArgumentError>
where
    T: FromStr,
{
    let word = read_word(input);
    let malformed = || ArgumentError::Malformed {
        expected,
        found: word.to_string(),
    };
    // Digits, sign and decimal point only: no `+5`, `1e5` or `inf`.
    if !word.bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b'.') {
        return Err(malformed());
    }
    word.parse::<T>()
        .map(|v| (v, word.len()))
        .map_err(|_| malformed())
}

fn check_range<T>(value: T, min: T, max: T, type_name: &'static str) -> Result<T, ArgumentError>
where
    T: PartialOrd + ToString,
{
    if value < min || value > max {
        return Err(ArgumentError::OutOfRange {
            type_name,
            min: min.to_string(),
            max: max.to_string(),
            found: value.to_string(),
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolArgumentType;

impl ArgumentType for BoolArgumentType {
    fn parse(&self, input: &str) -> Result<(ArgumentValue, usize), ArgumentError> {
        let word = read_word(input);
        match word {
            "true" => Ok((ArgumentValue::Bool(true), word.len())),
            "false" => Ok((ArgumentValue::Bool(false), word.len())),
            _ => Err(ArgumentError::Malformed {
                expected: "bool",
                found: word.to_string(),
            }),
        }
    }

    fn type_name(&self) -> &'static str {
        "bool"
    }
}

macro_rules! bounded_type {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident, $label:literal, $display:literal, $lo:expr, $hi:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub struct $name {
            pub min: $ty,
            pub max: $ty,
        }

        impl $name {
            pub fn new(min: $ty, max: $ty) -> Self {
                Self { min, max }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new($lo, $hi)
            }
        }

        impl ArgumentType for $name {
            fn parse(&self, input: &str) -> Result<(ArgumentValue, usize), ArgumentError> {
                let (value, consumed) = parse_number::<$ty>(input, $label)?;
                let value = check_range(value, self.min, self.max, $display)?;
                Ok((ArgumentValue::$variant(value), consumed))
            }

            fn type_name(&self) -> &'static str {
                $label
            }
        }
    };
}

bounded_type!(
    /// 32-bit integer with inclusive bounds.
    IntegerArgumentType, i32, Int, "integer", "Integer", i32::MIN, i32::MAX
);
bounded_type!(
    /// 64-bit integer with inclusive bounds.
    LongArgumentType, i64, Long, "long", "Long", i64::MIN, i64::MAX
);
bounded_type!(
    /// `f32` with inclusive bounds. Defaults to the full finite range.
    FloatArgumentType, f32, Float, "float", "Float", -f32::MAX, f32::MAX
);
bounded_type!(
    DoubleArgumentType, f64, Double, "double", "Double", -f64::MAX, f64::MAX
);

/// String arguments in their three reading modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringArgumentType {
    /// A single space-free word.
    Word,
    /// A word, or a double-quoted phrase with `\"` and `\\` escapes.
    Quoted,
    /// The rest of the input, spaces included.
    Greedy,
}

impl StringArgumentType {
    fn read_quoted(input: &str) -> Result<(String, usize), ArgumentError> {
        let mut out = String::new();
        let mut escaped = false;
        // Skip the opening quote.
        for (i, c) in input.char_indices().skip(1) {
            if escaped {
                if c != '"' && c != '\\' {
                    return Err(ArgumentError::Malformed {
                        expected: "valid escape sequence",
                        found: format!("\\{c}"),
                    });
                }
                out.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                return Ok((out, i + c.len_utf8()));
            } else {
                out.push(c);
            }
        }
        Err(ArgumentError::Malformed {
            expected: "closing quote",
            found: input.to_string(),
        })
    }
}

impl ArgumentType for StringArgumentType {
    fn parse(&self, input: &str) -> Result<(ArgumentValue, usize), ArgumentError> {
        if *self == StringArgumentType::Quoted && input.starts_with('"') {
            // `""` is the only way to pass an empty string.
            let (text, consumed) = Self::read_quoted(input)?;
            return Ok((ArgumentValue::String(text), consumed));
        }
        let (text, consumed) = match self {
            StringArgumentType::Greedy => (input.to_string(), input.len()),
            StringArgumentType::Word | StringArgumentType::Quoted => {
                let word = read_word(input);
                (word.to_string(), word.len())
            }
        };
        if text.is_empty() {
            return Err(ArgumentError::Malformed {
                expected: "string",
                found: String::new(),
            });
        }
        Ok((ArgumentValue::String(text), consumed))
    }

    fn type_name(&self) -> &'static str {
        match self {
            StringArgumentType::Word => "word",
            StringArgumentType::Quoted => "string",
            StringArgumentType::Greedy => "greedy string",
        }
    }
}
