use std::fmt;

use num_bigint::BigInt;
use num_traits::Num;

use crate::errors::*;

/// Sentinel returned by `convert` when the input is not a numeral
/// of the source base. Conversion failures are not fatal to the caller
pub const INVALID: &str = "Invalid";

/// Active numeral system of the base keypad
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NumberSystem {
    Bin,
    Oct,
    Dec,
    Hex,
}

impl NumberSystem {
    pub fn radix(self) -> u32 {
        match self {
            NumberSystem::Bin => 2,
            NumberSystem::Oct => 8,
            NumberSystem::Dec => 10,
            NumberSystem::Hex => 16,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NumberSystem::Bin => "BIN",
            NumberSystem::Oct => "OCT",
            NumberSystem::Dec => "DEC",
            NumberSystem::Hex => "HEX",
        }
    }

    pub fn all() -> [NumberSystem; 4] {
        [
            NumberSystem::Bin,
            NumberSystem::Oct,
            NumberSystem::Dec,
            NumberSystem::Hex,
        ]
    }

    /// Is `c` a digit of this system? Drives keypad enablement:
    /// `9` is dead in octal mode, `F` only lives in hex mode
    pub fn permits_digit(self, c: char) -> bool {
        let v = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='F' => c as u32 - 'A' as u32 + 10,
            'a'..='f' => c as u32 - 'a' as u32 + 10,
            _ => return false,
        };
        v < self.radix()
    }
}

impl fmt::Display for NumberSystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Converts an integer numeral between numeral systems.
/// The identical source and target system return the input unchanged.
/// A string that is not a valid numeral of the source base converts to
/// the `"Invalid"` sentinel instead of failing. Alphabetic digits of
/// the output are always uppercase
pub fn convert(value: &str, from: NumberSystem, to: NumberSystem) -> String {
    if from == to {
        return value.to_string();
    }
    match BigInt::from_str_radix(value.trim(), from.radix()) {
        Ok(i) => i.to_str_radix(to.radix()).to_uppercase(),
        Err(..) => INVALID.to_string(),
    }
}

/// Appends the closing brackets the user did not bother to type.
/// Only the deficit is appended; balanced text is left alone
pub fn auto_close(expr: &str) -> String {
    let opens = expr.matches('(').count();
    let closes = expr.matches(')').count();
    let mut out = expr.to_string();
    for _i in closes..opens {
        out.push(')');
    }
    out
}

/// Prepares raw keypad text for the evaluator: closes trailing brackets
/// and, outside the decimal system, rewrites bare numeral runs into
/// decimal (the evaluator reads plain literals in decimal only)
pub fn prepare(expr: &str, system: NumberSystem) -> Result<String, CalcError> {
    let expr = auto_close(expr);
    if system == NumberSystem::Dec {
        return Ok(expr);
    }
    rewrite_numerals(&expr, system)
}

// a numeral run is built from the digits the base keypad can emit
fn is_run_char(c: char) -> bool {
    c.is_ascii_digit() || ('A'..='F').contains(&c) || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_marker(c: char) -> bool {
    c == 'b' || c == 'h' || c == 'o'
}

/// Rewrites every bare numeral run of `expr` from `system` into decimal.
/// The scan is a real tokenizer, not a regex:
/// * a run is a maximal `[0-9A-F_]+` sequence; identifiers are skipped
///   wholly, so the digits of `log2(` or `log10(` are never touched;
/// * a run carrying an explicit base marker (`101b`, `FFh`, `17o`) is
///   copied verbatim - the evaluator reads those itself;
/// * a run with a digit invalid for `system` is an error, not garbage
pub fn rewrite_numerals(expr: &str, system: NumberSystem) -> Result<String, CalcError> {
    let chars: Vec<char> = expr.chars().collect();
    let mut out = String::with_capacity(expr.len());
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];

        if is_run_char(c) {
            let start = i;
            while i < chars.len() && is_run_char(chars[i]) {
                i += 1;
            }
            if i < chars.len() && is_marker(chars[i]) {
                // explicit marker: the literal already speaks for itself
                for ch in &chars[start..=i] {
                    out.push(*ch);
                }
                i += 1;
                continue;
            }
            let run: String = chars[start..i].iter().collect();
            let digits = run.replace("_", "");
            if digits.is_empty() {
                return Err(CalcError::BadNumeral(run, system.label()));
            }
            match BigInt::from_str_radix(&digits, system.radix()) {
                Ok(v) => out.push_str(&v.to_string()),
                Err(..) => return Err(CalcError::BadNumeral(run, system.label())),
            }
            continue;
        }

        if c.is_ascii_alphabetic() {
            // identifier: copy it wholly, digits included
            while i < chars.len() && is_word_char(chars[i]) {
                out.push(chars[i]);
                i += 1;
            }
            continue;
        }

        out.push(c);
        i += 1;
    }

    Ok(out)
}
