use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::errors::*;
use crate::value::{format_f64, Value};

/// Formatter precision bounds, in significant digits for `Auto` notation
pub const MIN_PRECISION: usize = 2;
pub const MAX_PRECISION: usize = 64;
pub const DEFAULT_PRECISION: usize = 16;

// below 1e-8 and above 10^precision the plain decimal form stops being readable
const LOW_EXP: i64 = -7;

/// How a value is rendered:
/// * `Auto` - shortest decimal with `precision` significant digits,
///   switching to exponent form for very large and very small magnitudes
/// * `Fixed` - exactly `precision` digits after the decimal point
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Notation {
    Auto,
    Fixed,
}

/// Renders a value for display. Integer and rational values are rounded
/// with exact big-integer arithmetic (half-up), floats go through their
/// exact binary expansion first, so the printed digits are the true ones.
/// Non-finite floats cannot be rendered and return an error
pub fn format_value(v: &Value, notation: Notation, precision: usize) -> Result<String, CalcError> {
    match notation {
        Notation::Auto => {
            let precision = precision.max(MIN_PRECISION).min(MAX_PRECISION);
            auto_value(v, precision)
        }
        Notation::Fixed => fixed_value(v, precision),
    }
}

fn pow10u(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

// checks n/d >= 10^e for positive n and d
fn ge_pow10(n: &BigInt, d: &BigInt, e: i64) -> bool {
    if e >= 0 {
        n >= &(d * pow10u(e as u32))
    } else {
        &(n * pow10u((-e) as u32)) >= d
    }
}

// the decimal exponent of n/d: the e with 10^e <= n/d < 10^(e+1)
fn decimal_exponent(n: &BigInt, d: &BigInt) -> i64 {
    let nd = n.to_string().len() as i64;
    let dd = d.to_string().len() as i64;
    let mut e = nd - dd;
    if !ge_pow10(n, d, e) {
        e -= 1;
    }
    e
}

fn layout(digits: &str, e: i64, precision: usize) -> String {
    if e >= LOW_EXP && e < precision as i64 {
        if e >= 0 {
            let int_len = (e + 1) as usize;
            if digits.len() <= int_len {
                let mut s = digits.to_string();
                while s.len() < int_len {
                    s.push('0');
                }
                s
            } else {
                let (ip, fp) = digits.split_at(int_len);
                let fp = fp.trim_end_matches('0');
                if fp.is_empty() {
                    ip.to_string()
                } else {
                    format!("{}.{}", ip, fp)
                }
            }
        } else {
            let zeros = (-e - 1) as usize;
            let fp = digits.trim_end_matches('0');
            format!("0.{}{}", "0".repeat(zeros), fp)
        }
    } else {
        let (first, rest) = digits.split_at(1);
        let rest = rest.trim_end_matches('0');
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{}.{}", first, rest)
        };
        if e >= 0 {
            format!("{}e+{}", mantissa, e)
        } else {
            format!("{}e-{}", mantissa, -e)
        }
    }
}

// exact rendering of a rational with `precision` significant digits
fn auto_ratio(r: &BigRational, precision: usize) -> String {
    if r.is_zero() {
        return "0".to_string();
    }
    let neg = r.numer().sign() == Sign::Minus;
    let n = r.numer().abs();
    let d = r.denom().clone();

    let mut e = decimal_exponent(&n, &d);
    let k = precision as i64 - 1 - e;
    let (num_s, den_s) = if k >= 0 {
        (n * pow10u(k as u32), d)
    } else {
        (n, d * pow10u((-k) as u32))
    };
    // round half-up: (2n + d) / 2d
    let q = (BigInt::from(2) * num_s + &den_s) / (BigInt::from(2) * den_s);
    let mut digits = q.to_str_radix(10);
    if digits.len() > precision {
        // rounding carried into the next power of ten
        e += 1;
        digits.truncate(precision);
    }

    let body = layout(&digits, e, precision);
    if neg {
        format!("-{}", body)
    } else {
        body
    }
}

fn auto_f64(f: f64, precision: usize) -> Result<String, CalcError> {
    if !f.is_finite() {
        return Err(CalcError::NotRepresentable(format_f64(f)));
    }
    if f == 0.0 {
        return Ok("0".to_string());
    }
    match BigRational::from_float(f) {
        Some(r) => Ok(auto_ratio(&r, precision)),
        None => Err(CalcError::NotRepresentable(format_f64(f))),
    }
}

fn auto_value(v: &Value, precision: usize) -> Result<String, CalcError> {
    match v {
        Value::Int(i) => {
            if i.is_zero() {
                Ok("0".to_string())
            } else {
                Ok(auto_ratio(&BigRational::from_integer(i.clone()), precision))
            }
        }
        Value::Ratio(r) => Ok(auto_ratio(r, precision)),
        Value::Float(f) => auto_f64(*f, precision),
        Value::Complex(c) => {
            let re = auto_f64(c.re, precision)?;
            let im = auto_f64(c.im.abs(), precision)?;
            if c.im >= 0.0 {
                Ok(format!("{}+{}i", re, im))
            } else {
                Ok(format!("{}-{}i", re, im))
            }
        }
    }
}

// scaled-integer rendering: floor/round once, then split on 10^precision
fn fixed_ratio(r: &BigRational, precision: usize) -> String {
    let neg = r.is_negative();
    let n = r.numer().abs();
    let d = r.denom().clone();
    let scale = pow10u(precision as u32);
    // round half-up on the scaled value
    let scaled = (BigInt::from(2) * n * &scale + &d) / (BigInt::from(2) * d);

    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;
    let sign = if neg && !scaled.is_zero() { "-" } else { "" };
    if precision == 0 {
        return format!("{}{}", sign, int_part);
    }
    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < precision {
        frac.insert(0, '0');
    }
    format!("{}{}.{}", sign, int_part, frac)
}

fn fixed_f64(f: f64, precision: usize) -> Result<String, CalcError> {
    if !f.is_finite() {
        return Err(CalcError::NotRepresentable(format_f64(f)));
    }
    let f = if f == 0.0 { 0.0 } else { f };
    Ok(format!("{:.*}", precision, f))
}

fn fixed_value(v: &Value, precision: usize) -> Result<String, CalcError> {
    match v {
        Value::Int(i) => Ok(fixed_ratio(&BigRational::from_integer(i.clone()), precision)),
        Value::Ratio(r) => Ok(fixed_ratio(r, precision)),
        Value::Float(f) => fixed_f64(*f, precision),
        Value::Complex(c) => {
            let re = fixed_f64(c.re, precision)?;
            let im = fixed_f64(c.im.abs(), precision)?;
            if c.im >= 0.0 {
                Ok(format!("{}+{}i", re, im))
            } else {
                Ok(format!("{}-{}i", re, im))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_complex::Complex;

    fn ratio(n: i64, d: i64) -> Value {
        Value::Ratio(BigRational::new(BigInt::from(n), BigInt::from(d)))
    }

    #[test]
    fn test_auto_int() {
        let s = format_value(&Value::Int(BigInt::from(123456789)), Notation::Auto, 16);
        assert_eq!(s, Ok("123456789".to_string()));
        let s = format_value(&Value::Int(BigInt::zero()), Notation::Auto, 16);
        assert_eq!(s, Ok("0".to_string()));
        let s = format_value(&Value::Int(BigInt::from(-42)), Notation::Auto, 16);
        assert_eq!(s, Ok("-42".to_string()));
        // 2^100 does not fit into 16 digits and switches to the exponent form
        let big = BigInt::from(2).pow(100u32);
        let s = format_value(&Value::Int(big), Notation::Auto, 16);
        assert_eq!(s, Ok("1.267650600228229e+30".to_string()));
    }

    #[test]
    fn test_auto_ratio() {
        let s = format_value(&ratio(1, 3), Notation::Auto, 5);
        assert_eq!(s, Ok("0.33333".to_string()));
        let s = format_value(&ratio(3, 10), Notation::Auto, 16);
        assert_eq!(s, Ok("0.3".to_string()));
        let s = format_value(&ratio(1, 2), Notation::Auto, 16);
        assert_eq!(s, Ok("0.5".to_string()));
        let s = format_value(&ratio(-999, 100), Notation::Auto, 2);
        assert_eq!(s, Ok("-10".to_string()));
        let s = format_value(&ratio(2, 3), Notation::Auto, 4);
        assert_eq!(s, Ok("0.6667".to_string()));
        // tiny magnitudes switch to the exponent form
        let s = format_value(&ratio(1, 100_000_000), Notation::Auto, 16);
        assert_eq!(s, Ok("1e-8".to_string()));
        let s = format_value(&ratio(1, 10_000_000), Notation::Auto, 16);
        assert_eq!(s, Ok("0.0000001".to_string()));
    }

    #[test]
    fn test_auto_float() {
        let s = format_value(&Value::Float(2.0), Notation::Auto, 16);
        assert_eq!(s, Ok("2".to_string()));
        let s = format_value(&Value::Float(0.1), Notation::Auto, 16);
        assert_eq!(s, Ok("0.1".to_string()));
        // one digit past the f64 mantissa shows the true binary expansion
        let s = format_value(&Value::Float(0.1), Notation::Auto, 17);
        assert_eq!(s, Ok("0.10000000000000001".to_string()));
        let s = format_value(&Value::Float(2.9999999999999996), Notation::Auto, 15);
        assert_eq!(s, Ok("3".to_string()));
        let s = format_value(&Value::Float(f64::NAN), Notation::Auto, 16);
        assert!(s.is_err());
        let s = format_value(&Value::Float(f64::INFINITY), Notation::Auto, 16);
        assert!(s.is_err());
    }

    #[test]
    fn test_auto_complex() {
        let v = Value::Complex(Complex::new(-1.0, 2.0));
        assert_eq!(format_value(&v, Notation::Auto, 16), Ok("-1+2i".to_string()));
        let v = Value::Complex(Complex::new(0.5, -0.25));
        assert_eq!(format_value(&v, Notation::Auto, 16), Ok("0.5-0.25i".to_string()));
    }

    #[test]
    fn test_fixed() {
        let s = format_value(&Value::Float(3.0), Notation::Fixed, 5);
        assert_eq!(s, Ok("3.00000".to_string()));
        let s = format_value(&Value::Float(-1.0), Notation::Fixed, 4);
        assert_eq!(s, Ok("-1.0000".to_string()));
        let s = format_value(&Value::Int(BigInt::from(7)), Notation::Fixed, 2);
        assert_eq!(s, Ok("7.00".to_string()));
        let s = format_value(&ratio(1, 3), Notation::Fixed, 4);
        assert_eq!(s, Ok("0.3333".to_string()));
        let s = format_value(&ratio(2, 3), Notation::Fixed, 4);
        assert_eq!(s, Ok("0.6667".to_string()));
    }

    #[test]
    fn test_fixed_complex() {
        let v = Value::Complex(Complex::new(-1.0, 2.0));
        assert_eq!(
            format_value(&v, Notation::Fixed, 4),
            Ok("-1.0000+2.0000i".to_string())
        );
        let v = Value::Complex(Complex::new(-1.0, -2.0));
        assert_eq!(
            format_value(&v, Notation::Fixed, 4),
            Ok("-1.0000-2.0000i".to_string())
        );
    }
}
