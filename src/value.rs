use num_bigint::{BigInt, Sign};
use num_complex::Complex;
use num_rational::BigRational;
use num_traits::{FromPrimitive, Num, One, ToPrimitive, Zero};
use std::f64::consts;
use std::f64::EPSILON;
use std::fmt;
use std::str;

use crate::errors::*;

/// Expression calculation result: either value or error
pub type CalcResult = Result<Value, CalcError>;
pub(crate) type CalcErrorResult = Result<(), CalcError>;

/// Supported value types. Decimal literals are kept as exact rational
/// numbers (numerator over a power of ten), so plain decimal arithmetic
/// does not accumulate binary float noise: `0.1+0.2` is exactly `0.3`
#[derive(Clone)]
pub enum Value {
    /// Big integer number
    Int(BigInt),
    /// Exact rational number (numerator and denominator are big integers)
    Ratio(BigRational),
    /// Float number
    Float(f64),
    /// Complex number
    Complex(Complex<f64>),
}

const F64_BUF_LEN: usize = 48;
pub(crate) fn format_f64(g: f64) -> String {
    let mut buf = [b'\0'; F64_BUF_LEN];
    match dtoa::write(&mut buf[..], g) {
        Ok(len) => match str::from_utf8(&buf[..len]) {
            Ok(s) => s.to_string(),
            Err(..) => format!("{}", g),
        },
        Err(..) => format!("{}", g),
    }
}

pub(crate) fn f64_equal(f1: f64, f2: f64) -> bool {
    (f1 - f2).abs() <= EPSILON
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(ref i) => write!(f, "{}", i),
            Value::Float(ref g) => write!(f, "{}", format_f64(*g)),
            Value::Ratio(ref r) => write!(f, "{}/{}", r.numer(), r.denom()),
            Value::Complex(ref c) => {
                if c.im >= 0.0 {
                    write!(f, "{}+{}i", format_f64(c.re), format_f64(c.im))
                } else {
                    write!(f, "{}{}i", format_f64(c.re), format_f64(c.im))
                }
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            Value::Int(ref i) => write!(f, " Int({:?})", i),
            Value::Ratio(ref r) => write!(f, " Ratio({:?})", r),
            Value::Float(ref g) => write!(f, " Float({:?})", g),
            Value::Complex(ref c) => write!(f, " Complex({:?})", c),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, &other) {
            (Value::Int(ref i1), Value::Int(ref i2)) => i1 == i2,
            (Value::Ratio(ref r1), Value::Ratio(ref r2)) => r1 == r2,
            (Value::Float(ref f1), Value::Float(ref f2)) => f1 == f2,
            (Value::Complex(ref c1), Value::Complex(ref c2)) => c1 == c2,
            (_, _) => false,
        }
    }
}

fn int_to_f64(i: &BigInt) -> Result<f64, CalcError> {
    if let Some(f) = i.to_f64() {
        Ok(f)
    } else {
        Err(CalcError::IntToFloat(i.clone()))
    }
}

fn f64_to_int(f: f64) -> Result<BigInt, CalcError> {
    if let Some(i) = BigInt::from_f64(f) {
        Ok(i)
    } else {
        Err(CalcError::FloatToInt(f))
    }
}

fn ratio_to_f64(r: &BigRational) -> Result<f64, CalcError> {
    if r.is_zero() {
        return Ok(0.0);
    }
    // extract the integer part first to avoid float overflow
    // in case of very long numer and denom
    let i = if let Some(f) = r.clone().to_integer().to_f64() {
        f
    } else {
        return Err(CalcError::RatioToFloat(r.clone()));
    };
    let r = r.fract();
    let n = if let Some(f) = r.numer().to_f64() {
        f
    } else {
        return Err(CalcError::RatioToFloat(r.clone()));
    };
    let d = if let Some(f) = r.denom().to_f64() {
        f
    } else {
        return Err(CalcError::RatioToFloat(r.clone()));
    };
    Ok(i + n / d)
}

fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

// exponents above this produce numbers nobody asked for
const MAX_DEC_EXP: i64 = 10_000;

fn str_to_bigint(s: &str) -> Result<BigInt, CalcError> {
    let s = s.replace("_", "");
    let s = s.replace(" ", "");
    let plen = "0x".len();
    if s.starts_with("0x") || s.starts_with("0X") {
        if let Ok(bi) = BigInt::from_str_radix(&s[plen..], 16) {
            return Ok(bi);
        }
        return Err(CalcError::StrToInt(s.to_owned()));
    } else if s.starts_with("0o") || s.starts_with("0O") {
        if let Ok(bi) = BigInt::from_str_radix(&s[plen..], 8) {
            return Ok(bi);
        }
        return Err(CalcError::StrToInt(s.to_owned()));
    } else if s.starts_with("0b") || s.starts_with("0B") {
        if let Ok(bi) = BigInt::from_str_radix(&s[plen..], 2) {
            return Ok(bi);
        }
        return Err(CalcError::StrToInt(s.to_owned()));
    }

    // suffix markers used by the base keypad: FFh, 17o, 101b
    for (marker, radix) in &[("h", 16u32), ("o", 8u32), ("b", 2u32)] {
        if s.ends_with(marker) && s.len() > 1 {
            if let Ok(bi) = BigInt::from_str_radix(&s[..s.len() - 1], *radix) {
                return Ok(bi);
            }
            return Err(CalcError::StrToInt(s.to_owned()));
        }
    }

    if let Ok(i) = s.parse() {
        Ok(i)
    } else {
        Err(CalcError::StrToInt(s.to_owned()))
    }
}

macro_rules! basic_op {
    ($id:ident, $op:tt) => {
        pub fn $id(self, rhs: Value) -> CalcResult {
            match (&self, &rhs) {
                (Value::Complex(..), ..) | (.., Value::Complex(..)) => {
                    let c1 = self.into_raw_complex()?;
                    let c2 = rhs.into_raw_complex()?;
                    let c = Value::Complex(c1 $op c2);
                    if Value::is_like_int(&c) {
                        return Value::into_int(c);
                    }
                    Ok(c)
                },
                (Value::Float(..), ..) | (.., Value::Float(..)) => {
                    let f1 = self.into_raw_f64()?;
                    let f2 = rhs.into_raw_f64()?;
                    let f = Value::Float(f1 $op f2);
                    if Value::is_like_int(&f) {
                        return Value::into_int(f);
                    }
                    Ok(f)
                },
                (Value::Ratio(..), ..) | (.., Value::Ratio(..)) => {
                    let r1 = self.into_raw_ratio()?;
                    let r2 = rhs.into_raw_ratio()?;
                    let r = Value::Ratio(r1 $op r2);
                    if Value::is_like_int(&r) {
                        return Value::into_int(r);
                    }
                    Ok(r)
                },
                _ => {
                    let i1 = self.into_raw_big_int()?;
                    let i2 = rhs.into_raw_big_int()?;
                    Ok(Value::Int(i1 $op i2))
                },
            }
        }
    }
}

macro_rules! sin_cos {
    ($id:ident) => {
        pub fn $id(self) -> CalcResult {
            match &self {
                Value::Complex(c) => Ok(Value::Complex(c.$id())),
                Value::Float(f) => Ok(Value::Float(f.$id())),
                _ => {
                    let f = self.into_raw_f64()?;
                    Ok(Value::Float(f.$id()))
                },
            }
        }
    }
}

macro_rules! asin_cos {
    ($id:ident) => {
        pub fn $id(self) -> CalcResult {
            match &self {
                Value::Complex(c) => Ok(Value::Complex(c.$id())),
                _ => {
                    let f = self.into_raw_f64()?;
                    if f >= -1.0 && f <= 1.0 {
                        Ok(Value::Float(f.$id()))
                    } else {
                        let cm = Complex::new(f, 0.0);
                        Ok(Value::Complex(cm.$id()))
                    }
                }
            }
        }
    }
}

impl Default for Value {
    fn default() -> Value {
        Value::Int(BigInt::zero())
    }
}

impl Value {
    pub fn new() -> Self {
        Default::default()
    }

    // --------------------------------

    pub(crate) fn into_int(self) -> CalcResult {
        match self {
            Value::Int(..) => Ok(self),
            Value::Ratio(r) => Ok(Value::Int(r.to_integer())),
            Value::Float(f) => {
                let i = f64_to_int(f.floor())?;
                Ok(Value::Int(i))
            }
            Value::Complex(c) => {
                let i = f64_to_int(c.re.floor())?;
                Ok(Value::Int(i))
            }
        }
    }

    pub(crate) fn into_float(self) -> CalcResult {
        match self {
            Value::Int(i) => {
                let f = int_to_f64(&i)?;
                Ok(Value::Float(f))
            }
            Value::Ratio(r) => {
                let f = ratio_to_f64(&r)?;
                Ok(Value::Float(f))
            }
            Value::Float(..) => Ok(self),
            Value::Complex(c) => Ok(Value::Float(c.re)),
        }
    }

    pub(crate) fn into_ratio(self) -> CalcResult {
        match self {
            Value::Ratio(..) => Ok(self),
            Value::Int(i) => Ok(Value::Ratio(BigRational::from_integer(i))),
            Value::Float(f) => match BigRational::from_float(f) {
                Some(r) => Ok(Value::Ratio(r)),
                None => Err(CalcError::StrToDecimal(format_f64(f))),
            },
            Value::Complex(c) => match BigRational::from_float(c.re) {
                Some(r) => Ok(Value::Ratio(r)),
                None => Err(CalcError::StrToDecimal(format_f64(c.re))),
            },
        }
    }

    pub(crate) fn into_complex(self) -> CalcResult {
        match self {
            Value::Complex(..) => Ok(self),
            Value::Float(f) => Ok(Value::Complex(Complex::new(f, 0.0))),
            Value::Int(i) => {
                let f = int_to_f64(&i)?;
                Ok(Value::Complex(Complex::new(f, 0.0)))
            }
            Value::Ratio(r) => {
                let f = ratio_to_f64(&r)?;
                Ok(Value::Complex(Complex::new(f, 0.0)))
            }
        }
    }

    //---------------------------------------------

    pub(crate) fn into_raw_f64(self) -> Result<f64, CalcError> {
        let v = Value::into_float(self)?;
        match v {
            Value::Float(f) => Ok(f),
            _ => Ok(0.0), // unreachable
        }
    }

    pub(crate) fn into_raw_big_int(self) -> Result<BigInt, CalcError> {
        let v = Value::into_int(self)?;
        match v {
            Value::Int(i) => Ok(i),
            _ => Ok(BigInt::zero()), // unreachable
        }
    }

    pub(crate) fn into_raw_ratio(self) -> Result<BigRational, CalcError> {
        let v = Value::into_ratio(self)?;
        match v {
            Value::Ratio(r) => Ok(r),
            _ => Ok(BigRational::zero()), // unreachable
        }
    }

    pub(crate) fn into_raw_complex(self) -> Result<Complex<f64>, CalcError> {
        let v = Value::into_complex(self)?;
        match v {
            Value::Complex(c) => Ok(c),
            _ => Ok(Complex::zero()), // unreachable
        }
    }

    //---------------------------------------------

    /// Convert &str to big integer number
    /// Supported formats:
    /// * Raw integer number - `1234`
    /// * Prefixed radix forms - `0x1F`, `0o17`, `0b101` (capital prefix letter works too)
    /// * Suffix-marked radix forms emitted by the base keypad - `1Fh`, `17o`, `101b`
    ///
    /// For convenience digits can be separated with underscores:
    /// `3_00_1` is the same as `3001`
    pub fn from_str_integer(s: &str) -> CalcResult {
        let i = str_to_bigint(s)?;
        Ok(Value::Int(i))
    }

    /// Convert &str to an exact decimal number.
    /// Supported formats:
    /// * Plain - `1.023`
    /// * With exponent - `1.02e-5`, `12e3`
    ///
    /// The text is parsed into an exact rational (denominator is a power
    /// of ten), so no binary rounding happens at read time. A value with
    /// nothing fractional left collapses to a big integer.
    ///
    /// For convenience digits can be separated with underscores:
    /// `3_005.245_1` is the same as `3005.2451`
    pub fn from_str_decimal(st: &str) -> CalcResult {
        let s = st.replace("_", "");
        let (mantissa, exp) = match s.find(|c: char| c == 'e' || c == 'E') {
            Some(pos) => {
                let e = s[pos + 1..].trim_start_matches('+');
                let e: i64 = match e.parse() {
                    Ok(v) => v,
                    Err(..) => return Err(CalcError::StrToDecimal(st.to_owned())),
                };
                (&s[..pos], e)
            }
            None => (s.as_str(), 0i64),
        };

        let (int_part, frac_part) = match mantissa.find('.') {
            Some(pos) => (&mantissa[..pos], &mantissa[pos + 1..]),
            None => (mantissa, ""),
        };
        let digits = format!("{}{}", int_part, frac_part);
        if digits.is_empty() {
            return Err(CalcError::StrToDecimal(st.to_owned()));
        }
        let num = match BigInt::from_str_radix(&digits, 10) {
            Ok(n) => n,
            Err(..) => return Err(CalcError::StrToDecimal(st.to_owned())),
        };

        let shift = exp - frac_part.len() as i64;
        if shift.abs() > MAX_DEC_EXP {
            return Err(CalcError::StrToDecimal(st.to_owned()));
        }
        if shift >= 0 {
            Ok(Value::Int(num * pow10(shift as u32)))
        } else {
            let r = BigRational::new(num, pow10((-shift) as u32));
            if r.denom().is_one() {
                Ok(Value::Int(r.to_integer()))
            } else {
                Ok(Value::Ratio(r))
            }
        }
    }

    //---------------------------------------------

    /// Returns true if the value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Int(ref i) => i.is_zero(),
            Value::Ratio(ref r) => r.is_zero(),
            Value::Float(ref f) => *f == 0.0,
            Value::Complex(ref c) => c.is_zero(),
        }
    }

    // to check any value after any operation whether it can be converted
    // to BigInt
    fn is_like_int(&self) -> bool {
        match self {
            Value::Int(..) => true,
            Value::Ratio(ref r) => *r.denom() == BigInt::one(),
            Value::Float(f) => {
                let fa: f64 = f.abs();
                // f64 precision is about 19-20 digits,
                // so it is probable that any f64 > 1e20 is not precise
                fa >= 1.0 && fa < 1e22 && f64_equal(fa.floor(), fa)
            }
            Value::Complex(ref c) => {
                if c.im != 0.0 {
                    return false;
                }
                let fa: f64 = c.re.abs();
                fa >= 1.0 && fa < 1e22 && f64_equal(fa.floor(), fa)
            }
        }
    }

    /// Returns the value as a big integer if it is exactly integer-valued:
    /// a whole float, a rational with denominator 1, a complex with zero
    /// imaginary part. Fractional and properly complex values return None.
    /// Used by the numeral-base round-trip after evaluation
    pub fn as_integer(&self) -> Option<BigInt> {
        fn whole_f64(f: f64) -> Option<BigInt> {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e22 {
                BigInt::from_f64(f)
            } else {
                None
            }
        }
        match self {
            Value::Int(i) => Some(i.clone()),
            Value::Ratio(r) => {
                if r.denom().is_one() {
                    Some(r.to_integer())
                } else {
                    None
                }
            }
            Value::Float(f) => whole_f64(*f),
            Value::Complex(c) => {
                if c.im == 0.0 {
                    whole_f64(c.re)
                } else {
                    None
                }
            }
        }
    }

    basic_op!(addition, +);
    basic_op!(subtract, -);
    basic_op!(multiply, *);

    /// Divides two values. Integer by integer division is exact: the
    /// result is an integer when it divides evenly and a rational
    /// otherwise, never a rounded float
    pub fn divide(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(format!("{}", self)));
        }
        match (&self, &rhs) {
            (Value::Complex(..), ..) | (.., Value::Complex(..)) => {
                let c2 = rhs.into_raw_complex()?;
                let c1 = self.into_raw_complex()?;
                let c = Value::Complex(c1 / c2);
                if Value::is_like_int(&c) {
                    return Value::into_int(c);
                }
                Ok(c)
            }
            (Value::Float(..), ..) | (.., Value::Float(..)) => {
                let f2 = rhs.into_raw_f64()?;
                let f1 = self.into_raw_f64()?;
                let f = Value::Float(f1 / f2);
                if Value::is_like_int(&f) {
                    return Value::into_int(f);
                }
                Ok(f)
            }
            (Value::Ratio(..), ..) | (.., Value::Ratio(..)) => {
                let r2 = rhs.into_raw_ratio()?;
                let r1 = self.into_raw_ratio()?;
                let r = Value::Ratio(r1 / r2);
                if Value::is_like_int(&r) {
                    return Value::into_int(r);
                }
                Ok(r)
            }
            _ => {
                let i2 = rhs.into_raw_big_int()?;
                let i1 = self.into_raw_big_int()?;
                if i1.clone() % i2.clone() == BigInt::zero() {
                    return Ok(Value::Int(i1 / i2));
                }
                Ok(Value::Ratio(BigRational::new(i1, i2)))
            }
        }
    }

    /// Remainder of a division. Complex numbers are not supported
    pub fn reminder(self, rhs: Value) -> CalcResult {
        if rhs.is_zero() {
            return Err(CalcError::DividedByZero(format!("{}", self)));
        }
        match (&self, &rhs) {
            (Value::Complex(..), ..) | (.., Value::Complex(..)) => {
                Err(CalcError::NotForComplex("mod".to_string()))
            }
            (Value::Int(i1), Value::Int(i2)) => Ok(Value::Int(i1 % i2)),
            _ => {
                let f2 = rhs.into_raw_f64()?;
                let f1 = self.into_raw_f64()?;
                let f = Value::Float(f1 % f2);
                if Value::is_like_int(&f) {
                    return Value::into_int(f);
                }
                Ok(f)
            }
        }
    }

    /// Inverts the sign of the value
    pub fn negate(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(-c)),
            Value::Ratio(r) => Ok(Value::Ratio(-r)),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Int(i) => Ok(Value::Int(-i)),
        }
    }

    /// Postfix percent: divides the value by one hundred, exactly
    pub fn percent(self) -> CalcResult {
        self.divide(Value::Int(BigInt::from(100)))
    }

    /// Returns absolute value of a number
    /// For complex numbers only its real part changes
    pub fn abs(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(Complex::new(c.re.abs(), c.im))),
            Value::Ratio(r) => {
                if *r < BigRational::zero() {
                    Ok(Value::Ratio(-r))
                } else {
                    Ok(Value::Ratio(r.clone()))
                }
            }
            Value::Float(f) => Ok(Value::Float(f.abs())),
            Value::Int(i) => {
                if *i < BigInt::zero() {
                    Ok(Value::Int(-i))
                } else {
                    Ok(Value::Int(i.clone()))
                }
            }
        }
    }

    /// Returns square root of a number.
    /// Automatically converts a negative number into complex one before calculation
    pub fn sqrt(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.sqrt())),
            Value::Ratio(r) => {
                let f = ratio_to_f64(r)?;
                if f >= 0.0 {
                    Ok(Value::Float(f.sqrt()))
                } else {
                    let f = -f;
                    let c = Complex::new(0.0, f.sqrt());
                    Ok(Value::Complex(c))
                }
            }
            Value::Float(f) => {
                if *f >= 0.0 {
                    Ok(Value::Float(f.sqrt()))
                } else {
                    let f = -f;
                    let c = Complex::new(0.0, f.sqrt());
                    Ok(Value::Complex(c))
                }
            }
            Value::Int(i) => {
                if *i < BigInt::zero() {
                    let i = -i;
                    let f = int_to_f64(&i)?;
                    Ok(Value::Complex(Complex::new(0.0, f.sqrt())))
                } else {
                    let sq = i.sqrt();
                    if sq.clone() * sq.clone() == *i {
                        Ok(Value::Int(sq))
                    } else {
                        let f = int_to_f64(i)?;
                        Ok(Value::Float(f.sqrt()))
                    }
                }
            }
        }
    }

    fn fast_power(self, pow: BigInt) -> CalcResult {
        if pow.is_zero() {
            return Ok(Value::Int(BigInt::one()));
        }
        let mut pow = pow;
        let mut inv = false;
        let sgn = pow.sign();
        if sgn == Sign::Minus {
            inv = true;
            pow = -pow;
        }

        let mut res = Value::Int(BigInt::one());
        let mut base = self;
        while pow > BigInt::zero() {
            if pow.clone() % BigInt::from(2) == BigInt::zero() {
                pow /= BigInt::from(2);
                base = base.clone().multiply(base.clone())?;
            } else {
                pow -= BigInt::one();
                res = res.multiply(base.clone())?;
            }
        }
        if inv {
            return Value::Int(BigInt::one()).divide(res);
        }
        if Value::is_like_int(&res) {
            res = Value::into_int(res)?
        }
        Ok(res)
    }

    /// Raises a number into arbitrary power.
    /// For integer power degrees the fast and exact algorithm is used.
    /// A negative base with a fractional degree goes through the complex
    /// plane, as the real power is undefined there
    pub fn power(self, rhs: Value) -> CalcResult {
        match (&self, &rhs) {
            (Value::Complex(..), ..) | (.., Value::Complex(..)) => {
                let v = self.into_raw_complex()?;
                let pow = rhs.into_raw_complex()?;
                let c = Value::Complex(v.powc(pow));
                if Value::is_like_int(&c) {
                    return Value::into_int(c);
                }
                Ok(c)
            }
            (.., Value::Int(i)) => self.fast_power(i.clone()),
            _ => {
                let f1 = self.into_raw_f64()?;
                let f2 = rhs.into_raw_f64()?;
                if f1 < 0.0 && f2.fract() != 0.0 {
                    let c = Complex::new(f1, 0.0).powc(Complex::new(f2, 0.0));
                    let v = Value::Complex(c);
                    if Value::is_like_int(&v) {
                        return Value::into_int(v);
                    }
                    return Ok(v);
                }
                let v = Value::Float(f1.powf(f2));
                if Value::is_like_int(&v) {
                    return Value::into_int(v);
                }
                Ok(v)
            }
        }
    }

    /// Returns factorial of a number.
    /// Complex numbers generate an error.
    /// Factorial of a negative or properly fractional number is not supported
    pub fn fact(self) -> CalcResult {
        if Value::is_zero(&self) {
            return Ok(Value::Int(BigInt::one()));
        }

        match &self {
            Value::Complex(..) => Err(CalcError::NotForComplex("factorial".to_owned())),
            Value::Ratio(..) | Value::Float(..) => {
                if Value::is_like_int(&self) {
                    let i = Value::into_int(self)?;
                    let i = if let Value::Int(i1) = i {
                        i1
                    } else {
                        return Err(CalcError::Unreachable);
                    };
                    if i < BigInt::zero() {
                        return Err(CalcError::NotForNegativeInt("factorial".to_owned()));
                    }
                    let mut res = BigInt::one();
                    let mut cnt = BigInt::from(1);
                    while cnt <= i {
                        res *= cnt.clone();
                        cnt += BigInt::one();
                    }
                    return Ok(Value::Int(res));
                }
                Err(CalcError::InvalidArgument("factorial".to_owned(), format!("{}", self)))
            }
            Value::Int(i) => {
                if *i < BigInt::zero() {
                    return Err(CalcError::NotForNegativeInt("factorial".to_owned()));
                }
                let mut res = BigInt::one();
                let mut cnt = BigInt::from(1);
                while cnt <= *i {
                    res *= cnt.clone();
                    cnt += BigInt::one();
                }
                Ok(Value::Int(res))
            }
        }
    }

    /// Exponent function
    pub fn exp(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.exp())),
            _ => {
                let f = self.into_raw_f64()?;
                Ok(Value::Float(f.exp()))
            }
        }
    }

    /// Returns natural logarithm of a number.
    /// Automatically converts a negative number to a complex one before calculation
    pub fn ln(self) -> CalcResult {
        if Value::is_zero(&self) {
            return Err(CalcError::InvalidArgument("ln".to_owned(), format!("{}", self)));
        }
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.ln())),
            _ => {
                let f = self.clone().into_raw_f64()?;
                if f > 0.0 {
                    Ok(Value::Float(f.ln()))
                } else {
                    let cm = Complex::new(f, 0.0);
                    Ok(Value::Complex(cm.ln()))
                }
            }
        }
    }

    /// Base-10 logarithm
    pub fn log10(self) -> CalcResult {
        if Value::is_zero(&self) {
            return Err(CalcError::InvalidArgument("log10".to_owned(), format!("{}", self)));
        }
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.ln() / consts::LN_10)),
            _ => {
                let f = self.clone().into_raw_f64()?;
                if f > 0.0 {
                    let v = Value::Float(f.log10());
                    if Value::is_like_int(&v) {
                        return Value::into_int(v);
                    }
                    Ok(v)
                } else {
                    let cm = Complex::new(f, 0.0);
                    Ok(Value::Complex(cm.ln() / consts::LN_10))
                }
            }
        }
    }

    /// Base-2 logarithm
    pub fn log2(self) -> CalcResult {
        if Value::is_zero(&self) {
            return Err(CalcError::InvalidArgument("log2".to_owned(), format!("{}", self)));
        }
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.ln() / consts::LN_2)),
            _ => {
                let f = self.clone().into_raw_f64()?;
                if f > 0.0 {
                    let v = Value::Float(f.log2());
                    if Value::is_like_int(&v) {
                        return Value::into_int(v);
                    }
                    Ok(v)
                } else {
                    let cm = Complex::new(f, 0.0);
                    Ok(Value::Complex(cm.ln() / consts::LN_2))
                }
            }
        }
    }

    /// Logarithm with an arbitrary base: `log(x, base) = ln(x)/ln(base)`
    pub fn log(self, base: Value) -> CalcResult {
        let n = self.ln()?;
        let d = base.ln()?;
        n.divide(d)
    }

    /// N-th root of a number. An odd integer index keeps the real branch
    /// for a negative radicand, everything else goes complex.
    /// A perfect integer root is detected exactly, the way `sqrt` does it
    pub fn nth_root(self, index: Value) -> CalcResult {
        if index.is_zero() {
            return Err(CalcError::InvalidArgument("nthroot".to_owned(), "0".to_string()));
        }
        if let Value::Int(ref i) = self {
            if let Some(n) = index.as_integer().and_then(|b| b.to_u32()) {
                if n > 0 {
                    if *i >= BigInt::zero() {
                        let root = i.nth_root(n);
                        if root.pow(n) == *i {
                            return Ok(Value::Int(root));
                        }
                    } else if n % 2 == 1 {
                        let pos = -i;
                        let root = pos.nth_root(n);
                        if root.pow(n) == pos {
                            return Ok(Value::Int(-root));
                        }
                    }
                }
            }
        }
        match &self {
            Value::Complex(c) => {
                let n = index.into_raw_f64()?;
                Ok(Value::Complex(c.powc(Complex::new(1.0 / n, 0.0))))
            }
            _ => {
                let f = self.into_raw_f64()?;
                let n = index.into_raw_f64()?;
                if f < 0.0 {
                    if n.fract() == 0.0 && (n as i64) % 2 != 0 {
                        let v = Value::Float(-(-f).powf(1.0 / n));
                        if Value::is_like_int(&v) {
                            return Value::into_int(v);
                        }
                        return Ok(v);
                    }
                    let c = Complex::new(f, 0.0).powc(Complex::new(1.0 / n, 0.0));
                    return Ok(Value::Complex(c));
                }
                let v = Value::Float(f.powf(1.0 / n));
                if Value::is_like_int(&v) {
                    return Value::into_int(v);
                }
                Ok(v)
            }
        }
    }

    sin_cos!(sin);
    sin_cos!(cos);

    pub fn tan(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.tan())),
            _ => {
                let f = self.clone().into_raw_f64()?;
                let half = consts::PI / 2.0;
                let ipart = (f / half).trunc();
                if f64_equal(ipart * half, f) && ipart as i64 % 2 != 0 {
                    Err(CalcError::InvalidArgument("tan".to_owned(), format!("{}", self)))
                } else {
                    Ok(Value::Float(f.tan()))
                }
            }
        }
    }

    /// Cotangent. Undefined where sine vanishes
    pub fn cot(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.cos() / c.sin())),
            _ => {
                let f = self.clone().into_raw_f64()?;
                let s = f.sin();
                if s == 0.0 {
                    Err(CalcError::InvalidArgument("cot".to_owned(), format!("{}", self)))
                } else {
                    Ok(Value::Float(f.cos() / s))
                }
            }
        }
    }

    /// Secant
    pub fn sec(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(Complex::new(1.0, 0.0) / c.cos())),
            _ => {
                let f = self.into_raw_f64()?;
                let c = f.cos();
                if c == 0.0 {
                    Err(CalcError::InvalidArgument("sec".to_owned(), format_f64(f)))
                } else {
                    Ok(Value::Float(1.0 / c))
                }
            }
        }
    }

    /// Cosecant. Undefined where sine vanishes
    pub fn csc(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(Complex::new(1.0, 0.0) / c.sin())),
            _ => {
                let f = self.into_raw_f64()?;
                let s = f.sin();
                if s == 0.0 {
                    Err(CalcError::InvalidArgument("csc".to_owned(), format_f64(f)))
                } else {
                    Ok(Value::Float(1.0 / s))
                }
            }
        }
    }

    asin_cos!(asin);
    asin_cos!(acos);

    pub fn atan(self) -> CalcResult {
        match &self {
            Value::Complex(c) => Ok(Value::Complex(c.atan())),
            _ => {
                let f = self.into_raw_f64()?;
                Ok(Value::Float(f.atan()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_str() {
        let v = Value::from_str_integer("10002");
        assert_eq!(v, Ok(Value::Int(BigInt::from(10002i64))));
        let v = Value::from_str_integer("10_00_2");
        assert_eq!(v, Ok(Value::Int(BigInt::from(10002i64))));
        let v = Value::from_str_integer("0xff");
        assert_eq!(v, Ok(Value::Int(BigInt::from(255i64))));
        let v = Value::from_str_integer("0O33");
        assert_eq!(v, Ok(Value::Int(BigInt::from(27i64))));
        let v = Value::from_str_integer("0b101");
        assert_eq!(v, Ok(Value::Int(BigInt::from(5i64))));

        // keypad suffix markers
        let v = Value::from_str_integer("FFh");
        assert_eq!(v, Ok(Value::Int(BigInt::from(255i64))));
        let v = Value::from_str_integer("17o");
        assert_eq!(v, Ok(Value::Int(BigInt::from(15i64))));
        let v = Value::from_str_integer("101b");
        assert_eq!(v, Ok(Value::Int(BigInt::from(5i64))));

        let v = Value::from_str_integer("12x9");
        assert!(v.is_err());
    }

    #[test]
    fn test_decimal_str() {
        let v = Value::from_str_decimal("10002");
        assert_eq!(v, Ok(Value::Int(BigInt::from(10002i64))));
        let v = Value::from_str_decimal("33e5");
        assert_eq!(v, Ok(Value::Int(BigInt::from(3300000i64))));
        let v = Value::from_str_decimal("2.50");
        assert_eq!(
            v,
            Ok(Value::Ratio(BigRational::new(BigInt::from(5), BigInt::from(2))))
        );
        let v = Value::from_str_decimal("1.0002e4");
        assert_eq!(v, Ok(Value::Int(BigInt::from(10002i64))));
        let v = Value::from_str_decimal("200e-2");
        assert_eq!(v, Ok(Value::Int(BigInt::from(2i64))));
        let v = Value::from_str_decimal("0.1");
        assert_eq!(
            v,
            Ok(Value::Ratio(BigRational::new(BigInt::from(1), BigInt::from(10))))
        );
    }

    #[test]
    fn test_exact_decimal_arithmetic() {
        // the classic float trap must stay exact
        let a = Value::from_str_decimal("0.1").unwrap();
        let b = Value::from_str_decimal("0.2").unwrap();
        let sum = a.addition(b);
        assert_eq!(
            sum,
            Ok(Value::Ratio(BigRational::new(BigInt::from(3), BigInt::from(10))))
        );

        let a = Value::from_str_decimal("2.5").unwrap();
        let b = Value::from_str_decimal("2.5").unwrap();
        assert_eq!(a.addition(b), Ok(Value::Int(BigInt::from(5))));
    }

    #[test]
    fn test_divide_exact() {
        let v = Value::Int(BigInt::from(1)).divide(Value::Int(BigInt::from(2)));
        assert_eq!(
            v,
            Ok(Value::Ratio(BigRational::new(BigInt::from(1), BigInt::from(2))))
        );
        let v = Value::Int(BigInt::from(10)).divide(Value::Int(BigInt::from(2)));
        assert_eq!(v, Ok(Value::Int(BigInt::from(5))));
        let v = Value::Int(BigInt::from(1)).divide(Value::Int(BigInt::zero()));
        assert!(v.is_err());
    }

    #[test]
    fn test_power() {
        let v = Value::Int(BigInt::from(2)).power(Value::Int(BigInt::from(10)));
        assert_eq!(v, Ok(Value::Int(BigInt::from(1024))));
        let v = Value::Int(BigInt::from(2)).power(Value::Int(BigInt::from(-2)));
        assert_eq!(
            v,
            Ok(Value::Ratio(BigRational::new(BigInt::from(1), BigInt::from(4))))
        );
        let v = Value::Int(BigInt::from(4)).power(Value::from_str_decimal("0.5").unwrap());
        assert_eq!(v, Ok(Value::Int(BigInt::from(2))));
    }

    #[test]
    fn test_sqrt() {
        let v = Value::Int(BigInt::from(16)).sqrt();
        assert_eq!(v, Ok(Value::Int(BigInt::from(4))));
        let v = Value::Int(BigInt::from(2)).sqrt();
        assert_eq!(v, Ok(Value::Float(2.0f64.sqrt())));
        let v = Value::Int(BigInt::from(-4)).sqrt();
        assert_eq!(v, Ok(Value::Complex(Complex::new(0.0, 2.0))));
    }

    #[test]
    fn test_fact() {
        let v = Value::Int(BigInt::from(5)).fact();
        assert_eq!(v, Ok(Value::Int(BigInt::from(120))));
        let v = Value::Int(BigInt::zero()).fact();
        assert_eq!(v, Ok(Value::Int(BigInt::one())));
        let v = Value::Int(BigInt::from(-3)).fact();
        assert!(v.is_err());
        let v = Value::Complex(Complex::new(1.0, 1.0)).fact();
        assert!(v.is_err());
    }

    #[test]
    fn test_percent() {
        let v = Value::Int(BigInt::from(50)).percent();
        assert_eq!(
            v,
            Ok(Value::Ratio(BigRational::new(BigInt::from(1), BigInt::from(2))))
        );
        let v = Value::Int(BigInt::from(200)).percent();
        assert_eq!(v, Ok(Value::Int(BigInt::from(2))));
    }

    #[test]
    fn test_logs() {
        let v = Value::Int(BigInt::from(100)).log10();
        assert_eq!(v, Ok(Value::Int(BigInt::from(2))));
        let v = Value::Int(BigInt::from(8)).log2();
        assert_eq!(v, Ok(Value::Int(BigInt::from(3))));
        let v = Value::Int(BigInt::zero()).ln();
        assert!(v.is_err());
        // ln of a negative number lands on the principal complex branch
        let v = Value::Int(BigInt::from(-1)).ln();
        match v {
            Ok(Value::Complex(c)) => {
                assert!(f64_equal(c.re, 0.0));
                assert!(f64_equal(c.im, consts::PI));
            }
            other => panic!("expected complex, got {:?}", other),
        }
    }

    #[test]
    fn test_nth_root() {
        let v = Value::Int(BigInt::from(27)).nth_root(Value::Int(BigInt::from(3)));
        assert_eq!(v, Ok(Value::Int(BigInt::from(3))));
        let v = Value::Int(BigInt::from(-27)).nth_root(Value::Int(BigInt::from(3)));
        assert_eq!(v, Ok(Value::Int(BigInt::from(-3))));
        let v = Value::Int(BigInt::from(16)).nth_root(Value::Int(BigInt::from(4)));
        assert_eq!(v, Ok(Value::Int(BigInt::from(2))));
    }

    #[test]
    fn test_trig() {
        let v = Value::Float(consts::FRAC_PI_2).sin();
        assert_eq!(v, Ok(Value::Float(1.0)));
        let v = Value::Int(BigInt::zero()).cos();
        assert_eq!(v, Ok(Value::Float(1.0)));
        let v = Value::Float(consts::FRAC_PI_2).tan();
        assert!(v.is_err());
        let v = Value::Int(BigInt::zero()).cot();
        assert!(v.is_err());
        let v = Value::Int(BigInt::zero()).csc();
        assert!(v.is_err());
        let v = Value::Int(BigInt::zero()).sec();
        assert_eq!(v, Ok(Value::Float(1.0)));
        // asin outside [-1, 1] promotes to complex
        let v = Value::Int(BigInt::from(5)).asin();
        match v {
            Ok(Value::Complex(..)) => {}
            other => panic!("expected complex, got {:?}", other),
        }
    }

    #[test]
    fn test_as_integer() {
        assert_eq!(Value::Int(BigInt::from(7)).as_integer(), Some(BigInt::from(7)));
        assert_eq!(Value::Float(3.0).as_integer(), Some(BigInt::from(3)));
        assert_eq!(Value::Float(3.5).as_integer(), None);
        assert_eq!(
            Value::Ratio(BigRational::new(BigInt::from(1), BigInt::from(2))).as_integer(),
            None
        );
        assert_eq!(
            Value::Complex(Complex::new(4.0, 0.0)).as_integer(),
            Some(BigInt::from(4))
        );
        assert_eq!(Value::Complex(Complex::new(4.0, 1.0)).as_integer(), None);
    }

    #[test]
    fn test_to_str() {
        let v = Value::Int(BigInt::from(12345));
        assert_eq!(v.to_string(), "12345");
        let v = Value::Float(2.25f64);
        assert_eq!(v.to_string(), "2.25");
        let v = Value::Ratio(BigRational::new(BigInt::from(23), BigInt::from(35)));
        assert_eq!(v.to_string(), "23/35");
        let v = Value::Complex(Complex::new(4.5, -3.25));
        assert_eq!(v.to_string(), "4.5-3.25i");
    }
}
