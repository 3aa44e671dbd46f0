use num_bigint::BigInt;
use num_rational::BigRational;
use std::fmt;

#[derive(PartialEq)]
pub enum CalcError {
    StrToInt(String),
    StrToDecimal(String),
    IntToFloat(BigInt),
    RatioToFloat(BigRational),
    FloatToInt(f64),
    DividedByZero(String),

    NotForComplex(String),
    NotForNegativeInt(String),
    InvalidArgument(String, String),

    EmptyValue,
    InvalidOp(String),
    TooManyOps,
    ClosingBracketMismatch,
    FunctionNoArgs(String),
    EmptyExpression,
    InsufficientOps,
    VarUndeclared(String),
    ParseFailed(String),

    BadNumeral(String, &'static str),
    NotRepresentable(String),
    InvalidInput(String),
    SingularMatrix,

    Unreachable,
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::StrToInt(s) => write!(f, "Failed to convert '{}' to integer", s),
            CalcError::StrToDecimal(s) => write!(f, "Failed to convert '{}' to number", s),
            CalcError::IntToFloat(i) => write!(f, "Failed to convert integer {} to float", i),
            CalcError::RatioToFloat(r) => write!(f, "Failed to convert fraction {} to float", r),
            CalcError::FloatToInt(r) => write!(f, "Failed to convert float {} to integer", r),
            CalcError::DividedByZero(s) => write!(f, "'{}' divided by zero", s),

            CalcError::NotForComplex(s) => write!(f, "Function '{}' is not supported for complex numbers", s),
            CalcError::NotForNegativeInt(s) => write!(f, "Function '{}' is not supported for negative integers", s),
            CalcError::InvalidArgument(func, val) => write!(f, "Invalid argument {} for function '{}'", val, func),

            CalcError::EmptyValue => write!(f, "Nor value neither operator found"),
            CalcError::InvalidOp(s) => write!(f, "Invalid operator '{}'", s),
            CalcError::TooManyOps => write!(f, "Too many operators"),
            CalcError::ClosingBracketMismatch => write!(f, "Mismatched closing bracket"),
            CalcError::FunctionNoArgs(s) => write!(f, "Function '{}' requires an argument", s),
            CalcError::EmptyExpression => write!(f, "Nothing to calculate"),
            CalcError::InsufficientOps => write!(f, "Too many numbers"),
            CalcError::VarUndeclared(s) => write!(f, "Name '{}' not found", s),
            CalcError::ParseFailed(s) => write!(f, "Failed to parse expression: {}", s),

            CalcError::BadNumeral(s, base) => write!(f, "'{}' is not a valid {} numeral", s, base),
            CalcError::NotRepresentable(s) => write!(f, "Cannot format '{}'", s),
            CalcError::InvalidInput(s) => write!(f, "{}", s),
            CalcError::SingularMatrix => write!(f, "Matrix is singular"),

            CalcError::Unreachable => write!(f, "unreachable"),
        }
    }
}

impl fmt::Debug for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self {
            CalcError::StrToInt(s) => write!(f, "Failed to convert '{}' to integer", s),
            CalcError::StrToDecimal(s) => write!(f, "Failed to convert '{}' to number", s),
            CalcError::IntToFloat(i) => write!(f, "Failed to convert integer {} to float", i),
            CalcError::RatioToFloat(r) => write!(f, "Failed to convert fraction {} to float", r),
            CalcError::FloatToInt(r) => write!(f, "Failed to convert float {} to integer", r),
            CalcError::DividedByZero(s) => write!(f, "'{}' divided by zero", s),

            CalcError::NotForComplex(s) => write!(f, "Function '{}' is not supported for complex numbers", s),
            CalcError::NotForNegativeInt(s) => write!(f, "Function '{}' is not supported for negative integers", s),
            CalcError::InvalidArgument(func, val) => write!(f, "Invalid argument {} for function '{}'", val, func),

            CalcError::EmptyValue => write!(f, "Nor value neither operator found"),
            CalcError::InvalidOp(s) => write!(f, "Invalid operator '{}'", s),
            CalcError::TooManyOps => write!(f, "Too many operators"),
            CalcError::ClosingBracketMismatch => write!(f, "Mismatched closing bracket"),
            CalcError::FunctionNoArgs(s) => write!(f, "Function '{}' requires an argument", s),
            CalcError::EmptyExpression => write!(f, "Nothing to calculate"),
            CalcError::InsufficientOps => write!(f, "Too many numbers"),
            CalcError::VarUndeclared(s) => write!(f, "Name '{}' not found", s),
            CalcError::ParseFailed(s) => write!(f, "Failed to parse expression: {}", s),

            CalcError::BadNumeral(s, base) => write!(f, "'{}' is not a valid {} numeral", s, base),
            CalcError::NotRepresentable(s) => write!(f, "Cannot format '{}'", s),
            CalcError::InvalidInput(s) => write!(f, "{}", s),
            CalcError::SingularMatrix => write!(f, "Matrix is singular"),

            CalcError::Unreachable => write!(f, "unreachable"),
        }
    }
}
