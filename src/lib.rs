//! # Multi-mode calculator engine
//!
//! The engine behind a basic/scientific/base-N calculator front-end.
//! Everything a keypad produces goes through here: expression text is
//! evaluated, numeral bases are converted, small equations are solved,
//! and the last fifty results are kept around. Rendering is not this
//! crate's business - the embedder draws the keys and the display,
//! this crate owns the state and the math.
//!
//! The evaluator transparently supports operations with different types
//! of numbers, converting to the appropriate type when it is needed.
//! For instance, `sqrt(-4)` is automatically converted from integer `-4`
//! to a complex number and evaluates to `0+2i`. The type ladder starting
//! from highest:
//! * Complex numbers (`f64` components)
//! * Float numbers
//! * Exact rational numbers - decimal literals are read exactly, so
//!   `0.1+0.2` is exactly `0.3`
//! * Big integer numbers
//!
//! Results collapse back down the ladder when they can: `1/2 + 1/2` is
//! the big integer `1`.
//!
//! The list of supported functions: trigonometric functions and their
//! inverses (sin, cos, tan, cot, sec, csc, asin, acos, atan), square
//! root and n-th root (sqrt, nthroot), exponent and logarithms (exp,
//! ln, log, log2, log10), and abs. Trig honors the radian/degree
//! setting. Operators, starting from highest priority:
//! * `!` - factorial, `%` - percent (when nothing follows)
//! * `-` - unary minus
//! * `^` - power (right associative)
//! * `*`, `/`, `%` - multiplication, division, remainder
//! * `+`, `-` - addition, subtraction
//!
//! Predefined constants: `PI`, `E`, `PHI`; `ans` names the previous
//! result. Integer literals can be written in any supported base:
//! `0xFF`, `0o17`, `0b101`, or with the keypad suffix markers `FFh`,
//! `17o`, `101b`.
//!
//! In a non-decimal numeral system the pre-processor rewrites bare
//! digit runs into decimal before evaluation, and integer results are
//! rendered back in the active base; a fractional or complex result
//! stays decimal behind a `(DEC)` marker. Unclosed brackets are closed
//! automatically.
//!
//! Nothing in the engine panics on user input: every failure becomes an
//! error value, and the orchestrating `Calculator` reduces all of them
//! to the single displayed result `Error`.

#[macro_use]
extern crate pest_derive;

pub mod base;
pub mod calc;
pub mod errors;
pub mod format;
pub mod history;
pub mod keys;
pub mod linear;
pub mod parse;
pub mod solver;
pub mod stack;
pub mod value;
