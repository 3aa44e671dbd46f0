use pest::Parser;
use std::f64::consts::{E, PI};

use crate::errors::*;
use crate::stack::{Stack, FACTORIAL, PERCENT, UNARY_MINUS};
use crate::value::*;

#[derive(Parser)]
#[grammar = "calc.pest"]
pub struct CalcParser;

pub const PHI: f64 = 1.618_033_988_749_895;
const LAST_RESULT: &str = "ans";

/// Unit of trig function arguments and inverse trig results
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AngleMode {
    Radians,
    Degrees,
}

impl Default for AngleMode {
    fn default() -> AngleMode {
        AngleMode::Radians
    }
}

/// Engine state that survives between evaluations: the last successful
/// result (readable in an expression as `ans`) and the angle unit
pub struct CalcState {
    ans: Option<Value>,
    angle: AngleMode,
}

impl Default for CalcState {
    fn default() -> CalcState {
        CalcState {
            ans: None,
            angle: AngleMode::Radians,
        }
    }
}

impl CalcState {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns a constant value by its name. Name is caseinsensitive
    pub fn constant(&self, name: &str) -> Option<Value> {
        let a = name.to_lowercase();
        match a.as_str() {
            "e" => Some(Value::Float(E)),
            "pi" => Some(Value::Float(PI)),
            "phi" | "golden" | "gold" => Some(Value::Float(PHI)),
            _ => None,
        }
    }

    /// The result of the last successful evaluation
    pub fn ans(&self) -> Option<Value> {
        self.ans.clone()
    }

    pub(crate) fn set_ans(&mut self, v: Value) {
        self.ans = Some(v);
    }

    pub fn angle(&self) -> AngleMode {
        self.angle
    }

    pub fn set_angle(&mut self, angle: AngleMode) {
        self.angle = angle;
    }
}

// a postfix '%' is a percent only when nothing that can start an operand
// follows; before an operand it is the binary mod operator
fn operand_follows(pairs: &[pest::iterators::Pair<Rule>], idx: usize) -> bool {
    match pairs.get(idx + 1) {
        Some(p) => match p.as_rule() {
            Rule::int
            | Rule::hex
            | Rule::oct
            | Rule::bin
            | Rule::float
            | Rule::ident
            | Rule::open_b => true,
            _ => false,
        },
        None => false,
    }
}

/// Evaluates a given expression and returns either result or error.
/// Adjacent values multiply implicitly: `(3+2)(4-9)` is `-25` and
/// `2pi` is two pi. A function name must be followed by a bracket
pub fn eval(expr: &str, state: &mut CalcState) -> CalcResult {
    let pairs = match CalcParser::parse(Rule::expr, expr) {
        Ok(p) => p,
        // detailed pest error is useless on a calculator display
        Err(..) => return Err(CalcError::ParseFailed("invalid expression".to_string())),
    };
    let pairs: Vec<_> = pairs.collect();

    let mut stk = Stack::new(state.angle());
    let mut is_last_value = false;
    let mut pending_func: Option<String> = None;

    for (idx, pair) in pairs.iter().enumerate() {
        let rule = pair.as_rule();
        let val = pair.as_span().as_str().to_lowercase();

        if let Some(fname) = pending_func.take() {
            if rule != Rule::open_b {
                return Err(CalcError::FunctionNoArgs(fname));
            }
        }

        match rule {
            Rule::int | Rule::hex | Rule::bin | Rule::oct => {
                if is_last_value {
                    stk.push("*", None)?;
                }
                let v = Value::from_str_integer(&val)?;
                stk.push("", Some(v))?;
                is_last_value = true;
            }
            Rule::float => {
                if is_last_value {
                    stk.push("*", None)?;
                }
                let v = Value::from_str_decimal(&val)?;
                stk.push("", Some(v))?;
                is_last_value = true;
            }
            Rule::open_b => {
                if is_last_value {
                    stk.push("*", None)?;
                }
                stk.push("(", None)?;
                is_last_value = false;
            }
            Rule::close_b => {
                stk.push(")", None)?;
                is_last_value = true;
            }
            Rule::arg_sep => {
                stk.push(",", None)?;
                is_last_value = false;
            }
            Rule::operator => {
                if val == "+" && !is_last_value {
                    // unary plus changes nothing
                } else if val == "-" && !is_last_value {
                    stk.push(UNARY_MINUS, None)?;
                } else if val == "!" {
                    if !is_last_value {
                        return Err(CalcError::InvalidOp("!".to_string()));
                    }
                    stk.push(FACTORIAL, None)?;
                    // postfix: the value stays on top
                } else if val == "%" && is_last_value && !operand_follows(&pairs, idx) {
                    stk.push(PERCENT, None)?;
                } else {
                    stk.push(&val, None)?;
                    is_last_value = false;
                }
            }
            Rule::ident => {
                if stk.is_func(&val) {
                    if is_last_value {
                        stk.push("*", None)?;
                    }
                    stk.push(&val, None)?;
                    is_last_value = false;
                    pending_func = Some(val);
                } else if val == LAST_RESULT {
                    let v = match state.ans() {
                        Some(v) => v,
                        None => return Err(CalcError::VarUndeclared(val)),
                    };
                    if is_last_value {
                        stk.push("*", None)?;
                    }
                    stk.push("", Some(v))?;
                    is_last_value = true;
                } else if let Some(v) = state.constant(&val) {
                    if is_last_value {
                        stk.push("*", None)?;
                    }
                    stk.push("", Some(v))?;
                    is_last_value = true;
                } else {
                    return Err(CalcError::VarUndeclared(val));
                }
            }
            Rule::EOI => {}
            _ => return Err(CalcError::Unreachable),
        }
    }

    let output = stk.calculate();
    if let Ok(ref v) = output {
        state.set_ans(v.clone());
    }
    output
}
