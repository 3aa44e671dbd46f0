use crate::errors::*;
use crate::parse::AngleMode;
use crate::value::*;

use lazy_static::lazy_static;

#[derive(Clone, Debug)]
pub(crate) enum Entry {
    Val(Value),
    Op(String, i32, bool),
    OpenB,
    Func(String, usize),
}

pub(crate) struct Stack {
    pub(crate) queue: Vec<Entry>,
    pub(crate) output: Vec<Entry>,
    values: Vec<Value>,
    pub result: Value,
    angle: AngleMode,
}

const PRI_IMMEDIATE: i32 = 99;
pub(crate) const FACTORIAL: &str = "!!!";
pub(crate) const UNARY_MINUS: &str = "---";
pub(crate) const PERCENT: &str = "%%%";

lazy_static! {
    pub(crate) static ref STD_FUNCS: Vec<&'static str> = [
        "sin",
        "cos",
        "tan",
        "asin",
        "acos",
        "atan",
        "cot",
        "sec",
        "csc",
        "sqrt",
        "exp",
        "ln",
        "log",
        "log2",
        "log10",
        "nthroot",
        "abs",
    ]
    .to_vec();
}

macro_rules! one_arg_op {
    ($id:ident) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.is_empty() {
                return Err(CalcError::TooManyOps);
            }

            let v = self.values.pop().unwrap();
            let v = v.$id()?;
            self.values.push(v);
            Ok(())
        }
    }
}
macro_rules! two_arg_op {
    ($id:ident) => {
        fn $id(&mut self) -> CalcErrorResult {
            if self.values.len() < 2 {
                return Err(CalcError::TooManyOps);
            }

            let v2 = self.values.pop().unwrap();
            let v1 = self.values.pop().unwrap();
            let v = v1.$id(v2)?;
            self.values.push(v);
            Ok(())
        }
    }
}
macro_rules! function_op {
    ($id:ident) => {
        fn $id(&mut self, args: usize) -> CalcErrorResult {
            if args == 0 || self.values.len() < args {
                return Err(CalcError::FunctionNoArgs(stringify!($id).to_string()));
            }

            // extra arguments are dropped, the first one is used
            let mut v = self.values.pop().unwrap();
            for _i in 0..args - 1 {
                v = self.values.pop().unwrap();
            }
            let v = v.$id()?;
            self.values.push(v);
            Ok(())
        }
    }
}
// direct trig converts a degree argument to radians first
macro_rules! trig_op {
    ($id:ident) => {
        fn $id(&mut self, args: usize) -> CalcErrorResult {
            if args == 0 || self.values.len() < args {
                return Err(CalcError::FunctionNoArgs(stringify!($id).to_string()));
            }

            let mut v = self.values.pop().unwrap();
            for _i in 0..args - 1 {
                v = self.values.pop().unwrap();
            }
            let v = self.to_radians(v)?;
            let v = v.$id()?;
            self.values.push(v);
            Ok(())
        }
    }
}
// inverse trig reports a degree result when the degree mode is on
macro_rules! inv_trig_op {
    ($id:ident) => {
        fn $id(&mut self, args: usize) -> CalcErrorResult {
            if args == 0 || self.values.len() < args {
                return Err(CalcError::FunctionNoArgs(stringify!($id).to_string()));
            }

            let mut v = self.values.pop().unwrap();
            for _i in 0..args - 1 {
                v = self.values.pop().unwrap();
            }
            let v = v.$id()?;
            let v = self.from_radians(v)?;
            self.values.push(v);
            Ok(())
        }
    }
}

impl Stack {
    fn priority(op: &str) -> (i32, bool) {
        match op {
            FACTORIAL | PERCENT => (PRI_IMMEDIATE, false), // immediate postfix ops
            UNARY_MINUS => (20, true),                     // negate
            "^" => (17, true),                             // power
            "*" | "/" | "%" => (12, false),                // mult, div, mod
            "+" | "-" => (8, false),                       // add, sub
            _ => (0, false),                               // invalid op
        }
    }

    pub(crate) fn is_func(&self, s: &str) -> bool {
        for fname in STD_FUNCS.iter() {
            if *fname == s {
                return true;
            }
        }
        false
    }

    // move operators from the queue to output while the top operator in the
    // queue has equal or greater priority
    fn pop_while_priority(&mut self, priority: i32) {
        loop {
            if self.queue.is_empty() {
                return;
            }
            // queue is not empty, so unwrap is OK
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::OpenB => {
                    self.queue.push(e);
                    return;
                }
                Entry::Func(..) => {
                    self.output.push(e);
                }
                Entry::Op(_, p, right) => {
                    if *p > priority || (*p == priority && !*right) {
                        self.output.push(e);
                    } else {
                        self.queue.push(e);
                        return;
                    }
                }
                _ => return, // unreachable
            }
        }
    }

    fn update_func_args(&mut self) {
        if self.queue.is_empty() {
            return;
        }

        if let Some(q) = self.queue.pop() {
            match &q {
                Entry::Func(name, args) => {
                    let args = args + 1;
                    self.queue.push(Entry::Func(name.to_string(), args));
                }
                _ => self.queue.push(q),
            }
        }
    }

    // move operators from the queue to output until the first bracket
    // or first argument separator
    fn pop_until_bracket(&mut self, keep_bracket: bool) -> CalcErrorResult {
        loop {
            if self.queue.is_empty() {
                return Err(CalcError::ClosingBracketMismatch);
            }

            // unwrap is ok - vector is not empty
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::Val(..) | Entry::Op(..) | Entry::Func(..) => self.output.push(e),
                Entry::OpenB => {
                    self.update_func_args();
                    if keep_bracket {
                        self.queue.push(Entry::OpenB);
                    }
                    return Ok(());
                }
            }
        }
    }

    // move functions from the queue to output
    fn pop_functions(&mut self) -> CalcErrorResult {
        loop {
            if self.queue.is_empty() {
                return Ok(());
            }

            // unwrap is ok - vector is not empty
            let e = self.queue.pop().unwrap();
            match &e {
                Entry::Func(..) => self.output.push(e),
                _ => {
                    self.queue.push(e);
                    return Ok(());
                }
            }
        }
    }

    // move all operators from queue to output
    // Must be called only after the expression ends.
    fn pop_all(&mut self) -> CalcErrorResult {
        while let Some(v) = self.queue.pop() {
            match &v {
                Entry::OpenB => {} // do nothing - allows to omit last closing brackets
                Entry::Op(..) => self.output.push(v),
                Entry::Func(..) => self.output.push(v),
                _ => return Err(CalcError::Unreachable),
            }
        }
        Ok(())
    }

    fn to_radians(&self, v: Value) -> CalcResult {
        if self.angle == AngleMode::Radians {
            return Ok(v);
        }
        match &v {
            // complex arguments are always radian
            Value::Complex(..) => Ok(v),
            _ => {
                let f = v.into_raw_f64()?;
                Ok(Value::Float(f.to_radians()))
            }
        }
    }

    fn from_radians(&self, v: Value) -> CalcResult {
        if self.angle == AngleMode::Radians {
            return Ok(v);
        }
        match &v {
            Value::Complex(..) => Ok(v),
            _ => {
                let f = v.into_raw_f64()?;
                Ok(Value::Float(f.to_degrees()))
            }
        }
    }

    // ------------ PUBLIC -----------------

    pub(crate) fn new(angle: AngleMode) -> Self {
        Stack {
            queue: Vec::new(),
            output: Vec::new(),
            values: Vec::new(),
            result: Value::new(),
            angle,
        }
    }

    pub(crate) fn push(&mut self, op: &str, val: Option<Value>) -> CalcErrorResult {
        if op.is_empty() {
            if let Some(v) = val {
                self.output.push(Entry::Val(v))
            } else {
                return Err(CalcError::EmptyValue);
            }
            return Ok(());
        }

        if self.is_func(op) {
            self.queue.push(Entry::Func(op.to_owned(), 0));
            return Ok(());
        }

        if op == "(" {
            self.queue.push(Entry::OpenB);
            return Ok(());
        }

        if op == ")" {
            return self.pop_until_bracket(false);
        }
        if op == "," {
            return self.pop_until_bracket(true);
        }

        let (pri, right_assoc) = Stack::priority(op);
        if pri == 0 {
            return Err(CalcError::InvalidOp(op.to_owned()));
        }

        if pri == PRI_IMMEDIATE {
            self.pop_functions()?;
            self.output.push(Entry::Op(op.to_owned(), pri, false));
            return Ok(());
        }

        self.pop_while_priority(pri);
        self.queue.push(Entry::Op(op.to_owned(), pri, right_assoc));

        Ok(())
    }

    pub(crate) fn calculate(&mut self) -> CalcResult {
        self.pop_all()?;
        if self.output.is_empty() {
            return Err(CalcError::EmptyExpression);
        }

        self.result = Value::new();
        self.values = Vec::new();

        for i in 0..self.output.len() {
            let o = self.output[i].clone();
            match o {
                Entry::Val(v) => {
                    self.values.push(v.clone());
                }
                Entry::Op(op, ..) => {
                    self.process_operator(&op)?;
                }
                Entry::Func(fname, args) => {
                    self.process_function(&fname, args)?;
                }
                _ => return Err(CalcError::Unreachable),
            }
        }

        if self.values.len() != 1 {
            return Err(CalcError::InsufficientOps);
        }

        // values is never empty after calculation - unwrap is fine
        self.result = self.values.pop().unwrap();
        Ok(self.result.clone())
    }

    fn process_operator(&mut self, op: &str) -> CalcErrorResult {
        match op {
            "/" => self.divide(),
            "*" => self.multiply(),
            "+" => self.addition(),
            "-" => self.subtract(),
            "%" => self.reminder(),
            "^" => self.power(),
            UNARY_MINUS => self.negate(),
            FACTORIAL => self.fact(),
            PERCENT => self.percent(),
            _ => Err(CalcError::InvalidOp(op.to_string())),
        }
    }

    fn process_function(&mut self, fname: &str, args: usize) -> CalcErrorResult {
        match fname {
            "sin" => self.sin(args),
            "cos" => self.cos(args),
            "tan" => self.tan(args),
            "cot" => self.cot(args),
            "sec" => self.sec(args),
            "csc" => self.csc(args),
            "asin" => self.asin(args),
            "acos" => self.acos(args),
            "atan" => self.atan(args),
            "sqrt" => self.sqrt(args),
            "exp" => self.exp(args),
            "ln" => self.ln(args),
            "log" => self.log(args),
            "log2" => self.log2(args),
            "log10" => self.log10(args),
            "nthroot" => self.nthroot(args),
            "abs" => self.abs(args),
            _ => Err(CalcError::InvalidOp(fname.to_string())),
        }
    }

    one_arg_op!(negate);
    one_arg_op!(fact);
    one_arg_op!(percent);

    two_arg_op!(power);
    two_arg_op!(divide);
    two_arg_op!(reminder);
    two_arg_op!(addition);
    two_arg_op!(subtract);
    two_arg_op!(multiply);

    trig_op!(sin);
    trig_op!(cos);
    trig_op!(tan);
    trig_op!(cot);
    trig_op!(sec);
    trig_op!(csc);

    inv_trig_op!(asin);
    inv_trig_op!(acos);
    inv_trig_op!(atan);

    function_op!(sqrt);
    function_op!(exp);
    function_op!(ln);
    function_op!(log2);
    function_op!(log10);
    function_op!(abs);

    // one argument is a natural logarithm, two arguments select the base
    fn log(&mut self, args: usize) -> CalcErrorResult {
        if args == 0 || self.values.len() < args {
            return Err(CalcError::FunctionNoArgs("log".to_string()));
        }

        if args == 1 {
            let v = self.values.pop().unwrap();
            let v = v.ln()?;
            self.values.push(v);
            return Ok(());
        }

        for _i in 0..args - 2 {
            let _ = self.values.pop().unwrap();
        }
        let base = self.values.pop().unwrap();
        let v = self.values.pop().unwrap();
        let v = v.log(base)?;
        self.values.push(v);
        Ok(())
    }

    // nthroot(x) is a square root, nthroot(x, n) selects the index
    fn nthroot(&mut self, args: usize) -> CalcErrorResult {
        if args == 0 || self.values.len() < args {
            return Err(CalcError::FunctionNoArgs("nthroot".to_string()));
        }

        if args == 1 {
            let v = self.values.pop().unwrap();
            let v = v.sqrt()?;
            self.values.push(v);
            return Ok(());
        }

        for _i in 0..args - 2 {
            let _ = self.values.pop().unwrap();
        }
        let index = self.values.pop().unwrap();
        let v = self.values.pop().unwrap();
        let v = v.nth_root(index)?;
        self.values.push(v);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_simple_order() {
        let mut stack = Stack::new(AngleMode::Radians);
        // 2 + 3 * 2 + 5 = 13
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(3))));
        let _ = stack.push("*", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(5))));
        let v = stack.calculate();
        assert_eq!(v, Ok(Value::Int(BigInt::from(13))));
    }

    #[test]
    fn test_braces() {
        let mut stack = Stack::new(AngleMode::Radians);
        // 2 + 3 * (2 + 5) + 1 = 24
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(3))));
        let _ = stack.push("*", None);
        let _ = stack.push("(", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(5))));
        let _ = stack.push(")", None);
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(1))));
        let v = stack.calculate();
        assert_eq!(v, Ok(Value::Int(BigInt::from(24))));
    }

    #[test]
    fn test_functions() {
        let mut stack = Stack::new(AngleMode::Radians);
        // 2 + sqrt(25) = 7
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("+", None);
        let _ = stack.push("sqrt", None);
        let _ = stack.push("(", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(25))));
        let _ = stack.push(")", None);
        let v = stack.calculate();
        assert_eq!(v, Ok(Value::Int(BigInt::from(7))));
    }

    #[test]
    fn test_two_arg_function() {
        let mut stack = Stack::new(AngleMode::Radians);
        // log(8, 2) = 3
        let _ = stack.push("log", None);
        let _ = stack.push("(", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(8))));
        let _ = stack.push(",", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push(")", None);
        // ln(8)/ln(2) may keep a float ulp of noise
        match stack.calculate() {
            Ok(Value::Int(i)) => assert_eq!(i, BigInt::from(3)),
            Ok(Value::Float(f)) => assert!((f - 3.0).abs() < 1e-12),
            other => panic!("expected 3, got {:?}", other),
        }
    }

    #[test]
    fn test_power_right_assoc() {
        let mut stack = Stack::new(AngleMode::Radians);
        // 5 + 2 ^ 2 ^ 3 + 1 = 262
        let _ = stack.push("", Some(Value::Int(BigInt::from(5))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("^", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push("^", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(3))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(1))));
        let v = stack.calculate();
        assert_eq!(v, Ok(Value::Int(BigInt::from(262))));
    }

    #[test]
    fn test_factorial() {
        let mut stack = Stack::new(AngleMode::Radians);
        // 3! + (3 + 2)! = 126
        let _ = stack.push("", Some(Value::Int(BigInt::from(3))));
        let _ = stack.push(FACTORIAL, None);
        let _ = stack.push("+", None);
        let _ = stack.push("(", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(3))));
        let _ = stack.push("+", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(2))));
        let _ = stack.push(")", None);
        let _ = stack.push(FACTORIAL, None);
        let v = stack.calculate();
        assert_eq!(v, Ok(Value::Int(BigInt::from(126))));
    }

    #[test]
    fn test_percent_postfix() {
        use num_rational::BigRational;
        let mut stack = Stack::new(AngleMode::Radians);
        // 50% = 1/2
        let _ = stack.push("", Some(Value::Int(BigInt::from(50))));
        let _ = stack.push(PERCENT, None);
        let v = stack.calculate();
        assert_eq!(
            v,
            Ok(Value::Ratio(BigRational::new(BigInt::from(1), BigInt::from(2))))
        );
    }

    #[test]
    fn test_degree_mode() {
        let mut stack = Stack::new(AngleMode::Degrees);
        // sin(90) = 1 in degree mode
        let _ = stack.push("sin", None);
        let _ = stack.push("(", None);
        let _ = stack.push("", Some(Value::Int(BigInt::from(90))));
        let _ = stack.push(")", None);
        let v = stack.calculate();
        assert_eq!(v, Ok(Value::Float(1.0)));
    }
}
