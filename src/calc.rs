use log::debug;

use crate::base::{self, NumberSystem};
use crate::format::{format_value, Notation, DEFAULT_PRECISION, MAX_PRECISION, MIN_PRECISION};
use crate::history::{History, HistoryEntry};
use crate::keys::{self, CalculatorMode, Key};
use crate::parse::{self, AngleMode, CalcState};

/// The one result every failure collapses to on the display
pub const ERROR_RESULT: &str = "Error";

/// Display precision in significant digits, clamped to the formatter range
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    precision: usize,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl Settings {
    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision.max(MIN_PRECISION).min(MAX_PRECISION);
    }
}

/// The whole mutable state of the calculator: the expression buffer, the
/// last result, the history log, the settings, and the active mode and
/// numeral system. One owner, no globals; every user action is one
/// method call that runs to completion
pub struct Calculator {
    expression: String,
    result: String,
    history: History,
    settings: Settings,
    mode: CalculatorMode,
    system: NumberSystem,
    second: bool,
    state: CalcState,
}

impl Default for Calculator {
    fn default() -> Calculator {
        Calculator {
            expression: String::new(),
            result: String::new(),
            history: History::new(),
            settings: Settings::default(),
            mode: CalculatorMode::Scientific,
            system: NumberSystem::Dec,
            second: false,
            state: CalcState::new(),
        }
    }
}

fn is_control(key: &str) -> bool {
    matches!(
        key,
        "AC" | "C" | "Backspace" | "=" | "Rad" | "Deg" | "2nd" | "settings" | "history" | "logModal"
    )
}

impl Calculator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn result(&self) -> &str {
        &self.result
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.settings.set_precision(precision);
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CalculatorMode) {
        self.mode = mode;
    }

    pub fn system(&self) -> NumberSystem {
        self.system
    }

    /// Switches the numeral system. The expression text is kept as is:
    /// it is reinterpreted only at the next evaluation
    pub fn set_system(&mut self, system: NumberSystem) {
        self.system = system;
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.state.angle()
    }

    pub fn set_angle_mode(&mut self, angle: AngleMode) {
        self.state.set_angle(angle);
    }

    pub fn toggle_angle_mode(&mut self) {
        let next = match self.state.angle() {
            AngleMode::Radians => AngleMode::Degrees,
            AngleMode::Degrees => AngleMode::Radians,
        };
        self.state.set_angle(next);
    }

    pub fn second(&self) -> bool {
        self.second
    }

    /// The key list for the active mode, ready for rendering
    pub fn keypad(&self) -> Vec<Key> {
        match self.mode {
            CalculatorMode::Basic => keys::basic_keys(),
            CalculatorMode::Scientific => keys::scientific_keys(self.second),
            CalculatorMode::Base => keys::base_keys(self.system),
        }
    }

    /// Feeds one keypad token in. Control tokens act on the state,
    /// anything else is appended to the expression buffer. The first
    /// input token after an error starts a fresh expression
    pub fn press(&mut self, key: &str) {
        if self.result == ERROR_RESULT && !is_control(key) {
            self.expression.clear();
            self.result.clear();
        }

        match key {
            "AC" => {
                self.expression.clear();
                self.result.clear();
            }
            "C" => {
                self.expression.clear();
            }
            "Backspace" => {
                self.expression.pop();
            }
            "=" => self.evaluate(),
            "±" => self.toggle_sign(),
            "Rad" | "Deg" => self.toggle_angle_mode(),
            "2nd" => self.second = !self.second,
            // panel toggles live outside the core
            "settings" | "history" | "logModal" => {}
            _ => self.expression.push_str(key),
        }
    }

    fn toggle_sign(&mut self) {
        if self.expression.starts_with('-') {
            self.expression.remove(0);
        } else {
            self.expression.insert(0, '-');
        }
    }

    /// Restores a history entry onto the display
    pub fn recall(&mut self, entry: &HistoryEntry) {
        self.expression = entry.expression.clone();
        self.result = entry.result.clone();
    }

    // integer-valued results re-render in the active base; anything
    // else keeps the decimal text behind a "(DEC) " marker so the user
    // knows the value did not survive the round-trip
    fn render_result(&self, value: &crate::value::Value, formatted: String) -> String {
        if self.system == NumberSystem::Dec {
            return formatted;
        }
        match value.as_integer() {
            Some(i) => i.to_str_radix(self.system.radix()).to_uppercase(),
            None => format!("(DEC) {}", formatted),
        }
    }

    /// Evaluates the expression buffer: closes trailing brackets,
    /// rewrites non-decimal numerals, runs the engine, formats, and on
    /// success commits the display state and the history entry. Every
    /// failure collapses to the `Error` result; the expression buffer
    /// and the history are left untouched so the user can edit and retry.
    /// An empty expression is not an error, it is simply ignored
    pub fn evaluate(&mut self) {
        if self.expression.is_empty() {
            return;
        }

        let final_expr = base::auto_close(&self.expression);
        let prepared = if self.system == NumberSystem::Dec {
            Ok(final_expr.clone())
        } else {
            base::rewrite_numerals(&final_expr, self.system)
        };

        let value = match prepared.and_then(|p| parse::eval(&p, &mut self.state)) {
            Ok(v) => v,
            Err(e) => {
                debug!("evaluation of '{}' failed: {}", final_expr, e);
                self.result = ERROR_RESULT.to_string();
                return;
            }
        };

        let formatted = match format_value(&value, Notation::Auto, self.settings.precision()) {
            Ok(s) => s,
            Err(e) => {
                debug!("result of '{}' cannot be formatted: {}", final_expr, e);
                self.result = ERROR_RESULT.to_string();
                return;
            }
        };

        let display = self.render_result(&value, formatted);
        self.expression = final_expr.clone();
        self.result = display.clone();
        self.history.push(HistoryEntry {
            expression: final_expr,
            result: display,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::HISTORY_CAPACITY;

    fn press_all(c: &mut Calculator, keys: &[&str]) {
        for k in keys {
            c.press(k);
        }
    }

    #[test]
    fn test_simple_evaluation() {
        let mut c = Calculator::new();
        press_all(&mut c, &["1", "+", "2", "="]);
        assert_eq!(c.result(), "3");
        assert_eq!(c.expression(), "1+2");
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.history().get(0).unwrap().result, "3");
    }

    #[test]
    fn test_auto_close_is_committed() {
        let mut c = Calculator::new();
        press_all(&mut c, &["(", "1", "+", "2", "="]);
        assert_eq!(c.result(), "3");
        // the closed form is what lands on the display and in history
        assert_eq!(c.expression(), "(1+2)");
        assert_eq!(c.history().get(0).unwrap().expression, "(1+2)");
    }

    #[test]
    fn test_error_keeps_state() {
        let mut c = Calculator::new();
        press_all(&mut c, &["1", "+", "2", "="]);
        press_all(&mut c, &["AC", "1", "/", "="]);
        assert_eq!(c.result(), ERROR_RESULT);
        // the buffer survives for editing, the history did not grow
        assert_eq!(c.expression(), "1/");
        assert_eq!(c.history().len(), 1);
    }

    #[test]
    fn test_error_then_fresh_input() {
        let mut c = Calculator::new();
        press_all(&mut c, &["1", "/", "="]);
        assert_eq!(c.result(), ERROR_RESULT);
        // an input token starts over, a control key keeps its meaning
        c.press("5");
        assert_eq!(c.expression(), "5");
        assert_eq!(c.result(), "");
    }

    #[test]
    fn test_empty_is_ignored() {
        let mut c = Calculator::new();
        c.press("=");
        assert_eq!(c.result(), "");
        assert_eq!(c.history().len(), 0);
    }

    #[test]
    fn test_backspace_and_clear() {
        let mut c = Calculator::new();
        press_all(&mut c, &["1", "2", "Backspace", "+", "3", "="]);
        assert_eq!(c.result(), "4");
        c.press("AC");
        assert_eq!(c.expression(), "");
        assert_eq!(c.result(), "");
    }

    #[test]
    fn test_function_tokens() {
        let mut c = Calculator::new();
        // "sqrt(" and the auto-closer cooperate: "sqrt(16" evaluates
        press_all(&mut c, &["sqrt(", "1", "6", "="]);
        assert_eq!(c.result(), "4");
    }

    #[test]
    fn test_history_capacity_via_evaluations() {
        let mut c = Calculator::new();
        for i in 1..=(HISTORY_CAPACITY + 1) {
            c.press("AC");
            let n = i.to_string();
            c.press(&n);
            c.press("+");
            c.press("1");
            c.press("=");
        }
        assert_eq!(c.history().len(), HISTORY_CAPACITY);
        assert_eq!(c.history().get(0).unwrap().expression, "51+1");
        assert!(c.history().iter().all(|e| e.expression != "1+1"));
    }

    #[test]
    fn test_base_round_trip() {
        let mut c = Calculator::new();
        c.set_system(NumberSystem::Hex);
        press_all(&mut c, &["F", "+", "1", "="]);
        assert_eq!(c.result(), "10");
        assert_eq!(c.history().get(0).unwrap().result, "10");

        c.press("AC");
        c.set_system(NumberSystem::Bin);
        press_all(&mut c, &["1", "0", "1", "*", "1", "0", "="]);
        assert_eq!(c.result(), "1010");
    }

    #[test]
    fn test_base_fractional_falls_back_to_dec() {
        let mut c = Calculator::new();
        c.set_system(NumberSystem::Hex);
        press_all(&mut c, &["F", "/", "2", "="]);
        assert_eq!(c.result(), "(DEC) 7.5");
    }

    #[test]
    fn test_base_invalid_digit_is_error() {
        let mut c = Calculator::new();
        c.set_system(NumberSystem::Oct);
        press_all(&mut c, &["1", "9", "+", "1", "="]);
        assert_eq!(c.result(), ERROR_RESULT);
    }

    #[test]
    fn test_precision_setting() {
        let mut c = Calculator::new();
        c.set_precision(5);
        press_all(&mut c, &["1", "/", "3", "="]);
        assert_eq!(c.result(), "0.33333");
        // out-of-range precision is clamped
        c.set_precision(1000);
        assert_eq!(c.settings().precision(), 64);
        c.set_precision(0);
        assert_eq!(c.settings().precision(), 2);
    }

    #[test]
    fn test_angle_toggle() {
        let mut c = Calculator::new();
        assert_eq!(c.angle_mode(), AngleMode::Radians);
        c.press("Deg");
        assert_eq!(c.angle_mode(), AngleMode::Degrees);
        press_all(&mut c, &["sin(", "9", "0", "="]);
        assert_eq!(c.result(), "1");
    }

    #[test]
    fn test_toggle_sign() {
        let mut c = Calculator::new();
        press_all(&mut c, &["4", "2", "±"]);
        assert_eq!(c.expression(), "-42");
        c.press("±");
        assert_eq!(c.expression(), "42");
    }

    #[test]
    fn test_recall() {
        let mut c = Calculator::new();
        press_all(&mut c, &["2", "*", "3", "="]);
        let entry = c.history().get(0).unwrap().clone();
        c.press("AC");
        c.recall(&entry);
        assert_eq!(c.expression(), "2*3");
        assert_eq!(c.result(), "6");
    }

    #[test]
    fn test_ans_carries_over() {
        let mut c = Calculator::new();
        press_all(&mut c, &["2", "+", "3", "="]);
        press_all(&mut c, &["AC", "ans", "*", "2", "="]);
        assert_eq!(c.result(), "10");
    }

    #[test]
    fn test_exact_decimal_display() {
        let mut c = Calculator::new();
        press_all(&mut c, &["0", ".", "1", "+", "0", ".", "2", "="]);
        assert_eq!(c.result(), "0.3");
    }
}
