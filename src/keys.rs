use crate::base::NumberSystem;

/// Active keypad layout
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CalculatorMode {
    Basic,
    Scientific,
    Base,
}

/// Rough role of a key, for styling only - the token is what matters
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyKind {
    Digit,
    Operator,
    Function,
    Control,
}

/// One keypad key: the opaque token fed to `Calculator::press` plus a
/// plain-text label. No markup lives here, rendering is the embedder's job
#[derive(Clone, Debug)]
pub struct Key {
    pub token: &'static str,
    pub label: &'static str,
    pub kind: KeyKind,
    /// the key spans two columns
    pub wide: bool,
    pub enabled: bool,
}

fn key(token: &'static str, label: &'static str, kind: KeyKind) -> Key {
    Key {
        token,
        label,
        kind,
        wide: false,
        enabled: true,
    }
}

fn digit(token: &'static str) -> Key {
    key(token, token, KeyKind::Digit)
}

fn base_digit(token: &'static str, system: NumberSystem) -> Key {
    let mut k = key(token, token, KeyKind::Digit);
    k.enabled = token.chars().all(|c| system.permits_digit(c));
    k
}

/// The plain four-function layout
pub fn basic_keys() -> Vec<Key> {
    vec![
        key("AC", "AC", KeyKind::Operator),
        key("C", "C", KeyKind::Operator),
        key("%", "%", KeyKind::Operator),
        key("/", "÷", KeyKind::Operator),
        digit("7"),
        digit("8"),
        digit("9"),
        key("*", "×", KeyKind::Operator),
        digit("4"),
        digit("5"),
        digit("6"),
        key("-", "−", KeyKind::Operator),
        digit("1"),
        digit("2"),
        digit("3"),
        key("+", "+", KeyKind::Operator),
        Key {
            wide: true,
            ..digit("0")
        },
        digit("."),
        key("=", "=", KeyKind::Operator),
    ]
}

/// The scientific layout. The second-function layer swaps the trig keys
/// for their inverses and a few others for their counterparts, the way
/// the `2nd` key on a desk calculator does
pub fn scientific_keys(second: bool) -> Vec<Key> {
    let mut keys = vec![
        // row 1
        key("2nd", "2nd", KeyKind::Control),
        if second {
            key("asin(", "sin⁻¹", KeyKind::Function)
        } else {
            key("sin(", "sin", KeyKind::Function)
        },
        if second {
            key("acos(", "cos⁻¹", KeyKind::Function)
        } else {
            key("cos(", "cos", KeyKind::Function)
        },
        if second {
            key("atan(", "tan⁻¹", KeyKind::Function)
        } else {
            key("tan(", "tan", KeyKind::Function)
        },
        key("Backspace", "⌫", KeyKind::Operator),
        // row 2
        if second {
            key("^(1/3)", "∛", KeyKind::Function)
        } else {
            key("^3", "x³", KeyKind::Function)
        },
        if second {
            key("cot(", "cot", KeyKind::Function)
        } else {
            key("PI", "π", KeyKind::Function)
        },
        if second {
            key("sec(", "sec", KeyKind::Function)
        } else {
            key("%", "%", KeyKind::Function)
        },
        key("(", "(", KeyKind::Function),
        key(")", ")", KeyKind::Function),
        // row 3
        digit("7"),
        digit("8"),
        digit("9"),
        if second {
            key("10^", "10ˣ", KeyKind::Function)
        } else {
            key("logModal", "log…", KeyKind::Control)
        },
        key("/", "÷", KeyKind::Operator),
        // row 4
        digit("4"),
        digit("5"),
        digit("6"),
        if second {
            key("e^", "eˣ", KeyKind::Function)
        } else {
            key("ln(", "ln", KeyKind::Function)
        },
        key("*", "×", KeyKind::Operator),
        // row 5
        digit("1"),
        digit("2"),
        digit("3"),
        if second {
            key("nthRoot(", "ⁿ√", KeyKind::Function)
        } else {
            key("^", "xʸ", KeyKind::Function)
        },
        key("-", "−", KeyKind::Operator),
        // row 6
        digit("0"),
        digit("."),
        if second {
            key("csc(", "csc", KeyKind::Function)
        } else {
            key("!", "n!", KeyKind::Function)
        },
        if second {
            key("^2", "x²", KeyKind::Function)
        } else {
            key("sqrt(", "√", KeyKind::Function)
        },
        key("+", "+", KeyKind::Operator),
        // row 7
        key("AC", "AC", KeyKind::Operator),
        key("settings", "set", KeyKind::Control),
        key("history", "hist", KeyKind::Control),
    ];
    keys.push(Key {
        wide: true,
        ..key("=", "=", KeyKind::Operator)
    });
    keys
}

/// The base-N layout: hex digits are dead below hex, `8` and `9` are
/// dead in octal, everything past `1` is dead in binary
pub fn base_keys(system: NumberSystem) -> Vec<Key> {
    vec![
        // row 1
        key("(", "(", KeyKind::Function),
        key(")", ")", KeyKind::Function),
        key("Backspace", "⌫", KeyKind::Operator),
        key("AC", "AC", KeyKind::Operator),
        // row 2
        base_digit("A", system),
        base_digit("B", system),
        base_digit("C", system),
        key("/", "÷", KeyKind::Operator),
        // row 3
        base_digit("D", system),
        base_digit("E", system),
        base_digit("F", system),
        key("*", "×", KeyKind::Operator),
        // row 4
        base_digit("7", system),
        base_digit("8", system),
        base_digit("9", system),
        key("-", "−", KeyKind::Operator),
        // row 5
        base_digit("4", system),
        base_digit("5", system),
        base_digit("6", system),
        key("+", "+", KeyKind::Operator),
        // row 6
        base_digit("1", system),
        base_digit("2", system),
        base_digit("3", system),
        key("±", "±", KeyKind::Function),
        // row 7
        Key {
            wide: true,
            ..base_digit("0", system)
        },
        Key {
            wide: true,
            ..key("=", "=", KeyKind::Operator)
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_layer_swaps() {
        let first: Vec<&str> = scientific_keys(false).iter().map(|k| k.token).collect();
        let second: Vec<&str> = scientific_keys(true).iter().map(|k| k.token).collect();
        assert!(first.contains(&"sin("));
        assert!(!first.contains(&"asin("));
        assert!(second.contains(&"asin("));
        assert!(second.contains(&"nthRoot("));
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_base_enablement() {
        let bin: Vec<Key> = base_keys(NumberSystem::Bin);
        let f = bin.iter().find(|k| k.token == "F").unwrap();
        assert!(!f.enabled);
        let two = bin.iter().find(|k| k.token == "2").unwrap();
        assert!(!two.enabled);
        let one = bin.iter().find(|k| k.token == "1").unwrap();
        assert!(one.enabled);

        let hex = base_keys(NumberSystem::Hex);
        assert!(hex.iter().find(|k| k.token == "F").unwrap().enabled);

        let oct = base_keys(NumberSystem::Oct);
        assert!(!oct.iter().find(|k| k.token == "9").unwrap().enabled);
        assert!(oct.iter().find(|k| k.token == "7").unwrap().enabled);
    }

    #[test]
    fn test_basic_layout() {
        let keys = basic_keys();
        assert_eq!(keys.len(), 19);
        assert!(keys.iter().any(|k| k.token == "=" ));
        let zero = keys.iter().find(|k| k.token == "0").unwrap();
        assert!(zero.wide);
    }
}
