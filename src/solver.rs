use log::debug;
use num_complex::Complex;

use crate::format::{format_value, Notation, DEFAULT_PRECISION};
use crate::value::Value;

/// Closed forms exist up to the quadratic; the solver accepts up to
/// this degree and answers the rest with a capability message
pub const MAX_DEGREE: usize = 5;

// complex roots are printed with four fixed decimals
const COMPLEX_ROOT_DECIMALS: usize = 4;

fn fmt_real(x: f64) -> String {
    match format_value(&Value::Float(x), Notation::Auto, DEFAULT_PRECISION) {
        Ok(s) => s,
        Err(..) => "Error".to_string(),
    }
}

fn fmt_complex(re: f64, im: f64) -> String {
    match format_value(
        &Value::Complex(Complex::new(re, im)),
        Notation::Fixed,
        COMPLEX_ROOT_DECIMALS,
    ) {
        Ok(s) => s,
        Err(..) => "Error".to_string(),
    }
}

/// Solves `a*x^2 + b*x + c = 0` and returns the roots as display strings.
/// * both leading coefficients zero: degenerate constant equation,
///   either every x or no x solves it
/// * `a == 0`: the linear root `-c/b`
/// * positive discriminant: two real roots, the `+` branch is x₁
/// * zero discriminant: one repeated root
/// * negative discriminant: a conjugate complex pair, fixed 4 decimals
pub fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<String> {
    if a == 0.0 {
        if b == 0.0 {
            return if c == 0.0 {
                vec!["Infinite solutions".to_string()]
            } else {
                vec!["No solution".to_string()]
            };
        }
        return vec![format!("x = {}", fmt_real(-c / b))];
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant > 0.0 {
        let x1 = (-b + discriminant.sqrt()) / (2.0 * a);
        let x2 = (-b - discriminant.sqrt()) / (2.0 * a);
        vec![
            format!("x₁ = {}", fmt_real(x1)),
            format!("x₂ = {}", fmt_real(x2)),
        ]
    } else if discriminant == 0.0 {
        let x = -b / (2.0 * a);
        vec![format!("x = {}", fmt_real(x))]
    } else {
        let real = -b / (2.0 * a);
        let imag = (-discriminant).sqrt() / (2.0 * a);
        vec![
            format!("x₁ = {}", fmt_complex(real, imag)),
            format!("x₂ = {}", fmt_complex(real, -imag)),
        ]
    }
}

/// Root finding for a polynomial given by its coefficients, highest
/// degree first. Degrees up to two are solved in closed form, a short
/// coefficient list is zero-padded. Degrees three to five answer with a
/// placeholder: a numerical root finder never made it in
pub fn solve_polynomial(coeffs: &[f64]) -> Vec<String> {
    let degree = if coeffs.is_empty() { 0 } else { coeffs.len() - 1 };
    if degree > MAX_DEGREE {
        return vec!["Solver supports up to degree 5.".to_string()];
    }
    if degree <= 1 {
        let b = coeffs.get(0).copied().unwrap_or(0.0);
        let c = coeffs.get(1).copied().unwrap_or(0.0);
        return solve_quadratic(0.0, b, c);
    }
    if degree == 2 {
        return solve_quadratic(coeffs[0], coeffs[1], coeffs[2]);
    }

    vec![
        format!(
            "Solving polynomials of degree {} requires advanced numerical methods.",
            degree
        ),
        "This feature is a placeholder.".to_string(),
    ]
}

/// Transient state of the polynomial solver modal: the degree slider
/// and the textual coefficient cells, highest degree first
pub struct PolynomialSpec {
    degree: usize,
    coeffs: Vec<String>,
}

impl Default for PolynomialSpec {
    fn default() -> PolynomialSpec {
        PolynomialSpec {
            degree: 2,
            coeffs: vec![String::new(); 3],
        }
    }
}

impl PolynomialSpec {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Changes the degree, keeping the cell count at degree+1:
    /// extra cells are dropped, missing ones appear empty
    pub fn set_degree(&mut self, degree: usize) {
        let degree = degree.max(1).min(MAX_DEGREE);
        self.degree = degree;
        self.coeffs.resize(degree + 1, String::new());
    }

    pub fn coeff(&self, idx: usize) -> &str {
        match self.coeffs.get(idx) {
            Some(s) => s,
            None => "",
        }
    }

    pub fn set_coeff(&mut self, idx: usize, text: &str) {
        if let Some(c) = self.coeffs.get_mut(idx) {
            *c = text.to_string();
        }
    }

    /// Parses the cells and solves. An empty cell counts as zero, a cell
    /// that is not a number answers with a message instead of roots
    pub fn solve(&self) -> Vec<String> {
        let mut parsed = Vec::with_capacity(self.coeffs.len());
        for cell in &self.coeffs {
            let cell = cell.trim();
            if cell.is_empty() {
                parsed.push(0.0);
                continue;
            }
            match cell.parse::<f64>() {
                Ok(v) if v.is_finite() => parsed.push(v),
                _ => return vec!["Invalid coefficients".to_string()],
            }
        }
        debug!("solving degree {} polynomial: {:?}", self.degree, parsed);
        if self.degree == 2 {
            solve_quadratic(parsed[0], parsed[1], parsed[2])
        } else {
            solve_polynomial(&parsed)
        }
    }
}
