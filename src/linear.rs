use log::{debug, warn};

use crate::errors::*;
use crate::format::{format_value, Notation};
use crate::value::Value;

pub const MIN_SIZE: usize = 2;
pub const MAX_SIZE: usize = 4;

// solution components are printed with five fixed decimals
const SOLUTION_DECIMALS: usize = 5;

// a pivot below this is as good as zero
const PIVOT_EPS: f64 = 1e-12;

/// Dense `A*x = b` solve: LU elimination with partial pivoting and back
/// substitution. The matrices here are tiny (4x4 at most), nothing
/// clever is needed. A vanishing pivot means a singular system
pub fn lu_solve(a: &[Vec<f64>], b: &[f64]) -> Result<Vec<f64>, CalcError> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(CalcError::InvalidInput(
            "Matrix and vector sizes do not match".to_string(),
        ));
    }

    let mut m = a.to_vec();
    let mut x = b.to_vec();

    for col in 0..n {
        let mut pivot = col;
        for row in col + 1..n {
            if m[row][col].abs() > m[pivot][col].abs() {
                pivot = row;
            }
        }
        if m[pivot][col].abs() < PIVOT_EPS {
            warn!("singular matrix: no pivot in column {}", col);
            return Err(CalcError::SingularMatrix);
        }
        if pivot != col {
            m.swap(pivot, col);
            x.swap(pivot, col);
        }
        for row in col + 1..n {
            let k = m[row][col] / m[col][col];
            if k == 0.0 {
                continue;
            }
            for j in col..n {
                m[row][j] -= k * m[col][j];
            }
            x[row] -= k * x[col];
        }
    }

    for col in (0..n).rev() {
        let mut s = x[col];
        for j in col + 1..n {
            s -= m[col][j] * x[j];
        }
        x[col] = s / m[col][col];
    }

    Ok(x)
}

/// Parses the textual cells of `A` and `b`, solves the system, and
/// formats every component with five fixed decimals. The first cell
/// that is not a finite number aborts everything before the solve
pub fn solve_linear_system(a: &[Vec<String>], b: &[String]) -> Result<Vec<String>, CalcError> {
    let mut matrix = Vec::with_capacity(a.len());
    for row in a {
        let mut cells = Vec::with_capacity(row.len());
        for cell in row {
            let v = parse_cell(cell)
                .ok_or_else(|| CalcError::InvalidInput("Invalid matrix value".to_string()))?;
            cells.push(v);
        }
        matrix.push(cells);
    }
    let mut vector = Vec::with_capacity(b.len());
    for cell in b {
        let v = parse_cell(cell)
            .ok_or_else(|| CalcError::InvalidInput("Invalid vector value".to_string()))?;
        vector.push(v);
    }

    debug!("solving {}x{} linear system", vector.len(), vector.len());
    let solution = lu_solve(&matrix, &vector)?;
    solution
        .iter()
        .map(|x| format_value(&Value::Float(*x), Notation::Fixed, SOLUTION_DECIMALS))
        .collect()
}

fn parse_cell(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

/// Transient state of the linear-system modal: the size slider and the
/// textual cells of the coefficient matrix and the right-hand side
pub struct LinearSystemSpec {
    size: usize,
    a: Vec<Vec<String>>,
    b: Vec<String>,
}

impl Default for LinearSystemSpec {
    fn default() -> LinearSystemSpec {
        LinearSystemSpec {
            size: MIN_SIZE,
            a: vec![vec![String::new(); MIN_SIZE]; MIN_SIZE],
            b: vec![String::new(); MIN_SIZE],
        }
    }
}

impl LinearSystemSpec {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Re-shapes the system. All cells start over empty, as a matrix
    /// of a different size is a different problem
    pub fn set_size(&mut self, size: usize) {
        let size = size.max(MIN_SIZE).min(MAX_SIZE);
        self.size = size;
        self.a = vec![vec![String::new(); size]; size];
        self.b = vec![String::new(); size];
    }

    pub fn matrix_cell(&self, row: usize, col: usize) -> &str {
        match self.a.get(row).and_then(|r| r.get(col)) {
            Some(s) => s,
            None => "",
        }
    }

    pub fn set_matrix_cell(&mut self, row: usize, col: usize, text: &str) {
        if let Some(c) = self.a.get_mut(row).and_then(|r| r.get_mut(col)) {
            *c = text.to_string();
        }
    }

    pub fn vector_cell(&self, idx: usize) -> &str {
        match self.b.get(idx) {
            Some(s) => s,
            None => "",
        }
    }

    pub fn set_vector_cell(&mut self, idx: usize, text: &str) {
        if let Some(c) = self.b.get_mut(idx) {
            *c = text.to_string();
        }
    }

    pub fn solve(&self) -> Result<Vec<String>, CalcError> {
        solve_linear_system(&self.a, &self.b)
    }
}
