//! Assignment tables: partial truth tables the search tries to reproduce.
//!
//! Conceptually a table has one row per variable `v_1..v_n`, a final outcome
//! row `e`, and one column per example. Variable cells are three-valued
//! (`None` is unknown); outcomes are always known once the table is cleaned.
//! Internally the table is stored column-major as a list of [`Example`]s.

use std::io::{BufRead, BufReader, Read};

use log::debug;
use rand::Rng;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::logic::Truth;

/// One column of the table: values of every variable plus the expected outcome.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Example {
    values: Vec<Truth>,
    outcome: bool,
}

impl Example {
    pub fn new(values: Vec<Truth>, outcome: bool) -> Self {
        Self { values, outcome }
    }

    /// `values()[i]` is the value of `v_{i+1}`.
    pub fn values(&self) -> &[Truth] {
        &self.values
    }

    pub fn outcome(&self) -> bool {
        self.outcome
    }
}

/// A cleaned assignment table.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Assignment {
    variable_count: usize,
    examples: Vec<Example>,
}

// Constructors
impl Assignment {
    /// Creates a table from already clean examples.
    ///
    /// Every example must carry exactly `variable_count` values. An empty
    /// list of examples is accepted here; the search rejects it.
    pub fn new(variable_count: usize, examples: Vec<Example>) -> Result<Self> {
        if let Some((i, example)) = examples
            .iter()
            .enumerate()
            .find(|(_, example)| example.values.len() != variable_count)
        {
            return Err(Error::MalformedTable(format!(
                "example a_{} has {} values, expected {}",
                i + 1,
                example.values.len(),
                variable_count
            )));
        }
        Ok(Self {
            variable_count,
            examples,
        })
    }

    /// Builds and cleans a table from raw rows.
    ///
    /// `rows[..n]` are the variable rows `v_1..v_n`, the last row is the
    /// outcome row `e`. Cleaning then:
    ///
    /// 1. drops every column whose variable values repeat an earlier column
    ///    (the earliest one is kept, outcomes are not compared);
    /// 2. drops every column whose outcome is unknown.
    pub fn from_rows(rows: &[Vec<Truth>]) -> Result<Self> {
        let Some((outcomes, variables)) = rows.split_last() else {
            return Err(Error::MalformedTable("missing outcome row".to_string()));
        };
        let width = outcomes.len();
        if let Some(i) = variables.iter().position(|row| row.len() != width) {
            return Err(Error::MalformedTable(format!(
                "row v_{} has {} cells, expected {}",
                i + 1,
                rows[i].len(),
                width
            )));
        }

        let columns: Vec<(Vec<Truth>, Truth)> = (0..width)
            .map(|j| (variables.iter().map(|row| row[j]).collect(), outcomes[j]))
            .collect();

        let mut unique: Vec<(Vec<Truth>, Truth)> = Vec::with_capacity(width);
        for (values, outcome) in columns {
            if unique.iter().any(|(seen, _)| *seen == values) {
                continue;
            }
            unique.push((values, outcome));
        }
        let duplicates = width - unique.len();

        let examples: Vec<Example> = unique
            .into_iter()
            .filter_map(|(values, outcome)| outcome.map(|outcome| Example::new(values, outcome)))
            .collect();

        debug!(
            "from_rows: {} columns, {} duplicates dropped, {} incomplete dropped",
            width,
            duplicates,
            width - duplicates - examples.len()
        );

        Self::new(variables.len(), examples)
    }

    /// Full truth table of `expr` over `variable_count` variables.
    ///
    /// Columns enumerate assignments starting from all-true, with `v_1`
    /// varying slowest (`TT, TF, FT, FF` for two variables).
    ///
    /// # Errors
    ///
    /// [`Error::MalformedTable`] if `2^variable_count` columns do not fit in a `usize`.
    pub fn from_formula(expr: &Expr, variable_count: usize) -> Result<Self> {
        let columns = u32::try_from(variable_count)
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
            .ok_or_else(|| {
                Error::MalformedTable(format!(
                    "a full truth table over {} variables is too large",
                    variable_count
                ))
            })?;
        let mut rows: Vec<Vec<Truth>> = (0..variable_count)
            .map(|i| {
                (0..columns)
                    .map(|j| Some((j >> (variable_count - 1 - i)) & 1 == 0))
                    .collect()
            })
            .collect();
        let mut outcomes = Vec::with_capacity(columns);
        for j in 0..columns {
            let values: Vec<Truth> = rows.iter().map(|row| row[j]).collect();
            outcomes.push(expr.evaluate(&values)?);
        }
        rows.push(outcomes);
        Self::from_rows(&rows)
    }

    /// Table of uniformly random booleans (`variable_count + 1` rows, `example_count` columns), cleaned.
    pub fn random<R>(rng: &mut R, variable_count: usize, example_count: usize) -> Result<Self>
    where
        R: Rng + ?Sized,
    {
        let rows: Vec<Vec<Truth>> = (0..=variable_count)
            .map(|_| (0..example_count).map(|_| Some(rng.gen_bool(0.5))).collect())
            .collect();
        Self::from_rows(&rows)
    }

    /// Reads a table in the plain-text format.
    ///
    /// One line per row, cells separated by whitespace or commas, the last row
    /// is the outcome row. Known cells: `1`, `T`, `t`, `true`, `True` and `0`,
    /// `F`, `f`, `false`, `False`; unknown cells: `?`, `-`, `None`, `none`.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut rows = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| Error::MalformedTable(format!("IO error at line {}: {}", line_num + 1, e)))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|cell| parse_cell(cell).map_err(|e| at_line(e, line_num + 1)))
                .collect::<Result<Vec<Truth>>>()?;
            rows.push(row);
        }
        Self::from_rows(&rows)
    }
}

fn parse_cell(cell: &str) -> Result<Truth> {
    match cell {
        "1" | "T" | "t" | "true" | "True" | "TRUE" => Ok(Some(true)),
        "0" | "F" | "f" | "false" | "False" | "FALSE" => Ok(Some(false)),
        "?" | "-" | "None" | "none" => Ok(None),
        _ => Err(Error::MalformedTable(format!("invalid cell `{}`", cell))),
    }
}

fn at_line(error: Error, line: usize) -> Error {
    match error {
        Error::MalformedTable(message) => Error::MalformedTable(format!("line {}: {}", line, message)),
        other => other,
    }
}

// Getters
impl Assignment {
    /// Number of variable rows.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// Number of examples (columns).
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Checks the table can drive a search: at least one variable and one example.
    pub fn validate(&self) -> Result<()> {
        if self.variable_count == 0 {
            return Err(Error::MalformedTable("no variable rows".to_string()));
        }
        if self.examples.is_empty() {
            return Err(Error::MalformedTable("no complete examples".to_string()));
        }
        Ok(())
    }
}
