//! Operator catalogue allowed in generated expressions.

use std::fmt;

use crate::error::{Error, Result};
use crate::expr::Kind;

/// The binary and unary operators a search may use.
///
/// Either list may be empty. With both empty only bare variables can be
/// generated.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Operators {
    binary: Vec<Kind>,
    unary: Vec<Kind>,
}

impl Operators {
    /// Creates a catalogue, checking that every kind sits in the list matching its arity.
    ///
    /// Repeated kinds are kept once.
    pub fn new(binary: impl IntoIterator<Item = Kind>, unary: impl IntoIterator<Item = Kind>) -> Result<Self> {
        let binary = dedup(binary);
        let unary = dedup(unary);
        if let Some(&kind) = binary.iter().find(|k| k.arity() != 2) {
            return Err(Error::InvalidOperator {
                kind,
                expected_arity: 2,
            });
        }
        if let Some(&kind) = unary.iter().find(|k| k.arity() != 1) {
            return Err(Error::InvalidOperator {
                kind,
                expected_arity: 1,
            });
        }
        Ok(Self { binary, unary })
    }

    /// Every operator of the catalogue.
    pub fn all() -> Self {
        Self {
            binary: Kind::OPERATORS.into_iter().filter(|k| k.arity() == 2).collect(),
            unary: Kind::OPERATORS.into_iter().filter(|k| k.arity() == 1).collect(),
        }
    }

    /// Parses a comma- or whitespace-separated list of operator names.
    ///
    /// The word `all` expands to every operator. Each name lands in the
    /// binary or unary list according to its arity.
    pub fn parse_list(text: &str) -> Result<Self> {
        let mut binary = Vec::new();
        let mut unary = Vec::new();
        for kind in parse_names(text, None)? {
            match kind.arity() {
                2 => binary.push(kind),
                1 => unary.push(kind),
                _ => return Err(Error::UnknownOperator(kind.name().to_string())),
            }
        }
        Self::new(binary, unary)
    }

    /// Parses separate binary and unary name lists, as given on the command line.
    ///
    /// Names follow [`parse_list`][Operators::parse_list], except that `all`
    /// only expands to the operators of the list's arity and a name in the
    /// wrong list is an [`Error::InvalidOperator`].
    pub fn parse_lists(binary: &str, unary: &str) -> Result<Self> {
        Self::new(parse_names(binary, Some(2))?, parse_names(unary, Some(1))?)
    }

    pub fn binary(&self) -> &[Kind] {
        &self.binary
    }

    pub fn unary(&self) -> &[Kind] {
        &self.unary
    }

    /// Binary operators followed by unary operators: the kinds of internal nodes.
    pub fn internal(&self) -> Vec<Kind> {
        self.binary.iter().chain(&self.unary).copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.binary.is_empty() && self.unary.is_empty()
    }
}

/// `{Or, And}` and `{Not}`.
impl Default for Operators {
    fn default() -> Self {
        Self {
            binary: vec![Kind::Or, Kind::And],
            unary: vec![Kind::Not],
        }
    }
}

impl fmt::Display for Operators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.internal().into_iter().map(Kind::name).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

/// Operator names separated by commas or whitespace; `all` expands to the
/// catalogue, restricted to `arity` if given.
fn parse_names(text: &str, arity: Option<usize>) -> Result<Vec<Kind>> {
    let mut kinds = Vec::new();
    for name in text.split(|c: char| c == ',' || c.is_whitespace()).filter(|s| !s.is_empty()) {
        if name.eq_ignore_ascii_case("all") {
            kinds.extend(
                Kind::OPERATORS
                    .into_iter()
                    .filter(|k| arity.map_or(true, |arity| k.arity() == arity)),
            );
            continue;
        }
        kinds.push(name.parse()?);
    }
    Ok(kinds)
}

fn dedup(kinds: impl IntoIterator<Item = Kind>) -> Vec<Kind> {
    let mut result = Vec::new();
    for kind in kinds {
        if !result.contains(&kind) {
            result.push(kind);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_default() {
        let ops = Operators::default();
        assert_eq!(ops.binary(), &[Kind::Or, Kind::And]);
        assert_eq!(ops.unary(), &[Kind::Not]);
        assert_eq!(ops.internal(), vec![Kind::Or, Kind::And, Kind::Not]);
        assert_eq!(ops.to_string(), "[or, and, not]");
    }

    #[test]
    fn test_all() {
        let ops = Operators::all();
        assert_eq!(ops.binary().len(), 6);
        assert_eq!(ops.unary(), &[Kind::Not]);
    }

    #[test]
    fn test_wrong_arity_rejected() {
        assert_eq!(
            Operators::new([Kind::Not], []),
            Err(Error::InvalidOperator {
                kind: Kind::Not,
                expected_arity: 2
            })
        );
        assert_eq!(
            Operators::new([], [Kind::And]),
            Err(Error::InvalidOperator {
                kind: Kind::And,
                expected_arity: 1
            })
        );
        assert!(Operators::new([Kind::Var], []).is_err());
    }

    #[test]
    fn test_empty_lists_allowed() {
        let ops = Operators::new([], []).unwrap();
        assert!(ops.is_empty());
        assert!(ops.internal().is_empty());
    }

    #[test]
    fn test_parse_list() {
        let ops = Operators::parse_list("xor, implies not").unwrap();
        assert_eq!(ops.binary(), &[Kind::Xor, Kind::Implies]);
        assert_eq!(ops.unary(), &[Kind::Not]);

        assert_eq!(Operators::parse_list("ALL").unwrap(), Operators::all());
        assert_eq!(Operators::parse_list("and,and").unwrap().binary(), &[Kind::And]);
        assert!(Operators::parse_list("and, nor").is_err());
        assert!(Operators::parse_list("var").is_err());
    }

    #[test]
    fn test_parse_lists_space_separated() {
        let ops = Operators::parse_lists("OR AND", "NOT").unwrap();
        assert_eq!(ops.binary(), &[Kind::Or, Kind::And]);
        assert_eq!(ops.unary(), &[Kind::Not]);
        assert_eq!(ops, Operators::default());

        let mixed = Operators::parse_lists("xor, -> <-", "").unwrap();
        assert_eq!(mixed.binary(), &[Kind::Xor, Kind::Implies, Kind::Converse]);
        assert!(mixed.unary().is_empty());
    }

    #[test]
    fn test_parse_lists_checks_arity() {
        assert_eq!(Operators::parse_lists("all", "all").unwrap(), Operators::all());
        assert_eq!(
            Operators::parse_lists("or not", "not"),
            Err(Error::InvalidOperator {
                kind: Kind::Not,
                expected_arity: 2
            })
        );
        assert_eq!(
            Operators::parse_lists("or", "and"),
            Err(Error::InvalidOperator {
                kind: Kind::And,
                expected_arity: 1
            })
        );
        assert_eq!(
            Operators::parse_lists("or nor", "not"),
            Err(Error::UnknownOperator("nor".to_string()))
        );
    }
}
