//! Expression trees over the fixed operator catalogue.
//!
//! An [`Expr`] is a strict tree: every operator node owns its children and no
//! subtree is ever shared, so [`Clone`] is a deep copy. Equality is
//! structural (variant, subscript and children, recursively), which coincides
//! with equality of the textual rendering produced by [`Display`][fmt::Display]:
//!
//! | Variant    | Rendering      |
//! |------------|----------------|
//! | `Var`      | `v_1`          |
//! | `Not`      | `not (X)`      |
//! | `Or`       | `(X) or (Y)`   |
//! | `And`      | `(X) and (Y)`  |
//! | `Nand`     | `(X) nand (Y)` |
//! | `Xor`      | `(X) xor (Y)`  |
//! | `Implies`  | `(X) -> (Y)`   |
//! | `Converse` | `(X) <- (Y)`   |
//!
//! The rendering parses back into the same tree, see [`crate::parser`].

use std::fmt;
use std::str::FromStr;

use log::trace;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{Error, Result};
use crate::logic::{self, Truth};
use crate::table::Assignment;
use crate::types::Var;

/// The variant of an expression node, without its children.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Kind {
    Var,
    Not,
    Or,
    And,
    Nand,
    Xor,
    Implies,
    Converse,
}

impl Kind {
    /// All operator kinds (everything except [`Kind::Var`]).
    pub const OPERATORS: [Kind; 7] = [
        Kind::Not,
        Kind::Or,
        Kind::And,
        Kind::Nand,
        Kind::Xor,
        Kind::Implies,
        Kind::Converse,
    ];

    /// Number of child slots.
    pub const fn arity(self) -> usize {
        match self {
            Kind::Var => 0,
            Kind::Not => 1,
            Kind::Or | Kind::And | Kind::Nand | Kind::Xor | Kind::Implies | Kind::Converse => 2,
        }
    }

    /// Token used in the textual rendering of an expression.
    pub const fn token(self) -> &'static str {
        match self {
            Kind::Var => "v_",
            Kind::Not => "not",
            Kind::Or => "or",
            Kind::And => "and",
            Kind::Nand => "nand",
            Kind::Xor => "xor",
            Kind::Implies => "->",
            Kind::Converse => "<-",
        }
    }

    /// Human-readable name, as accepted by [`Kind::from_str`].
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Var => "var",
            Kind::Not => "not",
            Kind::Or => "or",
            Kind::And => "and",
            Kind::Nand => "nand",
            Kind::Xor => "xor",
            Kind::Implies => "implies",
            Kind::Converse => "converse",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "->" {
            return Ok(Kind::Implies);
        }
        if s == "<-" {
            return Ok(Kind::Converse);
        }
        match s.to_ascii_lowercase().as_str() {
            "var" => Ok(Kind::Var),
            "not" => Ok(Kind::Not),
            "or" => Ok(Kind::Or),
            "and" => Ok(Kind::And),
            "nand" => Ok(Kind::Nand),
            "xor" => Ok(Kind::Xor),
            "implies" => Ok(Kind::Implies),
            "converse" => Ok(Kind::Converse),
            _ => Err(Error::UnknownOperator(s.to_string())),
        }
    }
}

/// A propositional-logic expression tree.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Expr {
    Var(Var),
    Not(Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Nand(Box<Expr>, Box<Expr>),
    Xor(Box<Expr>, Box<Expr>),
    Implies(Box<Expr>, Box<Expr>),
    Converse(Box<Expr>, Box<Expr>),
}

// Constructors
impl Expr {
    /// Variable leaf `v_<subscript>`.
    ///
    /// # Panics
    ///
    /// Panics if `subscript == 0`.
    pub fn var(subscript: u32) -> Self {
        Expr::Var(Var::new(subscript))
    }

    pub fn not(arg: Self) -> Self {
        Expr::Not(Box::new(arg))
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Expr::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Expr::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn nand(lhs: Self, rhs: Self) -> Self {
        Expr::Nand(Box::new(lhs), Box::new(rhs))
    }

    pub fn xor(lhs: Self, rhs: Self) -> Self {
        Expr::Xor(Box::new(lhs), Box::new(rhs))
    }

    pub fn implies(lhs: Self, rhs: Self) -> Self {
        Expr::Implies(Box::new(lhs), Box::new(rhs))
    }

    pub fn converse(lhs: Self, rhs: Self) -> Self {
        Expr::Converse(Box::new(lhs), Box::new(rhs))
    }

    /// Builds a unary node of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not unary.
    pub fn unary(kind: Kind, arg: Self) -> Self {
        match kind {
            Kind::Not => Expr::not(arg),
            _ => panic!("`{}` is not a unary operator", kind),
        }
    }

    /// Builds a binary node of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not binary.
    pub fn binary(kind: Kind, lhs: Self, rhs: Self) -> Self {
        match kind {
            Kind::Or => Expr::or(lhs, rhs),
            Kind::And => Expr::and(lhs, rhs),
            Kind::Nand => Expr::nand(lhs, rhs),
            Kind::Xor => Expr::xor(lhs, rhs),
            Kind::Implies => Expr::implies(lhs, rhs),
            Kind::Converse => Expr::converse(lhs, rhs),
            _ => panic!("`{}` is not a binary operator", kind),
        }
    }
}

// Getters
impl Expr {
    pub fn kind(&self) -> Kind {
        match self {
            Expr::Var(_) => Kind::Var,
            Expr::Not(_) => Kind::Not,
            Expr::Or(_, _) => Kind::Or,
            Expr::And(_, _) => Kind::And,
            Expr::Nand(_, _) => Kind::Nand,
            Expr::Xor(_, _) => Kind::Xor,
            Expr::Implies(_, _) => Kind::Implies,
            Expr::Converse(_, _) => Kind::Converse,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Expr::Var(_))
    }

    /// First argument, present for every operator.
    pub fn arg1(&self) -> Option<&Expr> {
        self.children().next()
    }

    /// Second argument, present for binary operators only.
    pub fn arg2(&self) -> Option<&Expr> {
        self.children().nth(1)
    }

    /// Direct children, left to right.
    pub fn children(&self) -> impl Iterator<Item = &Expr> + '_ {
        let (a, b): (Option<&Expr>, Option<&Expr>) = match self {
            Expr::Var(_) => (None, None),
            Expr::Not(a) => (Some(&**a), None),
            Expr::Or(a, b)
            | Expr::And(a, b)
            | Expr::Nand(a, b)
            | Expr::Xor(a, b)
            | Expr::Implies(a, b)
            | Expr::Converse(a, b) => (Some(&**a), Some(&**b)),
        };
        a.into_iter().chain(b)
    }

    fn slots_mut(&mut self) -> impl Iterator<Item = &mut Box<Expr>> + '_ {
        let (a, b) = match self {
            Expr::Var(_) => (None, None),
            Expr::Not(a) => (Some(a), None),
            Expr::Or(a, b)
            | Expr::And(a, b)
            | Expr::Nand(a, b)
            | Expr::Xor(a, b)
            | Expr::Implies(a, b)
            | Expr::Converse(a, b) => (Some(a), Some(b)),
        };
        a.into_iter().chain(b)
    }

    /// Number of nodes, including this one.
    pub fn size(&self) -> usize {
        1 + self.children().map(Expr::size).sum::<usize>()
    }

    /// Number of nodes on the longest path from this node down to a leaf.
    ///
    /// A single leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self.children().map(Expr::depth).max().unwrap_or(0)
    }
}

// Evaluation
impl Expr {
    /// Evaluates the expression under strong Kleene logic.
    ///
    /// `values[i]` is the value of variable `v_{i+1}`; `None` is unknown.
    ///
    /// # Errors
    ///
    /// [`Error::MissingVariable`] if the expression refers to a variable
    /// beyond `values.len()`.
    pub fn evaluate(&self, values: &[Truth]) -> Result<Truth> {
        Ok(match self {
            Expr::Var(v) => {
                return values.get(v.index()).copied().ok_or(Error::MissingVariable {
                    subscript: v.id(),
                    available: values.len(),
                })
            }
            Expr::Not(a) => logic::not(a.evaluate(values)?),
            Expr::Or(a, b) => logic::or(a.evaluate(values)?, b.evaluate(values)?),
            Expr::And(a, b) => logic::and(a.evaluate(values)?, b.evaluate(values)?),
            Expr::Nand(a, b) => logic::nand(a.evaluate(values)?, b.evaluate(values)?),
            Expr::Xor(a, b) => logic::xor(a.evaluate(values)?, b.evaluate(values)?),
            Expr::Implies(a, b) => logic::implies(a.evaluate(values)?, b.evaluate(values)?),
            Expr::Converse(a, b) => logic::converse(a.evaluate(values)?, b.evaluate(values)?),
        })
    }

    /// Fraction of examples whose evaluation equals their outcome.
    ///
    /// An unknown evaluation never matches a boolean outcome.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyColumnSet`] if the table has no examples, and
    /// [`Error::MissingVariable`] as in [`Expr::evaluate`].
    pub fn score(&self, table: &Assignment) -> Result<f64> {
        if table.is_empty() {
            return Err(Error::EmptyColumnSet);
        }
        let mut matches = 0usize;
        for example in table.examples() {
            if self.evaluate(example.values())? == Some(example.outcome()) {
                matches += 1;
            }
        }
        Ok(matches as f64 / table.len() as f64)
    }
}

// Traversal
impl Expr {
    /// Nodes whose kind is in `kinds` (all nodes if `kinds` is empty), in pre-order.
    pub fn collect(&self, kinds: &[Kind]) -> Vec<&Expr> {
        let mut nodes = Vec::new();
        self.collect_into(kinds, &mut nodes);
        nodes
    }

    fn collect_into<'a>(&'a self, kinds: &[Kind], nodes: &mut Vec<&'a Expr>) {
        if kinds.is_empty() || kinds.contains(&self.kind()) {
            nodes.push(self);
        }
        for child in self.children() {
            child.collect_into(kinds, nodes);
        }
    }

    /// Pre-order indices of the nodes [`collect`][Expr::collect] would return.
    ///
    /// The indices are valid for [`node`][Expr::node] and [`node_mut`][Expr::node_mut].
    pub fn positions(&self, kinds: &[Kind]) -> Vec<usize> {
        self.collect(&[])
            .into_iter()
            .enumerate()
            .filter(|(_, node)| kinds.is_empty() || kinds.contains(&node.kind()))
            .map(|(i, _)| i)
            .collect()
    }

    /// Node at the given pre-order index (0 is `self`).
    pub fn node(&self, index: usize) -> Option<&Expr> {
        if index == 0 {
            return Some(self);
        }
        let mut offset = 1;
        for child in self.children() {
            let size = child.size();
            if index < offset + size {
                return child.node(index - offset);
            }
            offset += size;
        }
        None
    }

    /// Mutable node at the given pre-order index (0 is `self`).
    pub fn node_mut(&mut self, index: usize) -> Option<&mut Expr> {
        if index == 0 {
            return Some(self);
        }
        let mut offset = 1;
        for child in self.slots_mut() {
            let size = child.size();
            if index < offset + size {
                return child.node_mut(index - offset);
            }
            offset += size;
        }
        None
    }
}

// Structural mutation
impl Expr {
    /// Installs `child` into one of this node's child slots.
    ///
    /// `Not` always receives it as its only argument; binary nodes pick the
    /// left or right slot uniformly at random. A leaf has no slot and hands
    /// the child back as `Err`.
    pub fn replace_one_child<R>(&mut self, child: Expr, rng: &mut R) -> std::result::Result<(), Expr>
    where
        R: Rng + ?Sized,
    {
        let arity = self.kind().arity();
        if arity == 0 {
            return Err(child);
        }
        let slot = if arity == 1 { 0 } else { rng.gen_range(0..arity) };
        trace!("replace_one_child(kind = {}, slot = {})", self.kind(), slot);
        match self.slots_mut().nth(slot) {
            Some(target) => {
                **target = child;
                Ok(())
            }
            None => Err(child),
        }
    }

    /// Builds a new parent above `self`, of a kind drawn uniformly from `allowed`.
    ///
    /// A unary parent takes `self` as its argument; a binary parent takes
    /// `self` on the left and `sibling` on the right. If `allowed` is empty,
    /// or the drawn kind is [`Kind::Var`], `self` is returned unchanged.
    pub fn wrap_as_parent<R>(self, sibling: Expr, allowed: &[Kind], rng: &mut R) -> Expr
    where
        R: Rng + ?Sized,
    {
        let Some(&kind) = allowed.choose(rng) else {
            return self;
        };
        trace!("wrap_as_parent(kind = {})", kind);
        match kind.arity() {
            1 => Expr::unary(kind, self),
            2 => Expr::binary(kind, self, sibling),
            _ => self,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Var(v) => write!(f, "{}", v),
            Expr::Not(a) => write!(f, "not ({})", a),
            Expr::Or(a, b)
            | Expr::And(a, b)
            | Expr::Nand(a, b)
            | Expr::Xor(a, b)
            | Expr::Implies(a, b)
            | Expr::Converse(a, b) => write!(f, "({}) {} ({})", a, self.kind().token(), b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    fn v(k: u32) -> Expr {
        Expr::var(k)
    }

    fn sample() -> Expr {
        // ((v_1) or (v_2)) and (not (v_1))
        Expr::and(Expr::or(v(1), v(2)), Expr::not(v(1)))
    }

    #[test]
    fn test_display() {
        assert_eq!(v(1).to_string(), "v_1");
        assert_eq!(Expr::not(v(1)).to_string(), "not (v_1)");
        assert_eq!(Expr::or(v(1), v(2)).to_string(), "(v_1) or (v_2)");
        assert_eq!(Expr::and(v(1), v(2)).to_string(), "(v_1) and (v_2)");
        assert_eq!(Expr::nand(v(1), v(2)).to_string(), "(v_1) nand (v_2)");
        assert_eq!(Expr::xor(v(1), v(2)).to_string(), "(v_1) xor (v_2)");
        assert_eq!(Expr::implies(v(1), v(2)).to_string(), "(v_1) -> (v_2)");
        assert_eq!(Expr::converse(v(1), v(2)).to_string(), "(v_1) <- (v_2)");
        assert_eq!(sample().to_string(), "((v_1) or (v_2)) and (not (v_1))");
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(v(1), v(1));
        assert_ne!(v(1), v(2));
        assert_ne!(Expr::or(v(1), v(2)), Expr::or(v(2), v(1)));
        assert_ne!(Expr::or(v(1), v(2)), Expr::and(v(1), v(2)));
    }

    #[test]
    fn test_size_and_depth() {
        assert_eq!(v(1).size(), 1);
        assert_eq!(v(1).depth(), 1);
        assert_eq!(Expr::and(v(1), v(2)).size(), 3);
        assert_eq!(Expr::and(v(1), v(2)).depth(), 2);
        assert_eq!(sample().size(), 6);
        assert_eq!(sample().depth(), 3);
    }

    #[test]
    fn test_args() {
        let e = sample();
        assert_eq!(e.arg1(), Some(&Expr::or(v(1), v(2))));
        assert_eq!(e.arg2(), Some(&Expr::not(v(1))));
        assert_eq!(Expr::not(v(1)).arg1(), Some(&v(1)));
        assert_eq!(Expr::not(v(1)).arg2(), None);
        assert_eq!(v(1).arg1(), None);
    }

    #[test]
    fn test_copy_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        copy.node_mut(0).unwrap().replace_one_child(v(3), &mut rng).unwrap();
        assert_ne!(copy, original);
        assert_eq!(original, sample());
    }

    #[test]
    fn test_evaluate_or_three_valued() {
        let e = Expr::or(v(1), v(2));
        assert_eq!(e.evaluate(&[Some(true), None]), Ok(Some(true)));
        assert_eq!(e.evaluate(&[None, Some(false)]), Ok(None));
        assert_eq!(e.evaluate(&[None, None]), Ok(None));
    }

    #[test]
    fn test_evaluate_xor_no_shortcut() {
        let e = Expr::xor(v(1), v(2));
        assert_eq!(e.evaluate(&[Some(true), None]), Ok(None));
        assert_eq!(Expr::and(v(1), v(2)).evaluate(&[Some(false), None]), Ok(Some(false)));
    }

    #[test]
    fn test_evaluate_nested() {
        let values = [Some(true), Some(true)];
        assert_eq!(Expr::or(v(1), Expr::or(v(1), v(2))).evaluate(&values), Ok(Some(true)));
        assert_eq!(Expr::nand(v(1), Expr::nand(v(1), v(2))).evaluate(&values), Ok(Some(true)));
        assert_eq!(Expr::xor(v(1), Expr::xor(v(1), v(2))).evaluate(&values), Ok(Some(true)));
        assert_eq!(
            Expr::implies(v(1), Expr::implies(v(1), v(2))).evaluate(&values),
            Ok(Some(true))
        );
        assert_eq!(
            Expr::converse(v(1), Expr::converse(v(1), v(2))).evaluate(&values),
            Ok(Some(true))
        );
        assert_eq!(Expr::not(v(2)).evaluate(&values), Ok(Some(false)));
    }

    #[test]
    fn test_evaluate_missing_variable() {
        let e = Expr::and(v(1), v(3));
        assert_eq!(
            e.evaluate(&[Some(false), Some(true)]),
            Err(Error::MissingVariable {
                subscript: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_score() {
        let table = Assignment::from_formula(&v(1), 2).unwrap();
        assert_eq!(v(1).score(&table), Ok(1.0));
        assert_eq!(v(2).score(&table), Ok(0.5));
        assert_eq!(Expr::and(v(1), v(2)).score(&table), Ok(0.75));
        assert_eq!(sample().score(&table), Ok(0.25));
    }

    #[test]
    fn test_score_empty_table() {
        let table = Assignment::new(2, Vec::new()).unwrap();
        assert_eq!(v(1).score(&table), Err(Error::EmptyColumnSet));
    }

    #[test]
    fn test_collect() {
        let leaf = v(1);
        assert_eq!(leaf.collect(&[]), vec![&leaf]);
        assert_eq!(leaf.collect(&[Kind::Var]), vec![&leaf]);
        assert!(leaf.collect(&[Kind::Not]).is_empty());

        let e = sample();
        assert_eq!(e.collect(&[Kind::Var]).len(), 3);
        assert_eq!(e.collect(&[Kind::Not, Kind::Or, Kind::And]).len(), 3);

        let kinds: Vec<Kind> = e.collect(&[]).iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![Kind::And, Kind::Or, Kind::Var, Kind::Var, Kind::Not, Kind::Var]
        );
    }

    #[test]
    fn test_positions_resolve_to_collected_nodes() {
        let e = sample();
        let kinds = [Kind::Not, Kind::Or];
        let positions = e.positions(&kinds);
        assert_eq!(positions, vec![1, 4]);
        let resolved: Vec<&Expr> = positions.iter().map(|&i| e.node(i).unwrap()).collect();
        assert_eq!(resolved, e.collect(&kinds));
        assert!(e.node(6).is_none());
    }

    #[test]
    fn test_node_mut() {
        let mut e = sample();
        *e.node_mut(5).unwrap() = v(2);
        assert_eq!(e.to_string(), "((v_1) or (v_2)) and (not (v_2))");
        assert!(e.node_mut(6).is_none());
    }

    #[test]
    fn test_replace_one_child_unary() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut e = Expr::not(v(2));
        e.replace_one_child(sample(), &mut rng).unwrap();
        assert_eq!(e.arg1(), Some(&sample()));
    }

    #[test]
    fn test_replace_one_child_binary() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..20 {
            let mut e = Expr::and(v(1), v(2));
            e.replace_one_child(v(3), &mut rng).unwrap();
            assert!(e == Expr::and(v(3), v(2)) || e == Expr::and(v(1), v(3)));
        }
    }

    #[test]
    fn test_replace_one_child_leaf() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut e = v(1);
        assert_eq!(e.replace_one_child(v(2), &mut rng), Err(v(2)));
        assert_eq!(e, v(1));
    }

    #[test]
    fn test_wrap_as_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let not = v(1).wrap_as_parent(v(1), &[Kind::Not], &mut rng);
        assert_eq!(not, Expr::not(v(1)));

        let and = v(1).wrap_as_parent(v(2), &[Kind::And], &mut rng);
        assert_eq!(and.arg2(), Some(&v(2)));
        assert_eq!(and, Expr::and(v(1), v(2)));

        let allowed = [Kind::Not, Kind::Or, Kind::And];
        for _ in 0..20 {
            let parent = v(1).wrap_as_parent(v(2), &allowed, &mut rng);
            assert!(allowed.contains(&parent.kind()));
        }

        assert_eq!(v(1).wrap_as_parent(v(2), &[], &mut rng), v(1));
    }

    #[test]
    fn test_kind_arity_and_names() {
        assert_eq!(Kind::Var.arity(), 0);
        assert_eq!(Kind::Not.arity(), 1);
        for kind in Kind::OPERATORS.into_iter().filter(|&k| k != Kind::Not) {
            assert_eq!(kind.arity(), 2);
        }
        for kind in Kind::OPERATORS {
            assert_eq!(kind.name().parse::<Kind>(), Ok(kind));
        }
        assert_eq!("->".parse::<Kind>(), Ok(Kind::Implies));
        assert_eq!("AND".parse::<Kind>(), Ok(Kind::And));
        assert_eq!(
            "nor".parse::<Kind>(),
            Err(Error::UnknownOperator("nor".to_string()))
        );
    }
}
