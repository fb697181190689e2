//! # sr-fol: Symbolic regression of propositional logic expressions
//!
//! **`sr-fol`** searches for a propositional formula that reproduces a partial
//! truth table: given examples mapping variable assignments to an expected
//! boolean outcome, it evolves expression trees until one explains as many
//! examples as possible.
//!
//! ## How it works
//!
//! Candidates are expression trees over variables `v_1..v_n` built from a
//! configurable set of operators (`not`, `or`, `and`, `nand`, `xor`, `->`,
//! `<-`). Evaluation follows **strong Kleene** three-valued logic, so variable
//! values may be unknown and an operator still yields a known result whenever
//! the known operands force it.
//!
//! The search keeps many independent populations of distinct trees. Each
//! generation it removes the worst half of every population, refills them by
//! crossover between random pairs of populations and by mutation, and tracks
//! the best score. It stops when the generation budget is spent or the best
//! score stagnates, and returns the best tree (smaller trees win ties).
//!
//! ## Key Features
//!
//! - **Three-valued evaluation**: unknown inputs propagate through [`logic`] only where they matter.
//! - **Structural trees**: [`Expr`][crate::expr::Expr] is a plain owned enum with structural equality; rendering round-trips through [`parser`].
//! - **Reproducible runs**: every random choice goes through a caller-supplied [`Rng`][rand::Rng].
//! - **1-Based Indexing**: variables are 1-indexed, matching the `v_1..v_n` rows of a table.
//!
//! ## Basic Usage
//!
//! ```rust
//! use sr_fol::expr::Expr;
//! use sr_fol::search::{search_with_seed, SearchConfig};
//! use sr_fol::table::Assignment;
//!
//! // 1. Build a table: here the full truth table of `not (not (v_1))` over two variables
//! let target = Expr::not(Expr::not(Expr::var(1)));
//! let table = Assignment::from_formula(&target, 2).unwrap();
//!
//! // 2. Run a (small) search
//! let config = SearchConfig::default().with_population_count(8);
//! let outcome = search_with_seed(&table, &config, 1).unwrap();
//!
//! // 3. Inspect the winner
//! println!("{} scores {}", outcome.expr, outcome.score);
//! assert!(outcome.score >= 0.5);
//! ```
//!
//! ## Core Components
//!
//! - **[`expr`]**: the expression tree, its evaluation, scoring and structural mutation primitives.
//! - **[`population`]**: duplicate-free populations with culling, mutation and crossover.
//! - **[`search`]**: the multi-population generational driver.
//! - **[`table`]**: assignment tables, their cleaning and a plain-text format.

pub mod error;
pub mod expr;
pub mod logic;
pub mod operators;
pub mod parser;
pub mod population;
pub mod random;
pub mod search;
pub mod table;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use expr::{Expr, Kind};
pub use operators::Operators;
pub use search::{search, search_with_seed, SearchConfig, SearchOutcome};
pub use table::Assignment;
