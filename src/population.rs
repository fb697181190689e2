//! Populations of candidate expressions and their genetic operators.
//!
//! A [`Population`] is a duplicate-free, insertion-ordered set of
//! expressions bounded by [`PopulationConfig::population_size`]. Members
//! only change through [`cull`][Population::cull] (removal) and
//! [`mutate`][Population::mutate] / [`crossover`][Population::crossover]
//! (insertion). Refilling is best-effort: each refill gives up after
//! [`PopulationConfig::retry_budget`] attempts and the population simply
//! stays under-filled.

use std::collections::HashSet;

use log::{debug, trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::expr::Expr;
use crate::operators::Operators;
use crate::random::random_expr;
use crate::table::Assignment;

/// Attempts allowed for constructing or refilling a population.
pub const DEFAULT_RETRY_BUDGET: usize = 500;

/// Parameters shared by the members of a population.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationConfig {
    /// Target number of members.
    pub population_size: usize,
    /// Variables `v_1..v_n` available to generated expressions.
    pub variable_count: usize,
    /// Depth bound for generation and crossover.
    pub max_depth: usize,
    /// Operators available to generated expressions.
    pub operators: Operators,
    /// Attempts per construction or refill.
    pub retry_budget: usize,
}

impl PopulationConfig {
    pub fn new(population_size: usize, variable_count: usize, max_depth: usize, operators: Operators) -> Self {
        Self {
            population_size,
            variable_count,
            max_depth,
            operators,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    /// Set the number of attempts per construction or refill.
    pub fn with_retry_budget(mut self, retry_budget: usize) -> Self {
        self.retry_budget = retry_budget;
        self
    }
}

/// Outcome of a construction or refill.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Refill {
    /// New members admitted.
    pub inserted: usize,
    /// Attempts spent, at most the retry budget.
    pub attempts: usize,
    /// Whether the population is still below its target size.
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct Population {
    config: PopulationConfig,
    members: Vec<Expr>,
}

// Constructors
impl Population {
    /// Fills a new population with distinct random expressions.
    ///
    /// # Panics
    ///
    /// Panics if `config.variable_count == 0`.
    pub fn new<R>(config: PopulationConfig, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut population = Self {
            config,
            members: Vec::new(),
        };
        let max_depth = population.config.max_depth as isize;
        let refill = population.refill(|p| {
            Some(random_expr(
                rng,
                p.config.variable_count,
                &p.config.operators,
                max_depth,
            ))
        });
        if refill.exhausted {
            warn!(
                "population under-filled: {} of {} members after {} attempts",
                population.len(),
                population.config.population_size,
                refill.attempts
            );
        }
        population
    }

    /// Seeds a population with the given members.
    ///
    /// Duplicates are dropped and at most `population_size` members are kept.
    pub fn from_members(config: PopulationConfig, members: impl IntoIterator<Item = Expr>) -> Self {
        let mut population = Self {
            config,
            members: Vec::new(),
        };
        for member in members {
            if population.len() >= population.config.population_size {
                break;
            }
            population.insert(member);
        }
        population
    }
}

// Getters
impl Population {
    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn members(&self) -> &[Expr] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, expr: &Expr) -> bool {
        self.members.contains(expr)
    }
}

// Fitness
impl Population {
    /// Members paired with their score, ascending by score.
    ///
    /// Members with equal scores stay in insertion order.
    pub fn scores(&self, table: &Assignment) -> Result<Vec<(&Expr, f64)>> {
        Ok(self
            .ranking(table)?
            .into_iter()
            .map(|(i, score)| (&self.members[i], score))
            .collect())
    }

    /// Highest-scoring member (the last one of [`scores`][Population::scores]).
    pub fn best(&self, table: &Assignment) -> Result<Option<(&Expr, f64)>> {
        Ok(self.scores(table)?.pop())
    }

    fn ranking(&self, table: &Assignment) -> Result<Vec<(usize, f64)>> {
        let mut ranking = Vec::with_capacity(self.members.len());
        for (i, member) in self.members.iter().enumerate() {
            ranking.push((i, member.score(table)?));
        }
        // Stable: ties keep insertion order.
        ranking.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(ranking)
    }

    /// Removes the `round(fraction * len)` lowest-scoring members.
    ///
    /// Rounding is half-to-even. When several members tie at the boundary
    /// score, the earliest inserted ones are removed first. Returns the
    /// number of removed members.
    pub fn cull(&mut self, table: &Assignment, fraction: f64) -> Result<usize> {
        let ranking = self.ranking(table)?;
        let count = ((fraction * self.members.len() as f64).round_ties_even() as usize).min(self.members.len());
        let doomed: HashSet<usize> = ranking.iter().take(count).map(|&(i, _)| i).collect();

        let mut index = 0;
        self.members.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });

        debug!("cull: removed {}, {} left", count, self.members.len());
        Ok(count)
    }
}

// Genetic operators
impl Population {
    /// Refills the population with mutated copies of random members.
    ///
    /// A bare variable is wrapped under a random parent (with a random
    /// sibling for binary parents); a larger expression gets one child of a
    /// random internal node replaced by a random subtree. Subtrees get the
    /// depth budget `max_depth - depth(copy)`. The depth of the result is
    /// not checked, so a wrapped leaf may end up one level deeper than
    /// `max_depth`.
    pub fn mutate<R>(&mut self, rng: &mut R) -> Refill
    where
        R: Rng + ?Sized,
    {
        if self.members.is_empty() {
            return self.empty_refill();
        }
        let refill = self.refill(|p| p.mutant(rng));
        trace!("mutate: {:?}", refill);
        refill
    }

    /// Refills the population by splicing material from `guest` into copies of random members.
    ///
    /// `guest` is only read. Candidates deeper than `max_depth` are rejected.
    pub fn crossover<R>(&mut self, guest: &Population, rng: &mut R) -> Refill
    where
        R: Rng + ?Sized,
    {
        if self.members.is_empty() || guest.members.is_empty() {
            return self.empty_refill();
        }
        let max_depth = self.config.max_depth;
        let refill = self.refill(|p| p.offspring(guest, rng).filter(|e| e.depth() <= max_depth));
        trace!("crossover: {:?}", refill);
        refill
    }

    fn mutant<R>(&self, rng: &mut R) -> Option<Expr>
    where
        R: Rng + ?Sized,
    {
        let mut mutant = self.members.choose(rng)?.clone();
        let budget = self.config.max_depth as isize - mutant.depth() as isize;
        let kinds = self.config.operators.internal();

        if mutant.size() < 2 {
            let sibling = random_expr(rng, self.config.variable_count, &self.config.operators, budget);
            return Some(mutant.wrap_as_parent(sibling, &kinds, rng));
        }

        let &position = mutant.positions(&kinds).choose(rng)?;
        let subtree = random_expr(rng, self.config.variable_count, &self.config.operators, budget);
        mutant.node_mut(position)?.replace_one_child(subtree, rng).ok()?;
        Some(mutant)
    }

    fn offspring<R>(&self, guest: &Population, rng: &mut R) -> Option<Expr>
    where
        R: Rng + ?Sized,
    {
        let mut host = self.members.choose(rng)?.clone();
        let kinds = self.config.operators.internal();

        if host.size() < 2 {
            let guest_copy = guest.members.choose(rng)?.clone();
            if guest_copy.size() < 2 {
                // Two bare variables: the wrapped result is dropped and the
                // unchanged host comes back, to be rejected as a duplicate.
                let wrapped = host.clone().wrap_as_parent(guest_copy, &kinds, rng);
                trace!("offspring: dropping {}", wrapped);
                return Some(host);
            }
            // Graft the host below a random internal guest node and keep only that branch.
            let &position = guest_copy.positions(&kinds).choose(rng)?;
            let mut branch = guest_copy.node(position)?.clone();
            branch.replace_one_child(host, rng).ok()?;
            return Some(branch);
        }

        let donor = guest.members.choose(rng)?.collect(&[]).choose(rng).map(|&node| node.clone())?;
        let &position = host.positions(&kinds).choose(rng)?;
        host.node_mut(position)?.replace_one_child(donor, rng).ok()?;
        Some(host)
    }

    /// Runs `make` until the population is full or the retry budget is spent.
    fn refill<F>(&mut self, mut make: F) -> Refill
    where
        F: FnMut(&Population) -> Option<Expr>,
    {
        let mut refill = Refill::default();
        while self.members.len() < self.config.population_size && refill.attempts < self.config.retry_budget {
            refill.attempts += 1;
            if let Some(candidate) = make(self) {
                if self.insert(candidate) {
                    refill.inserted += 1;
                }
            }
        }
        refill.exhausted = self.members.len() < self.config.population_size;
        if refill.exhausted {
            debug!(
                "retry budget exhausted: {} of {} members after {} attempts",
                self.members.len(),
                self.config.population_size,
                refill.attempts
            );
        }
        refill
    }

    fn empty_refill(&self) -> Refill {
        Refill {
            inserted: 0,
            attempts: 0,
            exhausted: self.members.len() < self.config.population_size,
        }
    }

    fn insert(&mut self, expr: Expr) -> bool {
        if self.members.contains(&expr) {
            return false;
        }
        self.members.push(expr);
        true
    }
}
