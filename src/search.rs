//! Multi-population generational search.
//!
//! Every generation runs three phases over all populations, in order:
//!
//! 1. **cull** the lowest-scoring fraction of each population;
//! 2. **crossover** `population_count / 2` times, each time between two
//!    distinct populations drawn at random (host refilled from guest);
//! 3. **mutate** every population, refilling whatever is still missing.
//!
//! The best rounded score of the generation is then recorded. The loop stops
//! after `max_generations`, or earlier once the recorded score has not changed
//! for `stagnation_window` generations. The winner is the member with the
//! highest rounded score across all populations, smaller expressions winning
//! ties.
//!
//! ```
//! use sr_fol::expr::Expr;
//! use sr_fol::search::{search_with_seed, SearchConfig};
//! use sr_fol::table::Assignment;
//!
//! let target = Expr::or(Expr::var(1), Expr::var(2));
//! let table = Assignment::from_formula(&target, 2).unwrap();
//! let config = SearchConfig::default().with_population_count(8).with_max_generations(20);
//! let outcome = search_with_seed(&table, &config, 42).unwrap();
//! assert!(outcome.score >= 0.75);
//! assert!(outcome.generations <= 20);
//! ```

use log::{debug, info};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{Error, Result};
use crate::expr::Expr;
use crate::operators::Operators;
use crate::population::{Population, PopulationConfig, DEFAULT_RETRY_BUDGET};
use crate::table::Assignment;
use crate::utils::{pair_mut, round2};

/// Parameters of a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of independent populations.
    pub population_count: usize,
    /// Target size of every population.
    pub population_size: usize,
    /// Depth bound for generated expressions.
    pub max_depth: usize,
    /// Generation budget.
    pub max_generations: usize,
    /// Operators available to generated expressions.
    pub operators: Operators,
    /// Fraction of every population removed by each cull.
    pub cull_fraction: f64,
    /// Generations without change of the best score before stopping (0 to disable).
    pub stagnation_window: usize,
    /// Attempts per population construction or refill.
    pub retry_budget: usize,
}

impl SearchConfig {
    /// Create a new configuration with defaults.
    pub fn new(operators: Operators) -> Self {
        Self {
            population_count: 31,
            population_size: 27,
            max_depth: 10,
            max_generations: 100,
            operators,
            cull_fraction: 0.5,
            stagnation_window: 10,
            retry_budget: DEFAULT_RETRY_BUDGET,
        }
    }

    /// Set the number of populations.
    pub fn with_population_count(mut self, population_count: usize) -> Self {
        self.population_count = population_count;
        self
    }

    /// Set the target size of every population.
    pub fn with_population_size(mut self, population_size: usize) -> Self {
        self.population_size = population_size;
        self
    }

    /// Set the depth bound.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the generation budget.
    pub fn with_max_generations(mut self, max_generations: usize) -> Self {
        self.max_generations = max_generations;
        self
    }

    /// Set the operator catalogue.
    pub fn with_operators(mut self, operators: Operators) -> Self {
        self.operators = operators;
        self
    }

    /// Set the cull fraction.
    pub fn with_cull_fraction(mut self, cull_fraction: f64) -> Self {
        self.cull_fraction = cull_fraction;
        self
    }

    /// Set the stagnation window.
    pub fn with_stagnation_window(mut self, stagnation_window: usize) -> Self {
        self.stagnation_window = stagnation_window;
        self
    }

    /// Set the retry budget.
    pub fn with_retry_budget(mut self, retry_budget: usize) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Checks the parameters are usable.
    pub fn validate(&self) -> Result<()> {
        if self.population_count == 0 {
            return Err(Error::InvalidConfig("population count must be positive".to_string()));
        }
        if self.population_size == 0 {
            return Err(Error::InvalidConfig("population size must be positive".to_string()));
        }
        if !(0.0..=1.0).contains(&self.cull_fraction) {
            return Err(Error::InvalidConfig(format!(
                "cull fraction {} is outside [0, 1]",
                self.cull_fraction
            )));
        }
        Ok(())
    }

    fn population_config(&self, variable_count: usize) -> PopulationConfig {
        PopulationConfig::new(
            self.population_size,
            variable_count,
            self.max_depth,
            self.operators.clone(),
        )
        .with_retry_budget(self.retry_budget)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(Operators::default())
    }
}

/// Best rounded score of every completed generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationHistory {
    window: usize,
    scores: Vec<f64>,
}

impl GenerationHistory {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            scores: Vec::new(),
        }
    }

    pub fn record(&mut self, score: f64) {
        self.scores.push(score);
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Whether generation `generation` should not run.
    ///
    /// True once `generation > window` and the last `window` recorded scores
    /// are all equal. A zero window never stagnates.
    pub fn is_stagnant(&self, generation: usize) -> bool {
        if self.window == 0 || generation <= self.window || self.scores.len() < self.window {
            return false;
        }
        let recent = &self.scores[self.scores.len() - self.window..];
        recent.iter().all(|&s| s == recent[0])
    }
}

/// Result of a search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// The winning expression.
    pub expr: Expr,
    /// Its unrounded score.
    pub score: f64,
    /// Number of generations actually run.
    pub generations: usize,
    /// Best rounded score per generation.
    pub history: GenerationHistory,
}

/// Searches for the expression that best reproduces `table`.
///
/// Fails with [`Error::MalformedTable`] if the table has no variables or no
/// examples, and with [`Error::InvalidConfig`] for unusable parameters.
pub fn search<R>(table: &Assignment, config: &SearchConfig, rng: &mut R) -> Result<SearchOutcome>
where
    R: Rng + ?Sized,
{
    table.validate()?;
    config.validate()?;

    debug!(
        "search: {} variables, {} examples, {} populations of {}, operators {}",
        table.variable_count(),
        table.len(),
        config.population_count,
        config.population_size,
        config.operators
    );

    let population_config = config.population_config(table.variable_count());
    let mut populations: Vec<Population> = (0..config.population_count)
        .map(|_| Population::new(population_config.clone(), rng))
        .collect();

    let mut history = GenerationHistory::new(config.stagnation_window);
    let mut generations = 0;

    for generation in 0..config.max_generations {
        if history.is_stagnant(generation) {
            info!("stagnated at generation {}", generation);
            break;
        }

        for population in populations.iter_mut() {
            population.cull(table, config.cull_fraction)?;
        }

        let count = populations.len();
        for _ in 0..count / 2 {
            let host = rng.gen_range(0..count);
            let mut guest = rng.gen_range(0..count - 1);
            if guest >= host {
                guest += 1;
            }
            let (host, guest) = pair_mut(&mut populations, host, guest);
            host.crossover(guest, rng);
        }

        for population in populations.iter_mut() {
            population.mutate(rng);
        }

        let mut best = 0.0_f64;
        for population in &populations {
            if let Some((_, score)) = population.best(table)? {
                best = best.max(round2(score));
            }
        }
        history.record(best);
        generations = generation + 1;
        info!("generation {}: best score {:.2}", generation, best);
    }

    let (expr, score) = select(&populations, table)?.ok_or(Error::Extinct { generations })?;
    info!("best after {} generations: {} (score {:.2})", generations, expr, score);

    Ok(SearchOutcome {
        expr,
        score,
        generations,
        history,
    })
}

/// [`search`] driven by a [`ChaCha8Rng`] seeded from `seed`.
pub fn search_with_seed(table: &Assignment, config: &SearchConfig, seed: u64) -> Result<SearchOutcome> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    search(table, config, &mut rng)
}

/// Highest rounded score over all members, ties broken by smaller size.
fn select(populations: &[Population], table: &Assignment) -> Result<Option<(Expr, f64)>> {
    let mut best: Option<(&Expr, f64)> = None;
    for population in populations {
        for (expr, score) in population.scores(table)? {
            let better = match best {
                None => true,
                Some((current, current_score)) => {
                    let (rounded, current_rounded) = (round2(score), round2(current_score));
                    rounded > current_rounded || (rounded == current_rounded && expr.size() < current.size())
                }
            };
            if better {
                best = Some((expr, score));
            }
        }
    }
    Ok(best.map(|(expr, score)| (expr.clone(), score)))
}
