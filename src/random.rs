//! Random generation of well-formed expressions.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::expr::{Expr, Kind};
use crate::operators::Operators;

/// Generates a random expression over variables `v_1..v_{variable_count}`.
///
/// At every level the node kind is drawn uniformly from `[Var] ++ binary ++
/// unary`, and children are generated with `max_depth - 1`. Once
/// `max_depth <= 0` a variable is forced. The single `Var` entry biases the
/// distribution towards shallow trees. The result has depth at most
/// `max_depth + 1` (or 1 if `max_depth` is not positive).
///
/// # Panics
///
/// Panics if `variable_count == 0`.
pub fn random_expr<R>(rng: &mut R, variable_count: usize, operators: &Operators, max_depth: isize) -> Expr
where
    R: Rng + ?Sized,
{
    assert!(variable_count > 0, "cannot generate expressions without variables");

    let kind = if max_depth > 0 {
        let mut options = vec![Kind::Var];
        options.extend(operators.internal());
        *options.choose(rng).unwrap_or(&Kind::Var)
    } else {
        Kind::Var
    };

    match kind.arity() {
        1 => Expr::unary(kind, random_expr(rng, variable_count, operators, max_depth - 1)),
        2 => {
            let lhs = random_expr(rng, variable_count, operators, max_depth - 1);
            let rhs = random_expr(rng, variable_count, operators, max_depth - 1);
            Expr::binary(kind, lhs, rhs)
        }
        _ => Expr::var(rng.gen_range(1..=variable_count as u32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use test_log::test;

    #[test]
    fn test_zero_depth_is_variable() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for max_depth in [-3, 0] {
            let e = random_expr(&mut rng, 3, &Operators::all(), max_depth);
            assert!(e.is_leaf());
        }
    }

    #[test]
    fn test_depth_bound() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for max_depth in 1..8 {
            for _ in 0..50 {
                let e = random_expr(&mut rng, 3, &Operators::all(), max_depth);
                assert!(e.depth() as isize <= max_depth + 1);
            }
        }
    }

    #[test]
    fn test_only_allowed_kinds_and_variables() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let operators = Operators::new([Kind::Xor], []).unwrap();
        for _ in 0..100 {
            let e = random_expr(&mut rng, 2, &operators, 5);
            for node in e.collect(&[]) {
                match node {
                    Expr::Var(v) => assert!((1..=2).contains(&v.id())),
                    Expr::Xor(_, _) => {}
                    other => panic!("unexpected node {}", other),
                }
            }
        }
    }

    #[test]
    fn test_without_operators_only_variables() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let operators = Operators::new([], []).unwrap();
        for _ in 0..20 {
            assert!(random_expr(&mut rng, 5, &operators, 10).is_leaf());
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let a: Vec<Expr> = {
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            (0..10).map(|_| random_expr(&mut rng, 3, &Operators::default(), 4)).collect()
        };
        let b: Vec<Expr> = {
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            (0..10).map(|_| random_expr(&mut rng, 3, &Operators::default(), 4)).collect()
        };
        assert_eq!(a, b);
    }
}
