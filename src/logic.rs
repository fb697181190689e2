//! Strong three-valued (Kleene) connectives.
//!
//! A truth value is `Option<bool>`, where `None` stands for *unknown*.
//! Unknown propagates, except where one known operand already decides the
//! result (e.g. `true OR unknown = true`).

/// Three-valued truth value.
pub type Truth = Option<bool>;

pub fn not(x: Truth) -> Truth {
    x.map(|x| !x)
}

pub fn or(x: Truth, y: Truth) -> Truth {
    match (x, y) {
        (Some(true), _) | (_, Some(true)) => Some(true),
        (Some(x), Some(y)) => Some(x || y),
        _ => None,
    }
}

pub fn and(x: Truth, y: Truth) -> Truth {
    match (x, y) {
        (Some(false), _) | (_, Some(false)) => Some(false),
        (Some(x), Some(y)) => Some(x && y),
        _ => None,
    }
}

pub fn nand(x: Truth, y: Truth) -> Truth {
    match (x, y) {
        (Some(false), _) | (_, Some(false)) => Some(true),
        (Some(x), Some(y)) => Some(!(x && y)),
        _ => None,
    }
}

/// No shortcut: both operands must be known.
pub fn xor(x: Truth, y: Truth) -> Truth {
    match (x, y) {
        (Some(x), Some(y)) => Some(x ^ y),
        _ => None,
    }
}

/// Material implication `x -> y`.
pub fn implies(x: Truth, y: Truth) -> Truth {
    match (x, y) {
        (Some(false), _) | (_, Some(true)) => Some(true),
        (Some(x), Some(y)) => Some(!x || y),
        _ => None,
    }
}

/// Converse implication `x <- y`, i.e. `x OR NOT y`.
pub fn converse(x: Truth, y: Truth) -> Truth {
    match (x, y) {
        (Some(true), _) | (_, Some(false)) => Some(true),
        (Some(x), Some(y)) => Some(x || !y),
        _ => None,
    }
}
