//! Causal pixel predictors.
//!
//! Every predictor sees the three already-known neighbours of the current
//! pixel `x`:
//!
//! ```text
//!   c b
//!   a x
//! ```
//!
//! `a` is the left neighbour, `b` the one above, `c` the one above-left.
//! All arithmetic is on `i32` and Rust's `/` truncates toward zero, so
//! `(a - c) / 2` with `a - c == -3` yields `-1`. Encoder and decoder call the
//! same `predict`, so the rounding is identical on both sides.

use std::fmt;
use std::str::FromStr;

use crate::LpicError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Predictor {
    /// x^ = a
    Left,
    /// x^ = b
    Above,
    /// x^ = c
    AboveLeft,
    /// x^ = a + b - c
    Planar,
    /// x^ = a + (b - c) / 2
    LeftHalfGradient,
    /// x^ = b + (a - c) / 2
    AboveHalfGradient,
    /// x^ = (a + b) / 2
    Average,
}

impl Predictor {
    /// Every formula, in index order.
    pub const ALL: [Predictor; 7] = [
        Predictor::Left,
        Predictor::Above,
        Predictor::AboveLeft,
        Predictor::Planar,
        Predictor::LeftHalfGradient,
        Predictor::AboveHalfGradient,
        Predictor::Average,
    ];

    #[inline]
    pub fn predict(self, a: i32, b: i32, c: i32) -> i32 {
        match self {
            Predictor::Left => a,
            Predictor::Above => b,
            Predictor::AboveLeft => c,
            Predictor::Planar => a + b - c,
            Predictor::LeftHalfGradient => a + (b - c) / 2,
            Predictor::AboveHalfGradient => b + (a - c) / 2,
            Predictor::Average => (a + b) / 2,
        }
    }

    /// [`predict`](Self::predict) that returns `None` instead of overflowing.
    pub fn checked_predict(self, a: i32, b: i32, c: i32) -> Option<i32> {
        match self {
            Predictor::Left => Some(a),
            Predictor::Above => Some(b),
            Predictor::AboveLeft => Some(c),
            Predictor::Planar => a.checked_add(b)?.checked_sub(c),
            Predictor::LeftHalfGradient => a.checked_add(b.checked_sub(c)? / 2),
            Predictor::AboveHalfGradient => b.checked_add(a.checked_sub(c)? / 2),
            Predictor::Average => i32::try_from((i64::from(a) + i64::from(b)) / 2).ok(),
        }
    }

    /// 1-based formula number, stable across releases (used in `.lpic` headers).
    pub fn index(self) -> u8 {
        match self {
            Predictor::Left => 1,
            Predictor::Above => 2,
            Predictor::AboveLeft => 3,
            Predictor::Planar => 4,
            Predictor::LeftHalfGradient => 5,
            Predictor::AboveHalfGradient => 6,
            Predictor::Average => 7,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(usize::from(index).checked_sub(1)?).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Predictor::Left => "left",
            Predictor::Above => "above",
            Predictor::AboveLeft => "above-left",
            Predictor::Planar => "planar",
            Predictor::LeftHalfGradient => "left-half-gradient",
            Predictor::AboveHalfGradient => "above-half-gradient",
            Predictor::Average => "average",
        }
    }

    /// Human-readable formula, e.g. `x^ = a + b - c`.
    pub fn formula(self) -> &'static str {
        match self {
            Predictor::Left => "x^ = a",
            Predictor::Above => "x^ = b",
            Predictor::AboveLeft => "x^ = c",
            Predictor::Planar => "x^ = a + b - c",
            Predictor::LeftHalfGradient => "x^ = a + (b - c) / 2",
            Predictor::AboveHalfGradient => "x^ = b + (a - c) / 2",
            Predictor::Average => "x^ = (a + b) / 2",
        }
    }
}

impl fmt::Display for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts either the formula number (`"4"`) or its name (`"planar"`).
impl FromStr for Predictor {
    type Err = LpicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<u8>() {
            return Self::from_index(index).ok_or(LpicError::InvalidArgument);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or(LpicError::InvalidArgument)
    }
}
