//! Next/previous index selection.
//!
//! Pure functions of the list length, the current index, the policy and an
//! injected RNG. Every function returns `None` for an empty list.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Index to show after moving in `direction`.
///
/// Sequential moves wrap around. Random forward never repeats `current` when
/// there is more than one question; random backward may land anywhere,
/// including `current`.
pub fn step<R: Rng + ?Sized>(
    len: usize,
    current: usize,
    random: bool,
    direction: Direction,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = match (random, direction) {
        (false, Direction::Forward) => (current + 1) % len,
        (false, Direction::Backward) => (current % len + len - 1) % len,
        (true, Direction::Forward) => loop {
            let drawn = rng.random_range(0..len);
            if len == 1 || drawn != current {
                break drawn;
            }
        },
        (true, Direction::Backward) => rng.random_range(0..len),
    };
    Some(next)
}

/// Unconstrained uniform draw, used when random mode is switched on.
pub fn random_jump<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}
