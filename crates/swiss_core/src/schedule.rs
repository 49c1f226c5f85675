//! How many Swiss rounds a field of a given size plays.

/// Upper bound of each competitor band and the rounds it plays. Fields
/// larger than the last band play [`MAX_SWISS_ROUNDS`].
const ROUND_TABLE: [(usize, u32); 8] = [
    (4, 2),
    (8, 3),
    (16, 4),
    (32, 5),
    (64, 6),
    (128, 7),
    (226, 8),
    (409, 9),
];

pub const MAX_SWISS_ROUNDS: u32 = 10;

/// Fewest competitors for which Swiss rounds are played at all.
pub const MIN_SWISS_FIELD: usize = 3;

/// Swiss rounds for `competitors` entrants. Monotone in the field size;
/// fields below [`MIN_SWISS_FIELD`] skip the Swiss stage.
pub fn swiss_rounds(competitors: usize) -> u32 {
    if competitors < MIN_SWISS_FIELD {
        return 0;
    }
    ROUND_TABLE
        .iter()
        .find(|(upper, _)| competitors <= *upper)
        .map(|&(_, rounds)| rounds)
        .unwrap_or(MAX_SWISS_ROUNDS)
}

/// Largest power of two that fits both the qualifier count and the
/// configured bracket size.
pub fn bracket_size(qualified: usize, requested: usize) -> usize {
    let cap = qualified.min(requested);
    if cap == 0 {
        0
    } else {
        1 << cap.ilog2()
    }
}
