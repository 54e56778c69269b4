use crate::model::error::LadderError;

/// Generates `rounds` rounds of round-robin pairings using the circle method.
///
/// Steps, per round:
/// 1. Split the rotation into halves and reverse the second half.
/// 2. Pair the halves index by index. Even rounds list the second half first,
///     odd rounds the first half, so players switch sides every round.
/// 3. Rotate: the last player moves to index 1 while index 0 stays fixed.
///
/// With `n` players and `n - 1` rounds every pair meets exactly once. The
/// output is deterministic for a given input order.
pub fn generate_schedule<P: Clone>(participants: &[P], rounds: u32) -> Result<Vec<(P, P)>, LadderError> {
    let n = participants.len();
    if n < 2 || n % 2 == 1 {
        return Err(LadderError::InvalidScheduleInput { participants: n });
    }

    let mid = n / 2;
    let mut rotation = participants.to_vec();
    let mut schedule = Vec::with_capacity(mid * rounds as usize);

    for round in 0..rounds {
        let (first_half, second_half) = rotation.split_at(mid);
        let pairs = first_half.iter().zip(second_half.iter().rev());

        if round % 2 == 1 {
            schedule.extend(pairs.map(|(a, b)| (a.clone(), b.clone())));
        } else {
            schedule.extend(pairs.map(|(a, b)| (b.clone(), a.clone())));
        }

        if let Some(last) = rotation.pop() {
            rotation.insert(1, last);
        }
    }

    Ok(schedule)
}
