//! Score calculation.
//!
//! Remaining attempts at the moment of the correct guess are split into three
//! bands of at most three attempts each. The first band is worth 15 points per
//! attempt, the second 10, the third 5. The base score is then scaled by the
//! quality of the fact associated with the winning guess.

use crate::trivia::{MAX_GUESSES, Quality};

/// Attempts per band.
const BAND_SIZE: u32 = 3;

/// Points per remaining attempt, hardest band first.
const BAND_POINTS: [u32; 3] = [15, 10, 5];

/// Unscaled score for `remaining` unused attempts.
pub fn base_score(remaining: u32) -> u32 {
  BAND_POINTS
    .iter()
    .enumerate()
    .map(|(band, points)| {
      let floor = band as u32 * BAND_SIZE;
      remaining.saturating_sub(floor).min(BAND_SIZE) * points
    })
    .sum()
}

/// Final score for a game won after `guesses_used` guesses.
///
/// `quality` is the quality of the fact revealed just before the winning
/// guess; `None` scores as [`Quality::Medium`]. Out-of-range guess counts
/// score zero.
pub fn calculate_score(guesses_used: u32, quality: Option<Quality>) -> u32 {
  if !(1..=MAX_GUESSES).contains(&guesses_used) {
    return 0;
  }
  let remaining = MAX_GUESSES - guesses_used;
  let percent = quality.unwrap_or(Quality::Medium).multiplier_percent();
  base_score(remaining) * percent / 100
}

/// [`calculate_score`] for a quality given as a raw key (e.g. from a query
/// string). Unknown keys score as medium.
pub fn calculate_score_for_key(guesses_used: u32, quality_key: &str) -> u32 {
  calculate_score(guesses_used, Quality::from_key(quality_key))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_guess_with_curated_fact() {
    // remaining 8: 3×15 + 3×10 + 2×5 = 85, ×1.2
    assert_eq!(base_score(8), 85);
    assert_eq!(calculate_score(1, Some(Quality::High)), 102);
  }

  #[test]
  fn sixth_guess_medium() {
    assert_eq!(calculate_score(6, Some(Quality::Medium)), 45);
  }

  #[test]
  fn no_remaining_attempts_scores_zero() {
    for quality in [None, Some(Quality::High), Some(Quality::Low)] {
      assert_eq!(calculate_score(9, quality), 0);
    }
  }

  #[test]
  fn out_of_range_guess_counts_score_zero() {
    assert_eq!(calculate_score(0, Some(Quality::High)), 0);
    assert_eq!(calculate_score(10, Some(Quality::High)), 0);
    assert_eq!(calculate_score(u32::MAX, None), 0);
  }

  #[test]
  fn low_quality_floors() {
    // remaining 7: 45 + 30 + 5 = 80, ×0.8 = 64
    assert_eq!(calculate_score(2, Some(Quality::Low)), 64);
    // remaining 1: 15, ×0.8 = 12
    assert_eq!(calculate_score(8, Some(Quality::Low)), 12);
    // remaining 1: 15, ×1.2 = 18
    assert_eq!(calculate_score(8, Some(Quality::High)), 18);
  }

  #[test]
  fn missing_quality_scores_as_medium() {
    assert_eq!(calculate_score(3, None), calculate_score(3, Some(Quality::Medium)));
  }

  #[test]
  fn unknown_quality_key_scores_as_medium() {
    assert_eq!(calculate_score_for_key(6, "bogus"), 45);
    assert_eq!(calculate_score_for_key(1, "HIGH"), 102);
  }

  #[test]
  fn score_never_increases_with_more_guesses() {
    for quality in [Quality::High, Quality::Medium, Quality::Low] {
      let scores: Vec<u32> =
        (1..=9).map(|g| calculate_score(g, Some(quality))).collect();
      assert!(scores.windows(2).all(|w| w[0] > w[1]), "{scores:?}");
    }
  }
}
