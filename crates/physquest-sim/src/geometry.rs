//! Right-triangle puzzles (quests 1 and 2). No stepping involved.

use serde::{Deserialize, Serialize};

use physquest_core::constants::ANGLE_TOLERANCE_DEG;
use physquest_core::error::{parse_answer, InputError, SimError};
use physquest_core::types::Verdict;

/// Hypotenuse of a right triangle with legs `a` and `b`.
pub fn hypotenuse(a: f64, b: f64) -> Result<f64, SimError> {
    SimError::check_positive("a", a)?;
    SimError::check_positive("b", b)?;
    Ok(a.hypot(b))
}

/// Acute angles of a right triangle, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleAngles {
    /// Opposite side `a`.
    pub alpha_deg: f64,
    /// Opposite side `b`.
    pub beta_deg: f64,
}

pub fn triangle_angles(a: f64, b: f64) -> Result<TriangleAngles, SimError> {
    SimError::check_positive("a", a)?;
    SimError::check_positive("b", b)?;
    Ok(TriangleAngles {
        alpha_deg: (a / b).atan().to_degrees(),
        beta_deg: (b / a).atan().to_degrees(),
    })
}

/// Check the player's typed angles against the triangle with legs `a` and `b`.
///
/// Unparseable input is reported as a failed verdict, not an error, since
/// the player simply tries again.
pub fn check_angles(a: f64, b: f64, alpha: &str, beta: &str) -> Result<Verdict, SimError> {
    let expected = triangle_angles(a, b)?;
    let parsed: Result<(f64, f64), InputError> =
        parse_answer("alpha", alpha).and_then(|al| Ok((al, parse_answer("beta", beta)?)));
    let Ok((alpha, beta)) = parsed else {
        return Ok(Verdict::failure("Please enter valid angles."));
    };

    let alpha_ok = (alpha - expected.alpha_deg).abs() < ANGLE_TOLERANCE_DEG;
    let beta_ok = (beta - expected.beta_deg).abs() < ANGLE_TOLERANCE_DEG;
    if alpha_ok && beta_ok {
        Ok(Verdict::success("Correct! Moving to the next quest."))
    } else {
        Ok(Verdict::failure("Incorrect angles. Try again."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_four_five() {
        assert_eq!(hypotenuse(3.0, 4.0).unwrap(), 5.0);
        assert!(hypotenuse(0.0, 4.0).is_err());
    }

    #[test]
    fn angles_sum_to_ninety() {
        let angles = triangle_angles(5.0, 12.0).unwrap();
        assert!((angles.alpha_deg + angles.beta_deg - 90.0).abs() < 1e-9);
        let isoceles = triangle_angles(7.0, 7.0).unwrap();
        assert!((isoceles.alpha_deg - 45.0).abs() < 1e-12);
    }

    #[test]
    fn accepts_answers_within_half_a_degree() {
        let verdict = check_angles(3.0, 4.0, "36.9", "53.1").unwrap();
        assert!(verdict.success);
        let verdict = check_angles(3.0, 4.0, "37.5", "53.1").unwrap();
        assert_eq!(verdict.message, "Incorrect angles. Try again.");
    }

    #[test]
    fn text_answers_ask_again() {
        let verdict = check_angles(3.0, 4.0, "abc", "53.1").unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.message, "Please enter valid angles.");
    }
}
