//! Picking the best shift of a matching run.

use crate::domain::Shift;

/// Shift with the lowest finite loss.
///
/// Ties go to the earlier shift, so the zero-shift baseline wins against any
/// run that did not improve on it. NaN losses never win.
pub fn best_shift(shifts: &[Shift]) -> Option<&Shift> {
    let mut best: Option<&Shift> = None;
    for shift in shifts.iter().filter(|s| !s.loss.is_nan()) {
        match best {
            Some(b) if shift.loss >= b.loss => {}
            _ => best = Some(shift),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(sequence_delta: f64, loss: f64) -> Shift {
        Shift {
            depth_from: sequence_delta,
            depth_to: 10.0 + sequence_delta,
            sequence_delta,
            interval_deltas: vec![],
            loss,
        }
    }

    #[test]
    fn lowest_loss_wins() {
        let shifts = [shift(0.0, -0.5), shift(1.0, -0.9), shift(2.0, -0.7)];
        assert_eq!(best_shift(&shifts).unwrap().sequence_delta, 1.0);
    }

    #[test]
    fn ties_keep_the_earlier_shift() {
        let shifts = [shift(0.0, -0.9), shift(1.0, -0.9)];
        assert_eq!(best_shift(&shifts).unwrap().sequence_delta, 0.0);
    }

    #[test]
    fn nan_losses_are_ignored() {
        let shifts = [shift(0.0, f64::NAN), shift(1.0, -0.1)];
        assert_eq!(best_shift(&shifts).unwrap().sequence_delta, 1.0);
        assert!(best_shift(&[shift(0.0, f64::NAN)]).is_none());
        assert!(best_shift(&[]).is_none());
    }
}
