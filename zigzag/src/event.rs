use serde::Serialize;

use crate::types::{Polarity, SwingPoint};

/// Why a swing point was (re)placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ConfirmCause {
    /// Price retraced far enough from the previous extreme to flip direction.
    Reversal,
    /// The open extreme moved further in the same direction.
    Extension,
}

/// Payload of a swing point that now has a predecessor to compare against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SwingConfirmation {
    pub point: SwingPoint,
    pub previous: SwingPoint,
    pub polarity: Polarity,
    /// Unsigned move from `previous` to `point`, in percent of `previous`.
    /// `NaN` when `previous.price` is zero.
    pub percent_change: f64,
    pub cause: ConfirmCause,
}

impl SwingConfirmation {
    pub fn new(point: SwingPoint, previous: SwingPoint, cause: ConfirmCause) -> Self {
        Self {
            point,
            previous,
            polarity: Polarity::between(point.price, previous.price),
            percent_change: percent_change(previous.price, point.price),
            cause,
        }
    }

    pub fn label_id(&self) -> String {
        self.point.label_id()
    }
}

/// Notification produced by the detector for the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub enum SwingEvent {
    Confirmed(SwingConfirmation),
    /// The point was dropped from the history; its chart object must go.
    Retracted(SwingPoint),
}

impl SwingEvent {
    /// Identifier of the chart object this event targets.
    pub fn label_id(&self) -> String {
        match self {
            SwingEvent::Confirmed(c) => c.label_id(),
            SwingEvent::Retracted(p) => p.label_id(),
        }
    }
}

/// `100 * |current - previous| / previous`. The older price is always the
/// reference, so a drop from 105 to 94 is 10.48% and a rise from 95 to 105 is
/// 10.53%.
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous == 0.0 {
        return f64::NAN;
    }
    100.0 * (current - previous).abs() / previous
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_change_uses_the_older_price() {
        assert!((percent_change(95.0, 105.0) - 10.526_315_789).abs() < 1e-6);
        assert!((percent_change(105.0, 94.0) - 10.476_190_476).abs() < 1e-6);
    }

    #[test]
    fn zero_reference_is_nan() {
        assert!(percent_change(0.0, 5.0).is_nan());
    }

    #[test]
    fn confirmation_derives_polarity() {
        let up = SwingConfirmation::new(
            SwingPoint::new(2, 105.0),
            SwingPoint::new(1, 95.0),
            ConfirmCause::Reversal,
        );
        assert_eq!(up.polarity, Polarity::Bullish);
        assert_eq!(up.label_id(), "ZigZagLabel2");

        let down = SwingConfirmation::new(
            SwingPoint::new(3, 94.0),
            SwingPoint::new(2, 105.0),
            ConfirmCause::Reversal,
        );
        assert_eq!(down.polarity, Polarity::Bearish);
    }
}
