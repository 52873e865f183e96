use serde::{Deserialize, Serialize};

/// One bar of the input series.
///
/// `index` is the zero-based position of the bar in the host series, so when
/// bar `i` arrives the data source holds `i + 1` observations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub index: u64,
    pub high: f64,
    pub low: f64,
}

impl Bar {
    pub fn new(index: u64, high: f64, low: f64) -> Self {
        Self { index, high, low }
    }

    /// Number of observations the data source holds once this bar exists.
    pub fn observations(&self) -> u64 {
        self.index.saturating_add(1)
    }
}

/// A tentative or confirmed local extreme.
///
/// Swing points are never edited in place. Moving an extreme means retracting
/// the old point and pushing a new one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: u64,
    pub price: f64,
}

impl SwingPoint {
    pub fn new(index: u64, price: f64) -> Self {
        Self { index, price }
    }

    /// Stable identifier of the chart object drawn for this point.
    pub fn label_id(&self) -> String {
        format!("ZigZagLabel{}", self.index)
    }
}

/// Which extreme the detector is currently tracking.
///
/// `SeekingDown` tracks a low: lower lows extend it, a rally of
/// `percentage_move` confirms a reversal up. `SeekingUp` is the mirror image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    SeekingDown,
    SeekingUp,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::SeekingDown => Direction::SeekingUp,
            Direction::SeekingUp => Direction::SeekingDown,
        }
    }

    /// Multiplier applied to the current extreme to get the reversal level.
    pub fn threshold_factor(self, percentage_move: f64) -> f64 {
        match self {
            Direction::SeekingDown => 1.0 + percentage_move / 100.0,
            Direction::SeekingUp => 1.0 - percentage_move / 100.0,
        }
    }
}

/// Polarity of a swing relative to the point before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Bullish,
    Bearish,
}

impl Polarity {
    /// Bullish iff `current` is strictly above `previous`.
    pub fn between(current: f64, previous: f64) -> Self {
        if current > previous {
            Polarity::Bullish
        } else {
            Polarity::Bearish
        }
    }

    pub fn sign(self) -> char {
        match self {
            Polarity::Bullish => '+',
            Polarity::Bearish => '-',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_factor_follows_direction() {
        assert!((Direction::SeekingDown.threshold_factor(3.0) - 1.03).abs() < 1e-12);
        assert!((Direction::SeekingUp.threshold_factor(3.0) - 0.97).abs() < 1e-12);
        assert_eq!(Direction::SeekingUp.threshold_factor(0.0), 1.0);
    }

    #[test]
    fn direction_flips_both_ways() {
        assert_eq!(Direction::default(), Direction::SeekingDown);
        assert_eq!(Direction::SeekingDown.flipped(), Direction::SeekingUp);
        assert_eq!(Direction::SeekingUp.flipped(), Direction::SeekingDown);
    }

    #[test]
    fn equal_prices_are_bearish() {
        assert_eq!(Polarity::between(10.0, 9.0), Polarity::Bullish);
        assert_eq!(Polarity::between(9.0, 10.0), Polarity::Bearish);
        assert_eq!(Polarity::between(10.0, 10.0), Polarity::Bearish);
    }

    #[test]
    fn label_id_is_keyed_by_bar_index() {
        assert_eq!(SwingPoint::new(17, 1.5).label_id(), "ZigZagLabel17");
    }

    #[test]
    fn first_bar_counts_as_one_observation() {
        assert_eq!(Bar::new(0, 1.0, 1.0).observations(), 1);
        assert_eq!(Bar::new(4, 1.0, 1.0).observations(), 5);
    }
}
