use tracing::{debug, instrument, trace, warn};

use crate::config::DetectorConfig;
use crate::error::{ConfigError, ZigZagError};
use crate::event::{ConfirmCause, SwingConfirmation, SwingEvent};
use crate::history::SwingHistory;
use crate::types::{Bar, Direction, SwingPoint};

/// What a single bar did to the detector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarOutcome {
    /// Not enough observations yet. Nothing was evaluated.
    WarmingUp,
    /// The bar neither extended the extreme nor crossed the reversal level.
    Unchanged,
    /// The open extreme moved further in the current direction.
    Extended,
    /// A reversal was confirmed and the direction flipped.
    Reversed,
}

/// Result of [`ZigZag::on_bar`]: the outcome plus the events to present, in order.
#[derive(Clone, Debug, PartialEq)]
pub struct BarReport {
    pub outcome: BarOutcome,
    pub events: Vec<SwingEvent>,
}

impl BarReport {
    fn quiet(outcome: BarOutcome) -> Self {
        Self {
            outcome,
            events: Vec::new(),
        }
    }
}

/// Decision taken for one evaluated bar.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Step {
    Extend(f64),
    Reverse(f64),
    Hold,
}

/// ZigZag swing detector for one price series.
///
/// ## Phases
/// - `SeekingDown`: tracking a low. A bar whose low reaches the extreme moves
///   it; otherwise a high at or above `extreme * (1 + p/100)` confirms a swing up.
/// - `SeekingUp`: mirror image with highs and `1 - p/100`.
///
/// Extension is checked before reversal, so a bar that does both only extends.
///
/// ## State
/// The detector starts in `SeekingDown` with no extreme. The first evaluated
/// bar always seeds the history with its low.
///
/// One instance per series. Instances share nothing.
#[derive(Clone, Debug)]
pub struct ZigZag {
    config: DetectorConfig,
    direction: Direction,
    extreme: Option<SwingPoint>,
    history: SwingHistory,
    last_index: Option<u64>,
}

impl ZigZag {
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            direction: Direction::default(),
            extreme: None,
            history: SwingHistory::new(),
            last_index: None,
        })
    }

    /// Drop all state and return to the starting phase with no extreme.
    pub fn reset(&mut self) {
        self.direction = Direction::default();
        self.extreme = None;
        self.history.clear();
        self.last_index = None;

        debug!(target: "zigzag", "detector reset");
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The open extreme, i.e. the last history entry.
    pub fn current_extreme(&self) -> Option<SwingPoint> {
        self.extreme
    }

    pub fn history(&self) -> &SwingHistory {
        &self.history
    }

    pub fn last_index(&self) -> Option<u64> {
        self.last_index
    }

    /// Feed the next bar.
    ///
    /// Rejected bars (non-finite price, index not after the previous one)
    /// leave every piece of state as it was.
    #[instrument(target = "zigzag", level = "trace", skip_all, fields(index = bar.index))]
    pub fn on_bar(&mut self, bar: Bar) -> Result<BarReport, ZigZagError> {
        if !bar.high.is_finite() || !bar.low.is_finite() {
            return Err(ZigZagError::NonFinitePrice { index: bar.index });
        }

        if let Some(last) = self.last_index {
            if bar.index <= last {
                return Err(ZigZagError::OutOfOrderInput {
                    index: bar.index,
                    last,
                });
            }
        }
        self.last_index = Some(bar.index);

        if bar.observations() < self.config.warmup_bars as u64 {
            trace!(
                target: "zigzag",
                observations = bar.observations(),
                required = self.config.warmup_bars,
                "warming up"
            );
            return Ok(BarReport::quiet(BarOutcome::WarmingUp));
        }

        let step = decide(
            self.direction,
            self.extreme.map(|p| p.price),
            &bar,
            self.config.percentage_move,
        );

        let mut events = Vec::new();

        let outcome = match step {
            Step::Extend(price) => {
                self.move_extremum(bar.index, price, &mut events);
                BarOutcome::Extended
            }
            Step::Reverse(price) => {
                self.set_extremum(bar.index, price, ConfirmCause::Reversal, &mut events);
                self.direction = self.direction.flipped();
                debug!(
                    target: "zigzag",
                    index = bar.index,
                    price,
                    direction = ?self.direction,
                    "reversal confirmed"
                );
                BarOutcome::Reversed
            }
            Step::Hold => return Ok(BarReport::quiet(BarOutcome::Unchanged)),
        };

        Ok(BarReport { outcome, events })
    }

    /// Retract the open extreme and replace it at the new bar.
    fn move_extremum(&mut self, index: u64, price: f64, events: &mut Vec<SwingEvent>) {
        if let Some(retracted) = self.history.pop_last() {
            trace!(
                target: "zigzag",
                from = retracted.index,
                to = index,
                price,
                "extreme moved"
            );
            events.push(SwingEvent::Retracted(retracted));
        }

        self.set_extremum(index, price, ConfirmCause::Extension, events);
    }

    /// Append a new extreme and, once it has a predecessor, confirm it.
    fn set_extremum(
        &mut self,
        index: u64,
        price: f64,
        cause: ConfirmCause,
        events: &mut Vec<SwingEvent>,
    ) {
        let point = SwingPoint::new(index, price);
        self.extreme = Some(point);
        self.history.push(point);

        let Some(previous) = self.history.previous().copied() else {
            return;
        };

        let confirmation = SwingConfirmation::new(point, previous, cause);
        if confirmation.percent_change.is_nan() {
            warn!(
                target: "zigzag",
                index,
                previous_index = previous.index,
                "reference price is zero; percent change undefined"
            );
        }

        events.push(SwingEvent::Confirmed(confirmation));
    }
}

/// Core decision for one bar.
///
/// An absent extreme is beaten by any price, which seeds the first swing
/// through the extend branch.
fn decide(direction: Direction, extreme: Option<f64>, bar: &Bar, percentage_move: f64) -> Step {
    let Some(extreme) = extreme else {
        return match direction {
            Direction::SeekingDown => Step::Extend(bar.low),
            Direction::SeekingUp => Step::Extend(bar.high),
        };
    };

    let reversal_level = extreme * direction.threshold_factor(percentage_move);

    match direction {
        Direction::SeekingDown => {
            if bar.low <= extreme {
                Step::Extend(bar.low)
            } else if bar.high >= reversal_level {
                Step::Reverse(bar.high)
            } else {
                Step::Hold
            }
        }
        Direction::SeekingUp => {
            if bar.high >= extreme {
                Step::Extend(bar.high)
            } else if bar.low <= reversal_level {
                Step::Reverse(bar.low)
            } else {
                Step::Hold
            }
        }
    }
}
