//! Streaming ZigZag swing detection.
//!
//! A [`ZigZag`] consumes bars one at a time and maintains an alternating
//! sequence of swing highs and lows. A reversal is only confirmed once price
//! moves a configured percentage away from the current extreme; until then the
//! latest swing point may still be retracted and moved further.
//!
//! The detector never draws anything. It reports [`SwingEvent`]s which the
//! [`label`] adapter turns into chart text commands, and which a
//! [`SwingRegistry`] fans out to subscribed handlers.

pub mod config;
pub mod detector;
pub mod error;
pub mod event;
pub mod history;
pub mod label;
pub mod registry;
pub mod types;

pub use config::{DetectorConfig, ZigZagConfig};
pub use detector::{BarOutcome, BarReport, ZigZag};
pub use error::{ConfigError, ZigZagError};
pub use event::{ConfirmCause, SwingConfirmation, SwingEvent};
pub use history::SwingHistory;
pub use label::{ChartLabel, LabelBoard, LabelCommand, LabelConfig, LabelStyle};
pub use registry::{SwingHandler, SwingRegistry};
pub use types::{Bar, Direction, Polarity, SwingPoint};
