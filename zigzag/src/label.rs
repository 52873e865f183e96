//! Chart text for confirmed swings.
//!
//! Turns [`SwingEvent`]s into [`LabelCommand`]s a host chart can execute
//! (draw or remove a text object), and keeps an in-memory [`LabelBoard`] that
//! mirrors what the chart currently shows.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::event::{SwingConfirmation, SwingEvent};
use crate::types::Polarity;

/// Which parts of a swing go into its label text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub show_price: bool,
    pub show_percent_change: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            show_price: false,
            show_percent_change: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LabelColor {
    Green,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VerticalAlignment {
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum HorizontalAlignment {
    Center,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LabelStyle {
    pub color: LabelColor,
    pub vertical: VerticalAlignment,
    pub horizontal: HorizontalAlignment,
}

impl LabelStyle {
    /// Bullish swings are green and hang below their anchor, bearish ones are
    /// red and sit above it.
    pub fn for_polarity(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Bullish => Self {
                color: LabelColor::Green,
                vertical: VerticalAlignment::Top,
                horizontal: HorizontalAlignment::Center,
            },
            Polarity::Bearish => Self {
                color: LabelColor::Red,
                vertical: VerticalAlignment::Bottom,
                horizontal: HorizontalAlignment::Center,
            },
        }
    }
}

/// A text object anchored at a swing point.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartLabel {
    pub id: String,
    pub bar_index: u64,
    pub price: f64,
    pub text: String,
    pub style: LabelStyle,
}

impl ChartLabel {
    pub fn from_confirmation(config: &LabelConfig, c: &SwingConfirmation) -> Self {
        Self {
            id: c.label_id(),
            bar_index: c.point.index,
            price: c.point.price,
            text: format_label_text(config, c),
            style: LabelStyle::for_polarity(c.polarity),
        }
    }
}

/// Instruction for the host chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum LabelCommand {
    Draw(ChartLabel),
    Remove { id: String },
}

impl LabelCommand {
    pub fn from_event(config: &LabelConfig, event: &SwingEvent) -> Self {
        match event {
            SwingEvent::Confirmed(c) => LabelCommand::Draw(ChartLabel::from_confirmation(config, c)),
            SwingEvent::Retracted(p) => LabelCommand::Remove { id: p.label_id() },
        }
    }
}

/// Label text: price first, then the signed percent change on its own line.
///
/// ```text
/// 105
/// +10.53%
/// ```
pub fn format_label_text(config: &LabelConfig, c: &SwingConfirmation) -> String {
    let mut text = String::new();

    if config.show_price {
        let _ = write!(text, "{}", c.point.price);
    }

    if config.show_percent_change {
        if config.show_price {
            text.push('\n');
        }
        let _ = write!(text, "{}{:.2}%", c.polarity.sign(), c.percent_change);
    }

    text
}

/// The set of labels currently drawn, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct LabelBoard {
    config: LabelConfig,
    labels: BTreeMap<String, ChartLabel>,
}

impl LabelBoard {
    pub fn new(config: LabelConfig) -> Self {
        Self {
            config,
            labels: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Translate and apply one event. Returns the command that was applied.
    pub fn handle(&mut self, event: &SwingEvent) -> LabelCommand {
        let cmd = LabelCommand::from_event(&self.config, event);
        self.apply(&cmd);
        cmd
    }

    /// Drawing an existing id replaces it. Removing an unknown id is a no-op,
    /// as it is on a chart.
    pub fn apply(&mut self, cmd: &LabelCommand) {
        match cmd {
            LabelCommand::Draw(label) => {
                self.labels.insert(label.id.clone(), label.clone());
            }
            LabelCommand::Remove { id } => {
                self.labels.remove(id);
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&ChartLabel> {
        self.labels.get(id)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels ordered by bar index.
    pub fn labels(&self) -> Vec<&ChartLabel> {
        let mut out: Vec<_> = self.labels.values().collect();
        out.sort_by_key(|l| l.bar_index);
        out
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }
}
