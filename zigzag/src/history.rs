use crate::types::SwingPoint;

/// Ordered swing points, oldest first.
///
/// Only the tail is ever touched: a new swing is pushed, a moved extreme is
/// popped and pushed again. Consecutive entries alternate between peaks and
/// troughs as long as the detector is the only writer.
#[derive(Clone, Debug, Default)]
pub struct SwingHistory {
    points: Vec<SwingPoint>,
}

impl SwingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, point: SwingPoint) {
        self.points.push(point);
    }

    pub fn pop_last(&mut self) -> Option<SwingPoint> {
        self.points.pop()
    }

    pub fn last(&self) -> Option<&SwingPoint> {
        self.points.last()
    }

    /// The entry just before the last one.
    pub fn previous(&self) -> Option<&SwingPoint> {
        self.points.len().checked_sub(2).map(|i| &self.points[i])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwingPoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[SwingPoint] {
        &self.points
    }

    /// `(bar index, price)` vertices of the zigzag line drawn over the chart.
    pub fn polyline(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.points.iter().map(|p| (p.index, p.price))
    }
}
