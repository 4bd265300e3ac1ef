use serde::Serialize;

use crate::common::enums::{ChartKind, LineStyle};
use crate::math::histogram::Histogram;

/// Fixed rows × cols panel grid, filled row by row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
}

impl GridLayout {
    pub const TICKER_GRID: GridLayout = GridLayout { rows: 3, cols: 2 };

    pub fn single() -> Self {
        Self { rows: 1, cols: 1 }
    }

    pub fn stacked(rows: usize) -> Self {
        Self { rows, cols: 1 }
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// 1-based (row, col) of the i-th panel, None past the last cell
    pub fn position(&self, i: usize) -> Option<(usize, usize)> {
        if i >= self.capacity() {
            return None;
        }
        Some((i / self.cols + 1, i % self.cols + 1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSpec {
    /// Legend label
    pub name: String,
    /// Column of the report frame holding the values
    pub column: String,
    /// Empty lets the renderer pick
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color: String,
    pub style: LineStyle,
}

impl SeriesSpec {
    pub fn solid(name: impl Into<String>, column: impl Into<String>, color: &str) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            color: color.to_string(),
            style: LineStyle::Solid,
        }
    }

    pub fn dashed(name: impl Into<String>, column: impl Into<String>, color: &str) -> Self {
        Self {
            style: LineStyle::Dash,
            ..Self::solid(name, column, color)
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub row: usize,
    pub col: usize,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<SeriesSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
}

impl Panel {
    pub fn new(
        (row, col): (usize, usize),
        title: impl Into<String>,
        x_label: &str,
        y_label: &str,
    ) -> Self {
        Self {
            row,
            col,
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            series: Vec::new(),
            histogram: None,
        }
    }

    pub fn with_series(mut self, series: SeriesSpec) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_histogram(mut self, histogram: Histogram) -> Self {
        self.histogram = Some(histogram);
        self
    }
}

/// Rendering request handed to the chart collaborator
#[derive(Debug, Clone, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub layout: GridLayout,
    pub show_legend: bool,
    pub panels: Vec<Panel>,
}

impl ChartSpec {
    pub fn new(title: impl Into<String>, kind: ChartKind, layout: GridLayout) -> Self {
        Self {
            title: title.into(),
            kind,
            layout,
            show_legend: kind == ChartKind::Line,
            panels: Vec::new(),
        }
    }

    pub fn push_panel(&mut self, panel: Panel) {
        self.panels.push(panel);
    }
}
