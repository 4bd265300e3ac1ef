pub mod chart_spec;

pub use chart_spec::{ChartSpec, GridLayout, Panel, SeriesSpec};
