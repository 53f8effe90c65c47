//! Bar chart geometry and a text renderer for it.

use std::fmt;

pub const DEFAULT_WIDTH: f64 = 600.0;
pub const DEFAULT_HEIGHT: f64 = 400.0;

const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Text attached to each bar.
pub enum BarLabel {
    Constant(String),
    Accessor(Box<dyn Fn(f64, usize) -> String>),
}

impl BarLabel {
    fn text(&self, value: f64, index: usize) -> String {
        match self {
            BarLabel::Constant(text) => text.clone(),
            BarLabel::Accessor(f) => f(value, index),
        }
    }
}

impl fmt::Debug for BarLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarLabel::Constant(text) => f.debug_tuple("Constant").field(text).finish(),
            BarLabel::Accessor(_) => f.write_str("Accessor(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub index: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub label: Option<String>,
}

pub struct ChartSpec {
    values: Vec<f64>,
    width: f64,
    height: f64,
    padding: Padding,
    label: Option<BarLabel>,
    x_label: Option<Box<dyn Fn(usize) -> String>>,
    y_label: Option<Box<dyn Fn(f64) -> String>>,
}

impl ChartSpec {
    /// Size the chart to its container, falling back to 600x400 for any
    /// dimension the container does not give.
    pub fn in_container(values: Vec<f64>, width: Option<f64>, height: Option<f64>) -> Self {
        Self {
            values,
            width: width.filter(|w| *w > 0.0).unwrap_or(DEFAULT_WIDTH),
            height: height.filter(|h| *h > 0.0).unwrap_or(DEFAULT_HEIGHT),
            padding: Padding::default(),
            label: None,
            x_label: None,
            y_label: None,
        }
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    pub fn label(mut self, label: BarLabel) -> Self {
        self.label = Some(label);
        self
    }

    pub fn x_label(mut self, f: impl Fn(usize) -> String + 'static) -> Self {
        self.x_label = Some(Box::new(f));
        self
    }

    pub fn y_label(mut self, f: impl Fn(f64) -> String + 'static) -> Self {
        self.y_label = Some(Box::new(f));
        self
    }

    pub fn available_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    pub fn available_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    /// Largest value, never below 1 so scaling cannot divide by zero.
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(1.0, f64::max)
    }

    pub fn bars(&self) -> Vec<Bar> {
        if self.values.is_empty() {
            return Vec::new();
        }

        let max = self.max_value();
        let available_height = self.available_height();
        let bar_width = self.available_width() / self.values.len() as f64;
        let baseline = self.padding.top + available_height;

        self.values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let scaled = if value.is_finite() { value.max(0.0) } else { 0.0 };
                let height = scaled / max * available_height;
                Bar {
                    index,
                    value,
                    x: self.padding.left + index as f64 * bar_width,
                    y: baseline - height,
                    width: bar_width,
                    height,
                    label: self.label.as_ref().map(|l| l.text(value, index)),
                }
            })
            .collect()
    }
}

/// Append-only drawing: each call to [`Chart::enter`] yields bars only for
/// values added since the previous call. Bars already drawn are never
/// updated, so a changed maximum needs a fresh chart.
pub struct Chart {
    spec: ChartSpec,
    drawn: usize,
}

impl Chart {
    pub fn new(spec: ChartSpec) -> Self {
        Self { spec, drawn: 0 }
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn push(&mut self, value: f64) {
        self.spec.values.push(value);
    }

    pub fn enter(&mut self) -> Vec<Bar> {
        let bars = self.spec.bars();
        let entered = bars.into_iter().skip(self.drawn).collect::<Vec<_>>();
        self.drawn += entered.len();
        entered
    }
}

/// Draw `bars` into text rows, one cell per unit of width and height.
/// Y labels for the maximum and zero go in a left gutter beside the top and
/// bottom of the plot area; bar labels and x labels get a row each beneath.
pub fn render_text(spec: &ChartSpec, bars: &[Bar]) -> Vec<String> {
    let columns = spec.width.round().max(0.0) as usize;
    let rows = spec.height.round().max(0.0) as usize;

    let (top_label, bottom_label) = match &spec.y_label {
        Some(f) => (f(spec.max_value()), f(0.0)),
        None => (String::new(), String::new()),
    };
    let gutter = top_label.chars().count().max(bottom_label.chars().count());
    let gutter = if gutter > 0 { gutter + 1 } else { 0 };

    let top_row = spec.padding.top.round().max(0.0) as usize;
    let bottom_row = ((spec.padding.top + spec.available_height()).round().max(0.0) as usize)
        .saturating_sub(1);

    let mut lines = Vec::with_capacity(rows + 2);
    for row in 0..rows {
        let prefix = if row == top_row {
            top_label.as_str()
        } else if row == bottom_row {
            bottom_label.as_str()
        } else {
            ""
        };
        let mut line = format!("{prefix:>width$}", width = gutter.saturating_sub(1));
        if gutter > 0 {
            line.push(' ');
        }

        let cell_top = row as f64;
        let cell_bottom = cell_top + 1.0;
        for column in 0..columns {
            let center = column as f64 + 0.5;
            let bar = bars.iter().find(|b| center >= b.x && center < b.x + b.width);
            let ch = match bar {
                Some(bar) if bar.value > 0.0 => {
                    let top = bar.y.max(cell_top);
                    let bottom = (bar.y + bar.height).min(cell_bottom);
                    let filled = (bottom - top).clamp(0.0, 1.0);
                    EIGHTHS[(filled * 8.0).round() as usize]
                }
                _ => ' ',
            };
            line.push(ch);
        }
        lines.push(line.trim_end().to_string());
    }

    if spec.label.is_some() {
        lines.push(label_row(bars, gutter, columns, |bar| {
            bar.label.clone().unwrap_or_default()
        }));
    }
    if let Some(f) = &spec.x_label {
        lines.push(label_row(bars, gutter, columns, |bar| f(bar.index)));
    }

    lines
}

fn label_row(bars: &[Bar], gutter: usize, columns: usize, text: impl Fn(&Bar) -> String) -> String {
    let mut cells = vec![' '; columns];
    for bar in bars {
        let start = bar.x.round().max(0.0) as usize;
        let room = (bar.width.floor() as usize).max(1);
        for (i, ch) in text(bar).chars().take(room).enumerate() {
            if let Some(cell) = cells.get_mut(start + i) {
                *cell = ch;
            }
        }
    }
    let row: String = cells.into_iter().collect();
    format!("{}{}", " ".repeat(gutter), row).trim_end().to_string()
}
