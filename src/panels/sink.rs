use crate::panels::panel::{Notice, Panel};
use log::warn;
use std::io::Write;

/// The presentation layer: receives rendered panels and notices, in order.
pub trait PanelSink {
    fn render_panel(&mut self, panel: Panel);

    fn notice(&mut self, notice: Notice);
}

impl<T: PanelSink + ?Sized> PanelSink for &mut T {
    fn render_panel(&mut self, panel: Panel) {
        (**self).render_panel(panel)
    }

    fn notice(&mut self, notice: Notice) {
        (**self).notice(notice)
    }
}

/// Everything emitted, kept in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    Panel(Panel),
    Notice(Notice),
}

/// Stores emitted panels and notices, for headless use and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub emitted: Vec<Emitted>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panels(&self) -> Vec<&Panel> {
        self.emitted
            .iter()
            .filter_map(|e| match e {
                Emitted::Panel(p) => Some(p),
                Emitted::Notice(_) => None,
            })
            .collect()
    }

    pub fn notices(&self) -> Vec<&Notice> {
        self.emitted
            .iter()
            .filter_map(|e| match e {
                Emitted::Notice(n) => Some(n),
                Emitted::Panel(_) => None,
            })
            .collect()
    }
}

impl PanelSink for RecordingSink {
    fn render_panel(&mut self, panel: Panel) {
        self.emitted.push(Emitted::Panel(panel));
    }

    fn notice(&mut self, notice: Notice) {
        self.emitted.push(Emitted::Notice(notice));
    }
}

/// Writes a plain-text summary of each panel: one line per series with
/// count, minimum, mean and maximum of its values.
pub struct TextSink<W> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_panel(&mut self, panel: &Panel) -> std::io::Result<()> {
        writeln!(self.out, "## {}", panel.title)?;
        writeln!(
            self.out,
            "{} chart, {} days, y: {}",
            panel.chart,
            panel.dates.len(),
            panel.y_label
        )?;
        for series in &panel.series {
            let values: Vec<f64> = series.values.iter().flatten().copied().collect();
            if values.is_empty() {
                writeln!(self.out, "  {:<22} no values", series.label)?;
                continue;
            }
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            writeln!(
                self.out,
                "  {:<22} n={:<4} min={:>8.1} mean={:>8.1} max={:>8.1}",
                series.label,
                values.len(),
                min,
                mean,
                max
            )?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> PanelSink for TextSink<W> {
    fn render_panel(&mut self, panel: Panel) {
        if let Err(e) = self.write_panel(&panel) {
            warn!("Failed to write panel '{}': {}", panel.title, e);
        }
    }

    fn notice(&mut self, notice: Notice) {
        if let Err(e) = writeln!(self.out, "! {}", notice) {
            warn!("Failed to write notice: {}", e);
        }
    }
}
