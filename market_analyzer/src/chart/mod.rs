//! Three-panel SVG market chart.
//!
//! ```text
//! +-----------------------------------------+
//! | price history: high, low, 1h/4h/24h MAs |  3
//! +-----------------------------------------+
//! | volume bars, 24h MA                     |  1
//! +-----------------------------------------+
//! | price distribution, mean and median     |  1
//! +-----------------------------------------+
//! ```
//!
//! All figure settings live on [`PriceChart`]; nothing is global.

pub mod panels;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use plotters::{
    coord::{
        Shift,
        cartesian::Cartesian2d,
        types::{RangedCoordf64, RangedCoordi64},
    },
    prelude::*,
};
use thiserror::Error;
use timeseries_ingestor::models::{sample::Sample, series::Series};
use tracing::info;

use panels::{Histogram, contiguous_runs, histogram, median, padded_range, rolling_mean};

use crate::stats::mean;

const HOUR: i64 = 3_600;
const HISTOGRAM_BINS: usize = 50;
const FOOTER_HEIGHT: i32 = 30;

type TimeChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordi64, RangedCoordf64>>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("cannot chart an empty series")]
    EmptySeries,

    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to draw {}: {message}", path.display())]
    Draw { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: RGBColor,
    pub foreground: RGBColor,
    pub high: RGBColor,
    pub low: RGBColor,
    pub ma_1h: RGBColor,
    pub ma_4h: RGBColor,
    pub ma_24h: RGBColor,
    pub volume: RGBColor,
    pub volume_ma: RGBColor,
    pub mean: RGBColor,
    pub median: RGBColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: RGBColor(0x12, 0x12, 0x12),
            foreground: RGBColor(0xe0, 0xe0, 0xe0),
            high: RGBColor(0x00, 0xff, 0x00),
            low: RGBColor(0xff, 0x33, 0x33),
            ma_1h: RGBColor(0xff, 0xff, 0x00),
            ma_4h: RGBColor(0x00, 0xff, 0xff),
            ma_24h: RGBColor(0xff, 0x00, 0xff),
            volume: RGBColor(0x30, 0x4c, 0x89),
            volume_ma: RGBColor(0xff, 0x98, 0x00),
            mean: RGBColor(0xff, 0x98, 0x00),
            median: RGBColor(0x00, 0xff, 0x00),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub palette: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1200,
            title: "Market Analysis".to_string(),
            palette: Palette::default(),
        }
    }
}

/// Series-derived values for every panel, computed before any drawing.
struct PanelData {
    x_range: std::ops::Range<i64>,
    step: i64,
    highs: Vec<(i64, Option<f64>)>,
    lows: Vec<(i64, Option<f64>)>,
    moving_averages: [(String, Vec<(i64, Option<f64>)>); 3],
    volumes: Vec<(i64, Option<f64>)>,
    volume_ma: Vec<(i64, Option<f64>)>,
    histogram: Option<Histogram>,
    mean: Option<f64>,
    median: Option<f64>,
}

impl PanelData {
    fn from_series(series: &Series) -> Option<Self> {
        let first = series.first()?.timestamp;
        let last = series.last()?.timestamp;
        let timestep = series.timestep();
        let step = timestep.bucket_secs();

        let column = |f: fn(&Sample) -> Option<f64>| -> Vec<Option<f64>> {
            series.iter().map(f).collect()
        };
        let with_time = |values: Vec<Option<f64>>| -> Vec<(i64, Option<f64>)> {
            series.timestamps().zip(values).collect()
        };

        let highs = column(|s| s.avg_high_price);
        let volumes = column(|s| s.combined_volume().map(|v| v as f64));
        let day = timestep.buckets_in(24 * HOUR);

        let ma = |label: &str, hours: i64| {
            let window = timestep.buckets_in(hours * HOUR);
            (label.to_string(), with_time(rolling_mean(&highs, window)))
        };
        let moving_averages = [ma("1h MA", 1), ma("4h MA", 4), ma("24h MA", 24)];

        let priced: Vec<f64> = highs.iter().flatten().copied().collect();

        Some(Self {
            x_range: first..last + step,
            step,
            lows: with_time(column(|s| s.avg_low_price)),
            moving_averages,
            volume_ma: with_time(rolling_mean(&volumes, day)),
            volumes: with_time(volumes),
            histogram: histogram(&priced, HISTOGRAM_BINS),
            mean: mean(&priced),
            median: median(&priced),
            highs: with_time(highs),
        })
    }
}

fn axis_date(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Renders a [`Series`] into the market chart.
#[derive(Debug, Clone, Default)]
pub struct PriceChart {
    config: ChartConfig,
}

impl PriceChart {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Default figure titled "`<item_name>` Market Analysis".
    pub fn for_item(item_name: &str) -> Self {
        Self::new(ChartConfig {
            title: format!("{item_name} Market Analysis"),
            ..ChartConfig::default()
        })
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Writes the chart to `path`, stamped with the current time.
    pub fn render(&self, series: &Series, path: impl AsRef<Path>) -> Result<PathBuf, ChartError> {
        self.render_at(series, path, Utc::now())
    }

    pub fn render_at(
        &self,
        series: &Series,
        path: impl AsRef<Path>,
        generated_at: DateTime<Utc>,
    ) -> Result<PathBuf, ChartError> {
        let path = path.as_ref();
        let data = PanelData::from_series(series).ok_or(ChartError::EmptySeries)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ChartError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let root =
            SVGBackend::new(path, (self.config.width, self.config.height)).into_drawing_area();
        self.draw(&root, &data, generated_at)
            .map_err(|e| ChartError::Draw {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        info!(path = %path.display(), samples = series.len(), "Chart saved");
        Ok(path.to_path_buf())
    }

    fn text_style(&self, size: u32) -> TextStyle<'static> {
        ("sans-serif", size).into_font().color(&self.config.palette.foreground)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        data: &PanelData,
        generated_at: DateTime<Utc>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&self.config.palette.background)?;
        let titled = root.titled(&self.config.title, self.text_style(32))?;

        let (_, height) = titled.dim_in_pixel();
        let height = height as i32;
        let (body, footer) = titled.split_vertically(height - FOOTER_HEIGHT);
        let unit = (height - FOOTER_HEIGHT) / 5;
        let (price_area, rest) = body.split_vertically(unit * 3);
        let (volume_area, distribution_area) = rest.split_vertically(unit);

        self.draw_price_panel(&price_area, data)?;
        self.draw_volume_panel(&volume_area, data)?;
        self.draw_distribution_panel(&distribution_area, data)?;

        let caption = format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M"));
        footer.draw(&Text::new(caption, (10, 5), self.text_style(14)))?;

        root.present()
    }

    fn time_chart<'a, DB: DrawingBackend>(
        &self,
        area: &'a DrawingArea<DB, Shift>,
        caption: &str,
        x_range: std::ops::Range<i64>,
        y_range: std::ops::Range<f64>,
        y_desc: &str,
    ) -> Result<TimeChart<'a, DB>, DrawingAreaErrorKind<DB::ErrorType>> {
        let fg = self.config.palette.foreground;
        let mut chart = ChartBuilder::on(area)
            .caption(caption, self.text_style(20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|ts: &i64| axis_date(*ts))
            .y_desc(y_desc)
            .label_style(self.text_style(14))
            .axis_style(&fg)
            .bold_line_style(fg.mix(0.15))
            .light_line_style(fg.mix(0.05))
            .draw()?;
        Ok(chart)
    }

    fn draw_line<DB: DrawingBackend>(
        chart: &mut TimeChart<'_, DB>,
        points: &[(i64, Option<f64>)],
        style: ShapeStyle,
        label: &str,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        chart
            .draw_series(
                contiguous_runs(points.iter().copied())
                    .into_iter()
                    .map(|run| PathElement::new(run, style)),
            )?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        Ok(())
    }

    fn draw_legend<'a, DB: DrawingBackend + 'a>(
        &self,
        chart: &mut TimeChart<'a, DB>,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let p = &self.config.palette;
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(p.background.mix(0.8))
            .border_style(&p.foreground)
            .label_font(self.text_style(14))
            .draw()
    }

    fn draw_price_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        data: &PanelData,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let p = &self.config.palette;
        let y_range = padded_range(
            data.highs
                .iter()
                .chain(&data.lows)
                .filter_map(|(_, v)| *v),
        );
        let mut chart = self.time_chart(
            area,
            "Price History",
            data.x_range.clone(),
            y_range,
            "Price (gp)",
        )?;

        Self::draw_line(&mut chart, &data.highs, p.high.stroke_width(1), "High Price")?;
        Self::draw_line(&mut chart, &data.lows, p.low.stroke_width(1), "Low Price")?;
        let ma_colors = [p.ma_1h, p.ma_4h, p.ma_24h];
        for ((label, points), color) in data.moving_averages.iter().zip(ma_colors) {
            Self::draw_line(&mut chart, points, color.stroke_width(2), label)?;
        }
        self.draw_legend(&mut chart)
    }

    fn draw_volume_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        data: &PanelData,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let p = &self.config.palette;
        let peak = data
            .volumes
            .iter()
            .filter_map(|(_, v)| *v)
            .fold(0.0_f64, f64::max);
        let y_top = if peak > 0.0 { peak * 1.1 } else { 1.0 };
        let mut chart = self.time_chart(
            area,
            "Trading Volume",
            data.x_range.clone(),
            0.0..y_top,
            "Volume",
        )?;

        let bar = p.volume.mix(0.8).filled();
        let step = data.step;
        chart
            .draw_series(data.volumes.iter().filter_map(|&(ts, v)| {
                v.map(|v| Rectangle::new([(ts, 0.0), (ts + step, v)], bar))
            }))?
            .label("Volume")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], bar));
        Self::draw_line(&mut chart, &data.volume_ma, p.volume_ma.stroke_width(2), "24h MA")?;
        self.draw_legend(&mut chart)
    }

    fn draw_distribution_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        data: &PanelData,
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        let p = &self.config.palette;
        let fg = p.foreground;
        let x_range = match &data.histogram {
            Some(h) => padded_range(h.edges.iter().copied()),
            None => 0.0..1.0,
        };
        let max_count = data.histogram.as_ref().map_or(0, Histogram::max_count);
        let y_top = (max_count.max(1) as f64) * 1.1;

        let mut chart = ChartBuilder::on(area)
            .caption("Price Distribution", self.text_style(20))
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(80)
            .build_cartesian_2d(x_range, 0.0..y_top)?;
        chart
            .configure_mesh()
            .x_desc("Price (gp)")
            .y_desc("Frequency")
            .label_style(self.text_style(14))
            .axis_style(&fg)
            .bold_line_style(fg.mix(0.15))
            .light_line_style(fg.mix(0.05))
            .draw()?;

        if let Some(h) = &data.histogram {
            let bar = p.volume.mix(0.7).filled();
            chart.draw_series(h.bins().map(|(range, count)| {
                Rectangle::new([(range.start, 0.0), (range.end, count as f64)], bar)
            }))?;
        }

        let markers = [("Mean", data.mean, p.mean), ("Median", data.median, p.median)];
        for (name, value, color) in markers {
            let Some(value) = value else { continue };
            let style = color.stroke_width(2);
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(value, 0.0), (value, y_top)],
                    style,
                )))?
                .label(format!("{name}: {value:.0}"))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(p.background.mix(0.8))
            .border_style(&fg)
            .label_font(self.text_style(14))
            .draw()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use timeseries_ingestor::models::{item::ItemId, timestep::Timestep};

    use super::*;

    fn series(len: usize) -> Series {
        let samples: Vec<Sample> = (0..len)
            .map(|i| Sample {
                timestamp: 1_700_000_000 + i as i64 * 300,
                avg_high_price: (i % 7 != 3).then(|| 200.0 + (i % 13) as f64),
                avg_low_price: Some(195.0 + (i % 5) as f64),
                high_price_volume: Some(1_000 + i as u64),
                low_price_volume: (i % 4 != 0).then_some(500),
            })
            .collect();
        Series::from_samples(ItemId::from_u32(565).unwrap(), Timestep::FiveMinutes, samples)
    }

    #[test]
    fn renders_svg_with_title_and_caption() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("price_analysis.svg");
        let generated = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

        let written = PriceChart::for_item("Blood Rune")
            .render_at(&series(400), &path, generated)
            .unwrap();

        assert_eq!(written, path);
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Blood Rune Market Analysis"));
        assert!(svg.contains("Generated: 2024-03-01 12:30"));
    }

    #[test]
    fn single_sample_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.svg");
        PriceChart::default().render(&series(1), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn overflowing_volume_drops_the_bar() {
        let dir = tempfile::tempdir().unwrap();
        let mut samples: Vec<Sample> = series(3).samples().to_vec();
        samples[1].high_price_volume = Some(u64::MAX);
        samples[1].low_price_volume = Some(1);
        let s = Series::from_samples(ItemId::from_u32(565).unwrap(), Timestep::FiveMinutes, samples);

        let data = PanelData::from_series(&s).unwrap();
        assert_eq!(data.volumes[1].1, None);
        PriceChart::default().render(&s, dir.path().join("big.svg")).unwrap();
    }

    #[test]
    fn empty_series_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let empty = Series::from_samples(
            ItemId::from_u32(565).unwrap(),
            Timestep::FiveMinutes,
            Vec::new(),
        );
        let err = PriceChart::default()
            .render(&empty, dir.path().join("x.svg"))
            .unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries));
    }

    #[test]
    fn moving_average_windows_follow_timestep() {
        let data = PanelData::from_series(&series(300)).unwrap();
        let labels: Vec<&str> = data.moving_averages.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["1h MA", "4h MA", "24h MA"]);
        // 288 five-minute buckets make a day, but index 3 is null in every
        // window of 7, so the daily average never fills
        assert!(data.moving_averages[2].1.iter().all(|(_, v)| v.is_none()));
        assert_eq!(data.x_range, 1_700_000_000..1_700_000_000 + 300 * 300);
    }
}
