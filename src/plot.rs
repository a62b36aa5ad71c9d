use std::{ops::RangeInclusive, sync::Arc};

use egui::{Color32, Ui};
use egui_plot::{
    AxisHints, Bar, BarChart, CoordinatesFormatter, GridInput, GridMark, Legend, Line, Plot,
    PlotPoint,
};
use series::ExtractionResult;

use crate::{chart::ChartKind, index_from_chart, index_to_chart};

pub const TOTAL_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

const PALETTE: [Color32; 15] = [
    Color32::from_rgb(255, 99, 132),  // red
    Color32::from_rgb(255, 206, 86),  // yellow
    Color32::from_rgb(54, 162, 235),  // blue
    Color32::from_rgb(75, 192, 192),  // teal
    Color32::from_rgb(153, 102, 255), // purple
    Color32::from_rgb(255, 159, 64),  // orange
    Color32::from_rgb(201, 203, 207), // grey
    Color32::from_rgb(99, 255, 132),  // light green
    Color32::from_rgb(102, 102, 255), // light blue
    Color32::from_rgb(255, 102, 102), // light red
    Color32::from_rgb(255, 102, 204), // pink
    Color32::from_rgb(102, 255, 178), // mint
    Color32::from_rgb(178, 255, 102), // lime
    Color32::from_rgb(255, 255, 102), // soft yellow
    Color32::from_rgb(102, 178, 255), // sky blue
];

/// Colour of the `index`-th series, wrapping around the palette.
pub fn palette_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// Fade `base` a little more for every series sharing it.
pub fn shade(base: Color32, index: usize, total: usize) -> Color32 {
    let alpha = 1.0 - (index as f32 / total.max(1) as f32) * 0.4;
    let alpha = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(base.r(), base.g(), base.b(), alpha)
}

/// Distance between two labelled rows so that about a dozen labels are visible.
fn label_step(visible_rows: f64) -> usize {
    const STEPS: [usize; 10] = [1, 2, 5, 10, 15, 30, 60, 120, 360, 720];
    STEPS
        .into_iter()
        .find(|step| visible_rows / *step as f64 <= 12.0)
        .unwrap_or_else(|| (visible_rows / 12.0).ceil() as usize)
        .max(1)
}

fn category_grid(len: usize) -> impl Fn(GridInput) -> Vec<GridMark> {
    move |input: GridInput| {
        if len == 0 {
            return Vec::new();
        }
        let (start, end) = input.bounds;
        let step = label_step(end - start);
        let first = start.max(0.0).ceil() as usize;
        let last = (end.min((len - 1) as f64).floor().max(0.0)) as usize;

        (first..=last)
            .filter(|index| index % step == 0)
            .map(|index| GridMark {
                value: index_to_chart(index),
                step_size: step as f64,
            })
            .collect()
    }
}

/// A plot whose x axis shows one category per retained row.
pub fn create_plot_categorical(
    name: &str,
    labels: Arc<[String]>,
    formatter: impl Fn(f64) -> String + 'static,
) -> Plot {
    let label_of = {
        let labels = labels.clone();
        move |x: f64| {
            index_from_chart(x)
                .and_then(|index| labels.get(index))
                .cloned()
                .unwrap_or_default()
        }
    };
    let axis_label = label_of.clone();
    let axis_formatter = move |mark: GridMark, _max_digits: usize, _range: &RangeInclusive<f64>| axis_label(mark.value);

    let format_plot_point = Arc::new(move |point: &PlotPoint| {
        format!("{}\n{}", label_of(point.x), formatter(point.y))
    });

    let fmt = format_plot_point.clone();

    Plot::new(name)
        .legend(Legend::default())
        .coordinates_formatter(
            egui_plot::Corner::LeftBottom,
            CoordinatesFormatter::new(move |point, _| fmt(point)),
        )
        .custom_x_axes(vec![AxisHints::new_x()
            .label("Date")
            .formatter(axis_formatter)])
        .x_grid_spacer(category_grid(labels.len()))
        .label_formatter(move |_, point| format_plot_point(point))
}

/// Draw the series of an extraction the way `kind` wants them.
pub fn show(kind: ChartKind, result: &ExtractionResult, ui: &mut Ui) {
    let labels: Arc<[String]> = result.labels.clone().into();
    let unit = kind.unit();
    let plot = create_plot_categorical(kind.title(), labels, move |value| format!("{value:.2} {unit}"))
        .custom_y_axes(vec![AxisHints::new_y().label(unit)]);

    plot.show(ui, |plot_ui| {
        let mut stack: Vec<BarChart> = Vec::new();
        let mut lines = Vec::new();

        for (index, series) in result.series.iter().enumerate() {
            let color = kind.color(index, series);
            if kind.draws_as_bar(series) {
                let bars = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(row, value)| Bar::new(index_to_chart(row), *value))
                    .collect();
                let below: Vec<&BarChart> = stack.iter().collect();
                let chart = BarChart::new(bars)
                    .name(&series.name)
                    .color(color)
                    .width(0.8)
                    .stack_on(&below);
                stack.push(chart);
            } else {
                let points: Vec<_> = series
                    .values
                    .iter()
                    .enumerate()
                    .map(|(row, value)| [index_to_chart(row), *value])
                    .collect();
                lines.push(Line::new(points).color(color).name(&series.name).width(2.0));
            }
        }

        // Lines go last so the totals stay visible over the bars.
        for chart in stack {
            plot_ui.bar_chart(chart);
        }
        for line in lines {
            plot_ui.line(line);
        }
    });
}
