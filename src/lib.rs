#![warn(clippy::all, rust_2018_idioms)]

mod app;
mod chart;
mod dashboard;
mod inspect;
mod panel;
mod picker;
mod plot;
pub use app::PowerApp;

/// Rows are laid out on the x axis one unit apart, in extraction order.
fn index_to_chart(index: usize) -> f64 {
    index as f64
}

fn index_from_chart(axis: f64) -> Option<usize> {
    let index = axis.round();
    ((axis - index).abs() < 1e-6 && index >= 0.0).then_some(index as usize)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn chart_positions() {
        for index in [0, 1, 59, 1440] {
            assert_eq!(index_from_chart(index_to_chart(index)), Some(index));
        }
        assert_eq!(index_from_chart(2.5), None);
        assert_eq!(index_from_chart(-1.0), None);
        assert_eq!(index_from_chart(f64::NAN), None);
    }
}
