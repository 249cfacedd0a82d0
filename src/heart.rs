use crate::models::HealthEntry;
use crate::view::{Element, Mount, Node, format_decimal};

pub const MAX_BPM: f64 = 200.0;
pub const MIN_BAR_HEIGHT: f64 = 2.0;
pub const CHART_HEIGHT: f64 = 60.0;
pub const BAR_X: f64 = 20.0;
pub const BAR_WIDTH: f64 = 20.0;
const TOP_PADDING: f64 = 10.0;
const BAR_COLOR: &str = "#ff3b30";

/// Bar height for a BPM reading, never below [`MIN_BAR_HEIGHT`] nor above the chart.
pub fn bar_height(bpm: Option<f64>) -> f64 {
    let ratio = match bpm {
        Some(value) if value.is_finite() && value > 0.0 => (value / MAX_BPM).min(1.0),
        _ => 0.0,
    };
    (ratio * CHART_HEIGHT).max(MIN_BAR_HEIGHT)
}

pub fn label(bpm: Option<f64>) -> String {
    match bpm {
        Some(value) => format!("{} BPM", format_decimal(value)),
        None => "— BPM".to_string(),
    }
}

pub fn render(target: &mut Mount, latest: &HealthEntry) {
    let bpm = latest.resting_heart_rate;
    let height = bar_height(bpm);

    let bar = Element::new("rect")
        .class("hr-bar")
        .attr("x", format_decimal(BAR_X))
        .attr("y", format_decimal(CHART_HEIGHT - height + TOP_PADDING))
        .attr("width", format_decimal(BAR_WIDTH))
        .attr("height", format_decimal(height))
        .attr("fill", BAR_COLOR);

    let text = Element::new("text")
        .class("hr-label")
        .attr("x", format_decimal(BAR_X + BAR_WIDTH + 8.0))
        .attr("y", format_decimal(CHART_HEIGHT / 2.0 + 12.0))
        .attr("fill", "#111")
        .attr("font-size", "12")
        .text(label(bpm));

    target.replace(vec![Node::from(bar), Node::from(text)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(bpm: Option<f64>) -> HealthEntry {
        HealthEntry {
            resting_heart_rate: bpm,
            ..HealthEntry::default()
        }
    }

    fn rendered_height(mount: &Mount) -> f64 {
        mount.find_by_class("hr-bar")[0]
            .get_attr("height")
            .unwrap()
            .parse()
            .unwrap()
    }

    #[test]
    fn height_never_drops_below_minimum() {
        assert_eq!(bar_height(None), MIN_BAR_HEIGHT);
        assert_eq!(bar_height(Some(0.0)), MIN_BAR_HEIGHT);
        assert_eq!(bar_height(Some(-40.0)), MIN_BAR_HEIGHT);
        assert_eq!(bar_height(Some(1.0)), MIN_BAR_HEIGHT);
    }

    #[test]
    fn height_scales_against_ceiling() {
        assert_eq!(bar_height(Some(60.0)), 18.0);
        assert_eq!(bar_height(Some(200.0)), CHART_HEIGHT);
        assert_eq!(bar_height(Some(320.0)), CHART_HEIGHT);
    }

    #[test]
    fn renders_bar_and_label() {
        let mut mount = Mount::new("hrChart");
        render(&mut mount, &entry(Some(60.0)));

        assert_eq!(rendered_height(&mount), 18.0);
        let bar = mount.find_by_class("hr-bar")[0];
        assert_eq!(bar.get_attr("y"), Some("52"));
        assert_eq!(mount.find_by_class("hr-label")[0].text_content(), "60 BPM");
    }

    #[test]
    fn absent_value_renders_sliver_and_placeholder() {
        let mut mount = Mount::new("hrChart");
        render(&mut mount, &entry(None));

        assert_eq!(rendered_height(&mount), MIN_BAR_HEIGHT);
        assert_eq!(mount.find_by_class("hr-label")[0].text_content(), "— BPM");
    }

    #[test]
    fn rerender_replaces_previous_bar() {
        let mut mount = Mount::new("hrChart");
        render(&mut mount, &entry(Some(50.0)));
        render(&mut mount, &entry(Some(70.0)));

        assert_eq!(mount.children().len(), 2);
        assert_eq!(mount.find_by_class("hr-bar").len(), 1);
        assert_eq!(rendered_height(&mount), 21.0);
    }
}
