use crate::models::{RawSleepStages, SleepStages};
use crate::view::{Easing, Element, Mount, Node, Tween};
use std::time::Duration;
use tracing::warn;

pub const GROW_DELAY: Duration = Duration::from_millis(30);
pub const GROW_DURATION: Duration = Duration::from_millis(900);

pub const NO_DATA_MESSAGE: &str = "No sleep stages";
pub const INVALID_DATA_MESSAGE: &str = "Invalid sleep data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Rem,
    Core,
    Deep,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Rem, Stage::Core, Stage::Deep];

    pub fn color(&self) -> &'static str {
        match self {
            Stage::Rem => "#4f46e5",
            Stage::Core => "#60a5fa",
            Stage::Deep => "#06b6d4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Rem => "REM",
            Stage::Core => "Core",
            Stage::Deep => "Deep",
        }
    }
}

/// Share of the total for each stage, in percent. `None` when the total is zero.
pub fn stage_shares(stages: &SleepStages) -> Option<[f64; 3]> {
    let total = stages.total();
    if total <= 0.0 {
        return None;
    }
    Some(stages.durations().map(|duration| duration / total * 100.0))
}

pub fn render(target: &mut Mount, stages: Option<&RawSleepStages>) {
    let Some(raw) = stages else {
        target.set_text(NO_DATA_MESSAGE);
        return;
    };

    match raw.parse() {
        Ok(stages) => render_stages(target, &stages),
        Err(err) => {
            warn!("{err}");
            target.set_text(INVALID_DATA_MESSAGE);
        }
    }
}

pub fn render_stages(target: &mut Mount, stages: &SleepStages) {
    let Some(shares) = stage_shares(stages) else {
        target.set_text(NO_DATA_MESSAGE);
        return;
    };

    let segments = Stage::ALL
        .iter()
        .zip(shares)
        .map(|(stage, share)| Node::from(segment(*stage, share)))
        .collect();
    target.replace(segments);
}

fn segment(stage: Stage, share: f64) -> Element {
    Element::new("div")
        .class("sleep-seg")
        .attr("data-stage", stage.label())
        .attr("title", format!("{} {}%", stage.label(), share.round()))
        .style("width", "0%")
        .style("opacity", "0")
        .style("background", stage.color())
        .tween(grow("width", 0.0, share).unit("%"))
        .tween(grow("opacity", 0.0, 1.0))
}

fn grow(property: &'static str, from: f64, to: f64) -> Tween {
    Tween::new(property, from, to)
        .delay(GROW_DELAY)
        .duration(GROW_DURATION)
        .easing(Easing::SnapOut)
}

pub fn segment_width(segment: &Element) -> Option<f64> {
    segment.tween_for("width").map(|tween| tween.to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn segments(mount: &Mount) -> Vec<&Element> {
        mount.find_by_class("sleep-seg")
    }

    #[test]
    fn zero_total_renders_no_data_without_segments() {
        let mut mount = Mount::new("sleepChart");
        render_stages(&mut mount, &SleepStages::new(0.0, 0.0, 0.0));
        assert_eq!(mount.text_content(), NO_DATA_MESSAGE);
        assert!(segments(&mount).is_empty());

        render(&mut mount, Some(&RawSleepStages(json!({}))));
        assert_eq!(mount.text_content(), NO_DATA_MESSAGE);
    }

    #[test]
    fn absent_stages_render_no_data() {
        let mut mount = Mount::new("sleepChart");
        render(&mut mount, None);
        assert_eq!(mount.text_content(), NO_DATA_MESSAGE);
    }

    #[test]
    fn unparseable_stages_render_invalid_data() {
        let mut mount = Mount::new("sleepChart");
        render(&mut mount, Some(&RawSleepStages(json!("{rem: 3"))));
        assert_eq!(mount.text_content(), INVALID_DATA_MESSAGE);
        assert!(segments(&mount).is_empty());
    }

    #[test]
    fn segments_are_proportional_and_sum_to_hundred() {
        let mut mount = Mount::new("sleepChart");
        let raw = RawSleepStages(json!("{\"rem\": 90, \"core\": 240, \"deep\": 70}"));
        render(&mut mount, Some(&raw));

        let widths: Vec<f64> = segments(&mount)
            .into_iter()
            .map(|segment| segment_width(segment).unwrap())
            .collect();
        assert_eq!(widths.len(), 3);
        assert!((widths[0] - 22.5).abs() < 1e-9);
        assert!((widths[1] - 60.0).abs() < 1e-9);
        assert!((widths[2] - 17.5).abs() < 1e-9);
        assert!((widths.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn segments_grow_from_zero_after_delay() {
        let mut mount = Mount::new("sleepChart");
        render_stages(&mut mount, &SleepStages::new(1.0, 1.0, 2.0));

        for (segment, stage) in segments(&mount).into_iter().zip(Stage::ALL) {
            assert_eq!(segment.get_style("width"), Some("0%"));
            assert_eq!(segment.get_style("opacity"), Some("0"));
            assert_eq!(segment.get_style("background"), Some(stage.color()));

            let width = segment.tween_for("width").unwrap();
            assert_eq!(width.value_at(GROW_DELAY), 0.0);
            let opacity = segment.tween_for("opacity").unwrap();
            assert_eq!(opacity.value_at(opacity.end()), 1.0);
        }
    }

    #[test]
    fn rerender_does_not_accumulate_segments() {
        let mut mount = Mount::new("sleepChart");
        render_stages(&mut mount, &SleepStages::new(1.0, 2.0, 3.0));
        render_stages(&mut mount, &SleepStages::new(3.0, 2.0, 1.0));
        assert_eq!(segments(&mount).len(), 3);
        assert_eq!(mount.children().len(), 3);
    }

    #[test]
    fn missing_stage_gets_zero_width() {
        let stages = SleepStages {
            rem: Some(30.0),
            core: None,
            deep: Some(90.0),
        };
        assert_eq!(stage_shares(&stages), Some([25.0, 0.0, 75.0]));
    }
}
