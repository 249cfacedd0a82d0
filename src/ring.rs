use crate::view::{Easing, Element, Mount, Node, Tween, format_decimal};
use std::f64::consts::PI;
use std::time::Duration;

pub const SIZE: f64 = 120.0;
pub const STROKE: f64 = 12.0;
pub const RADIUS: f64 = (SIZE - STROKE) / 2.0;
pub const FILL_DELAY: Duration = Duration::from_millis(50);
pub const FILL_DURATION: Duration = Duration::from_millis(900);

const TRACK_COLOR: &str = "rgba(14,165,233,0.08)";
const GRADIENT_STOPS: [(&str, &str); 2] = [("0%", "#ff9a9e"), ("100%", "#ff3b30")];

pub fn circumference() -> f64 {
    2.0 * PI * RADIUS
}

/// `percent` clamped to `[0, 100]`; NaN counts as zero.
pub fn clamp_percent(percent: f64) -> f64 {
    if percent.is_nan() || percent <= 0.0 {
        return 0.0;
    }
    percent.min(100.0)
}

pub fn arc_length(percent: f64) -> f64 {
    clamp_percent(percent) / 100.0 * circumference()
}

pub fn dash_offset(percent: f64) -> f64 {
    circumference() * (1.0 - clamp_percent(percent) / 100.0)
}

pub fn render(target: &mut Mount, percent: f64) {
    let circumference = circumference();
    let center = format_decimal(SIZE / 2.0);
    let gradient_id = format!("{}-gradient", target.id());

    let mut gradient = Element::new("linearGradient")
        .attr("id", &gradient_id)
        .attr("x1", "0%")
        .attr("y1", "0%")
        .attr("x2", "100%")
        .attr("y2", "0%");
    for (offset, color) in GRADIENT_STOPS {
        gradient = gradient.child(
            Element::new("stop")
                .attr("offset", offset)
                .attr("stop-color", color),
        );
    }

    let track = circle(&center)
        .class("ring-track")
        .attr("stroke", TRACK_COLOR);

    let arc = circle(&center)
        .class("ring-arc")
        .attr("stroke", format!("url(#{gradient_id})"))
        .attr("stroke-linecap", "round")
        .attr(
            "stroke-dasharray",
            format!("{} {}", format_decimal(circumference), format_decimal(circumference)),
        )
        .attr("stroke-dashoffset", format_decimal(circumference))
        .attr("transform", format!("rotate(-90 {center} {center})"))
        .tween(
            Tween::new("stroke-dashoffset", circumference, dash_offset(percent))
                .delay(FILL_DELAY)
                .duration(FILL_DURATION)
                .easing(Easing::SnapOut),
        );

    let svg = Element::new("svg")
        .attr("width", format_decimal(SIZE))
        .attr("height", format_decimal(SIZE))
        .attr("viewBox", format!("0 0 {0} {0}", format_decimal(SIZE)))
        .child(Element::new("defs").child(gradient))
        .child(track)
        .child(arc);

    let label = Element::new("div")
        .class("ring-label")
        .child(
            Element::new("div")
                .class("ring-value")
                .text(format!("{}%", clamp_percent(percent).round())),
        )
        .child(Element::new("div").class("ring-caption").text("of goal"));

    target.replace(vec![Node::from(svg), Node::from(label)]);
}

fn circle(center: &str) -> Element {
    Element::new("circle")
        .attr("cx", center)
        .attr("cy", center)
        .attr("r", format_decimal(RADIUS))
        .attr("stroke-width", format_decimal(STROKE))
        .attr("fill", "none")
}
