use crate::client::{HealthClient, Reply};
use crate::config::ConfigStore;
use crate::heart;
use crate::models::HealthEntry;
use crate::ring;
use crate::sleep;
use crate::view::{Dashboard, Element, Mount, Node, SharedView, format_decimal};
use chrono::{DateTime, NaiveDateTime};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

pub const CALORIE_GOAL: f64 = 500.0;

pub const UNAVAILABLE_MESSAGE: &str = "No summary (start backend and create a user)";
pub const EMPTY_MESSAGE: &str = "No health entries yet.";
pub const PLACEHOLDER: &str = "—";

/// Percent of the calorie goal, capped at 100; zero when calories are absent.
pub fn goal_percent(entry: &HealthEntry) -> f64 {
    match entry.calories_burned {
        Some(calories) => (calories / CALORIE_GOAL * 100.0).min(100.0),
        None => 0.0,
    }
}

struct Card {
    title: &'static str,
    value: Option<f64>,
    unit: &'static str,
    color: &'static str,
}

pub fn card_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{} {unit}", format_decimal(value)),
        None => PLACEHOLDER.to_string(),
    }
}

pub fn render_cards(target: &mut Mount, latest: &HealthEntry) {
    let cards = [
        Card {
            title: "Move",
            value: latest.calories_burned,
            unit: "cal",
            color: "#ff3b30",
        },
        Card {
            title: "Exercise",
            value: latest.exercise_minutes,
            unit: "min",
            color: "#34c759",
        },
        Card {
            title: "Stand",
            value: latest.stand_hours,
            unit: "hr",
            color: "#007aff",
        },
    ];

    let nodes = cards
        .into_iter()
        .map(|card| {
            Node::from(
                Element::new("div")
                    .class("small-card")
                    .style("border-color", card.color)
                    .child(Element::new("div").class("title").text(card.title))
                    .child(
                        Element::new("div")
                            .class("value")
                            .text(card_value(card.value, card.unit)),
                    ),
            )
        })
        .collect();
    target.replace(nodes);
}

pub fn format_recorded(raw: &str) -> String {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return stamp.format("%Y-%m-%d %H:%M").to_string();
    }
    match raw.parse::<NaiveDateTime>() {
        Ok(stamp) => stamp.format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn render_entry(view: &mut Dashboard, latest: &HealthEntry) {
    match latest.recorded_date.as_deref() {
        Some(raw) => view
            .summary
            .set_text(format!("Latest entry recorded {}", format_recorded(raw))),
        None => view.summary.clear(),
    }
    ring::render(&mut view.ring, goal_percent(latest));
    render_cards(&mut view.cards, latest);
    sleep::render(&mut view.sleep_chart, latest.sleep_stages.as_ref());
    heart::render(&mut view.heart_rate, latest);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Rendered,
    Empty,
    Unavailable(u16),
    Failed(String),
    /// A newer refresh was issued while this one was in flight.
    Superseded,
}

#[derive(Clone, Debug)]
pub struct SummaryOrchestrator {
    client: HealthClient,
    config: ConfigStore,
    view: SharedView,
    issued: Arc<AtomicU64>,
}

impl SummaryOrchestrator {
    pub fn new(client: HealthClient, config: ConfigStore, view: SharedView) -> Self {
        Self {
            client,
            config,
            view,
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let config = self.config.current().await;
        let reply = self.client.summary(&config).await;

        let mut view = self.view.lock().await;
        if self.issued.load(Ordering::SeqCst) != ticket {
            debug!(ticket, "discarding stale summary response");
            return RefreshOutcome::Superseded;
        }

        match reply {
            Ok(Reply::Rejected { status, .. }) => {
                warn!(%status, "summary unavailable");
                view.summary.set_text(UNAVAILABLE_MESSAGE);
                RefreshOutcome::Unavailable(status.as_u16())
            }
            Ok(Reply::Accepted(summary)) => match summary.latest {
                None => {
                    view.summary.set_text(EMPTY_MESSAGE);
                    RefreshOutcome::Empty
                }
                Some(latest) => {
                    render_entry(&mut view, &latest);
                    info!(entry = ?latest.id, "rendered latest health entry");
                    RefreshOutcome::Rendered
                }
            },
            Err(err) => {
                error!("failed to fetch summary: {err}");
                let reason = err.to_string();
                view.summary
                    .set_text(format!("Error fetching summary: {reason}"));
                RefreshOutcome::Failed(reason)
            }
        }
    }
}
