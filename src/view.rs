use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::warn;

pub type SharedView = Arc<Mutex<Dashboard>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(element) => element.write_html(out),
            Node::Text(text) => out.push_str(&escape(text)),
        }
    }

    fn write_text(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.write_text(out);
                }
            }
            Node::Text(text) => out.push_str(text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: BTreeMap<String, String>,
    pub style: Vec<(String, String)>,
    pub tweens: Vec<Tween>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: BTreeMap::new(),
            style: Vec::new(),
            tweens: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: impl ToString) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn style(mut self, property: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.style.iter_mut().find(|(name, _)| name == property) {
            Some(slot) => slot.1 = value,
            None => self.style.push((property.to_string(), value)),
        }
        self
    }

    pub fn tween(mut self, tween: Tween) -> Self {
        self.tweens.push(tween);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn get_style(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    pub fn tween_for(&self, property: &str) -> Option<&Tween> {
        self.tweens.iter().find(|tween| tween.property == property)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_text(&mut out);
        }
        out
    }

    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Element>) {
        if predicate(self) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(element) = child {
                element.find_all(predicate, found);
            }
        }
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            let _ = write!(out, " {name}=\"{}\"", escape(value));
        }

        let style = self.style_declarations();
        if !style.is_empty() {
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');

        for child in &self.children {
            child.write_html(out);
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    fn style_declarations(&self) -> String {
        let mut declarations: Vec<String> = self
            .style
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();

        for tween in &self.tweens {
            declarations.push(format!("--{}-from: {}", tween.property, tween.css_value(tween.from)));
            declarations.push(format!("--{}-to: {}", tween.property, tween.css_value(tween.to)));
        }
        if !self.tweens.is_empty() {
            let animations: Vec<String> = self.tweens.iter().map(Tween::css_animation).collect();
            declarations.push(format!("animation: {}", animations.join(", ")));
        }

        declarations.join("; ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    /// `cubic-bezier(.2,.9,.2,1)`: fast start, long settle.
    SnapOut,
}

impl Easing {
    pub fn css(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::SnapOut => "cubic-bezier(.2,.9,.2,1)",
        }
    }

    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::SnapOut => cubic_bezier(0.2, 0.9, 0.2, 1.0, t),
        }
    }
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, x: f64) -> f64 {
    let sample = |a1: f64, a2: f64, s: f64| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
    };

    // x(s) is monotonic for control points inside [0, 1], so bisection converges.
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    let mut s = x;
    for _ in 0..48 {
        let current = sample(x1, x2, s);
        if (current - x).abs() < 1e-9 {
            break;
        }
        if current < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    sample(y1, y2, s)
}

/// The element is inserted at `from`; after `delay` the value eases to `to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub property: &'static str,
    pub from: f64,
    pub to: f64,
    pub unit: &'static str,
    pub delay: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub fn new(property: &'static str, from: f64, to: f64) -> Self {
        Self {
            property,
            from,
            to,
            unit: "",
            delay: Duration::ZERO,
            duration: Duration::from_millis(300),
            easing: Easing::Linear,
        }
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn value_at(&self, elapsed: Duration) -> f64 {
        if elapsed <= self.delay {
            return self.from;
        }
        let running = elapsed - self.delay;
        if self.duration.is_zero() || running >= self.duration {
            return self.to;
        }
        let t = running.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn end(&self) -> Duration {
        self.delay + self.duration
    }

    fn css_value(&self, value: f64) -> String {
        format!("{}{}", format_decimal(value), self.unit)
    }

    fn css_animation(&self) -> String {
        format!(
            "tween-{} {}ms {} {}ms both",
            self.property,
            self.duration.as_millis(),
            self.easing.css(),
            self.delay.as_millis()
        )
    }
}

pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mount {
    id: &'static str,
    children: Vec<Node>,
}

impl Mount {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn replace(&mut self, children: Vec<Node>) {
        self.children = children;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_text(&mut out);
        }
        out
    }

    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.write_html(&mut out);
        }
        out
    }

    pub fn find_all(&self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&Element> {
        let mut found = Vec::new();
        for child in &self.children {
            if let Node::Element(element) = child {
                element.find_all(predicate, &mut found);
            }
        }
        found
    }

    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        self.find_all(&|element| element.has_class(class))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub id: &'static str,
    pub label: String,
    pub enabled: bool,
}

impl Control {
    pub fn new(id: &'static str, label: &str) -> Self {
        Self {
            id,
            label: label.to_string(),
            enabled: true,
        }
    }

    /// Disables the control and returns its resting label. `None` when it is already inert.
    pub fn begin(&mut self, busy_label: Option<&str>) -> Option<String> {
        if !self.enabled {
            return None;
        }
        self.enabled = false;
        let resting = self.label.clone();
        if let Some(busy) = busy_label {
            self.label = busy.to_string();
        }
        Some(resting)
    }

    pub fn finish(&mut self, resting_label: String) {
        self.label = resting_label;
        self.enabled = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSlot {
    Submit,
    Sync,
    SaveConfig,
}

/// Holds a control disabled. Dropping the lease re-enables it, so a cancelled
/// workflow never leaves its trigger inert.
#[derive(Debug)]
#[must_use = "dropping the lease immediately re-enables the control"]
pub struct ControlLease {
    view: SharedView,
    slot: ControlSlot,
    resting_label: Option<String>,
}

impl ControlLease {
    pub async fn acquire(
        view: &SharedView,
        slot: ControlSlot,
        busy_label: Option<&str>,
    ) -> Option<Self> {
        let resting_label = view.lock().await.control_mut(slot).begin(busy_label)?;
        Some(Self {
            view: view.clone(),
            slot,
            resting_label: Some(resting_label),
        })
    }

    /// Re-enables the control on a dashboard the caller already holds locked.
    pub fn release(mut self, dashboard: &mut Dashboard) {
        if let Some(label) = self.resting_label.take() {
            dashboard.control_mut(self.slot).finish(label);
        }
    }
}

impl Drop for ControlLease {
    fn drop(&mut self) {
        let Some(label) = self.resting_label.take() else {
            return;
        };
        if let Ok(mut dashboard) = self.view.try_lock() {
            dashboard.control_mut(self.slot).finish(label);
            return;
        }

        let view = self.view.clone();
        let slot = self.slot;
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    view.lock().await.control_mut(slot).finish(label);
                });
            }
            Err(_) => warn!(?slot, "control lease dropped outside the runtime"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub tone: Tone,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            tone: Tone::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub summary: Mount,
    pub ring: Mount,
    pub cards: Mount,
    pub sleep_chart: Mount,
    pub heart_rate: Mount,
    pub submit: Control,
    pub sync: Control,
    pub save_config: Control,
    pub notice: Option<Notice>,
    /// Set when a workflow has just re-rendered the summary, so the next page load can skip its own fetch.
    pub refreshed_by_action: bool,
}

pub const SUBMIT_LABEL: &str = "Add entry";
pub const SYNC_LABEL: &str = "Sync from Zepp";
pub const SAVE_CONFIG_LABEL: &str = "Save";

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            summary: Mount::new("summary"),
            ring: Mount::new("activityRing"),
            cards: Mount::new("cards"),
            sleep_chart: Mount::new("sleepChart"),
            heart_rate: Mount::new("hrChart"),
            submit: Control::new("submitBtn", SUBMIT_LABEL),
            sync: Control::new("syncBtn", SYNC_LABEL),
            save_config: Control::new("saveConfigBtn", SAVE_CONFIG_LABEL),
            notice: None,
            refreshed_by_action: false,
        }
    }
}

impl Dashboard {
    pub fn shared() -> SharedView {
        Arc::new(Mutex::new(Self::default()))
    }

    pub fn control_mut(&mut self, slot: ControlSlot) -> &mut Control {
        match slot {
            ControlSlot::Submit => &mut self.submit,
            ControlSlot::Sync => &mut self.sync,
            ControlSlot::SaveConfig => &mut self.save_config,
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let mounts = [
            &self.summary,
            &self.ring,
            &self.cards,
            &self.sleep_chart,
            &self.heart_rate,
        ]
        .into_iter()
        .map(|mount| (mount.id.to_string(), mount.inner_html()))
        .collect();

        ViewSnapshot {
            mounts,
            controls: vec![self.submit.clone(), self.sync.clone(), self.save_config.clone()],
            notice: self.notice.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub mounts: BTreeMap<String, String>,
    pub controls: Vec<Control>,
    pub notice: Option<Notice>,
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
