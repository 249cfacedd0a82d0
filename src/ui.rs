use crate::config::Config;
use crate::view::{Control, Dashboard, Notice, Tone, escape};

pub fn render_page(view: &Dashboard, notice: Option<&Notice>, config: &Config) -> String {
    fill(
        INDEX_HTML,
        &[
            ("SUMMARY", view.summary.inner_html()),
            ("RING", view.ring.inner_html()),
            ("CARDS", view.cards.inner_html()),
            ("SLEEP", view.sleep_chart.inner_html()),
            ("HEART", view.heart_rate.inner_html()),
            ("NOTICE", render_notice(notice)),
            ("SUBMIT_BUTTON", render_button(&view.submit, "btn-primary")),
            ("SYNC_BUTTON", render_button(&view.sync, "btn-secondary")),
            ("SAVE_BUTTON", render_button(&view.save_config, "btn-secondary")),
            ("API_BASE", escape(&config.api_base)),
            ("TOKEN", escape(&config.token)),
        ],
    )
}

fn render_notice(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let tone = match notice.tone {
        Tone::Success => "ok",
        Tone::Error => "error",
    };
    format!(
        "<div class=\"status\" data-type=\"{tone}\" role=\"alert\">{}</div>",
        escape(&notice.message)
    )
}

fn render_button(control: &Control, class: &str) -> String {
    let disabled = if control.enabled { "" } else { " disabled" };
    format!(
        "<button class=\"{class}\" id=\"{}\" type=\"submit\"{disabled}>{}</button>",
        control.id,
        escape(&control.label)
    )
}

/// Substitutes `{{KEY}}` placeholders in one pass, so inserted markup is never rescanned.
fn fill(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(name, _)| *name == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Health Dashboard</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f3f6fb;
      --bg-2: #dbeafe;
      --ink: #0b1220;
      --muted: #6b7280;
      --accent: #ff3b30;
      --card: rgba(255, 255, 255, 0.9);
      --shadow: 0 24px 60px rgba(11, 18, 32, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #eef2ff 60%, #f8fafc 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.1rem;
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 20px;
    }

    .panel {
      background: white;
      border-radius: 20px;
      padding: 18px;
      border: 1px solid rgba(11, 18, 32, 0.06);
    }

    #activityRing {
      position: relative;
      width: 120px;
      height: 120px;
    }

    .ring-label {
      position: absolute;
      left: 50%;
      top: 50%;
      transform: translate(-50%, -50%);
      text-align: center;
    }

    .ring-value {
      font-weight: 700;
      font-size: 16px;
    }

    .ring-caption {
      font-size: 11px;
      color: var(--muted);
    }

    #cards {
      display: grid;
      gap: 10px;
    }

    .small-card {
      border-left: 4px solid;
      padding: 6px 12px;
    }

    .small-card .title {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .small-card .value {
      font-size: 1.3rem;
      font-weight: 600;
    }

    #sleepChart {
      display: flex;
      height: 22px;
      border-radius: 999px;
      overflow: hidden;
      background: rgba(79, 70, 229, 0.06);
      color: var(--muted);
      font-size: 0.9rem;
    }

    .sleep-seg {
      height: 100%;
    }

    #hrChart {
      width: 200px;
      height: 80px;
    }

    #summary {
      color: var(--muted);
      min-height: 1.2em;
    }

    form.entry {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 12px;
    }

    label {
      display: grid;
      gap: 4px;
      font-size: 0.85rem;
      color: var(--muted);
    }

    input {
      border: 1px solid rgba(11, 18, 32, 0.15);
      border-radius: 12px;
      padding: 10px 12px;
      font: inherit;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
    }

    button[disabled] {
      opacity: 0.6;
      cursor: progress;
    }

    .btn-primary {
      background: var(--accent);
      color: white;
    }

    .btn-secondary {
      background: var(--ink);
      color: white;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @keyframes tween-stroke-dashoffset {
      from { stroke-dashoffset: var(--stroke-dashoffset-from); }
      to { stroke-dashoffset: var(--stroke-dashoffset-to); }
    }

    @keyframes tween-width {
      from { width: var(--width-from); }
      to { width: var(--width-to); }
    }

    @keyframes tween-opacity {
      from { opacity: var(--opacity-from); }
      to { opacity: var(--opacity-to); }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>Health Dashboard</h1>
      <div id="summary">{{SUMMARY}}</div>
      {{NOTICE}}
    </header>

    <section class="grid">
      <div class="panel">
        <h2>Activity</h2>
        <div id="activityRing">{{RING}}</div>
      </div>
      <div class="panel">
        <h2>Today</h2>
        <div id="cards">{{CARDS}}</div>
      </div>
      <div class="panel">
        <h2>Sleep stages</h2>
        <div id="sleepChart">{{SLEEP}}</div>
      </div>
      <div class="panel">
        <h2>Resting heart rate</h2>
        <svg id="hrChart" viewBox="0 0 200 80" role="img" aria-label="Resting heart rate">{{HEART}}</svg>
      </div>
    </section>

    <section class="panel">
      <h2>New entry</h2>
      <form id="dataForm" class="entry" method="post" action="/entries">
        <label>Calories burned <input name="calories_burned" inputmode="decimal" /></label>
        <label>Exercise minutes <input name="exercise_minutes" inputmode="numeric" /></label>
        <label>Stand hours <input name="stand_hours" inputmode="numeric" /></label>
        <label>Resting heart rate <input name="resting_heart_rate" inputmode="numeric" /></label>
        <label>Respiratory rate <input name="respiratory_rate" inputmode="decimal" /></label>
        <label>Sleep duration <input name="sleep_duration" inputmode="decimal" /></label>
        <label>Sleep quality <input name="sleep_quality" inputmode="numeric" /></label>
        <label>Sleep stages (JSON) <input name="sleep_stages" placeholder='{"rem": 90, "core": 240, "deep": 70}' /></label>
        {{SUBMIT_BUTTON}}
      </form>
    </section>

    <section class="grid">
      <form class="panel" method="post" action="/sync">
        <h2>Zepp</h2>
        {{SYNC_BUTTON}}
      </form>
      <form class="panel" method="post" action="/config">
        <h2>Connection</h2>
        <label>API base <input id="apiBaseInput" name="api_base" value="{{API_BASE}}" /></label>
        <label>Access token <input id="tokenInput" name="token" type="password" value="{{TOKEN}}" /></label>
        {{SAVE_BUTTON}}
      </form>
    </section>
  </main>
</body>
</html>
"#;
