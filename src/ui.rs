use crate::models::{
    DashboardView, LogRowView, Notice, NoticeKind, PanelView, Population, RowOrigin, TileView,
};

pub fn render_dashboard(view: &DashboardView, notice: Option<&Notice>) -> String {
    let panels: Vec<String> = view.panels.iter().map(render_panel).collect();
    INDEX_HTML
        .replace("{{NOTICE}}", &render_notice(notice))
        .replace(
            "{{PANELS}}",
            &panels.join("\n      <div class=\"pair-divider\" aria-hidden=\"true\"></div>\n"),
        )
}

fn render_notice(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let kind = match notice.kind {
        NoticeKind::Ok => "ok",
        NoticeKind::Warning => "warning",
        NoticeKind::Error => "error",
    };
    format!(
        r#"<p class="status" role="status" data-type="{kind}">{}</p>"#,
        escape_html(&notice.message)
    )
}

fn render_panel(panel: &PanelView) -> String {
    let vaccine = panel.vaccine.as_str();
    let mut html = format!(
        r#"<section class="pair">
        <div class="pair-title">{title}</div>
        <div class="pair-grid">
          {staff_tile}
          {resident_tile}
        </div>
        <form class="pair-footer" method="post" action="/panel/{vaccine}/update">
          <button type="submit" class="sr-only" tabindex="-1">Update</button>
          <div class="pair-actions">
            {staff_counter}
            {resident_counter}
          </div>
          <input class="note-input" name="note" placeholder="Add note…" value="{note}" />
          <div class="pair-submit-row">
            <button type="submit" class="ghost-btn" formaction="/stage/{vaccine}">Add draft row</button>
            <button type="submit" class="submit-btn" formaction="/submit/{vaccine}">Submit</button>
          </div>
        </form>"#,
        title = escape_html(&panel.title),
        staff_tile = render_tile("STAFF", &panel.staff),
        resident_tile = render_tile("RESIDENT", &panel.resident),
        staff_counter = render_counter(vaccine, Population::Staff, "Staff", panel.staff.counter),
        resident_counter = render_counter(
            vaccine,
            Population::Resident,
            "Resident",
            panel.resident.counter
        ),
        note = escape_html(&panel.note),
    );

    if !panel.log.is_empty() {
        let rows: Vec<String> = panel
            .log
            .iter()
            .map(|row| render_log_row(vaccine, row))
            .collect();
        html.push_str(&format!(
            r#"
        <div class="table-card">
          <table class="submit-table">
            <thead>
              <tr><th>Date submitted</th><th>Staff</th><th>Residents</th><th>Notes</th><th>Actions</th></tr>
            </thead>
            <tbody>
              {}
            </tbody>
          </table>
        </div>"#,
            rows.join("\n              ")
        ));
    }

    html.push_str("\n      </section>");
    html
}

fn render_tile(label: &str, tile: &TileView) -> String {
    format!(
        r#"<div class="stat-card"><span class="stat-label">{label}</span><span class="stat-value">{}</span></div>"#,
        tile.label
    )
}

fn render_counter(vaccine: &str, population: Population, label: &str, value: u32) -> String {
    let field = population.as_str();
    format!(
        r#"<div class="mini-counter">
              <span class="mini-label">{label}</span>
              <button type="submit" class="mini-btn" formaction="/panel/{vaccine}/{field}/dec" aria-label="Subtract 1 from {label}">–</button>
              <input class="mini-input" name="{field}" inputmode="numeric" value="{value}" aria-label="{label} count" />
              <button type="submit" class="mini-btn" formaction="/panel/{vaccine}/{field}/inc" aria-label="Add 1 to {label}">+</button>
            </div>"#
    )
}

fn render_log_row(vaccine: &str, row: &LogRowView) -> String {
    let note = row
        .note
        .as_deref()
        .filter(|note| !note.is_empty())
        .map(escape_html)
        .unwrap_or_else(|| "—".to_string());
    let draft = match row.origin {
        RowOrigin::Local => r#" <span class="draft-tag">unsaved</span>"#,
        RowOrigin::Persisted => "",
    };
    format!(
        r#"<tr><td>{date}{draft}</td><td class="num">{staff}</td><td class="num">{residents}</td><td class="notes">{note}</td><td class="actions"><form method="post" action="/delete/{vaccine}/{id}" onsubmit="return confirm('Delete this submission?')"><button type="submit" class="icon-btn" aria-label="Delete row" title="Delete">🗑</button></form></td></tr>"#,
        date = row.date_submitted.format("%b %d, %Y"),
        staff = row.staff_count,
        residents = row.resident_count,
        id = escape_html(row.id.as_str()),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Vaccination Dashboard</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2933;
      --muted: #6b7280;
      --accent: #2563eb;
      --danger: #ef4444;
      --card: #ffffff;
      --shadow: 0 18px 40px rgba(31, 41, 51, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .dashboard {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.8rem, 3.5vw, 2.4rem);
    }

    .card-grid {
      display: grid;
      grid-template-columns: 1fr auto 1fr;
      gap: 24px;
    }

    .pair {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
      display: grid;
      gap: 18px;
      align-content: start;
    }

    .pair-title {
      font-weight: 700;
      font-size: 1.15rem;
    }

    .pair-divider {
      width: 1px;
      background: rgba(31, 41, 51, 0.12);
    }

    .pair-grid {
      display: grid;
      grid-template-columns: 1fr 1fr;
      gap: 14px;
    }

    .stat-card {
      border: 1px solid rgba(31, 41, 51, 0.08);
      border-radius: 16px;
      padding: 16px;
      display: grid;
      gap: 6px;
    }

    .stat-label {
      font-size: 0.8rem;
      letter-spacing: 0.12em;
      color: var(--muted);
    }

    .stat-value {
      font-size: 2rem;
      font-weight: 700;
      color: var(--accent);
    }

    .pair-footer {
      display: grid;
      gap: 12px;
    }

    .pair-actions {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
    }

    .mini-counter {
      display: inline-flex;
      align-items: center;
      gap: 6px;
    }

    .mini-label {
      font-size: 0.9rem;
      color: var(--muted);
    }

    .mini-btn,
    .icon-btn,
    .ghost-btn,
    .submit-btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      cursor: pointer;
      font-weight: 600;
    }

    .mini-btn {
      width: 32px;
      height: 32px;
      background: rgba(37, 99, 235, 0.1);
      color: var(--accent);
    }

    .mini-input {
      width: 72px;
      padding: 6px 8px;
      border-radius: 10px;
      border: 1px solid rgba(31, 41, 51, 0.2);
      text-align: center;
    }

    .note-input {
      padding: 10px 12px;
      border-radius: 12px;
      border: 1px solid rgba(31, 41, 51, 0.2);
    }

    .pair-submit-row {
      display: flex;
      justify-content: flex-end;
      gap: 10px;
    }

    .submit-btn {
      padding: 10px 22px;
      background: var(--danger);
      color: white;
    }

    .ghost-btn {
      padding: 10px 18px;
      background: transparent;
      color: var(--muted);
      border: 1px solid rgba(31, 41, 51, 0.2);
    }

    .icon-btn {
      background: transparent;
      color: var(--danger);
    }

    .submit-table {
      width: 100%;
      border-collapse: collapse;
      font-size: 0.92rem;
    }

    .submit-table th,
    .submit-table td {
      text-align: left;
      padding: 8px 6px;
      border-bottom: 1px solid rgba(31, 41, 51, 0.08);
    }

    .submit-table .num {
      text-align: right;
    }

    .draft-tag {
      font-size: 0.75rem;
      color: var(--muted);
      font-style: italic;
    }

    .sr-only {
      position: absolute;
      width: 1px;
      height: 1px;
      overflow: hidden;
      clip: rect(0 0 0 0);
    }

    .status {
      margin: 0;
      font-size: 0.95rem;
    }

    .status[data-type="error"] {
      color: #c63b2b;
    }

    .status[data-type="warning"] {
      color: #b45309;
    }

    .status[data-type="ok"] {
      color: #2d7a4b;
    }

    @media (max-width: 860px) {
      .card-grid {
        grid-template-columns: 1fr;
      }

      .pair-divider {
        display: none;
      }
    }
  </style>
</head>
<body>
  <main class="dashboard">
    <div class="header-row">
      <h1>Vaccination Dashboard</h1>
    </div>
    {{NOTICE}}
    <div class="card-grid">
      {{PANELS}}
    </div>
  </main>
</body>
</html>
"#;
