use crate::dom::escape;
use crate::state::{PageState, PanelId, TabView};

/// Seconds between automatic reloads while any panel is waiting on the backend.
const LOADING_REFRESH_SECS: u32 = 2;

pub fn render_index(page: &PageState) -> String {
    let any_loading = PanelId::ALL.iter().any(|panel| page.panel(*panel).loading);
    let updated = page
        .stats
        .updated_at
        .map(|at| format!("Updated {}", at.format("%H:%M:%S UTC")))
        .unwrap_or_else(|| "Not loaded yet".to_string());

    fill(INDEX_HTML, |key| {
        let value = match key {
            "REFRESH" if any_loading => {
                format!("<meta http-equiv=\"refresh\" content=\"{LOADING_REFRESH_SECS}\" />")
            }
            "REFRESH" => String::new(),
            "STORED" => page.stats.total_articles_stored.to_string(),
            "VECTORDB" => page.stats.total_articles_in_vectordb.to_string(),
            "UPDATED" => escape(&updated),
            _ => {
                let (kind, name) = key.split_once('_')?;
                let panel = PanelId::from_name(&name.to_lowercase())?;
                match kind {
                    "TAB" => active_class(tab_flag(page, panel, |tab| tab.panel_active)).to_string(),
                    "BUTTON" => {
                        active_class(tab_flag(page, panel, |tab| tab.button_active)).to_string()
                    }
                    "LOADING" => active_class(page.panel(panel).loading).to_string(),
                    "RESULTS" => page.panel(panel).content.iter().map(|node| node.to_html()).collect(),
                    _ => return None,
                }
            }
        };
        Some(value)
    })
}

/// Substitutes `{{KEY}}` placeholders in one left-to-right pass, so inserted
/// values are never scanned again. Unknown keys are left as written.
fn fill(template: &str, mut value: impl FnMut(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("}}") {
            Some(close) => {
                let key = &after[..close];
                match value(key) {
                    Some(replacement) => out.push_str(&replacement),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[close + 2..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn tab_flag(page: &PageState, panel: PanelId, flag: impl Fn(&TabView) -> bool) -> bool {
    page.tabs.iter().any(|tab| tab.panel == panel && flag(tab))
}

fn active_class(active: bool) -> &'static str {
    if active { " active" } else { "" }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  {{REFRESH}}
  <title>AI News Research Assistant</title>
  <style>
    :root {
      --bg: #f3f5f9;
      --ink: #1f2933;
      --muted: #66788a;
      --accent: #3b5bdb;
      --card: #ffffff;
      --ok: #2b8a3e;
      --bad: #c92a2a;
      --shadow: 0 18px 40px rgba(31, 41, 51, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(160deg, #e7ecf8, var(--bg) 45%);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .container {
      width: min(960px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header h1 {
      margin: 0 0 6px;
      font-size: clamp(1.8rem, 4vw, 2.5rem);
    }

    header p {
      margin: 0;
      color: var(--muted);
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
      gap: 16px;
    }

    .stat-card {
      background: var(--card);
      border-radius: 16px;
      padding: 18px;
      box-shadow: var(--shadow);
    }

    .stat-card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: var(--muted);
    }

    .stat-card .value {
      font-size: 1.8rem;
      font-weight: 700;
      color: var(--accent);
    }

    .stats-updated {
      color: var(--muted);
      font-size: 0.85rem;
    }

    .tabs {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .tab-button {
      padding: 10px 18px;
      border-radius: 999px;
      text-decoration: none;
      color: var(--muted);
      background: rgba(59, 91, 219, 0.08);
      font-weight: 600;
    }

    .tab-button.active {
      background: var(--accent);
      color: white;
    }

    .tab-content {
      display: none;
      background: var(--card);
      border-radius: 20px;
      padding: 24px;
      box-shadow: var(--shadow);
    }

    .tab-content.active {
      display: grid;
      gap: 18px;
    }

    form {
      display: grid;
      gap: 12px;
    }

    label {
      display: grid;
      gap: 6px;
      font-weight: 600;
    }

    input, select, textarea {
      font: inherit;
      padding: 10px 12px;
      border-radius: 10px;
      border: 1px solid #cbd5e1;
    }

    button {
      justify-self: start;
      border: none;
      border-radius: 999px;
      padding: 12px 22px;
      font-weight: 600;
      background: var(--accent);
      color: white;
      cursor: pointer;
    }

    .loading {
      display: none;
      color: var(--muted);
    }

    .loading.active {
      display: block;
    }

    .result-item, .answer-box {
      border: 1px solid #e2e8f0;
      border-radius: 14px;
      padding: 16px;
      margin-top: 12px;
    }

    .result-title {
      font-weight: 700;
      margin-bottom: 6px;
    }

    .result-meta {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      color: var(--muted);
      font-size: 0.85rem;
      margin-bottom: 8px;
    }

    .result-score {
      color: var(--accent);
      font-weight: 600;
    }

    .result-url {
      color: var(--accent);
    }

    .answer-text {
      white-space: pre-wrap;
      line-height: 1.5;
    }

    .sources-title {
      margin-top: 14px;
      font-weight: 700;
    }

    .source-item {
      margin-top: 8px;
      padding-left: 10px;
      border-left: 3px solid rgba(59, 91, 219, 0.3);
    }

    .success {
      color: var(--ok);
      font-weight: 600;
    }

    .error {
      color: var(--bad);
      font-weight: 600;
    }
  </style>
</head>
<body>
  <main class="container">
    <header>
      <h1>AI News Research Assistant</h1>
      <p>Fetch headlines, search them semantically, and ask questions about what was stored.</p>
    </header>

    <section class="stats">
      <div class="stat-card">
        <div class="label">Articles stored</div>
        <div class="value" id="storageCount">{{STORED}}</div>
      </div>
      <div class="stat-card">
        <div class="label">Articles in vector DB</div>
        <div class="value" id="vectorCount">{{VECTORDB}}</div>
      </div>
    </section>
    <div class="stats-updated" id="statsUpdated">{{UPDATED}}</div>

    <nav class="tabs">
      <a class="tab-button{{BUTTON_FETCH}}" id="fetchTabButton" href="/?tab=fetch&amp;trigger=fetchTabButton">Fetch News</a>
      <a class="tab-button{{BUTTON_SEARCH}}" id="searchTabButton" href="/?tab=search&amp;trigger=searchTabButton">Search</a>
      <a class="tab-button{{BUTTON_ASK}}" id="askTabButton" href="/?tab=ask&amp;trigger=askTabButton">Ask a Question</a>
    </nav>

    <section class="tab-content{{TAB_FETCH}}" id="fetchTab">
      <form id="fetchForm" method="post" action="/fetch-news">
        <label>Category
          <select name="category">
            <option value="">All</option>
            <option value="business">Business</option>
            <option value="entertainment">Entertainment</option>
            <option value="health">Health</option>
            <option value="science">Science</option>
            <option value="sports">Sports</option>
            <option value="technology">Technology</option>
          </select>
        </label>
        <label>Country
          <select name="country">
            <option value="us">United States</option>
            <option value="gb">United Kingdom</option>
            <option value="in">India</option>
            <option value="ca">Canada</option>
            <option value="au">Australia</option>
          </select>
        </label>
        <label>Number of articles
          <input type="number" name="pageSize" min="1" max="20" value="10" />
        </label>
        <button type="submit">Fetch News</button>
      </form>
      <div class="loading{{LOADING_FETCH}}" id="fetchLoading">Working on it...</div>
      <div class="results" id="fetchResults">{{RESULTS_FETCH}}</div>
    </section>

    <section class="tab-content{{TAB_SEARCH}}" id="searchTab">
      <form id="searchForm" method="post" action="/search">
        <label>Search query
          <input type="text" id="searchQuery" name="searchQuery" placeholder="e.g. climate policy" required />
        </label>
        <label>Number of results
          <input type="number" id="topK" name="topK" min="1" max="20" value="5" />
        </label>
        <button type="submit">Search</button>
      </form>
      <div class="loading{{LOADING_SEARCH}}" id="searchLoading">Working on it...</div>
      <div class="results" id="searchResults">{{RESULTS_SEARCH}}</div>
    </section>

    <section class="tab-content{{TAB_ASK}}" id="askTab">
      <form id="askForm" method="post" action="/ask">
        <label>Your question
          <textarea id="question" name="question" rows="3" placeholder="What happened in tech this week?" required></textarea>
        </label>
        <label>Sources to consider
          <input type="number" id="sourcesCount" name="sourcesCount" min="1" max="20" value="5" />
        </label>
        <button type="submit">Ask</button>
      </form>
      <div class="loading{{LOADING_ASK}}" id="askLoading">Working on it...</div>
      <div class="results" id="askResults">{{RESULTS_ASK}}</div>
    </section>
  </main>
</body>
</html>
"#;
