//! Root page — a minimal form posting to `/api/analyze`.

use axum::response::Html;

const ROOT_INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Buildsage</title>
  <style>
    *, *::before, *::after { box-sizing: border-box; margin: 0; padding: 0; }
    body {
      font-family: system-ui, -apple-system, sans-serif;
      background: #0f0f0f; color: #e0e0e0;
      max-width: 800px; margin: 0 auto; padding: 2rem 1rem;
      line-height: 1.5;
    }
    h1 { font-size: 1.5rem; margin-bottom: 0.25rem; color: #7ab8ff; }
    p.sub { color: #888; font-size: 0.9rem; margin-bottom: 1.5rem; }
    form {
      padding: 1.5rem; border: 1px solid #333; border-radius: 12px;
      background: #1a1a1a; margin-bottom: 1.5rem;
    }
    label { display: block; margin-bottom: 0.3rem; font-weight: 600; font-size: 0.9rem; }
    input[type="text"], textarea, select {
      width: 100%; padding: 0.5rem; margin-bottom: 1rem;
      background: #111; color: #e0e0e0;
      border: 1px solid #444; border-radius: 6px; font: inherit;
    }
    textarea { height: 5rem; }
    .row { display: flex; gap: 1rem; }
    .row > div { flex: 1; }
    button {
      padding: 0.5rem 1.5rem; border: none; border-radius: 8px;
      background: #2a2a3a; color: #c0c0e0; font: inherit; cursor: pointer;
    }
    button:hover { background: #3a3a5a; }
    button:disabled { opacity: 0.5; cursor: wait; }
    #result {
      display: none; white-space: pre-wrap; padding: 1.5rem;
      border: 1px solid #333; border-radius: 12px; background: #1a1a1a;
    }
    #result.error { border-color: #a33; color: #e99; }
    #meta { color: #888; font-size: 0.85rem; margin-bottom: 0.75rem; }
  </style>
</head>
<body>
  <h1>Buildsage</h1>
  <p class="sub">Paste an Azure DevOps build URL and ask what went wrong.</p>

  <form id="analyze-form">
    <label for="url">Build URL</label>
    <input type="text" id="url" name="url"
           placeholder="https://dev.azure.com/org/project/_build/results?buildId=42" required />

    <label for="query">Question</label>
    <textarea id="query" name="query"
              placeholder="What caused this build to fail and how can I fix it?"></textarea>

    <div class="row">
      <div>
        <label for="provider">Provider</label>
        <select id="provider" name="provider"></select>
      </div>
      <div>
        <label for="model">Model (optional)</label>
        <input type="text" id="model" name="model" placeholder="provider default" />
      </div>
    </div>

    <button type="submit" id="submit">Analyze</button>
  </form>

  <div id="result"><div id="meta"></div><div id="answer"></div></div>

  <script>
    const form = document.getElementById('analyze-form');
    const providerSelect = document.getElementById('provider');
    const result = document.getElementById('result');
    const meta = document.getElementById('meta');
    const answer = document.getElementById('answer');
    const submit = document.getElementById('submit');

    fetch('/api/providers').then(r => r.json()).then(data => {
      for (const [name, label] of Object.entries(data.providers)) {
        const opt = document.createElement('option');
        opt.value = name;
        opt.textContent = label;
        opt.selected = name === data.default_provider;
        providerSelect.appendChild(opt);
      }
    });

    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      submit.disabled = true;
      result.style.display = 'none';
      try {
        const response = await fetch('/api/analyze', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({
            url: document.getElementById('url').value,
            query: document.getElementById('query').value,
            provider: providerSelect.value,
            model: document.getElementById('model').value || null,
          }),
        });
        const data = await response.json();
        if (response.ok) {
          result.classList.remove('error');
          meta.textContent = 'Answered by ' + data.provider + ' / ' + data.model;
          answer.textContent = data.answer;
        } else {
          result.classList.add('error');
          meta.textContent = 'Request failed (' + response.status + ')';
          answer.textContent = data.error || 'unknown error';
        }
      } catch (e) {
        result.classList.add('error');
        meta.textContent = 'Request failed';
        answer.textContent = String(e);
      }
      result.style.display = 'block';
      submit.disabled = false;
    });
  </script>
</body>
</html>
"#;

pub(super) async fn root() -> Html<&'static str> {
    Html(ROOT_INDEX_HTML)
}
