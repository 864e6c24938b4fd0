//! Embedded HTML/CSS/JS frontend for the carbontrace dashboard.
//!
//! The entire SPA is compiled into the binary as a string constant.
//! No external assets, no build tools, no CDN dependencies. The page is a
//! pure render adapter: it draws the aggregates the API hands it and emits
//! click payloads back — all filter logic lives on the server.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Carbon Emissions Dashboard</title>
<style>
:root {
  --bg: #f8f9fa;
  --card: #ffffff;
  --border: #dee2e6;
  --text: #212529;
  --text-muted: #6c757d;
  --accent: #2c7bb6;
  --selected: #d7301f;
  --bar: #74a9cf;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  background: var(--bg);
  color: var(--text);
  font-family: var(--font);
  font-size: 14px;
  line-height: 1.5;
}

.app {
  max-width: 1280px;
  margin: 0 auto;
  padding: 24px;
}

header {
  display: flex;
  align-items: center;
  justify-content: space-between;
  margin-bottom: 24px;
}

header h1 { font-size: 26px; font-weight: 600; }

.btn {
  padding: 8px 16px;
  border: 1px solid var(--border);
  border-radius: 6px;
  background: var(--card);
  color: var(--text);
  font-size: 13px;
  cursor: pointer;
}
.btn:hover { border-color: var(--accent); color: var(--accent); }

.grid { display: grid; gap: 16px; margin-bottom: 16px; }
.grid.cols-4 { grid-template-columns: repeat(4, 1fr); }
.grid.cols-3 { grid-template-columns: repeat(3, 1fr); }
.grid.cols-2 { grid-template-columns: repeat(2, 1fr); }

.card {
  background: var(--card);
  border: 1px solid var(--border);
  border-radius: var(--radius);
  box-shadow: 0 1px 2px rgba(0,0,0,0.05);
}
.card h2 {
  font-size: 13px;
  font-weight: 600;
  color: var(--text-muted);
  padding: 10px 14px;
  border-bottom: 1px solid var(--border);
}
.card .body { padding: 14px; }

.metric { font-size: 22px; font-weight: 600; }

select[multiple] {
  width: 100%;
  min-height: 110px;
  border: 1px solid var(--border);
  border-radius: 6px;
  padding: 4px;
  font-size: 13px;
}

.hint { color: var(--text-muted); font-size: 12px; margin-top: 6px; }

/* Horizontal country distribution (map stand-in) */
.hbar-row { display: flex; align-items: center; gap: 8px; margin-bottom: 5px; cursor: pointer; }
.hbar-label { width: 130px; text-align: right; font-size: 12px; white-space: nowrap; overflow: hidden; text-overflow: ellipsis; }
.hbar-track { flex: 1; }
.hbar-fill { height: 14px; border-radius: 3px; background: var(--bar); min-width: 2px; }
.hbar-row.selected .hbar-fill { background: var(--selected); }
.hbar-row:hover .hbar-fill { opacity: 0.8; }
.hbar-value { width: 70px; font-size: 12px; color: var(--text-muted); }

/* Treemap */
.treemap { display: flex; flex-wrap: wrap; gap: 4px; }
.tm-cell {
  display: flex;
  flex-direction: column;
  justify-content: flex-end;
  padding: 6px;
  border-radius: 4px;
  color: #fff;
  font-size: 11px;
  cursor: pointer;
  overflow: hidden;
  min-width: 60px;
  min-height: 44px;
}
.tm-cell:hover { outline: 2px solid var(--selected); }
.tm-cell .sector { font-weight: 600; }

/* Vertical bar chart */
.vbars { display: flex; align-items: flex-end; gap: 10px; height: 180px; }
.vbar { flex: 1; display: flex; flex-direction: column; align-items: center; cursor: pointer; height: 100%; justify-content: flex-end; }
.vbar-fill { width: 100%; background: var(--bar); border-radius: 3px 3px 0 0; min-height: 2px; }
.vbar.selected .vbar-fill { background: var(--selected); }
.vbar:hover .vbar-fill { opacity: 0.8; }
.vbar-label {
  font-size: 11px;
  margin-top: 4px;
  max-width: 72px;
  white-space: nowrap;
  overflow: hidden;
  text-overflow: ellipsis;
}

/* Trend chart */
.trend svg { width: 100%; height: 200px; }
.legend { display: flex; flex-wrap: wrap; gap: 12px; margin-top: 6px; font-size: 12px; }
.legend .key { display: inline-block; width: 10px; height: 10px; border-radius: 2px; margin-right: 4px; }

/* Table */
table { width: 100%; border-collapse: collapse; font-size: 13px; }
th, td { text-align: left; padding: 6px 10px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 600; }
td.num, th.num { text-align: right; }
.pager { display: flex; align-items: center; gap: 12px; margin-top: 10px; justify-content: flex-end; }
.pager .info { color: var(--text-muted); font-size: 12px; }

.empty { color: var(--text-muted); text-align: center; padding: 24px 0; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1>Carbon Emissions Dashboard</h1>
    <button class="btn" id="reset-button">Reset All Filters</button>
  </header>

  <div class="grid cols-4">
    <div class="card"><h2>Country Filter</h2><div class="body">
      <select multiple id="filter-countries"></select>
    </div></div>
    <div class="card"><h2>Year Filter</h2><div class="body">
      <select multiple id="filter-years"></select>
    </div></div>
    <div class="card"><h2>Sector Filter</h2><div class="body">
      <select multiple id="filter-sectors"></select>
    </div></div>
    <div class="card"><h2>Subsector Filter</h2><div class="body">
      <select multiple id="filter-subsectors"></select>
    </div></div>
  </div>

  <div class="grid cols-3">
    <div class="card"><h2>Total Emissions (CO₂e)</h2>
      <div class="body"><div class="metric" id="total-emissions">—</div></div></div>
    <div class="card"><h2>Number of Countries</h2>
      <div class="body"><div class="metric" id="country-count">—</div></div></div>
    <div class="card"><h2>Average Emissions per Country</h2>
      <div class="body"><div class="metric" id="avg-emissions">—</div></div></div>
  </div>

  <div class="grid cols-2">
    <div class="card"><h2>Emissions by Country (click to filter)</h2>
      <div class="body" id="map-panel"></div></div>
    <div class="card"><h2>Emissions by Sector and Subsector (click to filter)</h2>
      <div class="body treemap" id="treemap-panel"></div></div>
  </div>

  <div class="grid cols-2">
    <div class="card"><h2>Top Emitting Countries (click bars to filter)</h2>
      <div class="body" id="bar-panel"></div></div>
    <div class="card"><h2>Emissions Trend Over Time</h2>
      <div class="body trend" id="trend-panel"></div></div>
  </div>

  <div class="card"><h2>Detailed Emissions Data</h2>
    <div class="body">
      <table>
        <thead><tr>
          <th>Country</th><th class="num">Year</th><th>Sector</th>
          <th>Subsector</th><th class="num">Emissions (billion tons CO₂e)</th>
        </tr></thead>
        <tbody id="table-body"></tbody>
      </table>
      <div class="empty" id="table-empty" style="display:none">No data to display</div>
      <div class="pager">
        <span class="info" id="page-info"></span>
        <button class="btn" id="page-prev">Prev</button>
        <button class="btn" id="page-next">Next</button>
      </div>
    </div>
  </div>
</div>

<script>
// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------
let dashboard = null;
let page = 0;

const SERIES_COLORS = ['#2c7bb6', '#d7301f', '#2ca25f', '#756bb1', '#e6550d',
                       '#636363', '#1c9099', '#dd1c77', '#8c6d31', '#3182bd'];

// ---------------------------------------------------------------------------
// API helpers
// ---------------------------------------------------------------------------
async function api(method, path, body) {
  const opts = { method, headers: {} };
  if (body) {
    opts.headers['Content-Type'] = 'application/json';
    opts.body = JSON.stringify(body);
  }
  const res = await fetch(path, opts);
  return res.json();
}

function esc(s) {
  return String(s).replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;');
}

function fmt(n) { return Number(n).toFixed(3); }

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------
async function loadOptions() {
  const opts = await api('GET', '/api/options');
  fillSelect('filter-countries', opts.countries);
  fillSelect('filter-years', opts.years);
  fillSelect('filter-sectors', opts.sectors);
  fillSelect('filter-subsectors', opts.subsectors);
}

function fillSelect(id, values) {
  const el = document.getElementById(id);
  el.innerHTML = values.map(v => `<option value="${esc(v)}">${esc(v)}</option>`).join('');
  el.addEventListener('change', pushFilters);
}

function selected(id) {
  return Array.from(document.getElementById(id).selectedOptions).map(o => o.value);
}

async function pushFilters() {
  const body = {
    countries: selected('filter-countries'),
    years: selected('filter-years').map(Number),
    sectors: selected('filter-sectors'),
    subsectors: selected('filter-subsectors'),
  };
  dashboard = await api('POST', '/api/filters', body);
  page = 0;
  render();
}

// Reflect the server's filter state back into the dropdowns so chart
// clicks and dropdown selections stay in sync.
function syncSelections(filters) {
  syncSelect('filter-countries', filters.countries.map(String));
  syncSelect('filter-years', filters.years.map(String));
  syncSelect('filter-sectors', filters.sectors.map(String));
  syncSelect('filter-subsectors', filters.subsectors.map(String));
}

function syncSelect(id, values) {
  for (const opt of document.getElementById(id).options) {
    opt.selected = values.includes(opt.value);
  }
}

// ---------------------------------------------------------------------------
// Chart clicks
// ---------------------------------------------------------------------------
async function chartClick(payload) {
  const res = await api('POST', '/api/click', payload);
  if (!res.changed) return;
  dashboard = res.dashboard;
  page = 0;
  render();
}

document.getElementById('reset-button').addEventListener('click', async () => {
  dashboard = await api('POST', '/api/reset');
  page = 0;
  render();
});

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------
function render() {
  const d = dashboard;
  document.getElementById('total-emissions').textContent = d.total_emissions;
  document.getElementById('country-count').textContent = d.country_count;
  document.getElementById('avg-emissions').textContent = d.avg_emissions;
  syncSelections(d.filters);
  renderMap(d.map, d.filters.countries);
  renderTreemap(d.treemap);
  renderBars(d.bar, d.filters.countries);
  renderTrend(d.trend);
  renderTable(d.table_rows, d.page_size);
}

function renderMap(totals, selectedCountries) {
  const el = document.getElementById('map-panel');
  if (totals.length === 0) {
    el.innerHTML = '<div class="empty">No data to display</div>';
    return;
  }
  const max = Math.max(...totals.map(t => t.emissions), 0);
  el.innerHTML = totals.map(t => {
    const width = max > 0 ? (t.emissions / max) * 100 : 0;
    const sel = selectedCountries.includes(t.country) ? ' selected' : '';
    return `<div class="hbar-row${sel}" data-country="${esc(t.country)}">
      <span class="hbar-label">${esc(t.country)}</span>
      <span class="hbar-track"><span class="hbar-fill" style="width:${width}%;display:block"></span></span>
      <span class="hbar-value">${fmt(t.emissions)}</span>
    </div>`;
  }).join('');
  for (const row of el.querySelectorAll('.hbar-row')) {
    row.addEventListener('click', () =>
      chartClick({ source: 'map', value: row.dataset.country }));
  }
}

function renderTreemap(slices) {
  const el = document.getElementById('treemap-panel');
  if (slices.length === 0) {
    el.innerHTML = '<div class="empty">No data to display</div>';
    return;
  }
  const total = slices.reduce((acc, s) => acc + s.emissions, 0);
  el.innerHTML = slices.map((s, i) => {
    const share = total > 0 ? s.emissions / total : 0;
    const color = SERIES_COLORS[i % SERIES_COLORS.length];
    return `<div class="tm-cell" style="flex-grow:${Math.max(share * 100, 1)};background:${color}"
      data-path="${esc(s.sector)}/${esc(s.subsector)}">
      <span class="sector">${esc(s.sector)}</span>
      <span>${esc(s.subsector)} · ${fmt(s.emissions)}</span>
    </div>`;
  }).join('');
  for (const cell of el.querySelectorAll('.tm-cell')) {
    cell.addEventListener('click', () =>
      chartClick({ source: 'treemap', value: null, path: cell.dataset.path }));
  }
}

function renderBars(totals, selectedCountries) {
  const el = document.getElementById('bar-panel');
  if (totals.length === 0) {
    el.innerHTML = '<div class="empty">No data to display</div>';
    return;
  }
  const max = Math.max(...totals.map(t => t.emissions), 0);
  el.innerHTML = '<div class="vbars">' + totals.map(t => {
    const height = max > 0 ? (t.emissions / max) * 100 : 0;
    const sel = selectedCountries.includes(t.country) ? ' selected' : '';
    return `<div class="vbar${sel}" data-country="${esc(t.country)}" title="${esc(t.country)}: ${fmt(t.emissions)}">
      <div class="vbar-fill" style="height:${height}%"></div>
      <div class="vbar-label">${esc(t.country)}</div>
    </div>`;
  }).join('') + '</div>';
  for (const bar of el.querySelectorAll('.vbar')) {
    bar.addEventListener('click', () =>
      chartClick({ source: 'bar', value: bar.dataset.country }));
  }
}

function renderTrend(series) {
  const el = document.getElementById('trend-panel');
  if (series.length === 0 || series.every(s => s.points.length === 0)) {
    el.innerHTML = '<div class="empty">No data to display</div>';
    return;
  }

  const years = series.flatMap(s => s.points.map(p => p.year));
  const values = series.flatMap(s => s.points.map(p => p.emissions));
  const minYear = Math.min(...years), maxYear = Math.max(...years);
  const maxVal = Math.max(...values, 0);

  const W = 600, H = 200, PAD = 36;
  const xOf = yr => maxYear === minYear
    ? W / 2
    : PAD + (yr - minYear) / (maxYear - minYear) * (W - 2 * PAD);
  const yOf = v => maxVal === 0 ? H - PAD : H - PAD - (v / maxVal) * (H - 2 * PAD);

  const lines = series.map((s, i) => {
    const color = SERIES_COLORS[i % SERIES_COLORS.length];
    const pts = s.points.map(p => `${xOf(p.year).toFixed(1)},${yOf(p.emissions).toFixed(1)}`).join(' ');
    const dots = s.points.map(p =>
      `<circle cx="${xOf(p.year).toFixed(1)}" cy="${yOf(p.emissions).toFixed(1)}" r="3" fill="${color}"><title>${esc(s.name)} ${p.year}: ${fmt(p.emissions)}</title></circle>`
    ).join('');
    return `<polyline points="${pts}" fill="none" stroke="${color}" stroke-width="2"/>` + dots;
  }).join('');

  const axis = `<line x1="${PAD}" y1="${H - PAD}" x2="${W - PAD}" y2="${H - PAD}" stroke="#ccc"/>
    <text x="${PAD}" y="${H - 12}" font-size="11" fill="#6c757d">${minYear}</text>
    <text x="${W - PAD}" y="${H - 12}" font-size="11" fill="#6c757d" text-anchor="end">${maxYear}</text>`;

  const legend = series.map((s, i) =>
    `<span><span class="key" style="background:${SERIES_COLORS[i % SERIES_COLORS.length]}"></span>${esc(s.name)}</span>`
  ).join('');

  el.innerHTML = `<svg viewBox="0 0 ${W} ${H}">${axis}${lines}</svg><div class="legend">${legend}</div>`;
}

function renderTable(rows, pageSize) {
  const body = document.getElementById('table-body');
  const empty = document.getElementById('table-empty');
  const pages = Math.max(Math.ceil(rows.length / pageSize), 1);
  page = Math.min(page, pages - 1);

  if (rows.length === 0) {
    body.innerHTML = '';
    empty.style.display = 'block';
  } else {
    empty.style.display = 'none';
    const slice = rows.slice(page * pageSize, (page + 1) * pageSize);
    body.innerHTML = slice.map(r => `<tr>
      <td>${esc(r.country)}</td>
      <td class="num">${r.year}</td>
      <td>${esc(r.sector)}</td>
      <td>${esc(r.subsector)}</td>
      <td class="num">${fmt(r.emissions)}</td>
    </tr>`).join('');
  }

  document.getElementById('page-info').textContent =
    `${rows.length} rows · page ${page + 1} of ${pages}`;
  document.getElementById('page-prev').disabled = page === 0;
  document.getElementById('page-next').disabled = page >= pages - 1;
}

document.getElementById('page-prev').addEventListener('click', () => {
  if (page > 0) { page--; renderTable(dashboard.table_rows, dashboard.page_size); }
});
document.getElementById('page-next').addEventListener('click', () => {
  page++;
  renderTable(dashboard.table_rows, dashboard.page_size);
});

// ---------------------------------------------------------------------------
// Init
// ---------------------------------------------------------------------------
(async function init() {
  await loadOptions();
  dashboard = await api('GET', '/api/dashboard');
  render();
})();
</script>
</body>
</html>
"##;
