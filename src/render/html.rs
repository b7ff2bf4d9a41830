use crate::plot::ChartData;

/// Render charts into one self-contained HTML page. The chart data is
/// embedded as JSON at `__DATA__` and drawn as SVG by the page script.
pub fn render_html_report(charts: &[ChartData]) -> anyhow::Result<String> {
    // "</" would end the <script> block early if it shows up in a title.
    let json = serde_json::to_string(charts)?.replace("</", "<\\/");

    const TEMPLATE: &str = r##"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Full stack plot</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; background: #fff; }
  .chart { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  svg { width: 100%; max-width: 1400px; height: auto; display: block; }
  .grid line { stroke: #ddd; stroke-dasharray: 2 3; }
  .axis text { font-size: 13px; fill: #333; }
  .axis line, .axis path { stroke: #333; }
  .title { font-size: 18px; font-weight: 600; }
  .legend rect { fill: white; stroke: #ccc; }
  .legend text { font-size: 14px; }
</style>
</head>
<body>
<div id="charts"></div>

<script>
// Embedded chart data (JSON array of charts)
const DATA = __DATA__;

const SVG_NS = "http://www.w3.org/2000/svg";
const W = 1400, H = 1000;
const M = { top: 50, right: 80, bottom: 60, left: 80 };

function el(name, attrs, parent) {
  const e = document.createElementNS(SVG_NS, name);
  for (const [k, v] of Object.entries(attrs || {})) e.setAttribute(k, v);
  if (parent) parent.appendChild(e);
  return e;
}

function text(parent, x, y, s, attrs) {
  const t = el("text", Object.assign({ x, y }, attrs || {}), parent);
  t.textContent = s;
  return t;
}

function extent(values) {
  let lo = Infinity, hi = -Infinity;
  for (const v of values) {
    if (v === null || !isFinite(v)) continue;
    if (v < lo) lo = v;
    if (v > hi) hi = v;
  }
  if (lo === Infinity) return [0, 1];
  if (lo === hi) return [lo - 1, hi + 1];
  return [lo, hi];
}

function ticks(lo, hi, count) {
  const step0 = (hi - lo) / count;
  const mag = Math.pow(10, Math.floor(Math.log10(step0)));
  const err = step0 / mag;
  const step = mag * (err >= 5 ? 10 : err >= 2 ? 5 : err >= 1 ? 2 : 1);
  const out = [];
  for (let v = Math.ceil(lo / step) * step; v <= hi + step * 1e-9; v += step) {
    out.push(Math.abs(v) < step * 1e-9 ? 0 : v);
  }
  return out;
}

function fmt(v) {
  return Math.abs(v) >= 1e4 || (v !== 0 && Math.abs(v) < 1e-3) ? v.toExponential(2) : String(+v.toFixed(3));
}

function scale(d0, d1, r0, r1) {
  return (v) => r0 + (v - d0) / (d1 - d0) * (r1 - r0);
}

function drawLegend(svg, lines, anchorRight) {
  if (!lines.length) return;
  const g = el("g", { class: "legend" }, svg);
  const rowH = 20, width = 12 + 8.0 * Math.max(...lines.map((l) => l.label.length)) + 40;
  const x0 = anchorRight ? W - M.right - width - 10 : M.left + 10;
  const y0 = M.top + 10;
  el("rect", { x: x0, y: y0, width, height: rowH * lines.length + 10, rx: 4 }, g);
  lines.forEach((line, i) => {
    const y = y0 + 15 + i * rowH;
    el("line", { x1: x0 + 8, y1: y, x2: x0 + 32, y2: y, stroke: line.color, "stroke-width": 2 }, g);
    el("circle", { cx: x0 + 20, cy: y, r: 3, fill: line.color }, g);
    text(g, x0 + 40, y + 5, line.label);
  });
}

function drawChart(chart) {
  const box = document.createElement("div");
  box.className = "chart";
  document.getElementById("charts").appendChild(box);

  const svg = el("svg", { viewBox: `0 0 ${W} ${H}` });
  box.appendChild(svg);
  text(svg, W / 2, 30, chart.title, { class: "title", "text-anchor": "middle" });

  const left = chart.lines.filter((l) => l.axis === "left");
  const right = chart.lines.filter((l) => l.axis === "right");

  const xs = extent(chart.lines.flatMap((l) => l.x));
  const x = scale(xs[0], xs[1], M.left, W - M.right);
  const ly = extent(left.flatMap((l) => l.y));
  const yl = scale(ly[0], ly[1], H - M.bottom, M.top);
  const ry = extent(right.flatMap((l) => l.y));
  const yr = scale(ry[0], ry[1], H - M.bottom, M.top);

  const grid = el("g", { class: "grid" }, svg);
  const axis = el("g", { class: "axis" }, svg);
  for (const t of ticks(xs[0], xs[1], 10)) {
    el("line", { x1: x(t), y1: M.top, x2: x(t), y2: H - M.bottom }, grid);
    text(axis, x(t), H - M.bottom + 20, fmt(t), { "text-anchor": "middle" });
  }
  for (const t of ticks(ly[0], ly[1], 8)) {
    el("line", { x1: M.left, y1: yl(t), x2: W - M.right, y2: yl(t) }, grid);
    text(axis, M.left - 8, yl(t) + 4, fmt(t), { "text-anchor": "end" });
  }
  el("rect", { x: M.left, y: M.top, width: W - M.left - M.right, height: H - M.top - M.bottom, fill: "none", stroke: "#333" }, axis);
  text(axis, W / 2, H - 15, chart.x_label, { "text-anchor": "middle" });
  if (chart.has_right_axis) {
    for (const t of ticks(ry[0], ry[1], 8)) {
      text(axis, W - M.right + 8, yr(t) + 4, fmt(t), { "text-anchor": "start" });
    }
  }

  for (const line of chart.lines) {
    const y = line.axis === "right" ? yr : yl;
    const g = el("g", {}, svg);
    // null values break the line; no point is drawn there.
    let d = "", pen = false;
    line.y.forEach((v, i) => {
      if (v === null) { pen = false; return; }
      d += `${pen ? "L" : "M"}${x(line.x[i]).toFixed(1)},${y(v).toFixed(1)}`;
      pen = true;
      const c = el("circle", { cx: x(line.x[i]), cy: y(v), r: 3, fill: line.color }, g);
      el("title", {}, c).textContent = `${line.label}\nframe ${line.x[i]}: ${fmt(v)}`;
    });
    el("path", { d, fill: "none", stroke: line.color, "stroke-width": 1 }, g);
  }

  if (chart.has_right_axis) {
    drawLegend(svg, left, false);
    drawLegend(svg, right, true);
  } else {
    drawLegend(svg, chart.lines, false);
  }
}

for (const chart of DATA) drawChart(chart);
</script>
</body>
</html>
"##;

    Ok(TEMPLATE.replace("__DATA__", &json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::LineFlags;
    use crate::plot::PlotLine;

    #[test]
    fn embeds_chart_json() {
        let chart = ChartData::from_lines(
            "end to end </script>",
            vec![Some(PlotLine {
                label: "Run A end to end".to_string(),
                values: vec![Some(1.5), None],
                flags: LineFlags::default(),
            })],
            0,
        );
        let html = render_html_report(&[chart]).unwrap();
        assert!(!html.contains("__DATA__"));
        assert!(html.contains(r#""label":"Run A end to end""#));
        assert!(html.contains(r#""y":[1.5,null]"#));
        assert!(html.contains(r#"end to end <\/script>"#));
    }
}
