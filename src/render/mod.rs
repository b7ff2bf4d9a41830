//! Chart rendering: self-contained HTML pages with the chart data embedded.

pub mod html;

pub use html::render_html_report;
