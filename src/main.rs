use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

mod cycle;
mod dataset;
mod directive;
mod error;
mod field;
mod plot;
mod render;

pub type Result<T> = anyhow::Result<T>;

const LONG_ABOUT: &str = "\
Generate graphs for data produced by full stack loopback tests.

Each input file holds a title line, a frame count, a line of field names and
one row of values per frame. Charts are written as self-contained HTML pages.

Directives (order matters; -d and -r apply to the next -f only):
  -c, --cycle_length N       average values over a cycle of N frames
  -f, --field NAME           field to show; 'none' skips a color
  -r, --right                put the next field on the right Y axis
  -d, --drop                 hide values of dropped frames for the next field
  -o, --offset N             frame offset
      --frames N             frame count to show or average over
  -t, --title TEXT           chart title
  -O, --output_filename PATH write this chart to PATH instead of the report
  -n, --next                 start the next chart
  FILE...                    log files; 'none' reserves a row of colors

Examples:
  Show end to end time for a single full stack test:
    fullstack-plot -df end_to_end -o 600 --frames 1000 vp9_data.txt

  Show PSNR and encoded frame size of two runs, averaged over a cycle of
  200 frames:
    fullstack-plot -c 200 -df psnr -drf encoded_frame_size before.txt after.txt

  The same with several charts:
    fullstack-plot -c 200 -df psnr vp8.txt vp9.txt --next \\
                   -c 200 -df sender_time vp8.txt vp9.txt --next \\
                   -c 200 -df end_to_end vp8.txt vp9.txt";

#[derive(Parser)]
#[command(name = "fullstack-plot")]
#[command(about = "Plot per-frame metrics of A/V loopback tests", long_about = LONG_ABOUT)]
struct Cli {
    /// HTML file that receives every chart without its own output file.
    #[arg(long, default_value = "fullstack_plot.html")]
    report: PathBuf,

    /// Log filter (error, warn, info, debug, trace). RUST_LOG overrides it.
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Chart directives and input files.
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    directives: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level.as_str()),
    )
    .init();

    // 1) Directives -> plot specs (loads every referenced file once).
    let mut cache = directive::DatasetCache::new();
    let specs = directive::plot_specs_from_args(&cli.directives, &mut cache)?;
    log::info!("{} charts from {} files", specs.len(), cache.len());

    // 2) Materialize every chart before writing anything: a broken chart
    //    aborts the whole run.
    let mut charts = Vec::with_capacity(specs.len());
    for spec in &specs {
        charts.push((spec.output.clone(), spec.materialize()?));
    }

    // 3) Render.
    let mut report = Vec::new();
    for (output, chart) in charts {
        match output {
            Some(path) => {
                println!("Saving to {}", path.display());
                let html = render::render_html_report(std::slice::from_ref(&chart))?;
                fs::write(&path, html).with_context(|| format!("write {}", path.display()))?;
            }
            None => report.push(chart),
        }
    }

    if !report.is_empty() {
        let html = render::render_html_report(&report)?;
        fs::write(&cli.report, html)
            .with_context(|| format!("write {}", cli.report.display()))?;
        println!("Wrote {}", cli.report.display());
    }

    Ok(())
}
