// File: crates/demo/src/main.rs
// Summary: Demo loads a backtest result (JSON) or an OHLC CSV, builds the dashboard and writes
//          one PNG per panel plus a hovered indicator frame.
// Usage: retrospect-demo [input.json|input.csv] [out_dir] [--theme NAME] [--at MS]

use anyhow::{Context, Result};
use chart_core::{theme, BacktestResult, Body, Dashboard, PanelContent, PointerEvent, RawRecord};
use chart_render_skia::{CardLayout, RenderOptions, SkiaRenderer};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "crates/demo/data/sample_backtest.json";

struct Args {
    input: String,
    out_dir: PathBuf,
    theme: String,
    /// Dashboard time to sample; `None` renders every panel fully settled.
    at_ms: Option<u32>,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut theme = "dashboard".to_string();
    let mut at_ms = None;
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--theme" => theme = it.next().context("--theme needs a value")?,
            "--at" => {
                let raw = it.next().context("--at needs a value in milliseconds")?;
                at_ms = Some(raw.parse().with_context(|| format!("invalid --at value '{raw}'"))?);
            }
            _ => positional.push(arg),
        }
    }
    let mut positional = positional.into_iter();
    Ok(Args {
        input: positional.next().unwrap_or_else(|| DEFAULT_INPUT.to_string()),
        out_dir: positional.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("target/out")),
        theme,
        at_ms,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = parse_args()?;
    let (path, used_alt) = resolve_path(&args.input)?;
    info!(input = %path.display(), "using input file");
    if used_alt {
        info!("extension swapped between .csv/.cvs");
    }

    let result = load_result(&path).with_context(|| format!("failed to load '{}'", path.display()))?;
    info!(
        ohlc = result.ohlc().len(),
        equity = result.equity_curve().len(),
        trades = result.trades().len(),
        "loaded backtest result"
    );

    let theme = theme::find(&args.theme);
    let body = Body::new();
    let mut dashboard = Dashboard::build(&result, &theme, &body)?;
    let renderer = SkiaRenderer::new(&theme);
    let opts = RenderOptions::default();
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating output dir {}", args.out_dir.display()))?;

    for panel in dashboard.panels() {
        let out = args.out_dir.join(format!("{}.png", panel.id));
        match &panel.content {
            PanelContent::Kpi(cards) => {
                renderer.render_cards_png(cards, &CardLayout::default(), &opts, &out)?;
            }
            PanelContent::Chart(chart) => {
                let local = match args.at_ms {
                    Some(ms) => match panel.local_time(ms) {
                        Some(local) => local,
                        None => {
                            warn!(panel = panel.id, at_ms = ms, reveal_at_ms = panel.reveal_at_ms, "panel not revealed yet, skipping");
                            continue;
                        }
                    },
                    None => chart.scene().timeline().total_duration_ms(),
                };
                renderer.render_to_png(&chart.frame_at(local), &opts, &out)?;
            }
        }
        info!(panel = panel.id, path = %out.display(), "wrote panel");
    }

    // Hover the middle of the indicator plot to show the focus ring and tooltip.
    if let Some(chart) = dashboard.panel_mut("indicator").and_then(|p| p.chart_mut()) {
        if !chart.scene().is_placeholder() {
            let vp = chart.config().viewport;
            let (ox, oy) = vp.origin();
            chart.handle_pointer(PointerEvent::Enter);
            chart.handle_pointer(PointerEvent::Move { x: ox + vp.inner_width() / 2.0, y: oy + vp.inner_height() / 2.0 });
            let settled = chart.scene().timeline().total_duration_ms();
            let out = args.out_dir.join("indicator_hover.png");
            renderer.render_to_png(&chart.frame_at(settled), &opts, &out)?;
            info!(path = %out.display(), tooltips = body.visible_tooltips().len(), "wrote hover frame");
        }
    }

    Ok(())
}

/// Backtest JSON as-is; CSV files become an OHLC-only result.
fn load_result(path: &Path) -> Result<BacktestResult> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
    match ext.as_str() {
        "csv" | "cvs" => {
            let records = load_ohlc_csv(path)?;
            if records.is_empty() {
                anyhow::bail!("no OHLC rows loaded - check headers/delimiter.");
            }
            Ok(BacktestResult { ohcl_data: Some(records), ..Default::default() })
        }
        _ => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(BacktestResult::from_json_str(&text)?)
        }
    }
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(raw: &str) -> Result<(PathBuf, bool)> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

/// Load a Binance-like OHLC CSV into raw records keyed like the backtest API.
/// Cell values stay strings; numeric coercion happens during normalization.
fn load_ohlc_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.trim().to_lowercase()).collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let idx = |names: &[&str]| -> Option<usize> { headers.iter().position(|h| names.contains(&h.as_str())) };

    // Common Binance headers
    let columns = [
        ("Date", idx(&["time", "timestamp", "open_time", "date", "datetime"])),
        ("Open", idx(&["open", "o"])),
        ("High", idx(&["high", "h"])),
        ("Low", idx(&["low", "l"])),
        ("Close", idx(&["close", "c", "adj_close", "close_price"])),
        ("Volume", idx(&["volume", "vol", "v"])),
    ];
    for (key, col) in &columns {
        if col.is_none() && *key != "Volume" {
            warn!(column = key, "could not find column; rows will be dropped");
        }
    }

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let mut raw = RawRecord::new();
        for (key, col) in &columns {
            if let Some(cell) = col.and_then(|i| rec.get(i)) {
                raw = raw.with(*key, cell.trim());
            }
        }
        out.push(raw);
    }
    Ok(out)
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_csv_and_cvs() {
        assert_eq!(swap_ext(Path::new("a/b.cvs")), Some(PathBuf::from("a/b.csv")));
        assert_eq!(swap_ext(Path::new("b.CSV")), Some(PathBuf::from("b.cvs")));
        assert_eq!(swap_ext(Path::new("b.json")), None);
    }

    #[test]
    fn sample_csv_loads_as_ohlc() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_ohlc.csv");
        let result = load_result(&path).expect("load csv");
        assert_eq!(result.ohlc().len(), 60);
        let series = chart_core::normalize(result.ohlc(), &chart_core::series::OHLC_SERIES);
        assert_eq!(series.len(), 60);
        assert!(series.has_field("volume"));
    }

    #[test]
    fn sample_backtest_builds_full_dashboard() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/sample_backtest.json");
        let result = load_result(&path).expect("load json");
        let body = Body::new();
        let dash = Dashboard::build(&result, &theme::find("dashboard"), &body).expect("dashboard");
        assert!(dash.panels().iter().filter_map(|p| p.chart()).all(|c| !c.scene().is_placeholder()));
        assert_eq!(body.layer_count(), 3);
    }
}
