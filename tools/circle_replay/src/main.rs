use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use circle_pad::{CirclePad, GestureConfig, GestureReport, ReportBuffer};
use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "circle_replay")]
#[command(about = "Replay a recorded pointer trace through the circle pad recognizer")]
struct Cli {
    /// Trace file with one pointer input per line.
    trace: PathBuf,
    /// Gesture config (TOML); engine defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Expected sequence of non-rotation report kinds, one per line.
    #[arg(long)]
    expect: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum TraceInput {
    Geometry { width: f32, height: f32 },
    Begin { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    End,
    Cancel,
    Pinch { scale: f32 },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => GestureConfig::from_path(path)?,
        None => GestureConfig::default(),
    };
    let inputs = parse_trace(&cli.trace)?;
    let mut pad = CirclePad::new(config)?;

    let mut reports: Vec<GestureReport> = Vec::new();
    for input in &inputs {
        let output = replay(&mut pad, *input);
        reports.extend(output.iter().copied());
    }
    // Flush a trace that stops mid-gesture so the consumer still sees an end.
    if pad.state_id() == circle_pad::TrackerStateId::Tracking {
        log::warn!("trace ended mid-gesture, cancelling");
        reports.extend(pad.on_pointer_cancel().iter().copied());
    }

    println!("report,index,kind,turns,direction,value");
    for (index, report) in reports.iter().enumerate() {
        println!("{}", format_report(index, report));
    }
    if let Some(verdict) = pad.last_verdict() {
        println!("verdict,{verdict:?}");
    }

    if let Some(expect_path) = &cli.expect {
        let expected = parse_expected_kinds(expect_path)?;
        let actual: Vec<&'static str> = reports
            .iter()
            .filter(|report| !matches!(report, GestureReport::RotationChanged(_)))
            .map(GestureReport::label)
            .collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            bail!("report sequence mismatch");
        }
    }

    Ok(())
}

fn replay(pad: &mut CirclePad, input: TraceInput) -> ReportBuffer {
    match input {
        TraceInput::Geometry { width, height } => {
            pad.set_geometry(width, height);
            ReportBuffer::new()
        }
        TraceInput::Begin { x, y } => pad.on_pointer_begin(x, y),
        TraceInput::Move { x, y } => pad.on_pointer_move(x, y),
        TraceInput::End => pad.on_pointer_end(),
        TraceInput::Cancel => pad.on_pointer_cancel(),
        TraceInput::Pinch { scale } => pad.on_pinch_update(scale),
    }
}

fn format_report(index: usize, report: &GestureReport) -> String {
    match report {
        GestureReport::RotationChanged(sample) => format!(
            "report,{index},{},{:.4},{},{:.3}",
            report.label(),
            sample.turns,
            sample.direction.label(),
            sample.speed_multiplier
        ),
        GestureReport::FullCircle { turns, direction } => format!(
            "report,{index},{},{turns:.4},{},",
            report.label(),
            direction.label()
        ),
        GestureReport::PinchChanged { scale } => {
            format!("report,{index},{},,,{scale:.4}", report.label())
        }
        GestureReport::GestureStart | GestureReport::GestureEnd => {
            format!("report,{index},{},,,", report.label())
        }
    }
}

fn parse_trace(path: &Path) -> Result<Vec<TraceInput>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        if let Some(input) = parse_trace_line(&line)
            .with_context(|| format!("{}:{line_no} invalid trace line", path.display()))?
        {
            out.push(input);
        }
    }
    Ok(out)
}

fn parse_trace_line(line: &str) -> Result<Option<TraceInput>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
    let input = match parts.as_slice() {
        ["geometry", width, height] => TraceInput::Geometry {
            width: parse_f32(width, "width")?,
            height: parse_f32(height, "height")?,
        },
        ["begin", x, y] => TraceInput::Begin {
            x: parse_f32(x, "x")?,
            y: parse_f32(y, "y")?,
        },
        ["move", x, y] => TraceInput::Move {
            x: parse_f32(x, "x")?,
            y: parse_f32(y, "y")?,
        },
        ["end"] => TraceInput::End,
        ["cancel"] => TraceInput::Cancel,
        ["pinch", scale] => TraceInput::Pinch {
            scale: parse_f32(scale, "scale")?,
        },
        _ => bail!("unrecognized input '{trimmed}'"),
    };
    Ok(Some(input))
}

fn parse_f32(raw: &str, field: &str) -> Result<f32> {
    raw.parse::<f32>()
        .with_context(|| format!("invalid {field} '{raw}'"))
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.with_context(|| format!("failed to read {}:{line_no}", path.display()))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }
        let Some(kind) = normalize_kind(token) else {
            bail!(
                "{}:{line_no} invalid expected report kind: {token}",
                path.display()
            );
        };
        kinds.push(kind);
    }
    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.to_ascii_lowercase().as_str() {
        "start" => Some("start"),
        "full_circle" => Some("full_circle"),
        "pinch" => Some("pinch"),
        "end" => Some("end"),
        _ => None,
    }
}
