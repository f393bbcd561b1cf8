//! Load Audit
//!
//! Run with: `cargo run --bin load_audit -- scene.json [--settle] [--out settled.json]`
//!
//! Loads a scene file and reports, per item, whether it sits inside a usable
//! zone, plus any interpenetrating pairs. With `--settle` every item is first
//! dropped onto whatever is below it. Exits non-zero when the scene fails to
//! load or the arrangement has overlaps.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use truckload_engine::Scene;

#[derive(Parser)]
#[command(name = "load_audit", version, about = "Audit a truck load arrangement")]
struct Args {
    /// Scene file (JSON)
    scene: PathBuf,
    /// Settle every item under gravity before auditing
    #[arg(long)]
    settle: bool,
    /// Write the (possibly settled) scene back out
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt().without_time().compact().init();

    let args = Args::parse();
    let scene = match Scene::load(&args.scene) {
        Ok(scene) => scene,
        Err(e) => {
            error!(path = %args.scene.display(), "failed to load scene: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut planner = scene.into_planner();
    if args.settle {
        let moved = planner.settle_all();
        info!(moved, "settled");
    }

    let report = planner.audit();
    println!(
        "envelope {} x {} x {} ({:?}), {} zone(s)",
        planner.envelope().length,
        planner.envelope().width,
        planner.envelope().height,
        planner.envelope().shape_mode(),
        planner.zones().len()
    );
    for item in planner.store().items() {
        let status = if item.hidden {
            "hidden"
        } else if report.contained.contains(&item.id) {
            "loaded"
        } else {
            "OUT OF GAUGE"
        };
        let p = item.position;
        println!(
            "  #{:<4} {:<16} ({:>8.2}, {:>8.2}, {:>8.2})  {status}",
            item.id, item.template_id, p.x, p.y, p.z
        );
    }
    for (a, b) in &report.overlapping {
        println!("  overlap: #{a} and #{b}");
    }
    println!(
        "loaded {}/{} items, weight {:.1}/{:.1}, volume {:.1}",
        report.contained.len(),
        report.contained.len() + report.out_of_gauge.len(),
        report.loaded_weight,
        report.total_weight,
        report.loaded_volume
    );

    if let Some(out) = &args.out {
        let written = Scene::capture(&planner)
            .to_json()
            .and_then(|json| std::fs::write(out, json).map_err(Into::into));
        if let Err(e) = written {
            error!(path = %out.display(), "failed to write scene: {e}");
            return ExitCode::FAILURE;
        }
        info!(path = %out.display(), "wrote scene");
    }

    if report.is_legal() {
        ExitCode::SUCCESS
    } else {
        error!(pairs = report.overlapping.len(), "arrangement has overlapping items");
        ExitCode::FAILURE
    }
}
