use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde::de::DeserializeOwned;
use sprawl_layout::*;
use tracing::{debug, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

mod report;
mod scene;

use report::Report;
use scene::Scene;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    Random,
    Layered,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Axis {
    Both,
    Horizontal,
    Vertical,
}

impl From<Axis> for OverlapAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::Both => OverlapAxis::Both,
            Axis::Horizontal => OverlapAxis::Horizontal,
            Axis::Vertical => OverlapAxis::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Ron,
}

/// Lay out a synthetic graph and print the result
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Algorithm::Layered)]
    algorithm: Algorithm,

    /// Seed of both the graph and the layout, overriding the parameter file.
    /// Taken from the file, or random, if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short = 'n', long, default_value_t = 12)]
    vertices: usize,

    /// Maximum number of outgoing edges of a vertex
    #[arg(long, default_value_t = 2)]
    fan_out: usize,

    /// Width of the random layout bounds, overriding the parameter file
    #[arg(long)]
    width: Option<f64>,

    /// Height of the random layout bounds, overriding the parameter file
    #[arg(long)]
    height: Option<f64>,

    /// RON file with the algorithm parameters
    #[arg(short, long)]
    parameters: Option<PathBuf>,

    /// Remove overlaps, keeping this gap between vertices
    #[arg(long)]
    gap: Option<f64>,

    #[arg(long, value_enum, default_value_t = Axis::Both)]
    axis: Axis,

    /// Route edges when the algorithm doesn't
    #[arg(long)]
    route: bool,

    /// Cancel the layout after this many milliseconds
    #[arg(long)]
    deadline_ms: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

/// Parameters from `path` or the defaults, observed so that overrides get
/// logged. `seed` replaces the loaded seed only when given.
fn load_parameters<P>(path: Option<&Path>, seed: Option<u64>) -> Result<Observed<P>>
where
    P: LayoutParameters + Default + DeserializeOwned,
{
    let parameters = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            ron::from_str(&text).with_context(|| format!("Invalid parameters in {}", path.display()))?
        }
        None => P::default(),
    };

    let mut parameters = Observed::new(parameters);
    parameters.on_change(|field, _| debug!("Parameter {field:?} overridden"));
    if let Some(seed) = seed {
        parameters.update(|p| p.set_seed(seed));
    }
    Ok(parameters)
}

/// Replace the given dimensions of the bounds, keeping their origin
fn override_bounds(
    parameters: &mut Observed<RandomLayoutParameters>,
    width: Option<f64>,
    height: Option<f64>,
) {
    if width.is_none() && height.is_none() {
        return;
    }
    let bounds = parameters.get().bounds();
    let bounds = Rect::new(
        bounds.x,
        bounds.y,
        width.unwrap_or(bounds.width),
        height.unwrap_or(bounds.height),
    );
    parameters.update(|p| p.set_bounds(bounds));
}

fn cancel_after(token: CancellationToken, deadline: Duration) {
    thread::spawn(move || {
        thread::sleep(deadline);
        warn!("Deadline of {deadline:?} reached, cancelling layout");
        token.cancel();
    });
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let token = CancellationToken::new();
    if let Some(deadline) = args.deadline_ms {
        cancel_after(token.clone(), Duration::from_millis(deadline));
    }

    let mut pipeline = LayoutPipeline::new();
    if let Some(gap) = args.gap {
        let parameters = OverlapParameters::new(gap, gap)?.with_axis(args.axis.into());
        pipeline = pipeline.with_overlap_removal(ScanOverlapRemoval::new(), parameters);
    }
    if args.route {
        pipeline = pipeline.with_router(OrthogonalRouter::default());
    }

    let (seed, outcome) = match args.algorithm {
        Algorithm::Random => {
            let mut parameters = load_parameters::<RandomLayoutParameters>(
                args.parameters.as_deref(),
                args.seed,
            )?;
            override_bounds(&mut parameters, args.width, args.height);
            let seed = parameters.get().seed();
            let scene = Scene::generate(seed, args.vertices, args.fan_out)?;

            let mut algorithm = RandomLayout::new(parameters.snapshot());
            algorithm.initialize(scene.input())?;
            (seed, pipeline.run(&mut algorithm, &token)?)
        }
        Algorithm::Layered => {
            let parameters = load_parameters::<LayeredLayoutParameters>(
                args.parameters.as_deref(),
                args.seed,
            )?;
            let seed = parameters.get().seed();
            let scene = Scene::generate(seed, args.vertices, args.fan_out)?;

            let mut algorithm = LayeredLayout::new(parameters.snapshot());
            let input = scene.input().with_listener(|event: &mut IterationEvent<usize>| {
                debug!(
                    "Iteration {} ({:.0}%): {}",
                    event.iteration,
                    event.status_in_percent,
                    event.message
                );
                if event.status == IterationStatus::Finished {
                    info!("Positions settled after {} iterations", event.iteration + 1);
                }
            });
            algorithm.initialize(input)?;
            (seed, pipeline.run(&mut algorithm, &token)?)
        }
    };

    let report = Report::new(seed, &outcome);
    match args.format {
        Format::Text => print!("{report}"),
        Format::Ron => println!("{}", report.to_ron()?),
    }

    Ok(())
}
