use std::path::PathBuf;

use clap::Parser;
use log::info;

use strokeplay::loader;
use strokeplay::report::Report;
use strokeplay::Course;

/// Stroke-play analytics for a two-course, two-round qualifying championship.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding course_pars.csv and round_scores.csv
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Rows in each hardest/easiest ranking
    #[arg(long, default_value_t = 5)]
    top: usize,

    /// Restrict the per-course sections to one course (lake or ocean)
    #[arg(long, value_parser = Course::parse)]
    course: Option<Course>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let snapshot = loader::load_dir(&args.data_dir)?;
    info!(
        "snapshot: {} rounds, {} warnings",
        snapshot.rounds().len(),
        snapshot.warnings().len()
    );

    let mut report = Report::build(&snapshot, args.top);
    if let Some(course) = args.course {
        report.courses.retain(|section| section.course == course);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
