use clap::{Parser, Subcommand};
use lift_core::input::{parse_set_line, parse_set_spec, SetInput};
use lift_core::timer::format_remaining;
use lift_core::types::date_format;
use lift_core::*;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout log with next-week weight recommendations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout session
    Log {
        /// Exercise name (e.g., "Bench Press", "Squat")
        #[arg(short, long)]
        exercise: String,

        /// Workout type (upper, lower, push, pull, legs, full_body, or any label)
        #[arg(short, long)]
        workout_type: Option<String>,

        /// Target reps per set
        #[arg(short, long)]
        target_reps: Option<u32>,

        /// A set as WEIGHTxREPS, e.g. 135x10 (repeat for each set)
        #[arg(short, long = "set", value_name = "WEIGHTxREPS")]
        sets: Vec<String>,

        /// Session time as "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(long)]
        date: Option<String>,

        /// Dry run - show recommendation without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Show workout history and latest recommendations (default)
    History {
        /// Also write the history table to a CSV file
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },

    /// Run a rest timer; press Enter to stop early
    Rest {
        /// Rest length in seconds
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        seconds: Option<u64>,
    },
}

fn main() {
    // Initialize logging
    lift_core::logging::init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Some(Commands::Log {
            exercise,
            workout_type,
            target_reps,
            sets,
            date,
            dry_run,
        }) => {
            let mut draft = SessionDraft::new(
                workout_type
                    .as_deref()
                    .map(WorkoutType::parse)
                    .unwrap_or_else(|| config.default_workout_type()),
                exercise,
                target_reps.unwrap_or(config.logging.default_target_reps),
            );
            draft.sets = if sets.is_empty() {
                prompt_sets()?
            } else {
                sets.iter().map(|s| parse_set_spec(s)).collect()
            };
            cmd_log(&data_dir, draft, date, dry_run)
        }
        Some(Commands::History { export }) => cmd_history(&data_dir, export.as_deref()),
        Some(Commands::Rest { seconds }) => {
            cmd_rest(seconds.unwrap_or(config.timer.rest_seconds))
        }
        None => {
            // Default to "history" command
            cmd_history(&data_dir, None)
        }
    }
}

fn cmd_log(
    data_dir: &Path,
    draft: SessionDraft,
    date: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let date = match date {
        Some(text) => date_format::parse(&text)
            .map_err(|e| Error::Validation(format!("Invalid date {:?}: {}", text, e)))?,
        None => chrono::Local::now().naive_local(),
    };

    let (sets, warnings) = draft.sets();
    for warning in &warnings {
        eprintln!("Warning: {}", warning);
    }

    println!();
    println!("  {} ({})", draft.exercise.trim(), draft.workout_type);
    println!("  Target: {} reps", draft.target_reps);
    for (idx, set) in sets.iter().enumerate() {
        println!("  Set {}: {} x {}", idx + 1, format_weight(set.weight), set.reps);
    }
    println!();
    println!(
        "Recommended weight next week (based on top working set): {}",
        format_weight(draft.preview())
    );

    if dry_run {
        draft.validate()?;
        println!("\n[Dry run - not saving session]");
        return Ok(());
    }

    let session = draft.into_session(date)?;
    let mut store = JsonFileStore::in_dir(data_dir);
    store.append(session)?;

    println!("\n✓ Saved!");
    Ok(())
}

fn cmd_history(data_dir: &Path, export: Option<&Path>) -> Result<()> {
    let store = JsonFileStore::in_dir(data_dir);
    let sessions = store.load()?;

    if sessions.is_empty() {
        println!("No workouts logged yet. Use `liftlog log` to add your first session.");
        return Ok(());
    }

    let mut rows = flatten(&sessions);
    let latest = latest_per_exercise(&rows);
    sort_for_display(&mut rows);

    println!("Workout History");
    println!();
    display_history(&rows);

    println!();
    println!("Latest recommendations (per exercise)");
    println!();
    display_recommendations(latest.values());

    if let Some(path) = export {
        let count = export_rows_csv(&rows, path)?;
        println!();
        println!("✓ Exported {} rows to {}", count, path.display());
    }

    Ok(())
}

fn cmd_rest(seconds: u64) -> Result<()> {
    println!("Resting for {}. Press Enter to stop early.", format_remaining(Duration::from_secs(seconds)));

    let handle = RestTimer::start(
        Duration::from_secs(seconds),
        Duration::from_secs(1),
        |remaining| {
            print!("\r  ⏱  {}   ", format_remaining(remaining));
            let _ = io::stdout().flush();
        },
    );

    // Enter (or closed stdin) is the stop signal
    let stdin_watch = std::thread::spawn(|| {
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
    });
    while !handle.is_finished() && !stdin_watch.is_finished() {
        std::thread::sleep(Duration::from_millis(50));
    }
    handle.stop();

    match handle.wait() {
        TimerOutcome::Finished => println!("\n✓ Rest over - next set!"),
        TimerOutcome::Stopped => println!("\nRest stopped."),
    }
    Ok(())
}

fn display_history(rows: &[SetRow]) {
    let exercise_width = column_width(rows.iter().map(|r| r.exercise.as_str()), "Exercise");
    let workout_width = column_width(rows.iter().map(|r| r.workout_type.as_str()), "Workout");

    println!(
        "{:<16}  {:<ww$}  {:<ew$}  {:>3}  {:>8}  {:>4}  {:>11}",
        "Date",
        "Workout",
        "Exercise",
        "Set",
        "Weight",
        "Reps",
        "Target Reps",
        ww = workout_width,
        ew = exercise_width,
    );
    for row in rows {
        println!(
            "{:<16}  {:<ww$}  {:<ew$}  {:>3}  {:>8}  {:>4}  {:>11}",
            row.date.format(date_format::FORMAT).to_string(),
            row.workout_type,
            row.exercise,
            row.set_index,
            format_weight(row.weight),
            row.reps,
            row.target_reps,
            ww = workout_width,
            ew = exercise_width,
        );
    }
}

fn display_recommendations<'a>(recommendations: impl Iterator<Item = &'a Recommendation> + Clone) {
    let exercise_width = column_width(recommendations.clone().map(|r| r.exercise.as_str()), "Exercise");

    println!(
        "{:<ew$}  {:>11}  {:>15}  {:>21}",
        "Exercise",
        "Last Weight",
        "Hit Target Reps",
        "Recommended Next Week",
        ew = exercise_width,
    );
    for rec in recommendations {
        println!(
            "{:<ew$}  {:>11}  {:>15}  {:>21}",
            rec.exercise,
            format_weight(rec.last_weight),
            if rec.hit_target { "yes" } else { "no" },
            format_weight(rec.recommended_weight),
            ew = exercise_width,
        );
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(header.len())
}

/// Whole weights print without decimals, others with up to two
fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{:.0}", weight)
    } else {
        let s = format!("{:.2}", weight);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn prompt_sets() -> Result<Vec<SetInput>> {
    println!("Enter sets as \"weight reps\" (e.g. 135 10), blank line to finish:");

    let stdin = io::stdin();
    let mut sets = Vec::new();
    loop {
        print!("  Set {}> ", sets.len() + 1);
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let (input, extra) = parse_set_line(line);
        if let Some(extra) = extra {
            eprintln!("Warning: Set {}: ignoring extra input {:?}", sets.len() + 1, extra);
        }
        sets.push(input);
    }

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_weight() {
        assert_eq!(format_weight(135.0), "135");
        assert_eq!(format_weight(138.38), "138.38");
        assert_eq!(format_weight(102.5), "102.5");
        assert_eq!(format_weight(0.0), "0");
        assert_eq!(format_weight(5.999), "6");
    }
}
