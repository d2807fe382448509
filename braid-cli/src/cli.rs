use braid_dataset::{load_dataset, DatasetHeader};
use braid_engine::{BurauState, Generator, Move, MoveKind, OptimalReducer};
use std::time::{Duration, Instant};

/// Default wall-clock budget per word, matching the generation default.
const DEFAULT_DEADLINE_SECS: u64 = 30;

/// Default intermediate-word cap when the caller does not override it.
const DEFAULT_MAX_LEN: usize = 64;

/// JSON output structure for one move of a solution.
/// MoveKind and Generator serialize as their wire codes.
#[derive(serde::Serialize)]
struct MoveOutput {
    kind: MoveKind,
    position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    generator: Option<Generator>,
}

impl From<&Move> for MoveOutput {
    fn from(mv: &Move) -> Self {
        let generator = match mv {
            Move::InsertPair(_, gen) => Some(*gen),
            _ => None,
        };
        MoveOutput {
            kind: mv.kind(),
            position: mv.position(),
            generator,
        }
    }
}

/// JSON output structure for each solved dataset entry.
///
/// `writhe` is invariant under all four moves, so a nonzero value explains
/// an unsolved entry: the word was never the identity to begin with.
#[derive(serde::Serialize)]
struct SolveOutput {
    index: usize,
    length: usize,
    writhe: i32,
    burau_trace_magnitude: f64,
    /// Minimal move count, or -1 when the search found nothing in time.
    optimal_steps: i32,
    elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<MoveOutput>>,
}

/// Trailing JSON summary for a solve run.
#[derive(serde::Serialize)]
struct SummaryOutput {
    dataset: DatasetHeader,
    solved: usize,
    unsolved: usize,
}

/// Runs the solve mode: one JSON line per dataset entry, then a summary.
pub fn run_solve(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    if args.len() < 2 {
        eprintln!(
            "Usage: {} [--max-len N] [--deadline SECS] <dataset_path>",
            args[0]
        );
        eprintln!("       {} --generate --out PATH --count N --strands N --crossings N --difficulty N [--seed S] [--optimal] [--deadline SECS] [--max-len N]", args[0]);
        std::process::exit(1);
    }

    let mut max_len = DEFAULT_MAX_LEN;
    let mut deadline_secs = DEFAULT_DEADLINE_SECS;
    let mut dataset_path = None;

    let mut i = 1;
    while i < args.len() {
        if args[i] == "--max-len" && i + 1 < args.len() {
            max_len = args[i + 1].parse()?;
            i += 2;
        } else if args[i] == "--deadline" && i + 1 < args.len() {
            deadline_secs = args[i + 1].parse()?;
            i += 2;
        } else if dataset_path.is_none() {
            dataset_path = Some(&args[i]);
            i += 1;
        } else {
            i += 1;
        }
    }

    let dataset_path = dataset_path.ok_or("Missing dataset path")?;
    let dataset = load_dataset(dataset_path)?;
    log::info!(
        "loaded {} words on {} strands from {}",
        dataset.entries.len(),
        dataset.header.n_strands,
        dataset_path
    );

    let reducer = OptimalReducer::new(dataset.header.n_strands, max_len);
    let deadline = Duration::from_secs(deadline_secs);
    let mut solved = 0;

    for (index, entry) in dataset.entries.iter().enumerate() {
        let started = Instant::now();
        let solution = reducer.solve(&entry.word, deadline);
        let elapsed_ms = started.elapsed().as_millis();

        let fingerprint = BurauState::of_word(&entry.word);
        let (optimal_steps, moves) = match solution {
            Some(moves) => {
                solved += 1;
                (
                    moves.len() as i32,
                    Some(moves.iter().map(MoveOutput::from).collect()),
                )
            }
            None => (-1, None),
        };

        let output = SolveOutput {
            index,
            length: entry.word.len(),
            writhe: fingerprint.writhe(),
            burau_trace_magnitude: fingerprint.trace_magnitude(),
            optimal_steps,
            elapsed_ms,
            moves,
        };

        println!("{}", serde_json::to_string(&output)?);
    }

    let summary = SummaryOutput {
        dataset: dataset.header,
        solved,
        unsolved: dataset.entries.len() - solved,
    };
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
