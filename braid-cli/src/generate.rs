use braid_dataset::{
    write_dataset, BraidGenerator, Dataset, DatasetEntry, DatasetHeader, GeneratorConfig,
};
use braid_engine::{BraidWord, BurauOracle, OptimalReducer};
use futures::future::join_all;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// Default per-word solver budget when labeling with --optimal.
const DEFAULT_DEADLINE_SECS: u64 = 30;

/// Default intermediate-word cap for the labeling solver.
const DEFAULT_MAX_LEN: usize = 64;

struct GenerateArgs {
    out: String,
    count: usize,
    n_strands: usize,
    crossings: usize,
    difficulty: usize,
    seed: u64,
    compute_optimal: bool,
    deadline_secs: u64,
    max_len: usize,
}

fn parse_args(args: &[String]) -> Result<GenerateArgs, Box<dyn std::error::Error>> {
    let mut out = None;
    let mut count = None;
    let mut n_strands = None;
    let mut crossings = None;
    let mut difficulty = None;
    let mut seed = 42u64;
    let mut compute_optimal = false;
    let mut deadline_secs = DEFAULT_DEADLINE_SECS;
    let mut max_len = DEFAULT_MAX_LEN;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--generate" => i += 1,
            "--optimal" => {
                compute_optimal = true;
                i += 1;
            }
            "--out" | "--count" | "--strands" | "--crossings" | "--difficulty" | "--seed"
            | "--deadline" | "--max-len"
                if i + 1 < args.len() =>
            {
                let value = &args[i + 1];
                match args[i].as_str() {
                    "--out" => out = Some(value.clone()),
                    "--count" => count = Some(value.parse()?),
                    "--strands" => n_strands = Some(value.parse()?),
                    "--crossings" => crossings = Some(value.parse()?),
                    "--difficulty" => difficulty = Some(value.parse()?),
                    "--seed" => seed = value.parse()?,
                    "--deadline" => deadline_secs = value.parse()?,
                    "--max-len" => max_len = value.parse()?,
                    _ => unreachable!(),
                }
                i += 2;
            }
            other => return Err(format!("unexpected argument '{other}'").into()),
        }
    }

    let n_strands: usize = n_strands.ok_or("--generate requires --strands N")?;
    if n_strands < 2 {
        return Err("--strands must be at least 2".into());
    }

    Ok(GenerateArgs {
        out: out.ok_or("--generate requires --out PATH")?,
        count: count.ok_or("--generate requires --count N")?,
        n_strands,
        crossings: crossings.ok_or("--generate requires --crossings N")?,
        difficulty: difficulty.ok_or("--generate requires --difficulty N")?,
        seed,
        compute_optimal,
        deadline_secs,
        max_len,
    })
}

/// Runs the generate mode: builds `count` oracle-confirmed trivial words
/// with a seeded RNG, optionally labels each with its optimal move count,
/// and writes the dataset file.
///
/// Word construction is sequential so a seed pins the exact dataset.
/// Labeling fans out one blocking solver task per word: each `solve` call
/// owns its frontier and best-cost map outright, so the words are
/// embarrassingly parallel.
pub async fn run_generate(args: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(args)?;

    log::info!(
        "generating {} words on {} strands ({} crossings, difficulty {}, seed {})",
        args.count,
        args.n_strands,
        args.crossings,
        args.difficulty,
        args.seed
    );

    let builder = BraidGenerator::new(
        args.n_strands,
        GeneratorConfig::new(args.crossings, args.difficulty),
    );
    let oracle = BurauOracle::new(args.n_strands);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let words: Vec<BraidWord> = (0..args.count)
        .map(|_| builder.build_confirmed(&mut rng, &oracle))
        .collect();

    let entries = if args.compute_optimal {
        label_words(words, &args).await
    } else {
        words
            .into_iter()
            .map(|word| DatasetEntry {
                word,
                optimal_steps: None,
            })
            .collect()
    };

    let dataset = Dataset {
        header: DatasetHeader {
            count: entries.len(),
            n_strands: args.n_strands,
            crossings: args.crossings,
            difficulty: args.difficulty,
            optimal: args.compute_optimal,
        },
        entries,
    };

    write_dataset(&args.out, &dataset)?;
    log::info!("wrote {} entries to {}", dataset.entries.len(), args.out);

    Ok(())
}

/// Labels every word with its optimal move count, `-1` on timeout or
/// frontier exhaustion. One blocking task per word.
async fn label_words(words: Vec<BraidWord>, args: &GenerateArgs) -> Vec<DatasetEntry> {
    let deadline = Duration::from_secs(args.deadline_secs);
    let n_strands = args.n_strands;
    let max_len = args.max_len;

    let tasks = words.into_iter().map(|word| {
        tokio::task::spawn_blocking(move || {
            let reducer = OptimalReducer::new(n_strands, max_len);
            let steps = match reducer.solve(&word, deadline) {
                Some(moves) => moves.len() as i32,
                None => -1,
            };
            DatasetEntry {
                word,
                optimal_steps: Some(steps),
            }
        })
    });

    let mut entries = Vec::new();
    for joined in join_all(tasks).await {
        match joined {
            Ok(entry) => entries.push(entry),
            Err(err) => log::warn!("labeling task failed: {err}"),
        }
    }
    entries
}
