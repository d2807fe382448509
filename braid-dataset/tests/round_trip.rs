use braid_dataset::{
    load_dataset, write_dataset, BraidGenerator, Dataset, DatasetEntry, DatasetHeader,
    GeneratorConfig,
};
use braid_engine::{BraidWord, BurauOracle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("braid_dataset_{}_{}", std::process::id(), name))
}

#[test]
fn test_write_then_load_round_trips() {
    let header = DatasetHeader {
        count: 3,
        n_strands: 3,
        crossings: 4,
        difficulty: 5,
        optimal: true,
    };
    let entries = vec![
        DatasetEntry {
            word: BraidWord::from_ints(3, &[1, 2, -2, -1]).unwrap(),
            optimal_steps: Some(2),
        },
        DatasetEntry {
            word: BraidWord::from_ints(3, &[2, 1, -1, -2]).unwrap(),
            optimal_steps: Some(-1),
        },
        DatasetEntry {
            word: BraidWord::from_ints(3, &[]).unwrap(),
            optimal_steps: Some(0),
        },
    ];

    let path = temp_path("round_trip.txt");
    write_dataset(
        &path,
        &Dataset {
            header,
            entries: entries.clone(),
        },
    )
    .unwrap();

    let loaded = load_dataset(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded.header, header);
    assert_eq!(loaded.entries, entries);
}

#[test]
fn test_malformed_lines_are_skipped_not_fatal() {
    let path = temp_path("malformed.txt");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "4,3,4,0").unwrap();
    writeln!(file, "[1, -1]").unwrap();
    writeln!(file, "this line is garbage").unwrap();
    writeln!(file, "[1, 7]").unwrap(); // magnitude out of range for 3 strands
    writeln!(file, "([2, -2], 1)").unwrap();
    drop(file);

    let loaded = load_dataset(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded.entries.len(), 2, "good lines survive the bad ones");
    assert_eq!(loaded.entries[0].word.as_ints(), vec![1, -1]);
    assert_eq!(loaded.entries[1].optimal_steps, Some(1));
}

#[test]
fn test_missing_header_is_fatal() {
    let path = temp_path("empty.txt");
    fs::File::create(&path).unwrap();

    let result = load_dataset(&path);
    fs::remove_file(&path).ok();
    assert!(result.is_err(), "an empty file has no header");
}

#[test]
fn test_generated_dataset_round_trips() {
    let n_strands = 3;
    let builder = BraidGenerator::new(n_strands, GeneratorConfig::new(6, 10));
    let oracle = BurauOracle::new(n_strands);
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    let entries: Vec<DatasetEntry> = (0..5)
        .map(|_| DatasetEntry {
            word: builder.build_confirmed(&mut rng, &oracle),
            optimal_steps: None,
        })
        .collect();

    let dataset = Dataset {
        header: DatasetHeader {
            count: entries.len(),
            n_strands,
            crossings: 6,
            difficulty: 10,
            optimal: false,
        },
        entries,
    };

    let path = temp_path("generated.txt");
    write_dataset(&path, &dataset).unwrap();
    let loaded = load_dataset(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(loaded.entries.len(), 5);
    for (loaded, original) in loaded.entries.iter().zip(&dataset.entries) {
        assert_eq!(loaded.word.as_ints(), original.word.as_ints());
        assert_eq!(loaded.optimal_steps, None);
    }
}
