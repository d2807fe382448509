pub mod format;
pub mod generator;

pub use format::{
    load_dataset, parse_entry, render_entry, write_dataset, Dataset, DatasetEntry, DatasetError,
    DatasetHeader,
};
pub use generator::{BraidGenerator, GeneratorConfig};
