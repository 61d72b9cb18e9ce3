pub mod chant;
pub mod output;
pub mod reader;
pub mod render;
pub mod stats;

// Re-export the transform pipeline
pub use chant::{
    build_syllables, classify_tones, place_hints, split_segments, tokenize, ChantConfig, Segment, Syllable,
    Transcriber, Transcript, Unit, UnitClass,
};

// Re-export preprocessing
pub use chant::normalization::{prepare, CommentMarks, PreprocessOptions, Prepared};

// Re-export rendering and file handling
pub use output::{generate_output_path, write_output};
pub use reader::{read_document, ReadStats};
pub use render::{render, OutputFormat, RenderOptions, StyleOptions};
pub use stats::{write_stats, RunStats};
