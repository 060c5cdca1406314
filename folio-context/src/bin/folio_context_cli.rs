use clap::Parser;
use folio_context::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, TextSplitter, work_title};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// A CLI tool to preview how a play is split into chunks before indexing.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input text file. If not provided, reads from stdin.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Source label for the chunks. Derived from the input file name if omitted.
    #[arg(short, long)]
    source: Option<String>,

    /// Maximum length for each text chunk, in characters.
    #[arg(short = 'c', long, default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,

    /// Characters shared between neighbouring chunks.
    #[arg(short = 'o', long, default_value_t = DEFAULT_CHUNK_OVERLAP)]
    chunk_overlap: usize,

    /// Comma-separated list of literal separators, most significant first.
    #[arg(short, long, value_delimiter = ',')]
    separators: Option<Vec<String>>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    if args.chunk_size == 0 || args.chunk_overlap > args.chunk_size {
        eprintln!("Error: chunk overlap must not exceed a positive chunk size");
        std::process::exit(2);
    }

    let (content, file_path) = if let Some(input_path) = &args.input {
        (
            fs::read_to_string(input_path)?,
            input_path.to_string_lossy().into_owned(),
        )
    } else {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        (buffer, "<stdin>".to_string())
    };

    let source = match (&args.source, &args.input) {
        (Some(source), _) => source.clone(),
        (None, Some(path)) => work_title(path),
        (None, None) => "Unknown".to_string(),
    };

    let splitter = match &args.separators {
        Some(separators) => {
            let refs: Vec<&str> = separators.iter().map(|s| s.as_str()).collect();
            TextSplitter::new(&refs, args.chunk_size, args.chunk_overlap)
        }
        None => TextSplitter::new(
            folio_context::DEFAULT_SEPARATORS,
            args.chunk_size,
            args.chunk_overlap,
        ),
    };

    let chunks = splitter.chunk_document(&source, &file_path, &content);

    let json_output = serde_json::to_string_pretty(&chunks)?;
    println!("{json_output}");

    Ok(())
}
