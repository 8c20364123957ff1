//! Convert a delimited text table into a memory-mapped f64 matrix

use std::path::PathBuf;

use clap::Parser;
use tabmat::{page_rounded_size, MappedRegion, ScanConfig};

#[derive(Parser)]
#[command(author, version)]
#[command(about = "Convert delimited numeric text into a memory-mapped f64 matrix")]
struct Cli {
    /// Input text table
    input: PathBuf,

    /// Destination file for the binary matrix (anonymous memory if omitted)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Echo the normalized text before converting
    #[arg(long)]
    print: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = ScanConfig::default();

    let size = page_rounded_size(&cli.input)?;
    let mut text = MappedRegion::open_text(&cli.input, "r", size, &config)?;

    if cli.print {
        text.print_text(&config.separators)?;
    }

    let matrix = text.to_double_matrix(cli.output.as_deref(), &config)?;
    let (fields, records) = matrix
        .matrix_dims()
        .expect("converted region carries its dimensions");
    println!(
        "{} records x {} fields -> {} mapped bytes",
        records,
        fields,
        matrix.mapped_len()
    );

    let values = matrix.matrix_values()?;
    if let Some(first) = values.first() {
        println!("first value: {first}");
    }

    matrix.close()?;
    text.close()?;
    Ok(())
}
