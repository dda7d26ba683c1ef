use clap::{Parser, Subcommand};
use ndarray::{Array3, Axis};
use regex::Regex;
use std::path::Path;

mod error;
mod image_io;
mod labels;
mod segment;

use error::SegError;
use image_io::{load_grayscale, load_rgba, save_mask, save_rgba};
use labels::decode::decode_labels;
use labels::palette::random_color_table;
use labels::propagate::assign_labels;
use segment::segment_cells;
use segment::wall::extract_wall;

const DEFAULT_BLOCK_SIZE: usize = 21;
const DEFAULT_OFFSET: f32 = 1.0;

#[derive(Parser, Debug)]
#[command(name = "serialseg")]
#[command(about = "Cell segmentation and label propagation for serial section microscopy")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short = 't', long, global = true, default_value = None)]
    nthreads: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the cell wall mask from a grayscale slice
    ExtractWall {
        input: String,
        output: String,

        #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,

        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: f32,
    },

    /// Segment a slice into labeled cells and render them for inspection
    LabelCells {
        input: String,
        output: String,

        #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,

        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: f32,
    },

    /// Segment slices and carry labels over from an annotated reference stack
    AssignLabels {
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<String>,

        #[arg(short, long, required = true, num_args = 1..)]
        reference: Vec<String>,

        #[arg(short, long, default_value = ".")]
        output: String,

        #[arg(short, long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,

        #[arg(long, default_value_t = DEFAULT_OFFSET)]
        offset: f32,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(nthreads) = cli.nthreads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(nthreads)
            .build_global()
            .unwrap();
    }

    if let Err(err) = run(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), SegError> {
    match command {
        Command::ExtractWall {
            input,
            output,
            block_size,
            offset,
        } => {
            let image = load_grayscale(&input)?;
            let wall = extract_wall(&image, block_size, offset)?;
            save_mask(&output, &wall)?;
        }

        Command::LabelCells {
            input,
            output,
            block_size,
            offset,
        } => {
            let image = load_grayscale(&input)?;
            let cells = segment_cells(&image, block_size, offset)?;
            let n_labels = cells.iter().copied().max().unwrap_or(0);
            println!("Segmented {} cells", n_labels);

            let table = random_color_table(n_labels);
            save_rgba(&output, &table.recolor(&cells))?;
        }

        Command::AssignLabels {
            input,
            reference,
            output,
            block_size,
            offset,
        } => {
            let planes = reference
                .iter()
                .map(|path| load_rgba(path))
                .collect::<Result<Vec<_>, _>>()?;
            let (maps, table) = decode_labels(&planes)?;
            println!(
                "Decoded {} reference slices, {} colors",
                maps.len(),
                table.len()
            );

            let views: Vec<_> = maps.iter().map(|m| m.view()).collect();
            let volume: Array3<u32> = ndarray::stack(Axis(0), &views).unwrap();

            for input_path in &input {
                println!("Processing {}", input_path);
                let image = load_grayscale(input_path)?;
                let cells = segment_cells(&image, block_size, offset)?;
                let relabeled = assign_labels(&cells, &volume)?;

                let output_path = Path::new(&output)
                    .join(output_name(input_path))
                    .display()
                    .to_string();
                save_rgba(&output_path, &table.recolor(&relabeled))?;
            }
        }
    }

    return Ok(());
}

// Output slices are named after the last digit group in the input filename
// (the slice number), falling back to the whole basename.
fn output_name(input_path: &str) -> String {
    let basename = Path::new(input_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input_path.to_string());

    let digits = Regex::new(r"\d+").unwrap();
    match digits.find_iter(&basename).last() {
        Some(m) => format!("{}.png", m.as_str()),
        None => basename,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_name_uses_last_digit_group() {
        assert_eq!(output_name("stack/slice_0042_v2.png"), "2.png");
        assert_eq!(output_name("section17.png"), "17.png");
    }

    #[test]
    fn test_output_name_falls_back_to_basename() {
        assert_eq!(output_name("stack/slice.png"), "slice.png");
    }
}
