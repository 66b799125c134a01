use platen::{PipelineBuilder, PipelineError};
use serde_json::{Value, from_str};
use std::env;
use std::fs;
use std::time::Instant;

/// A simple CLI to fill a JSON report template with a JSON data file.
fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("A simple tool to print reports on ESC/P printers from JSON data and a JSON template.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/template.json> <path/to/data.json> <path/to/output.prn>",
            args[0]
        );
        std::process::exit(1);
    }

    let template_path = &args[1];
    let data_path = &args[2];
    let output_path = &args[3];

    println!("Loading template from {}", template_path);
    let pipeline = PipelineBuilder::new().with_template_file(template_path)?.build()?;

    println!("Loading data from {}", data_path);
    let data_json_str = fs::read_to_string(data_path)?;
    let data_json: Value = from_str(&data_json_str)?;

    println!("Filling report to {}...", output_path);
    let start = Instant::now();
    let written = pipeline.generate_to_file(data_json, output_path)?;

    println!("Successfully wrote {} bytes to {} in {:?}", written, output_path, start.elapsed());
    Ok(())
}
