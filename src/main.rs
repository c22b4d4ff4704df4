// Fri Aug 07 2026 - Alex

use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use telemetry_dictionary::{
    utils::logging, DictionaryEngine, EngineConfig, LayoutValue, ProjectFile,
};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Telemetry dictionary macro expansion and structure layout", long_about = None)]
struct Args {
    /// Project file with data types, macros, and the variable hierarchy
    #[arg(short, long)]
    project: PathBuf,

    /// Expand the supplied text and print the result
    #[arg(short, long)]
    expand: Vec<String>,

    /// Print the byte offset of a variable path
    #[arg(long)]
    offset: Vec<String>,

    /// Print the size in bytes of a primitive or structure type
    #[arg(long)]
    size: Vec<String>,

    /// Write the layout table as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the layout table as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Macro delimiter string
    #[arg(long, default_value = "##")]
    identifier: String,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();

    logging::init(args.verbose as usize);

    let config = EngineConfig::new().with_macro_identifier(&args.identifier);
    if let Err(message) = config.validate() {
        eprintln!("{} Invalid configuration: {}", "[!]".red(), message);
        std::process::exit(1);
    }

    println!("{} Loading project: {}", "[*]".blue(), args.project.display());

    let project = match ProjectFile::load(&args.project) {
        Ok(project) => project,
        Err(e) => {
            eprintln!("{} Failed to load project: {}", "[!]".red(), e);
            std::process::exit(1);
        }
    };

    let mut engine = DictionaryEngine::with_config(config);
    engine.load_project(&project);

    println!(
        "{} Dictionary ready: {} data types, {} macros, {} layout entries",
        "[+]".green(),
        engine.data_types().len(),
        engine.macros().definitions().len(),
        engine.layout().len()
    );

    for text in &args.expand {
        let expansion = engine.expand(text);
        let marker = if expansion.is_trusted() {
            "[+]".green()
        } else {
            "[!]".yellow()
        };
        println!("{} {} => {}", marker, text.cyan(), expansion.text);
        if expansion.recursive {
            println!("    {}", "macro reference cycle detected".yellow());
        }
        if expansion.invalid_type {
            println!("    {}", "sizeof() references an invalid data type".yellow());
        }
    }

    for path in &args.offset {
        match engine.offset_of(path) {
            Some(offset) => println!("{} {} @ byte {}", "[+]".green(), path.cyan(), offset),
            None => println!("{} {} not found", "[!]".yellow(), path.cyan()),
        }
    }

    for name in &args.size {
        println!(
            "{} sizeof({}) = {}",
            "[+]".green(),
            name.cyan(),
            engine.size_of_type(name)
        );
    }

    if let Some(path) = &args.output {
        if let Err(e) = save_layout_json(&engine, path) {
            eprintln!("{} Failed to write layout JSON: {}", "[!]".red(), e);
            std::process::exit(1);
        }
        println!("{} Layout table saved to: {}", "[+]".green(), path.display());
    }

    if let Some(path) = &args.csv {
        if let Err(e) = save_layout_csv(&engine, path) {
            eprintln!("{} Failed to write layout CSV: {}", "[!]".red(), e);
            std::process::exit(1);
        }
        println!("{} Layout table saved to: {}", "[+]".green(), path.display());
    }
}

fn save_layout_json(engine: &DictionaryEngine, path: &PathBuf) -> anyhow::Result<()> {
    let entries = engine.layout().entries();
    let text = serde_json::to_string_pretty(&entries)?;

    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;

    Ok(())
}

fn save_layout_csv(engine: &DictionaryEngine, path: &PathBuf) -> anyhow::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "Path,Kind,Value")?;
    for (entry_path, value) in engine.layout().iter() {
        let (kind, raw) = match value {
            LayoutValue::Offset(offset) => ("offset", offset),
            LayoutValue::StructSize(size) => ("size", size),
        };
        writeln!(file, "\"{}\",{},{}", entry_path, kind, raw)?;
    }

    Ok(())
}
