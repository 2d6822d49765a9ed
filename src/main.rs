//! db2html - DocBook help document to HTML converter

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use db2html::{ConvertOptions, Diagnostics};

#[derive(Parser)]
#[command(name = "db2html")]
#[command(version, about = "Convert DocBook help documents to HTML", long_about = None)]
#[command(after_help = "EXAMPLES:
    db2html guide.xml                 Render the whole document
    db2html 'guide.xml?intro'         Render the section with id \"intro\"
    db2html --dump-index guide.xml    Print titles, figures and section order")]
struct Cli {
    /// Input document, optionally followed by ?SECTION_ID
    #[arg(value_name = "TARGET")]
    target: String,

    /// Section to render (overrides ?SECTION_ID)
    #[arg(short, long, value_name = "ID")]
    section: Option<String>,

    /// Scheme of links back into the document
    #[arg(long, value_name = "SCHEME", default_value = "help")]
    link_scheme: String,

    /// Directory holding admonition icons
    #[arg(long, value_name = "DIR")]
    pixmap_dir: Option<PathBuf>,

    /// Print the cross-reference index as JSON instead of HTML
    #[arg(long)]
    dump_index: bool,

    /// Report recovered anomalies on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = if cli.dump_index {
        dump_index(&cli)
    } else {
        convert(&cli)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn options(cli: &Cli) -> ConvertOptions {
    let mut options = ConvertOptions::from_target(&cli.target).with_link_scheme(&cli.link_scheme);
    if let Some(section) = &cli.section {
        options = options.with_target_section(section);
    }
    if let Some(dir) = &cli.pixmap_dir {
        options = options.with_pixmap_dir(dir);
    }
    options
}

fn convert(cli: &Cli) -> Result<(), String> {
    let options = options(cli);
    let conversion = db2html::convert_file(&options).map_err(|e| e.to_string())?;

    io::stdout()
        .lock()
        .write_all(conversion.html.as_bytes())
        .map_err(|e| e.to_string())?;

    if cli.verbose {
        report(&options, &conversion.diagnostics);
    }
    Ok(())
}

fn dump_index(cli: &Cli) -> Result<(), String> {
    let options = options(cli);
    let bytes = std::fs::read(options.input_path()).map_err(|e| e.to_string())?;
    let source = db2html::util::decode_document(&bytes).map_err(|e| e.to_string())?;
    let index = db2html::preparse(&source).map_err(|e| e.to_string())?;

    let json = serde_json::to_string_pretty(&index).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn report(options: &ConvertOptions, diagnostics: &Diagnostics) {
    eprintln!("File: {}", options.base_file);
    if let Some(section) = &options.target_section {
        eprintln!("Section: {section}");
    }
    if diagnostics.is_clean() {
        eprintln!("No problems found");
        return;
    }
    eprintln!("Mismatched end tags: {}", diagnostics.stack_mismatches);
    eprintln!("Unknown elements: {}", diagnostics.unknown_elements);
    eprintln!("Unresolved entities: {}", diagnostics.unresolved_entities);
}
