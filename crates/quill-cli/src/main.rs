//! Quill CLI entry point.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rhizome_quill_core::{Manifest, Site, VarStore, to_markup, to_style};
use rhizome_quill_ir::{Node, read_document};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "S-expression to scriptlet markup and CSS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transpile a template tree to scriptlet markup
    Markup {
        /// Input file (or - for stdin)
        file: String,

        /// Read the input as JSON instead of S-expression text
        #[arg(long)]
        json: bool,
    },

    /// Transpile a list of rules to CSS
    Style {
        /// Input file (or - for stdin)
        file: String,

        /// Read the input as JSON instead of S-expression text
        #[arg(long)]
        json: bool,

        /// Define a variable, as NAME=VALUE
        #[arg(long = "var", value_parser = parse_var)]
        vars: Vec<(String, String)>,
    },

    /// Build every template and style listed in a manifest
    Build {
        /// Manifest path
        #[arg(short, long, default_value = "quill.toml")]
        manifest: PathBuf,

        /// Output directory, overriding the manifest
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn parse_var(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", arg)),
    }
}

fn read_input(file: &str) -> std::io::Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(file)
    }
}

fn parse_input(input: &str, json: bool) -> Result<Node, Box<dyn std::error::Error>> {
    if json {
        Ok(serde_json::from_str(input)?)
    } else {
        Ok(read_document(input)?)
    }
}

fn build(manifest_path: &Path, out: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = Manifest::from_file(manifest_path)?;
    let base_dir = manifest_path.parent().unwrap_or(Path::new("."));

    let mut site = Site::new();
    manifest.load_into(base_dir, &mut site)?;

    let out_dir = out.unwrap_or_else(|| base_dir.join(&manifest.output.dir));
    fs::create_dir_all(&out_dir)?;

    for (name, markup) in site.templates().iter() {
        let path = out_dir.join(format!("{}.ejs", name));
        fs::write(&path, markup)?;
        info!("Wrote: {}", path.display());
    }
    for (name, css) in site.styles().iter() {
        let path = out_dir.join(format!("{}.css", name));
        fs::write(&path, css)?;
        info!("Wrote: {}", path.display());
    }

    info!(
        templates = site.templates().len(),
        styles = site.styles().len(),
        "build finished"
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rhizome_quill=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Markup { file, json } => {
            let tree = parse_input(&read_input(&file)?, json)?;
            println!("{}", to_markup(&tree)?);
        }

        Commands::Style { file, json, vars } => {
            let rules = parse_input(&read_input(&file)?, json)?;
            let vars: VarStore = vars.into_iter().collect();
            print!("{}", to_style(&rules, Some(&vars))?);
        }

        Commands::Build { manifest, out } => build(&manifest, out)?,
    }

    Ok(())
}
