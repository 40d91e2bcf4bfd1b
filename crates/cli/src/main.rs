//! CLI tool for turning lyrics text files into PowerPoint slide decks.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use lyrics_core::layout::format_outline;
use lyrics_core::{
    FontPreferences, LineNormalizer, LyricsDocument, ScriptCategory, StyleConfig, StyleProfile,
};
use lyrics_pptx::{DeckBuilder, DeckReader};
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Build two-lines-per-slide lyric decks for projection.
#[derive(Parser, Debug)]
#[command(name = "lyrics-deck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a .pptx deck from each lyrics text file
    Build(BuildArgs),

    /// Print the slides of existing .pptx decks
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Lyrics text file(s), or "-" for stdin
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Presentation name (default: input file name without extension)
    #[arg(short, long)]
    name: Option<String>,

    /// Font size in points (default: from the style profile)
    #[arg(short, long)]
    size: Option<String>,

    /// Styling profile: classic (36pt) or stage (48pt)
    #[arg(long, default_value = "classic")]
    profile: StyleProfile,

    /// Font for Latin lines
    #[arg(long)]
    english_font: Option<String>,

    /// Font for Devanagari lines
    #[arg(long)]
    hindi_font: Option<String>,

    /// Font for Telugu lines
    #[arg(long)]
    telugu_font: Option<String>,

    /// Font for a script as CATEGORY=NAME, e.g. hindi=Mangal (repeatable)
    #[arg(long = "font", value_name = "CATEGORY=NAME", value_parser = parse_font_override)]
    fonts: Vec<(ScriptCategory, String)>,

    /// Collapse runs of spaces and tabs inside lines
    #[arg(long)]
    collapse_whitespace: bool,

    /// Print the slide outline to stdout instead of writing a deck
    #[arg(short, long)]
    print: bool,

    /// Print JSON: a summary of each deck written, or the slide groups with --print
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// PowerPoint deck(s) to read
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Print the full structure as JSON
    #[arg(long)]
    json: bool,
}

/// Summary printed by `build --json`.
#[derive(Debug, Serialize)]
struct BuildSummary<'a> {
    input: String,
    output: String,
    filename: &'a str,
    slide_count: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &cli.command {
        Command::Build(args) => run_build(args, cli.verbose),
        Command::Inspect(args) => run_inspect(args),
    }
}

/// Parse a `--font` value such as `telugu=Gautami`.
fn parse_font_override(s: &str) -> std::result::Result<(ScriptCategory, String), String> {
    let (category, font) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=NAME, got '{}'", s))?;
    let category = category.parse::<ScriptCategory>().map_err(|e| e.to_string())?;
    Ok((category, font.trim().to_string()))
}

/// Reject option combinations that would make decks overwrite each other.
fn check_build_args(args: &BuildArgs) -> Result<()> {
    if args.name.is_some() && args.input.len() > 1 && !args.print {
        bail!("--name can only be used with a single input file");
    }
    Ok(())
}

fn run_build(args: &BuildArgs, verbose: bool) -> Result<()> {
    check_build_args(args)?;

    let style = StyleConfig::for_profile(args.profile);
    let builder = DeckBuilder::with_style(style).with_normalizer(
        LineNormalizer::new().with_collapse_whitespace(args.collapse_whitespace),
    );
    let preferences = font_preferences(args);
    let font_size = lyrics_core::style::parse_font_size(args.size.as_deref());

    if args.size.is_some() && font_size.is_none() {
        log::warn!(
            "Ignoring font size {:?}; using {}pt",
            args.size.as_deref().unwrap_or_default(),
            builder.style().font_size_pt
        );
    }

    let mut failed = 0;
    for input_path in &args.input {
        if verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        if let Err(e) = build_file(input_path, args, &builder, &preferences, font_size) {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} inputs failed", failed, args.input.len());
    }

    Ok(())
}

fn font_preferences(args: &BuildArgs) -> FontPreferences {
    let mut preferences = FontPreferences::new();
    preferences.set_opt(ScriptCategory::English, args.english_font.as_deref());
    preferences.set_opt(ScriptCategory::Hindi, args.hindi_font.as_deref());
    preferences.set_opt(ScriptCategory::Telugu, args.telugu_font.as_deref());
    for (category, font) in &args.fonts {
        preferences.set(*category, font.as_str());
    }
    preferences
}

/// Build one deck from a lyrics file.
fn build_file(
    input_path: &Path,
    args: &BuildArgs,
    builder: &DeckBuilder,
    preferences: &FontPreferences,
    font_size: Option<u32>,
) -> Result<()> {
    let text = read_lyrics(input_path)?;
    let document = LyricsDocument::new(text)
        .with_context(|| format!("No lyrics found in {}", input_path.display()))?;

    if args.print {
        let groups = builder.plan(document.as_str());
        if args.json {
            println!("{}", serde_json::to_string_pretty(&groups)?);
        } else {
            println!("{}", format_outline(&groups));
        }
        return Ok(());
    }

    let name = args
        .name
        .clone()
        .unwrap_or_else(|| default_name(input_path));

    let result = builder.build(document.as_str(), &name, preferences, font_size)?;

    let output_path = get_output_path(input_path, args.output.as_ref(), &result.filename)?;
    write_output(&output_path, &result.bytes)?;

    if args.json {
        let summary = BuildSummary {
            input: input_path.display().to_string(),
            output: output_path.display().to_string(),
            filename: &result.filename,
            slide_count: result.slide_count,
        };
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        eprintln!(
            "Wrote {} ({} slides)",
            output_path.display(),
            result.slide_count
        );
    }

    Ok(())
}

/// Read lyrics text from a file, or stdin for "-".
fn read_lyrics(input_path: &Path) -> Result<String> {
    let mut text = String::new();

    if input_path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read lyrics from stdin")?;
    } else {
        let file = File::open(input_path)
            .with_context(|| format!("Failed to open {}", input_path.display()))?;
        BufReader::new(file)
            .read_to_string(&mut text)
            .with_context(|| format!("Failed to read {} as UTF-8 text", input_path.display()))?;
    }

    Ok(text)
}

/// Presentation name for an input file.
fn default_name(input_path: &Path) -> String {
    input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| *s != "-")
        .unwrap_or(lyrics_core::naming::DEFAULT_PRESENTATION_NAME)
        .to_string()
}

/// Determine the output path for a deck.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    filename: &str,
) -> Result<PathBuf> {
    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(filename)
        }
        None => match input_path.parent() {
            Some(parent) if input_path != Path::new("-") => parent.join(filename),
            _ => PathBuf::from(filename),
        },
    };

    Ok(output_path)
}

/// Write a deck to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    let reader = DeckReader::new();

    for input_path in &args.input {
        let file = File::open(input_path)
            .with_context(|| format!("Failed to open {}", input_path.display()))?;
        let outline = reader
            .read(BufReader::new(file))
            .with_context(|| format!("Failed to read {}", input_path.display()))?;

        if args.json {
            println!("{}", serde_json::to_string_pretty(&outline)?);
            continue;
        }

        println!(
            "{}: {} slides",
            outline.title.as_deref().unwrap_or("(untitled)"),
            outline.slides.len()
        );
        for slide in &outline.slides {
            println!();
            println!("Slide {}", slide.number);
            for p in &slide.paragraphs {
                println!(
                    "  {} [{} {}pt]",
                    p.text,
                    p.typeface.as_deref().unwrap_or("default font"),
                    p.size.map(|s| s / 100).unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_build_options() {
        let cli = Cli::parse_from([
            "lyrics-deck",
            "build",
            "song.txt",
            "--profile",
            "stage",
            "--hindi-font",
            "Mangal",
            "-s",
            "40",
        ]);

        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert_eq!(args.profile, StyleProfile::Stage);
        assert_eq!(args.size.as_deref(), Some("40"));

        let preferences = font_preferences(&args);
        assert_eq!(preferences.get(ScriptCategory::Hindi), Some("Mangal"));
        assert_eq!(preferences.get(ScriptCategory::English), None);
    }

    #[test]
    fn test_font_option_uses_category_names() {
        let cli = Cli::parse_from([
            "lyrics-deck",
            "build",
            "song.txt",
            "--english-font",
            "Arial",
            "--font",
            "telugu=Gautami",
            "--font",
            "English=Roboto",
        ]);

        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        let preferences = font_preferences(&args);
        assert_eq!(preferences.get(ScriptCategory::Telugu), Some("Gautami"));
        assert_eq!(preferences.get(ScriptCategory::English), Some("Roboto"));
    }

    #[test]
    fn test_font_option_rejects_bad_values() {
        assert!(parse_font_override("tamil=Latha").is_err());
        assert!(parse_font_override("Mangal").is_err());
        assert_eq!(
            parse_font_override("hindi= Mangal ").unwrap(),
            (ScriptCategory::Hindi, "Mangal".to_string())
        );
    }

    #[test]
    fn test_name_requires_single_input() {
        let cli = Cli::parse_from(["lyrics-deck", "build", "a.txt", "b.txt", "-n", "Song"]);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(check_build_args(&args).is_err());
        assert!(run_build(&args, false).is_err());

        let cli = Cli::parse_from(["lyrics-deck", "build", "a.txt", "-n", "Song"]);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };
        assert!(check_build_args(&args).is_ok());
    }

    #[test]
    fn test_failed_inputs_are_reported() {
        let missing = std::env::temp_dir().join("lyrics-deck-missing-input.txt");
        let cli = Cli::parse_from(["lyrics-deck", "build", missing.to_str().unwrap()]);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };

        let err = run_build(&args, false).unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 inputs failed");
    }

    #[test]
    fn test_empty_input_fails_build() {
        let path = std::env::temp_dir().join("lyrics-deck-empty-input.txt");
        std::fs::write(&path, "\u{feff}\n  \n").unwrap();
        let cli = Cli::parse_from(["lyrics-deck", "build", path.to_str().unwrap()]);
        let Command::Build(args) = cli.command else {
            panic!("expected build command");
        };

        assert!(run_build(&args, false).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_default_name() {
        assert_eq!(default_name(Path::new("songs/Amazing Grace.txt")), "Amazing Grace");
        assert_eq!(default_name(Path::new("-")), "Lyrics");
    }

    #[test]
    fn test_output_path_next_to_input() {
        let path = get_output_path(Path::new("songs/grace.txt"), None, "Grace.pptx").unwrap();
        assert_eq!(path, PathBuf::from("songs/Grace.pptx"));

        let path = get_output_path(Path::new("-"), None, "Lyrics.pptx").unwrap();
        assert_eq!(path, PathBuf::from("Lyrics.pptx"));
    }
}
