use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flyer_studio::{
    CommandSpooler, DirDownloadSink, EditOutcome, ExportOutcome, ExportPipeline, FileSpooler,
    GeminiImageEditor, Project, ResvgRasterizer, StderrNotifier, Studio, ThemeField,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flyer-studio", version)]
struct Cli {
    /// Project JSON. Without one, the built-in content and theme are used.
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// Override a theme color, e.g. `--set heading=#14532d`. Repeatable.
    #[arg(long = "set", value_name = "FIELD=COLOR", value_parser = parse_theme_override, global = true)]
    overrides: Vec<(ThemeField, String)>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the flyer as SVG.
    Svg(SvgArgs),
    /// Export the flyer as a 3x PNG named `<product>-<epoch-millis>.png`.
    Png(PngArgs),
    /// Print on an A4 page (via `lp`), or save the page with `--out`.
    Print(PrintArgs),
    /// Edit the project logo with a text instruction (requires GEMINI_API_KEY).
    EditLogo(EditLogoArgs),
    /// Print the resolved theme as JSON.
    Theme,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PngArgs {
    /// Directory the PNG is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct PrintArgs {
    /// Save the print-ready page here instead of spooling it.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print command to run with the page file as its last argument.
    #[arg(long, default_value = "lp")]
    printer: String,

    /// Extra arguments passed to the print command before the page file.
    #[arg(long = "printer-arg")]
    printer_args: Vec<String>,
}

#[derive(Parser, Debug)]
struct EditLogoArgs {
    /// What to change, e.g. "add a golden frame".
    #[arg(long)]
    instruction: String,

    /// Where to write the edited logo.
    #[arg(long)]
    out: PathBuf,

    /// Override the model name.
    #[arg(long)]
    model: Option<String>,

    /// Override the API endpoint.
    #[arg(long)]
    endpoint: Option<String>,
}

fn parse_theme_override(s: &str) -> Result<(ThemeField, String), String> {
    let (field, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=COLOR, got '{s}'"))?;
    let field = field.parse::<ThemeField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_owned()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project = match &cli.project {
        Some(path) => Project::from_path(path)
            .with_context(|| format!("load project '{}'", path.display()))?,
        None => Project::default(),
    };
    let mut studio = project.load_studio()?;
    for (field, value) in &cli.overrides {
        studio.set_theme_field(*field, value.clone());
    }

    match cli.cmd {
        Command::Svg(args) => cmd_svg(&studio, args),
        Command::Png(args) => cmd_png(&studio, &project, args),
        Command::Print(args) => cmd_print(&studio, args),
        Command::EditLogo(args) => cmd_edit_logo(&mut studio, args),
        Command::Theme => {
            println!("{}", serde_json::to_string_pretty(studio.theme())?);
            Ok(())
        }
    }
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_svg(studio: &Studio, args: SvgArgs) -> anyhow::Result<()> {
    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, studio.document().to_svg())
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_png(studio: &Studio, project: &Project, args: PngArgs) -> anyhow::Result<()> {
    let pipeline = ExportPipeline::new(
        project.product_name.clone(),
        ResvgRasterizer::new(),
        DirDownloadSink::new(&args.out_dir),
        StderrNotifier,
    );
    match pipeline.export_png(studio) {
        ExportOutcome::Saved(path) => {
            eprintln!("wrote {}", path.display());
            Ok(())
        }
        ExportOutcome::Skipped => anyhow::bail!("no flyer document to export"),
        ExportOutcome::Busy => anyhow::bail!("an export is already running"),
        ExportOutcome::Failed(msg) => anyhow::bail!("export failed: {msg}"),
    }
}

fn cmd_print(studio: &Studio, args: PrintArgs) -> anyhow::Result<()> {
    match args.out {
        Some(out) => {
            flyer_studio::print(studio, &FileSpooler::new(&out))?;
            eprintln!("wrote {}", out.display());
        }
        None => {
            let spooler = CommandSpooler {
                program: args.printer,
                args: args.printer_args,
            };
            flyer_studio::print(studio, &spooler)?;
        }
    }
    Ok(())
}

fn cmd_edit_logo(studio: &mut Studio, args: EditLogoArgs) -> anyhow::Result<()> {
    if studio.logo().is_none() {
        anyhow::bail!("the project has no logo to edit");
    }
    let mut editor = GeminiImageEditor::from_env()?;
    if let Some(model) = args.model {
        editor = editor.with_model(model);
    }
    if let Some(endpoint) = args.endpoint {
        editor = editor.with_endpoint(endpoint);
    }

    match studio.edit_logo(&editor, &args.instruction) {
        EditOutcome::Applied => {
            let logo = studio
                .logo()
                .context("edited logo missing after a successful edit")?;
            ensure_parent_dir(&args.out)?;
            std::fs::write(&args.out, &logo.bytes)
                .with_context(|| format!("write logo '{}'", args.out.display()))?;
            eprintln!("wrote {}", args.out.display());
            Ok(())
        }
        EditOutcome::Skipped => anyhow::bail!("nothing to do: instruction is empty"),
        EditOutcome::Busy => anyhow::bail!("an edit is already running"),
        EditOutcome::Failed => {
            let msg = studio
                .logo_edit_state()
                .error
                .clone()
                .unwrap_or_else(|| "image edit failed".to_owned());
            anyhow::bail!(msg)
        }
    }
}
