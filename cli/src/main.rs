//! morphpage CLI - static report page renderer

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use morphpage::render::{RenderStats, DEFAULT_KATEX_VERSION};
use morphpage::{
    report, AssetRoot, DocumentLoader, JsonFormat, LoadOptions, ParentSelection, Publication,
    Diagnostic, DiagnosticKind, Publisher, RenderOptions, Severity, Validator,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "morphpage")]
#[command(version)]
#[command(about = "Render a sectioned report to a single HTML page, Markdown, text, or JSON", long_about = None)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command.
#[derive(Args, Clone, Default)]
struct SourceArgs {
    /// JSON document (the built-in report when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,

    /// Public URL prefix for image assets
    #[arg(long, value_name = "URL", env = "PUBLIC_URL", global = true)]
    public_url: Option<String>,

    /// Log and repair integrity violations instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Parent sections to render (e.g., "face-morphing,pca")
    #[arg(long, value_name = "IDS", global = true)]
    parents: Option<String>,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE", global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a complete HTML page (default)
    Html {
        /// Do not load the KaTeX typesetter
        #[arg(long)]
        no_math: bool,

        /// External stylesheet to link
        #[arg(long, value_name = "HREF")]
        stylesheet: Option<String>,

        /// Page title (defaults to the document title)
        #[arg(long)]
        title: Option<String>,

        /// Print rendering statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Render Markdown
    #[command(alias = "md")]
    Markdown {
        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Include a table of contents
        #[arg(long)]
        toc: bool,

        /// Do not escape Markdown special characters
        #[arg(long)]
        no_escape: bool,
    },

    /// Render plain text
    Text {
        /// Include a table of contents
        #[arg(long)]
        toc: bool,
    },

    /// Export the document as JSON
    Json {
        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the navigation tree
    Nav {
        /// Output JSON instead of a Markdown list
        #[arg(long)]
        json: bool,
    },

    /// Validate a document and list every finding
    Check,

    /// Show document information
    Info,

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let source = cli.source;

    let result = match cli.command {
        Some(Commands::Html {
            no_math,
            stylesheet,
            title,
            stats,
        }) => cmd_html(&source, no_math, stylesheet, title, stats),
        Some(Commands::Markdown {
            frontmatter,
            toc,
            no_escape,
        }) => cmd_markdown(&source, frontmatter, toc, no_escape),
        Some(Commands::Text { toc }) => cmd_text(&source, toc),
        Some(Commands::Json { compact }) => cmd_json(&source, compact),
        Some(Commands::Nav { json }) => cmd_nav(&source, json),
        Some(Commands::Check) => cmd_check(&source),
        Some(Commands::Info) => cmd_info(&source),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => cmd_html(&source, false, None, None, false),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn publish(
    source: &SourceArgs,
    render_options: RenderOptions,
) -> Result<Publication, Box<dyn std::error::Error>> {
    let selection = match source.parents.as_deref() {
        Some(ids) => {
            ParentSelection::parse(ids).map_err(|e| format!("Invalid parent selection: {}", e))?
        }
        None => ParentSelection::All,
    };

    let mut publisher = Publisher::new()
        .with_render_options(render_options)
        .with_parents(selection);
    if let Some(ref url) = source.public_url {
        publisher = publisher.with_public_url(url.as_str());
    }
    if source.lenient {
        publisher = publisher.lenient();
    }

    let publication = match source.input {
        Some(ref path) => {
            log::debug!("Publishing {}", path.display());
            publisher.load(path)?
        }
        None => {
            log::debug!("Publishing built-in report");
            publisher.builtin()?
        }
    };
    Ok(publication)
}

fn emit(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_html(
    source: &SourceArgs,
    no_math: bool,
    stylesheet: Option<String>,
    title: Option<String>,
    stats: bool,
) -> CliResult {
    let mut options = RenderOptions::new();
    if no_math {
        options = options.without_math();
    }
    if let Some(href) = stylesheet {
        options = options.with_stylesheet(href);
    }
    if let Some(title) = title {
        options = options.with_title(title);
    }

    let publication = publish(source, options)?;
    if stats {
        let result = publication.to_html_with_stats()?;
        eprint!("{}", format_stats(&result.stats));
        emit(source.output.as_deref(), &result.content)
    } else {
        emit(source.output.as_deref(), &publication.to_html()?)
    }
}

fn cmd_markdown(source: &SourceArgs, frontmatter: bool, toc: bool, no_escape: bool) -> CliResult {
    let options = RenderOptions::new()
        .with_frontmatter(frontmatter)
        .with_toc(toc)
        .with_escaping(!no_escape);
    let publication = publish(source, options)?;
    emit(source.output.as_deref(), &publication.to_markdown()?)
}

fn cmd_text(source: &SourceArgs, toc: bool) -> CliResult {
    let publication = publish(source, RenderOptions::new().with_toc(toc))?;
    emit(source.output.as_deref(), &publication.to_text()?)
}

fn cmd_json(source: &SourceArgs, compact: bool) -> CliResult {
    let publication = publish(source, RenderOptions::new())?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let selected = publication.document().select(&publication.render_options().parents)?;
    let json = morphpage::render::to_json(&selected, format)?;
    emit(source.output.as_deref(), &json)
}

fn cmd_nav(source: &SourceArgs, json: bool) -> CliResult {
    let publication = publish(source, RenderOptions::new())?;
    let nav = publication.nav()?;

    let content = if json {
        morphpage::render::nav_to_json(&nav, JsonFormat::Pretty)?
    } else {
        nav.to_markdown()
    };
    emit(source.output.as_deref(), content.trim_end())
}

fn cmd_check(source: &SourceArgs) -> CliResult {
    let options = if source.lenient {
        LoadOptions::new().lenient()
    } else {
        LoadOptions::new()
    };

    let (doc, diagnostics) = match source.input {
        Some(ref path) => {
            DocumentLoader::open_with_options(path, options)?.load_with_diagnostics()?
        }
        None => {
            let root = AssetRoot::new(source.public_url.clone().unwrap_or_default());
            let doc = report::face_morphing(&root);
            let report = Validator::new().validate(&doc);
            if report.has_errors() {
                return Err(morphpage::Error::Integrity(report.errors).into());
            }
            (doc, report.warnings)
        }
    };

    for diagnostic in &diagnostics {
        println!("{} {}", finding_label(diagnostic).yellow().bold(), diagnostic);
    }

    println!(
        "{} {} parents, {} sections, {} findings",
        "Document is valid:".green().bold(),
        doc.parent_count(),
        doc.section_count(),
        diagnostics.len()
    );
    Ok(())
}

fn cmd_info(source: &SourceArgs) -> CliResult {
    let publication = publish(source, RenderOptions::new())?;
    let doc = publication.document().select(&publication.render_options().parents)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    match source.input {
        Some(ref path) => println!("{}: {}", "File".bold(), path.display()),
        None => println!("{}: built-in report", "Source".bold()),
    }
    println!("{}: {}", "Title".bold(), doc.metadata.title);
    if let Some(ref subtitle) = doc.metadata.subtitle {
        println!("{}: {}", "Subtitle".bold(), subtitle);
    }
    if let Some(ref author) = doc.metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref description) = doc.metadata.description {
        println!("{}: {}", "Description".bold(), description);
    }

    println!();
    print!("{}", format_stats(&RenderStats::collect(&doc)));

    println!();
    println!("{}", "Sections".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for parent in &doc.parents {
        println!("{} {}", parent.title.bold(), format!("#{}", parent.id).dimmed());
        let count = parent.sections.len();
        for (i, section) in parent.sections.iter().enumerate() {
            let branch = if i + 1 == count { "└─" } else { "├─" };
            println!(
                "  {} {} {}",
                branch.dimmed(),
                section.title,
                format!("#{}", section.id).dimmed()
            );
        }
    }

    Ok(())
}

/// How a finding reported by a successful load was handled.
fn finding_label(diagnostic: &Diagnostic) -> &'static str {
    match (&diagnostic.kind, diagnostic.severity()) {
        (DiagnosticKind::MalformedBlock { .. }, _) => "skipped",
        (_, Severity::Error) => "repaired",
        (_, Severity::Warning) => "warning",
    }
}

fn format_stats(stats: &RenderStats) -> String {
    let mut lines = vec![
        format!("{}", "Content Statistics".cyan().bold()),
        format!("{}", "─".repeat(40).dimmed()),
        format!("{}: {}", "Parent sections".bold(), stats.parent_count),
        format!("{}: {}", "Sections".bold(), stats.section_count),
        format!("{}: {}", "Paragraphs".bold(), stats.paragraph_count),
        format!("{}: {}", "Formulas".bold(), stats.math_count),
        format!(
            "{}: {} ({} items, depth {})",
            "Lists".bold(),
            stats.list_count,
            stats.list_item_count,
            stats.max_list_depth
        ),
        format!(
            "{}: {} ({} images)",
            "Image grids".bold(),
            stats.image_grid_count,
            stats.image_count
        ),
    ];
    if stats.word_count > 0 {
        lines.push(format!("{}: {}", "Words".bold(), stats.word_count));
    }
    lines.push(String::new());
    lines.join("\n")
}

fn cmd_version() {
    println!("{} {}", "morphpage".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Static report page renderer");
    println!();
    println!("Math typesetting: KaTeX {}", DEFAULT_KATEX_VERSION.dimmed());
    println!("License: MIT");
}
