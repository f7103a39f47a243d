//! docmap CLI - map Word document sections onto schema fields

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docmap::render::{snippet, DEFAULT_SNIPPET_LEN};
use docmap::translate::{translate_fields_with_progress, DEFAULT_MODEL};
use docmap::{
    Docmap, DocmapResult, FieldMapper, JsonFormat, OpenAiConfig, OpenAiTranslator, Payload,
    PlaceholderTranslator, RenderOptions, Schema, TitleHints, TranslateOptions, Translator,
};

#[derive(Parser)]
#[command(name = "docmap")]
#[command(version)]
#[command(about = "Map Word document sections onto schema fields and export them", long_about = None)]
struct Cli {
    /// Input DOCX file (lists its sections)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sections detected in a document
    #[command(alias = "ls")]
    Sections {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Preview length in characters (0 = full text)
        #[arg(long, default_value_t = DEFAULT_SNIPPET_LEN)]
        snippet_len: usize,
    },

    /// Show how schema fields map onto sections
    Map {
        #[command(flatten)]
        mapping: MappingArgs,

        /// Write the resulting mapping file
        #[arg(long, value_name = "FILE")]
        save_mapping: Option<PathBuf>,
    },

    /// Translate mapped fields and export the payload
    Export {
        #[command(flatten)]
        mapping: MappingArgs,

        #[command(flatten)]
        translate: TranslateArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        format: ExportFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Convert a document to sectioned Markdown
    #[command(alias = "md")]
    Markdown {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include YAML frontmatter
        #[arg(short, long)]
        frontmatter: bool,

        /// Maximum heading level (1-6)
        #[arg(long, default_value = "6")]
        max_heading: u8,

        /// Section range (e.g., "0-3", "1,4")
        #[arg(long)]
        sections: Option<String>,

        /// Emit a heading for content before the first heading
        #[arg(long)]
        preamble_title: bool,
    },

    /// Show document information
    Info {
        /// Input DOCX file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Args)]
struct MappingArgs {
    /// Input DOCX file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Field schema (YAML)
    #[arg(short, long, value_name = "FILE")]
    schema: PathBuf,

    /// Mapping file with expected section titles (YAML)
    #[arg(short, long, value_name = "FILE")]
    mapping: Option<PathBuf>,

    /// Map a field to a section: KEY=INDEX, or KEY=- to unmap
    #[arg(long = "set", value_name = "KEY=INDEX")]
    assignments: Vec<String>,

    /// Replace a field's source text with the content of a file: KEY=PATH
    #[arg(long = "text-file", value_name = "KEY=PATH")]
    text_files: Vec<String>,

    /// Treat a custom paragraph style as a level-1 heading
    #[arg(long, value_name = "STYLE")]
    heading_style: Vec<String>,
}

#[derive(Args)]
struct TranslateArgs {
    /// API key for the chat-completions endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model name
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Chat-completions endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// System prompt ({source} and {target} are replaced by language names)
    #[arg(long)]
    system_prompt: Option<String>,

    /// Source language code
    #[arg(long, default_value = "fr")]
    source_lang: String,

    /// Target language code
    #[arg(long, default_value = "nl")]
    target_lang: String,

    /// Translate one field at a time
    #[arg(long)]
    sequential: bool,

    /// Skip translation and export empty target text
    #[arg(long)]
    no_translate: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    /// JSON payload
    Json,
    /// CSV with a key,fr,nl_key,nl header
    Csv,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Sections {
            input,
            json,
            compact,
            snippet_len,
        }) => cmd_sections(&input, json || compact, compact, snippet_len),
        Some(Commands::Map {
            mapping,
            save_mapping,
        }) => cmd_map(&mapping, save_mapping.as_deref()),
        Some(Commands::Export {
            mapping,
            translate,
            format,
            output,
            compact,
        }) => cmd_export(&mapping, &translate, format, output.as_deref(), compact),
        Some(Commands::Markdown {
            input,
            output,
            frontmatter,
            max_heading,
            sections,
            preamble_title,
        }) => cmd_markdown(
            &input,
            output.as_deref(),
            frontmatter,
            max_heading,
            sections.as_deref(),
            preamble_title,
        ),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            if let Some(input) = cli.input {
                cmd_sections(&input, false, false, DEFAULT_SNIPPET_LEN)
            } else {
                println!("{}", "Usage: docmap <FILE>".yellow());
                println!("       docmap --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Parse `KEY=INDEX` or `KEY=-`.
fn parse_assignment(s: &str) -> Result<(String, Option<usize>), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=INDEX, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field key in '{}'", s));
    }
    let value = value.trim();
    if value.is_empty() || value == "-" {
        return Ok((key.to_string(), None));
    }
    let index = value
        .parse()
        .map_err(|_| format!("invalid section index '{}'", value))?;
    Ok((key.to_string(), Some(index)))
}

fn read_document(input: &Path, heading_styles: &[String]) -> docmap::Result<DocmapResult> {
    let mut builder = Docmap::new();
    for style in heading_styles {
        builder = builder.with_heading_style(style.as_str(), 1);
    }
    builder.parse(input)
}

fn build_mapper(args: &MappingArgs) -> Result<FieldMapper, Box<dyn std::error::Error>> {
    let result = read_document(&args.input, &args.heading_style)?;
    let schema = Schema::load(&args.schema)?;
    let hints = match &args.mapping {
        Some(path) => TitleHints::load(path, &schema)?,
        None => TitleHints::new(),
    };

    let mut mapper = result.mapper_with_hints(schema, &hints);
    for assignment in &args.assignments {
        let (key, index) = parse_assignment(assignment)?;
        mapper.set(&key, index)?;
    }
    for entry in &args.text_files {
        let (key, path) = entry
            .split_once('=')
            .ok_or_else(|| format!("expected KEY=PATH, got '{}'", entry))?;
        let text = fs::read_to_string(path.trim())?;
        mapper.set_text(key.trim(), Some(text.trim().to_string()))?;
    }
    Ok(mapper)
}

fn write_output(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_sections(input: &Path, json: bool, compact: bool, snippet_len: usize) -> CliResult {
    let result = Docmap::new()
        .with_render_options(RenderOptions::new().with_snippet_len(snippet_len))
        .parse(input)?;

    if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        println!("{}", result.to_json(format)?);
        return Ok(());
    }

    if result.sections.is_empty() {
        println!("{}", "No sections found".yellow());
        return Ok(());
    }

    for section in &result.sections {
        let marker = if section.level == 0 {
            "·".to_string()
        } else {
            "#".repeat(section.level as usize)
        };
        let tables = match section.table_count() {
            0 => String::new(),
            n => format!(" [{} table{}]", n, if n == 1 { "" } else { "s" }),
        };
        println!(
            "{:>4}  {} {}{}",
            section.order_index.to_string().cyan(),
            marker.dimmed(),
            section.title.bold(),
            tables.dimmed()
        );
        let preview = result.preview(section);
        if !preview.is_empty() {
            println!("        {}", preview.dimmed());
        }
    }
    Ok(())
}

fn cmd_map(args: &MappingArgs, save_mapping: Option<&Path>) -> CliResult {
    let mapper = build_mapper(args)?;

    println!("{}", "Field Mapping".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for resolved in mapper.resolve_all() {
        let target = match resolved.section.and_then(|i| mapper.sections().get(i)) {
            Some(section) => format!("[{}] {}", section.order_index, section.title).green(),
            None => "(unmapped)".yellow(),
        };
        println!(
            "{} {} {}",
            resolved.field.source_key.bold(),
            "→".dimmed(),
            target
        );
        if resolved.field.label != resolved.field.source_key {
            println!("    {}", resolved.field.label.dimmed());
        }
        let preview = snippet(&resolved.text, DEFAULT_SNIPPET_LEN);
        if !preview.is_empty() {
            println!("    {}", preview.dimmed());
        }
    }

    let correspondence = mapper.correspondence();
    println!();
    println!(
        "{}: {}/{}",
        "Mapped".bold(),
        correspondence.mapped_count(),
        correspondence.len()
    );

    if let Some(path) = save_mapping {
        let yaml = TitleHints::from_mapper(&mapper).to_mapping_yaml(mapper.schema())?;
        fs::write(path, yaml)?;
        println!("{} {}", "Mapping saved to".green(), path.display());
    }
    Ok(())
}

fn make_translator(args: &TranslateArgs) -> docmap::Result<Box<dyn Translator>> {
    let Some(api_key) = args.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
        eprintln!(
            "{}",
            "No API key configured, using placeholder translations".yellow()
        );
        return Ok(Box::new(PlaceholderTranslator));
    };

    let mut config = OpenAiConfig::new(api_key).with_model(args.model.as_str());
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str());
    }
    if let Some(prompt) = &args.system_prompt {
        config = config.with_system_prompt(prompt.as_str());
    }
    log::debug!("translating via {} ({})", config.endpoint, config.model);
    Ok(Box::new(OpenAiTranslator::new(config)?))
}

fn cmd_export(
    args: &MappingArgs,
    translate: &TranslateArgs,
    format: ExportFormat,
    output: Option<&Path>,
    compact: bool,
) -> CliResult {
    let mut mapper = build_mapper(args)?;

    if !translate.no_translate {
        let translator = make_translator(translate)?;
        let mut options = TranslateOptions::new()
            .with_source_lang(translate.source_lang.as_str())
            .with_target_lang(translate.target_lang.as_str());
        if translate.sequential {
            options = options.sequential();
        }

        let pb = ProgressBar::new(mapper.schema().len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        pb.set_message(format!("Translating with {}...", translator.name()));
        translate_fields_with_progress(&mut mapper, translator.as_ref(), &options, |_| {
            pb.inc(1)
        });
        pb.finish_with_message("Done!");
    }

    let payload = Payload::from_mapper(&mapper);
    let content = match format {
        ExportFormat::Json => payload.to_json(if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        })?,
        ExportFormat::Csv => payload.to_csv()?,
    };
    write_output(output, &content)
}

fn cmd_markdown(
    input: &Path,
    output: Option<&Path>,
    frontmatter: bool,
    max_heading: u8,
    sections: Option<&str>,
    preamble_title: bool,
) -> CliResult {
    let mut render_options = RenderOptions::new()
        .with_frontmatter(frontmatter)
        .with_max_heading(max_heading)
        .with_preamble_title(preamble_title);
    if let Some(s) = sections {
        let selection = docmap::SectionSelection::parse(s)
            .map_err(|e| format!("Invalid section range: {}", e))?;
        render_options = render_options.with_sections(selection);
    }

    let result = Docmap::new()
        .with_render_options(render_options)
        .parse(input)?;
    write_output(output, &result.to_markdown())
}

fn cmd_info(input: &Path) -> CliResult {
    let format = docmap::detect_format_from_path(input)?;
    let result = read_document(input, &[])?;
    let metadata = &result.document.metadata;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref subject) = metadata.subject {
        println!("{}: {}", "Subject".bold(), subject);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    let stats = &result.stats;
    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Sections".bold(), stats.section_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!(
        "{}: {} ({} ragged)",
        "Tables".bold(),
        stats.table_count,
        stats.ragged_table_count
    );
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docmap".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Document section mapping and translation tool");
}
