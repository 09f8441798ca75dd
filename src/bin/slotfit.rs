use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use slotfit::{
    AssemblyOpts, AssemblySession, Document, DocumentStore, LayoutStrategy, MatcherChain,
    RemapSettings, SourceContext, Template, TemplateRegistry, Wiring, compute_payload,
};

#[derive(Parser, Debug)]
#[command(name = "slotfit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Remap one source container into one template slot and print the payload as JSON.
    Remap(RemapArgs),
    /// Run an assembly and print its readiness report. Exits with status 2 when not ready.
    Check(AssemblyArgs),
    /// Run an assembly and write the output document.
    Assemble(AssembleArgs),
}

#[derive(Parser, Debug)]
struct RemapArgs {
    /// Source document JSON.
    #[arg(long)]
    doc: PathBuf,

    /// Source container name (empty or `@canvas` for the whole canvas).
    #[arg(long, default_value = "")]
    container: String,

    /// Template JSON.
    #[arg(long)]
    template: PathBuf,

    /// Target slot handle.
    #[arg(long)]
    slot: String,

    /// Optional layout strategy JSON.
    #[arg(long)]
    strategy: Option<PathBuf>,

    /// Vertical bleed allowed past the target, as a fraction of its height.
    #[arg(long)]
    bleed: Option<f64>,
}

#[derive(Args, Debug)]
struct AssemblyArgs {
    /// Source document JSON (repeatable).
    #[arg(long = "doc", required = true)]
    docs: Vec<PathBuf>,

    /// Template JSON (repeatable).
    #[arg(long = "template", required = true)]
    templates: Vec<PathBuf>,

    /// Wiring JSON.
    #[arg(long)]
    wiring: PathBuf,

    /// Assembly options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compute remap instances in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Vertical bleed allowed past each slot, as a fraction of its height.
    #[arg(long)]
    bleed: Option<f64>,
}

#[derive(Parser, Debug)]
struct AssembleArgs {
    #[command(flatten)]
    assembly: AssemblyArgs,

    /// Output document JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Remap(args) => cmd_remap(args),
        Command::Check(args) => cmd_check(args),
        Command::Assemble(args) => cmd_assemble(args),
    }
}

fn cmd_remap(args: RemapArgs) -> anyhow::Result<()> {
    let doc = Document::from_path(&args.doc)?;
    let template = Template::from_path(&args.template)?;
    template.validate()?;

    let strategy = args
        .strategy
        .as_deref()
        .map(read_strategy)
        .transpose()?;
    let mut settings = RemapSettings::default();
    if let Some(bleed) = args.bleed {
        settings.bleed_fraction = bleed;
    }

    let m = MatcherChain::default()
        .resolve(&args.slot, &template)
        .with_context(|| format!("slot '{}' not found in '{}'", args.slot, template.name))?;
    let slot = &template.slots[m.index];

    let source = SourceContext::from_document(&doc, &args.container, strategy)?;
    let payload = compute_payload(&source, slot, &settings)?;

    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn cmd_check(args: AssemblyArgs) -> anyhow::Result<()> {
    let (mut session, documents, templates, wiring) = load_assembly(&args)?;
    let assembly = session.run(&documents, &templates, &wiring)?;

    for f in &assembly.failures {
        eprintln!("instance '{}' failed: {}", f.instance, f.error);
    }
    println!("{}", serde_json::to_string_pretty(&assembly.report)?);

    if !assembly.is_fully_assembled() {
        std::process::exit(2);
    }
    Ok(())
}

fn cmd_assemble(args: AssembleArgs) -> anyhow::Result<()> {
    let (mut session, documents, templates, wiring) = load_assembly(&args.assembly)?;
    let assembly = session.run(&documents, &templates, &wiring)?;

    for f in &assembly.failures {
        eprintln!("instance '{}' failed: {}", f.instance, f.error);
    }
    let out = assembly.export(&documents)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(f, &out)
        .with_context(|| format!("write output '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn load_assembly(
    args: &AssemblyArgs,
) -> anyhow::Result<(AssemblySession, DocumentStore, TemplateRegistry, Wiring)> {
    let mut opts = match &args.config {
        Some(p) => AssemblyOpts::from_path(p)?,
        None => AssemblyOpts::default(),
    };
    if args.parallel {
        opts.parallel = true;
    }
    if args.threads.is_some() {
        opts.threads = args.threads;
    }
    if let Some(bleed) = args.bleed {
        opts.remap.bleed_fraction = bleed;
    }

    let mut documents = DocumentStore::new();
    for p in &args.docs {
        let doc = Document::from_path(p)?;
        documents
            .insert(doc)
            .with_context(|| format!("load document '{}'", p.display()))?;
    }

    let mut templates = TemplateRegistry::new();
    for p in &args.templates {
        let t = Template::from_path(p)?;
        templates
            .insert(t)
            .with_context(|| format!("load template '{}'", p.display()))?;
    }

    let wiring = Wiring::from_path(&args.wiring)?;
    let session = AssemblySession::new(opts)?;
    Ok((session, documents, templates, wiring))
}

fn read_strategy(path: &Path) -> anyhow::Result<LayoutStrategy> {
    let f = File::open(path).with_context(|| format!("open strategy '{}'", path.display()))?;
    let strategy: LayoutStrategy = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse strategy '{}'", path.display()))?;
    Ok(strategy)
}
