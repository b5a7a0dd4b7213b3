use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use mosh_journal_config::Config;
use mosh_journal_engine::{
    ActionOutcome, BlockKind, EditorSurface, FIGURE_CLASS, FigureAction, FigureOptions,
    FigurePosition, FigureSize, FigureState, FigureStyle, FragmentRenderer, LogNotifier,
    MaintenanceOutcome, Modifier, NavigationExit, RenderOptions, SelectionProvider, ToolbarSlot,
    WrapOptions, apply_action, apply_block_style, enclosing_block, maintain_toolbar_buttons,
    unwrap_in_place,
};
use mosh_journal_markup::MutableTree;

#[derive(Parser)]
#[command(name = "mosh-journal", version, about = "Styled journal blocks and floating figures")]
struct Cli {
    /// Config file (defaults to ~/.config/mosh-journal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a block from content
    Render(RenderArgs),

    /// Print the block found in markup as TOML
    Parse {
        /// Markup file, or stdin when omitted
        input: Option<PathBuf>,
    },

    /// Wrap the {{ }} selection in a block and print the result
    Wrap(WrapArgs),

    /// Remove the block around the {{ caret
    Unwrap {
        input: Option<PathBuf>,
    },

    /// Apply a toolbar action to the first figure
    Figure {
        /// position, size, style or delete
        action: String,
        /// The new value; ignored for delete
        #[arg(default_value = "")]
        value: String,
        input: Option<PathBuf>,
    },

    /// Re-add missing block buttons to editor menus
    Maintain {
        input: Option<PathBuf>,
    },

    /// Print the sample block shown in the block picker
    Preview {
        kind: BlockKind,
    },
}

#[derive(clap::Args)]
struct BlockArgs {
    #[arg(short, long)]
    title: Option<String>,

    /// Ragged paper edge
    #[arg(long)]
    torn: bool,

    /// Redaction stamp
    #[arg(long)]
    classified: bool,
}

impl BlockArgs {
    fn modifiers(&self) -> impl Iterator<Item = Modifier> {
        [(self.torn, Modifier::Torn), (self.classified, Modifier::Classified)]
            .into_iter()
            .filter_map(|(on, m)| on.then_some(m))
    }
}

#[derive(clap::Args)]
struct RenderArgs {
    kind: BlockKind,

    #[command(flatten)]
    block: BlockArgs,

    /// Navigation exit as LABEL or LABEL=TARGET. Repeatable.
    #[arg(short, long = "exit")]
    exits: Vec<String>,

    /// Figure position: inline, left or right
    #[arg(long, default_value = "inline")]
    position: String,

    /// Figure size: small, medium or large
    #[arg(long, default_value = "medium")]
    size: String,

    /// Figure style: default, polaroid or screen
    #[arg(long, default_value = "default")]
    style: String,

    /// Figure caption
    #[arg(long)]
    caption: Option<String>,

    /// Content file (the image source for figures), or stdin when omitted
    input: Option<PathBuf>,
}

#[derive(clap::Args)]
struct WrapArgs {
    kind: BlockKind,

    #[command(flatten)]
    block: BlockArgs,

    input: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    if let Err(e) = run(Cli::parse()) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;
    let renderer = config.renderer()?;

    match cli.command {
        Command::Render(args) => println!("{}", render(&renderer, args)?),
        Command::Parse { input } => {
            let markup = read_input(input.as_ref())?;
            let parsed = renderer
                .parse(&markup)
                .ok_or_else(|| anyhow!("no MOSH block found"))?;
            print!("{}", toml::to_string_pretty(&parsed)?);
        }
        Command::Wrap(args) => {
            let mut surface = EditorSurface::with_markers(&read_input(args.input.as_ref())?);
            let options = WrapOptions {
                title: args.block.title.clone(),
                modifiers: args.block.modifiers().collect(),
            };
            apply_block_style(
                &mut surface,
                args.kind,
                &options,
                &renderer.strings,
                &mut LogNotifier,
            )?;
            println!("{}", surface.to_marked_html());
        }
        Command::Unwrap { input } => {
            let mut surface = EditorSurface::with_markers(&read_input(input.as_ref())?);
            let caret = surface
                .selection()
                .ok_or_else(|| anyhow!("mark the block to unwrap with {{{{"))?;
            let root = surface.root();
            let block = enclosing_block(surface.tree(), caret.start.node, root)
                .ok_or_else(|| anyhow!("the caret is not inside a MOSH block"))?;
            unwrap_in_place(surface.tree_mut(), block.node)?;
            println!("{}", surface.to_html());
        }
        Command::Figure { action, value, input } => {
            let action = FigureAction::parse(&action, &value)?;
            let mut surface = EditorSurface::parse(&read_input(input.as_ref())?);
            let root = surface.root();
            let tree = surface.tree_mut();
            let figure = tree
                .find_descendant(root, |t, n| t.has_class(n, FIGURE_CLASS))
                .ok_or_else(|| anyhow!("no figure found"))?;
            match apply_action(tree, figure, action)? {
                ActionOutcome::Updated(state) => log::info!("figure {}", state_summary(state)),
                ActionOutcome::Deleted => {
                    log::info!("{}", renderer.strings.get("MOSH.Figure.Deleted"))
                }
            }
            println!("{}", surface.to_html());
        }
        Command::Maintain { input } => {
            let mut surface = EditorSurface::parse(&read_input(input.as_ref())?);
            let root = surface.root();
            log::debug!("maintenance interval {:?}", config.maintenance_interval());
            let outcome = maintain_toolbar_buttons(
                surface.tree_mut(),
                root,
                &ToolbarSlot::new(),
                &renderer.strings,
            )?;
            if let MaintenanceOutcome::Checked { added } = outcome {
                log::info!("{added} menu(s) updated");
            }
            println!("{}", surface.to_html());
        }
        Command::Preview { kind } => println!("{}", renderer.preview(kind)),
    }
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let config_path = path.cloned().unwrap_or_else(Config::config_path);
    log::debug!("Config path: {}", config_path.display());

    match Config::load_from_path(&config_path)? {
        Some(config) => Ok(config),
        None if path.is_some() => bail!("config file not found: {}", config_path.display()),
        None => Ok(Config::default()),
    }
}

fn render(renderer: &FragmentRenderer, args: RenderArgs) -> Result<String> {
    let content = match (&args.input, args.kind) {
        (None, BlockKind::Navigation) => String::new(),
        (input, _) => read_input(input.as_ref())?,
    };

    let mut options = RenderOptions {
        title: args.block.title.clone(),
        modifiers: args.block.modifiers().collect(),
        ..RenderOptions::default()
    };
    for exit in &args.exits {
        let (label, target) = match exit.split_once('=') {
            Some((label, target)) => (label, Some(target)),
            None => (exit.as_str(), None),
        };
        options = options.with_exit(NavigationExit::new(label, target));
    }
    if args.kind.is_figure() {
        options.figure = FigureOptions {
            state: FigureState::new(
                FigurePosition::from_value(&args.position)
                    .ok_or_else(|| anyhow!("unknown position: {}", args.position))?,
                FigureSize::from_value(&args.size)
                    .ok_or_else(|| anyhow!("unknown size: {}", args.size))?,
                FigureStyle::from_value(&args.style)
                    .ok_or_else(|| anyhow!("unknown style: {}", args.style))?,
            ),
            caption: args.caption.clone(),
        };
    }

    Ok(renderer.render(args.kind, content.trim_end(), &options))
}

fn state_summary(state: FigureState) -> String {
    format!(
        "position={} size={} style={}",
        state.position.value(),
        state.size.value(),
        state.style.value()
    )
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("cannot read stdin")?;
            Ok(buf)
        }
    }
}
