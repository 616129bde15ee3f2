//! Command-line entry point.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use wsldev::{
    config::Config,
    distro::{self, Distro},
    editor::{self, Editor},
    launcher,
    project::{self, Project},
};

#[derive(Parser)]
#[command(
    name = "wsldev",
    about = "Browse projects inside WSL distributions and open them in your editor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List projects found in the running distributions
    List {
        /// Only scan this distribution
        #[arg(short, long)]
        distro: Option<String>,
    },

    /// List the WSL distributions registered on this host
    Distros,

    /// List the editors detected on this host
    Editors {
        /// Distribution probed for terminal editors (default: the default
        /// distro if running, else the first running one)
        #[arg(short, long)]
        distro: Option<String>,
    },

    /// Open a project in an editor
    Open {
        /// Project name as shown by `list`
        #[arg(value_name = "PROJECT")]
        project: String,

        /// Distribution holding the project (required when the name is
        /// ambiguous)
        #[arg(short, long)]
        distro: Option<String>,

        /// Editor id as shown by `editors` (default: the configured
        /// selection)
        #[arg(short, long)]
        editor: Option<String>,
    },

    /// Manage wsldev configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run first-time setup: detect editors and store your selection
    Setup,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the default configuration to disk
    Init,
    /// Set a configuration value (e.g. editor.selected vscode)
    Set { key: String, value: String },
    /// Get a configuration value
    Get { key: String },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List { distro } => cmd_list(distro.as_deref()),
        Commands::Distros => cmd_distros(),
        Commands::Editors { distro } => cmd_editors(distro.as_deref()),
        Commands::Open {
            project,
            distro,
            editor,
        } => cmd_open(&project, distro.as_deref(), editor.as_deref()),
        Commands::Config { action } => cmd_config(action),
        Commands::Setup => cmd_setup(),
    }
}

fn cmd_list(only: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let distros = select_distros(only)?;
    let projects = project::scan_all(&distros, &config.scan.root);

    if projects.is_empty() {
        eprintln!("No projects found under {}.", config.scan.root);
        return Ok(());
    }
    println!("{}", project::render_table(&projects));
    Ok(())
}

fn cmd_distros() -> Result<()> {
    let distros = distro::list()?;
    if distros.is_empty() {
        eprintln!("No WSL distributions are registered on this host.");
        return Ok(());
    }
    for distro in &distros {
        let marker = if distro.is_default { "*" } else { " " };
        println!("{marker} {:<24} {}", distro.name, distro.state);
    }
    Ok(())
}

fn cmd_editors(distro_name: Option<&str>) -> Result<()> {
    let probe = match distro_name {
        Some(name) => Some(name.to_string()),
        None => default_probe_distro(),
    };
    if probe.is_none() {
        eprintln!("No running distribution; terminal editors cannot be probed.");
    }

    let detected = editor::detect(probe.as_deref());
    if detected.is_empty() {
        eprintln!("No editors detected.");
        return Ok(());
    }
    for editor in detected {
        let kind = if editor.is_terminal() { "terminal" } else { "gui" };
        println!("{:<12} {:<20} {kind}", editor.id, editor.name);
    }
    Ok(())
}

fn cmd_open(name: &str, distro_name: Option<&str>, editor_id: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let distros = select_distros(distro_name)?;
    let projects = project::scan_all(&distros, &config.scan.root);
    let project = find_project(&projects, name)?;

    let editor = match editor_id.or(config.editor.selected.as_deref()) {
        Some(id) => Editor::find(id).with_context(|| format!("Unknown editor id: {id}"))?,
        None => bail!("No editor configured. Run: wsldev setup"),
    };

    launcher::launch(project, editor)?;
    eprintln!("Opened {} ({}) in {}", project.name, project.distro, editor.name);
    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            let pretty = toml::to_string_pretty(&config)?;
            print!("{pretty}");
        }
        ConfigAction::Path => {
            let path = Config::path()?;
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let config = Config::default();
            config.save()?;
            println!("Wrote default config to {}", Config::path()?.display());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set_value(&key, &value)?;
            config.save()?;
            println!("Set {key} = {value}");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get_value(&key)?);
        }
    }
    Ok(())
}

fn cmd_setup() -> Result<()> {
    let config_path = Config::path()?;
    let already_existed = config_path.exists();
    let mut config = Config::load()?;

    let probe = default_probe_distro();
    if probe.is_none() {
        eprintln!("Warning: no running distribution; terminal editors will not be offered.");
    }

    let detected = editor::detect(probe.as_deref());
    match prompt_editor(&detected) {
        Ok(Some(id)) => config.editor.selected = Some(id),
        Ok(None) => {}
        Err(e) => eprintln!("Warning: could not read editor choice: {e}"),
    }

    config.save()?;
    if already_existed {
        eprintln!("Updated config at {}", config_path.display());
    } else {
        eprintln!("Created config at {}", config_path.display());
    }

    eprintln!("\nSetup complete! Run: wsldev list");
    Ok(())
}

/// Pick the distribution used for editor probing: the default distro when
/// it is running, else the first running one. Failures degrade to `None`
/// so Windows-side detection can still proceed.
fn default_probe_distro() -> Option<String> {
    match distro::list_running() {
        Ok(running) => running
            .iter()
            .find(|distro| distro.is_default)
            .or_else(|| running.first())
            .map(|distro| distro.name.clone()),
        Err(e) => {
            eprintln!("Warning: could not list distributions: {e:#}");
            None
        }
    }
}

/// Running distributions to scan, narrowed to `only` when given.
fn select_distros(only: Option<&str>) -> Result<Vec<Distro>> {
    let distros = distro::list_running()?;
    match only {
        Some(name) => {
            let selected: Vec<Distro> =
                distros.into_iter().filter(|d| d.name == name).collect();
            if selected.is_empty() {
                bail!("Distribution {name} is not running");
            }
            Ok(selected)
        }
        None => Ok(distros),
    }
}

fn find_project<'a>(projects: &'a [Project], name: &str) -> Result<&'a Project> {
    let matches: Vec<&Project> = projects.iter().filter(|p| p.name == name).collect();
    match matches.as_slice() {
        [] => bail!("No project named {name} in any running distribution"),
        [one] => Ok(*one),
        many => {
            let distros: Vec<&str> = many.iter().map(|p| p.distro.as_str()).collect();
            bail!(
                "Project {name} exists in {}; pick one with --distro",
                distros.join(", ")
            );
        }
    }
}

/// Present an interactive editor selection menu and return the chosen id.
fn prompt_editor(detected: &[&'static Editor]) -> Result<Option<String>> {
    use std::io::{BufRead, Write};

    eprintln!("\nSelect your default editor:");
    for (i, editor) in detected.iter().enumerate() {
        eprintln!("  {}. {}", i + 1, editor.name);
    }
    eprintln!("  0. Skip (no editor configured)");
    eprint!("Choice [{}]: ", if detected.is_empty() { 0 } else { 1 });
    std::io::stderr().flush().ok();

    let stdin = std::io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let trimmed = line.trim();

    let choice: usize = if trimmed.is_empty() {
        usize::from(!detected.is_empty())
    } else {
        trimmed.parse().unwrap_or(usize::MAX)
    };

    if choice == 0 {
        return Ok(None);
    }
    if choice <= detected.len() {
        return Ok(Some(detected[choice - 1].id.to_string()));
    }

    eprintln!("Invalid choice, skipping editor selection.");
    Ok(None)
}
