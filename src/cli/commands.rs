//! Command dispatch: each subcommand loads settings, builds a view and prints results

use std::cell::RefCell;
use std::io;
use std::path::Path;
use std::rc::Rc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, info, instrument};

use crate::application::{parse_script, run_script, to_text_tree, TreeEvent, TreeView};
use crate::cli::args::{Cli, Commands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::infrastructure::{InfraError, ServiceContainer};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(command) => {
            let settings = Settings::load(cli.config.as_deref())?;
            let container = ServiceContainer::new(settings);
            dispatch(command, &container)
        }
        None => {
            if cli.info {
                return Ok(());
            }
            Err(CliError::Usage(
                "no command given, see `treeview --help`".to_string(),
            ))
        }
    }
}

fn dispatch(command: &Commands, container: &ServiceContainer) -> CliResult<()> {
    match command {
        Commands::Tree { file } => _tree(container, file),
        Commands::Flatten { file } => _flatten(container, file),
        Commands::Render { file } => _render(container, file),
        Commands::Run {
            data,
            script,
            output,
            quiet,
        } => _run(container, data.as_deref(), script, output.as_deref(), *quiet),
        Commands::Config => _config(container),
        Commands::Completion { .. } => Ok(()),
    }
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let view = container.load_view(file)?;
    print_tree(&view, &file.display().to_string());
    if !view.arena().is_empty() {
        output::detail(&tree_summary(&view));
    }
    Ok(())
}

/// One-line shape summary printed below the tree.
pub fn tree_summary(view: &TreeView) -> String {
    let arena = view.arena();
    format!(
        "{} nodes, {} leaves, depth {}",
        arena.len(),
        arena.leaf_ids().len(),
        arena.depth()
    )
}

#[instrument(skip(container))]
fn _flatten(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let view = container.load_view(file)?;
    for record in view.flatten() {
        output::info(&record.node_id);
    }
    Ok(())
}

#[instrument(skip(container))]
fn _render(container: &ServiceContainer, file: &Path) -> CliResult<()> {
    let view = container.load_view(file)?;
    let json = to_json(view.visual(), "visual tree")?;
    output::info(&json);
    Ok(())
}

#[instrument(skip(container))]
fn _run(
    container: &ServiceContainer,
    data: Option<&Path>,
    script: &Path,
    output_path: Option<&Path>,
    quiet: bool,
) -> CliResult<()> {
    let source = container
        .fs
        .read_to_string(script)
        .map_err(|e| InfraError::io(format!("read {}", script.display()), e))?;
    let commands = parse_script(&source)?;
    debug!(commands = commands.len(), "parsed script");

    let mut view = match data {
        Some(path) => container.load_view(path)?,
        None => TreeView::new((*container.settings).clone()),
    };

    let events: Rc<RefCell<Vec<TreeEvent>>> = Rc::default();
    let sink = Rc::clone(&events);
    view.connect(move |event| sink.borrow_mut().push(event.clone()));

    run_script(&mut view, &commands);
    info!(events = events.borrow().len(), "script finished");

    if !quiet {
        let events = events.borrow();
        if !events.is_empty() {
            output::header("Events");
            for event in events.iter() {
                output::detail(&to_json_line(event)?);
            }
        }
    }

    print_tree(&view, view.tree_name());

    if let Some(path) = output_path {
        container.save_tree(path, &view.tree())?;
        output::success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}

#[instrument(skip(container))]
fn _config(container: &ServiceContainer) -> CliResult<()> {
    let toml = container.settings.to_toml()?;
    output::info(&toml);
    Ok(())
}

fn print_tree(view: &TreeView, title: &str) {
    if view.arena().is_empty() {
        output::warning("tree is empty");
        return;
    }
    let tree = to_text_tree(view.arena(), view.state(), view.settings(), title);
    output::info(&tree);
}

fn to_json<T: serde::Serialize>(value: &T, context: &str) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| {
        CliError::from(InfraError::Serialize {
            context: context.to_string(),
            source: e,
        })
    })
}

fn to_json_line(event: &TreeEvent) -> CliResult<String> {
    serde_json::to_string(event).map_err(|e| {
        CliError::from(InfraError::Serialize {
            context: format!("event {}", event.name()),
            source: e,
        })
    })
}
