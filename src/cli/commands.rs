//! Command dispatch for the rsavl CLI.

use std::io::{self, BufRead, IsTerminal};

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::command::{format_script, COMMAND_HELP};
use crate::application::services::{Outcome, TreeService};
use crate::application::{parse_line, TreeCommand};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::cli::render::{render_tree, StepPrinter};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Run { ops, quiet }) => cmd_run(cli, ops, *quiet),
        Some(Commands::Shell) | None => cmd_shell(cli),
        Some(Commands::Config { command }) => cmd_config(cli, command),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

fn load_container(cli: &Cli) -> CliResult<ServiceContainer> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    Ok(ServiceContainer::new(settings, cli.animate))
}

/// One tree plus the presentation choices for it.
pub(crate) struct Session<'a> {
    container: &'a ServiceContainer,
    service: TreeService,
    steps: bool,
    draw_changes: bool,
}

impl<'a> Session<'a> {
    pub(crate) fn new(container: &'a ServiceContainer, steps: bool, draw_changes: bool) -> Self {
        Self {
            container,
            service: container.tree_service(),
            steps,
            draw_changes,
        }
    }

    /// Apply one command; returns false once the user asked to quit.
    ///
    /// Duplicates, missing values and bad input are reported and the
    /// session continues. A broken invariant ends it.
    pub(crate) fn apply(&mut self, command: TreeCommand) -> CliResult<bool> {
        let mut printer = StepPrinter::new(self.steps);
        if self.steps {
            output::header(&command);
        }
        let result = {
            let mut paced = self.container.paced(&mut printer);
            self.service.execute(command, &mut paced)
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) if e.is_notice() => {
                output::failure(&e);
                return Ok(true);
            }
            Err(e) => return Err(e.into()),
        };

        if outcome.mutated() {
            self.service.verify()?;
        }
        self.report(&outcome);
        Ok(outcome != Outcome::Quit)
    }

    fn report(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Inserted { value, .. } => {
                output::success(&format!("inserted {}", value));
                self.draw_if_enabled();
            }
            Outcome::Deleted { value } => {
                output::warning(&format!("deleted {}", value));
                self.draw_if_enabled();
            }
            Outcome::Found { value, id } => {
                output::success(&format!("found {} at {}", value, id));
            }
            Outcome::Cleared { removed } => {
                output::notice(&format!("cleared {} nodes", removed));
                self.draw_if_enabled();
            }
            Outcome::Traversal { order, values } => {
                let separator = &self.service.settings().display.separator;
                let line = if values.is_empty() {
                    "(empty)".to_string()
                } else {
                    values
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(separator)
                };
                output::header(&format!("{}:", order));
                output::detail(&line);
            }
            Outcome::Stats(_) => self.print_stats(),
            Outcome::Show => self.draw(),
            Outcome::Help => output::plain(COMMAND_HELP),
            Outcome::Quit => {}
        }
    }

    fn draw_if_enabled(&self) {
        if self.draw_changes {
            self.draw();
        }
    }

    fn draw(&self) {
        let show_balance = self.service.settings().display.show_balance;
        output::plain(render_tree(self.service.tree(), show_balance).trim_end());
        self.print_stats();
    }

    fn print_stats(&self) {
        let stats = self.service.stats();
        output::detail(&format!("height: {}  nodes: {}", stats.height, stats.count));
    }
}

/// Parse `run` arguments as one script; `#` starts a comment.
fn parse_script(ops: &[String]) -> CliResult<Vec<TreeCommand>> {
    let commands = parse_line(&ops.join(" "))?;
    if commands.is_empty() {
        return Err(CliError::Usage(
            "script has no operations, e.g. `rsavl run insert 10 20`".into(),
        ));
    }
    Ok(commands)
}

/// Apply `commands` to a fresh tree until the script ends or says quit.
fn run_script<'a>(
    container: &'a ServiceContainer,
    commands: Vec<TreeCommand>,
    steps: bool,
    quiet: bool,
) -> CliResult<Session<'a>> {
    let mut session = Session::new(container, steps, !quiet);
    for command in commands {
        if !session.apply(command)? {
            break;
        }
    }
    if quiet {
        session.draw();
    }
    Ok(session)
}

#[instrument(skip(cli))]
fn cmd_run(cli: &Cli, ops: &[String], quiet: bool) -> CliResult<()> {
    let commands = parse_script(ops)?;
    debug!("script: {}", format_script(&commands));

    let container = load_container(cli)?;
    run_script(&container, commands, cli.steps, quiet)?;
    Ok(())
}

#[instrument(skip(cli))]
fn cmd_shell(cli: &Cli) -> CliResult<()> {
    let container = load_container(cli)?;
    let mut session = Session::new(&container, cli.steps, true);

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        output::header("rsavl shell, `help` lists commands");
    }

    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            output::prompt("avl>");
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| InfraError::io("read stdin", e))?;

        let commands = match parse_line(&line) {
            Ok(commands) => commands,
            Err(e) => {
                output::failure(&e);
                continue;
            }
        };
        for command in commands {
            if !session.apply(command)? {
                return Ok(());
            }
        }
    }
    Ok(())
}

fn cmd_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let container = load_container(cli)?;
            output::plain(container.settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                let marker = if path.exists() { "" } else { " (not present)" };
                output::plain(&format!("{}{}", path.display(), marker));
            }
            None => output::warning("no config directory on this platform"),
        },
        ConfigCommands::Template => output::plain(&Settings::template()),
    }
    Ok(())
}

fn cmd_completion(shell: clap_complete::Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Settings;
    use crate::infrastructure::traits::{NoPacer, ScriptedSource};

    fn container() -> ServiceContainer {
        ServiceContainer::with_deps(
            Settings::default(),
            Arc::new(NoPacer),
            Arc::new(ScriptedSource::new([])),
        )
    }

    fn script(text: &str) -> Vec<String> {
        text.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn given_duplicate_and_missing_values_when_running_then_session_continues() {
        let container = container();
        let commands = parse_script(&script("insert 5 5 delete 9 search 5 insert 7")).unwrap();
        assert_eq!(commands.len(), 5);

        let session = run_script(&container, commands, false, true).unwrap();

        assert_eq!(session.service.tree().inorder(), vec![5, 7]);
        session.service.verify().unwrap();
    }

    #[test]
    fn given_quit_in_script_then_later_commands_are_skipped() {
        let container = container();
        let commands = parse_script(&script("insert 1 quit insert 2")).unwrap();

        let session = run_script(&container, commands, false, true).unwrap();

        assert_eq!(session.service.tree().inorder(), vec![1]);
    }

    #[test]
    fn given_notice_then_apply_reports_and_keeps_going() {
        let container = container();
        let mut session = Session::new(&container, true, false);

        assert!(session.apply(TreeCommand::Search(3)).unwrap());
        assert!(session.apply(TreeCommand::Insert(3)).unwrap());
        assert!(session.apply(TreeCommand::Insert(3)).unwrap());
        assert!(!session.apply(TreeCommand::Quit).unwrap());
        assert_eq!(session.service.stats().count, 1);
    }

    #[test]
    fn given_comment_only_script_then_usage_error() {
        let err = parse_script(&script("# nothing here")).unwrap_err();

        assert!(matches!(err, CliError::Usage(_)));
        assert_eq!(err.exit_code(), crate::exitcode::USAGE);
    }

    #[test]
    fn given_bad_value_in_script_then_invalid_input() {
        let err = parse_script(&script("insert 1 delete x")).unwrap_err();
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }
}
