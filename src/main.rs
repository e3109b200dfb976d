use anyhow::{bail, Context};
use clap::Parser;
use log::warn;
use project_board::{
    logging, BoardConfig, ProjectBoard, ProjectId, ProjectStatus, SubmitOutcome,
};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

/// Drive a project board from commands on stdin
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Board configuration (JSON); defaults are used when omitted
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error or off [default: debug in
    /// debug builds, info otherwise]
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn log_level(&self) -> &str {
        self.log_level
            .as_deref()
            .unwrap_or_else(|| logging::default_log_level())
    }
}

const HELP: &str = "\
commands:
  add <title> | <description> | <people>   submit the project form
  move <id or id prefix> <active|finished> drag a project onto a column
  list                                     print each column
  show                                     print the rendered board
  help                                     print this text";

#[derive(Debug, PartialEq)]
enum Command {
    Add {
        title: String,
        description: String,
        people: String,
    },
    Move {
        id: String,
        status: ProjectStatus,
    },
    List,
    Show,
    Help,
}

fn parse_command(line: &str) -> anyhow::Result<Command> {
    let (verb, rest) = line
        .trim()
        .split_once(char::is_whitespace)
        .unwrap_or((line.trim(), ""));

    match verb {
        "add" => {
            let parts: Vec<&str> = rest.split('|').map(str::trim).collect();
            let [title, description, people] = parts.as_slice() else {
                bail!("usage: add <title> | <description> | <people>");
            };
            Ok(Command::Add {
                title: title.to_string(),
                description: description.to_string(),
                people: people.to_string(),
            })
        }
        "move" => {
            let mut words = rest.split_whitespace();
            let (Some(id), Some(status), None) = (words.next(), words.next(), words.next()) else {
                bail!("usage: move <id> <active|finished>");
            };
            Ok(Command::Move {
                id: id.to_string(),
                status: status.parse()?,
            })
        }
        "list" => Ok(Command::List),
        "show" => Ok(Command::Show),
        "help" => Ok(Command::Help),
        other => bail!("unknown command `{}`, try `help`", other),
    }
}

/// Resolves a full id or a unique prefix of one
fn resolve_id(board: &ProjectBoard, needle: &str) -> anyhow::Result<ProjectId> {
    let matches: Vec<ProjectId> = board
        .store()
        .projects()
        .into_iter()
        .map(|project| project.id().clone())
        .filter(|id| id.as_str().starts_with(needle))
        .collect();

    match matches.as_slice() {
        [id] => Ok(id.clone()),
        [] => bail!("no project matches `{}`", needle),
        _ => bail!("`{}` matches {} projects", needle, matches.len()),
    }
}

fn run_command(board: &ProjectBoard, command: Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::Add {
            title,
            description,
            people,
        } => match board.submit_project(&title, &description, &people)? {
            SubmitOutcome::Created(id) => writeln!(out, "created {}", id)?,
            SubmitOutcome::Rejected(err) => {
                let alert = board
                    .document()
                    .borrow()
                    .alerts()
                    .last()
                    .cloned()
                    .unwrap_or_default();
                writeln!(out, "{} ({})", alert, err)?
            }
        },
        Command::Move { id, status } => {
            let id = resolve_id(board, &id)?;
            if board.drag_project(&id, status)? {
                writeln!(out, "moved {} to {}", id, status)?;
            } else {
                writeln!(out, "{} unchanged", id)?;
            }
        }
        Command::List => {
            for list in board.lists() {
                writeln!(out, "{}", list.column().heading())?;
                for project in list.assigned() {
                    writeln!(
                        out,
                        "  {}  {} ({} assigned): {}",
                        project.id(),
                        project.title(),
                        project.persons_label(),
                        project.description()
                    )?;
                }
            }
        }
        Command::Show => write!(out, "{}", board.render_html()?)?,
        Command::Help => writeln!(out, "{}", HELP)?,
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level())?;

    let config = match &args.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("cannot load configuration file {}", path.display()))?,
        None => BoardConfig::default(),
    };
    let board = ProjectBoard::new(config).context("cannot build the board")?;

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let result = parse_command(&line).and_then(|cmd| run_command(&board, cmd, &mut stdout));
        if let Err(err) = result {
            warn!("command failed: {:#}", err);
            writeln!(stdout, "error: {:#}", err)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(board: &ProjectBoard, line: &str) -> String {
        let mut out = Vec::new();
        let command = parse_command(line).unwrap();
        run_command(board, command, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_log_level_defaults_by_build() {
        let args = Args::try_parse_from(["project-board"]).unwrap();
        assert_eq!(args.log_level(), logging::default_log_level());

        let args = Args::try_parse_from(["project-board", "--log-level", "error"]).unwrap();
        assert_eq!(args.log_level(), "error");
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse_command("add Launch | Ship the thing | 3").unwrap(),
            Command::Add {
                title: "Launch".to_string(),
                description: "Ship the thing".to_string(),
                people: "3".to_string(),
            }
        );
        assert!(parse_command("add Launch | Ship").is_err());
    }

    #[test]
    fn test_parse_move_and_others() {
        assert_eq!(
            parse_command("move abc finished").unwrap(),
            Command::Move {
                id: "abc".to_string(),
                status: ProjectStatus::Finished,
            }
        );
        assert!(parse_command("move abc done").is_err());
        assert!(parse_command("move abc").is_err());
        assert_eq!(parse_command("  list ").unwrap(), Command::List);
        assert!(parse_command("delete abc").is_err());
    }

    #[test]
    fn test_session() {
        let board = ProjectBoard::new(BoardConfig::default()).unwrap();

        let created = run(&board, "add Launch | Ship the thing | 2");
        let id = created.trim().strip_prefix("created ").unwrap().to_string();

        let rejected = run(&board, "add X | abc | 9");
        assert!(rejected.starts_with("Invalid input, please try again!"));

        let moved = run(&board, &format!("move {} finished", &id[..8]));
        assert_eq!(moved.trim(), format!("moved {} to Finished", id));

        let again = run(&board, &format!("move {} finished", id));
        assert_eq!(again.trim(), format!("{} unchanged", id));

        let listing = run(&board, "list");
        assert!(listing.starts_with("ACTIVE PROJECTS\nFINISHED PROJECTS\n"));
        assert!(listing.contains("Launch (2 persons assigned)"));
    }

    #[test]
    fn test_move_unknown_prefix() {
        let board = ProjectBoard::new(BoardConfig::default()).unwrap();
        let command = parse_command("move zzz active").unwrap();
        let mut out = Vec::new();
        assert!(run_command(&board, command, &mut out).is_err());
    }
}
