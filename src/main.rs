// SPDX-License-Identifier: MPL-2.0
use photo_scroller::config::{self, CacheCapacity, InitialFanout, TargetWidth};
use photo_scroller::error::Error;
use photo_scroller::media::{ImageData, ImageStore, Presenter};
use photo_scroller::navigator::{FolderOutcome, Outcome};
use photo_scroller::viewer::Viewer;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const USAGE: &str = "\
usage: photo_scroller [--config-dir DIR] [--capacity N] [--fanout N] [--width N] [--log FILE] [PATH]

commands:
  n, next        next image          p, prev     previous image
  g N            go to image N       home, end   first / last image
  ]              next folder         [           previous folder
  s              toggle scaling      w N         set target width
  i              position            a PATH      append an image
  h              this help           q           quit";

struct Flags {
    config_dir: Option<PathBuf>,
    capacity: Option<usize>,
    fanout: Option<usize>,
    width: Option<u32>,
    log: Option<PathBuf>,
    path: Option<PathBuf>,
}

fn parse_flags(mut args: pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    let flags = Flags {
        config_dir: args.opt_value_from_str("--config-dir")?,
        capacity: args.opt_value_from_str("--capacity")?,
        fanout: args.opt_value_from_str("--fanout")?,
        width: args.opt_value_from_str("--width")?,
        log: args.opt_value_from_str("--log")?,
        path: None,
    };
    let path = args.finish().into_iter().next().map(PathBuf::from);
    Ok(Flags { path, ..flags })
}

/// Prints what would be on screen.
struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn show(&mut self, path: &Path, raw: &ImageData, scaled: Option<&ImageData>) {
        match scaled {
            Some(scaled) => println!(
                "showing {} ({}x{}, scaled to {}x{})",
                path.display(),
                raw.width,
                raw.height,
                scaled.width,
                scaled.height
            ),
            None => println!("showing {} ({}x{})", path.display(), raw.width, raw.height),
        }
    }

    fn show_placeholder(&mut self, path: &Path, error: &Error) {
        println!("cannot show {} ({})", path.display(), error.kind());
    }

    fn hide(&mut self) {
        println!("(nothing shown)");
    }
}

#[derive(Debug, PartialEq)]
enum Command {
    Next,
    Previous,
    Jump(usize),
    Home,
    End,
    NextFolder,
    PreviousFolder,
    ToggleScaling,
    Width(u32),
    Info,
    Append(PathBuf),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let command = match word {
        "n" | "next" => Command::Next,
        "p" | "prev" => Command::Previous,
        "g" => Command::Jump(rest.parse().ok()?),
        "home" => Command::Home,
        "end" => Command::End,
        "]" => Command::NextFolder,
        "[" => Command::PreviousFolder,
        "s" => Command::ToggleScaling,
        "w" => Command::Width(rest.parse().ok()?),
        "i" => Command::Info,
        "a" if !rest.is_empty() => Command::Append(PathBuf::from(rest)),
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn init_logging(log: Option<&Path>) -> io::Result<()> {
    match log {
        Some(log_path) => {
            let file = std::fs::File::create(log_path)?;
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        None => env_logger::init(),
    }
    Ok(())
}

fn report_outcome(viewer: &Viewer<TerminalPresenter>, outcome: Outcome) {
    match outcome {
        Outcome::NoOp => println!("no images"),
        Outcome::HideEdge(direction) => {
            println!("{} (no more images {direction})", viewer.current_position_label());
        }
        _ => log::debug!("{outcome:?} -> {}", viewer.current_position_label()),
    }
}

fn report_folder(viewer: &Viewer<TerminalPresenter>, outcome: &FolderOutcome) {
    match outcome {
        FolderOutcome::Changed(folder) => println!(
            "folder {} ({} image(s))",
            folder.display(),
            viewer.navigator().len()
        ),
        FolderOutcome::NoNextFolder => println!("no next folder"),
        FolderOutcome::NoPreviousFolder => println!("no previous folder"),
    }
}

/// Runs one command. Returns `false` when the session should end.
fn execute(viewer: &mut Viewer<TerminalPresenter>, command: Command) -> bool {
    match command {
        Command::Next => {
            let outcome = viewer.advance();
            report_outcome(viewer, outcome);
        }
        Command::Previous => {
            let outcome = viewer.retreat();
            report_outcome(viewer, outcome);
        }
        Command::Jump(n) => {
            let outcome = viewer.jump_to(n);
            viewer.show_current();
            report_outcome(viewer, outcome);
        }
        Command::Home => {
            let outcome = viewer.jump_to_start();
            viewer.show_current();
            report_outcome(viewer, outcome);
        }
        Command::End => {
            let outcome = viewer.jump_to_end();
            viewer.show_current();
            report_outcome(viewer, outcome);
        }
        Command::NextFolder => match viewer.next_folder() {
            Ok(outcome) => report_folder(viewer, &outcome),
            Err(err) => eprintln!("Error: {err}"),
        },
        Command::PreviousFolder => match viewer.previous_folder() {
            Ok(outcome) => report_folder(viewer, &outcome),
            Err(err) => eprintln!("Error: {err}"),
        },
        Command::ToggleScaling => {
            let enabled = viewer.toggle_scaling();
            println!("scaling {}", if enabled { "on" } else { "off" });
        }
        Command::Width(width) => {
            let width = TargetWidth::new(width);
            viewer.set_target_width(width.value());
            println!("target width {}", width.value());
        }
        Command::Info => {
            let path = viewer
                .current_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("{} {path}", viewer.current_position_label());
        }
        Command::Append(path) => {
            println!("appended {}", path.display());
            viewer.append_item(path);
        }
        Command::Help => println!("{USAGE}"),
        Command::Quit => return false,
    }
    true
}

fn main() -> ExitCode {
    let flags = match parse_flags(pico_args::Arguments::from_env()) {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("Error: {err}\n\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(flags.log.as_deref()) {
        eprintln!("Error: failed to open log file: {err}");
        return ExitCode::FAILURE;
    }

    // Load config file and merge CLI overrides
    let (mut cfg, warning) = config::load_with_override(flags.config_dir.clone());
    if let Some(warning) = warning {
        eprintln!("Warning: {warning}");
    }
    if let Some(capacity) = flags.capacity {
        cfg.cache.capacity = CacheCapacity::new(capacity).value();
    }
    if let Some(fanout) = flags.fanout {
        cfg.cache.initial_fanout = InitialFanout::new(fanout, cfg.capacity()).value();
    }
    if let Some(width) = flags.width {
        cfg.display.target_width = TargetWidth::new(width).value();
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = ImageStore::new(TerminalPresenter)
        .with_scaling(cfg.display.scale_to_width, cfg.target_width().value())
        .with_runtime(runtime.handle().clone());
    let mut viewer = Viewer::new(store, &cfg);

    if let Some(path) = &flags.path {
        if let Err(err) = viewer.open(path) {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        viewer.poll_scaled();
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }
        line.clear();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        viewer.poll_scaled();
        match parse_command(&line) {
            Some(command) => {
                if !execute(&mut viewer, command) {
                    break;
                }
            }
            None if line.trim().is_empty() => {}
            None => println!("unknown command, h for help"),
        }
    }

    ExitCode::SUCCESS
}
