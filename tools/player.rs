/// Player: interactive terminal shell for playing back a dialogue script.
///
/// Usage: player --script <file> [--config <file.ron>] [--sprites <file.ron>]
///               [--typing-ms <n>] [--auto-ms <n>] [--auto] [--pause-auto-in-log]
///
/// Commands:
///   next (or empty line)  click: skip the reveal or go to the next line
///   auto                  toggle auto-play
///   log                   toggle the backlog
///   hide / show           hide or re-show the dialogue UI
///   wait <ms>             let time pass
///   play                  run in real time until input is needed
///   state                 print the playback snapshot
///   help                  list commands
///   quit                  exit
use dialogue_playback::core::config::{BacklogPolicy, PlaybackConfig};
use dialogue_playback::core::controller::{PlaybackController, PlayerInput};
use dialogue_playback::core::frame::Frame;
use dialogue_playback::core::sprite::SpriteTable;
use dialogue_playback::schema::script::Script;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut script_path = None;
    let mut config_path = None;
    let mut sprites_path = None;
    let mut typing_ms = None;
    let mut auto_ms = None;
    let mut start_auto = false;
    let mut pause_auto_in_log = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--script" if i + 1 < args.len() => {
                i += 1;
                script_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--sprites" if i + 1 < args.len() => {
                i += 1;
                sprites_path = Some(args[i].clone());
            }
            "--typing-ms" if i + 1 < args.len() => {
                i += 1;
                typing_ms = Some(parse_ms(&args[i], "--typing-ms"));
            }
            "--auto-ms" if i + 1 < args.len() => {
                i += 1;
                auto_ms = Some(parse_ms(&args[i], "--auto-ms"));
            }
            "--auto" => start_auto = true,
            "--pause-auto-in-log" => pause_auto_in_log = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let script_path = script_path.unwrap_or_else(|| {
        eprintln!("Error: --script is required");
        print_usage();
        process::exit(1);
    });

    let script = Script::load(Path::new(&script_path)).unwrap_or_else(|e| {
        eprintln!("Error loading script '{}': {}", script_path, e);
        process::exit(1);
    });

    let mut config = match config_path {
        Some(ref path) => PlaybackConfig::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading config '{}': {}", path, e);
            process::exit(1);
        }),
        None => PlaybackConfig::default(),
    };
    if let Some(ms) = typing_ms {
        config.typing_interval_ms = ms;
    }
    if let Some(ms) = auto_ms {
        config.auto_delay_ms = ms;
    }
    if pause_auto_in_log {
        config.backlog_policy = BacklogPolicy::PauseAuto;
    }

    let sprites = match sprites_path {
        Some(ref path) => SpriteTable::load_from_ron(Path::new(path)).unwrap_or_else(|e| {
            eprintln!("Error loading sprites '{}': {}", path, e);
            process::exit(1);
        }),
        None => SpriteTable::default(),
    };

    println!("== {} ==", script.title);
    println!(
        "{} lines, {} ms/char, auto delay {} ms",
        script.len(),
        config.typing_interval_ms,
        config.auto_delay_ms
    );
    println!("Type 'help' for commands.\n");

    let started = Instant::now();
    let mut pc = PlaybackController::with_config(script, config, started.elapsed());
    if start_auto {
        pc.toggle_auto(started.elapsed());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        pc.update(started.elapsed());
        print_frame(&pc.frame(&sprites));
        report_events(&mut pc);
        if pc.has_exited() {
            break;
        }

        print!("player> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            pc.exit();
            break;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts.first().map(|s| s.to_lowercase()).unwrap_or_default();

        pc.update(started.elapsed());
        let now = started.elapsed();

        match cmd.as_str() {
            "" | "next" | "n" => {
                pc.handle(PlayerInput::Click, now);
            }
            "auto" | "a" => {
                pc.handle(PlayerInput::ToggleAuto, now);
            }
            "log" | "l" => {
                pc.handle(PlayerInput::ToggleLog, now);
                if pc.is_log_visible() {
                    print_backlog(&pc);
                }
            }
            "hide" => {
                pc.handle(PlayerInput::Hide, now);
            }
            "show" => {
                pc.handle(PlayerInput::Show, now);
            }
            "wait" | "w" => {
                let Some(arg) = parts.get(1) else {
                    println!("Usage: wait <ms>");
                    continue;
                };
                match arg.parse::<u64>() {
                    Ok(ms) => std::thread::sleep(Duration::from_millis(ms)),
                    Err(_) => println!("Invalid duration: {}", arg),
                }
            }
            "play" | "p" => play(&mut pc, started),
            "state" | "s" => match serde_json::to_string_pretty(&pc.snapshot()) {
                Ok(json) => println!("{}", json),
                Err(e) => println!("ERROR: {}", e),
            },
            "help" | "h" | "?" => print_help(),
            "quit" | "exit" | "q" => {
                pc.handle(PlayerInput::Exit, now);
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }

    println!("Goodbye.");
}

/// Stream the reveal in real time until the script needs a click.
fn play(pc: &mut PlaybackController, started: Instant) {
    let mut stdout = io::stdout();
    let mut printed: Option<(usize, usize)> = None;

    loop {
        pc.update(started.elapsed());

        if let Some(line) = pc.current_line() {
            let index = pc.current_index().unwrap_or(0);
            let visible = pc.visible_text();
            let already = match printed {
                Some((i, n)) if i == index => n,
                other => {
                    if other.is_some() {
                        println!();
                    }
                    print!("{}: ", line.speaker);
                    0
                }
            };
            let count = visible.chars().count();
            let fresh: String = visible.chars().skip(already).collect();
            print!("{}", fresh);
            stdout.flush().ok();
            printed = Some((index, count));
        }

        // No timer pending means only input can move playback on, e.g. the
        // end of the script or auto-play paused under the backlog.
        if pc.awaiting_input() {
            break;
        }
        let wait = pc
            .next_deadline()
            .unwrap_or_default()
            .saturating_sub(started.elapsed());
        std::thread::sleep(wait.max(Duration::from_millis(1)));
    }
    println!();
}

fn print_frame(frame: &Frame) {
    match frame {
        Frame::NoContent { message } => println!("[{}]", message),
        Frame::Exited => {}
        Frame::Dialogue(d) if d.ui_hidden => {
            println!("(UI hidden; click or 'show' to bring it back)");
        }
        Frame::Dialogue(d) => {
            let mut status = Vec::new();
            if d.auto_active {
                status.push("AUTO");
            }
            if d.backlog_open {
                status.push("LOG");
            }
            if d.finished {
                status.push("END");
            }
            println!(
                "\n[{}/{}] {} ({}){}",
                d.index + 1,
                d.total,
                d.speaker,
                d.emotion.name(),
                if status.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", status.join(" "))
                }
            );
            if let Some(ref sprite) = d.sprite {
                println!("  sprite: {}", sprite);
            }
            let marker = if d.show_cursor { "▌" } else { " ▼" };
            println!("  {}{}", d.text, marker);
            if let Some(ref note) = d.note {
                println!("  * Note: {}", note);
            }
        }
    }
}

fn print_backlog(pc: &PlaybackController) {
    println!("\n=== Dialogue History ===");
    for entry in pc.backlog().iter() {
        println!("{}", entry.speaker);
        println!("  {}", entry.text);
    }
    println!("========================");
}

fn report_events(pc: &mut PlaybackController) {
    for event in pc.drain_events() {
        tracing::debug!(?event, "playback event");
    }
}

fn parse_ms(value: &str, flag: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        eprintln!("Error: {} must be a number of milliseconds", flag);
        process::exit(1);
    })
}

fn print_usage() {
    println!("Player: interactive terminal shell for playing back a dialogue script.");
    println!();
    println!("Usage: player --script <file> [options]");
    println!();
    println!("  --script <file>        Script to play (.ron, or generator .json)");
    println!("  --config <file>        Playback config (RON)");
    println!("  --sprites <file>       Sprite table (RON)");
    println!("  --typing-ms <n>        Milliseconds per character (default: 30)");
    println!("  --auto-ms <n>          Auto-play delay in milliseconds (default: 2000)");
    println!("  --auto                 Start with auto-play on");
    println!("  --pause-auto-in-log    Pause auto-play while the backlog is open");
}

fn print_help() {
    println!("Commands:");
    println!("  next (or empty line)  Skip the reveal or go to the next line");
    println!("  auto                  Toggle auto-play");
    println!("  log                   Toggle the backlog");
    println!("  hide / show           Hide or re-show the dialogue UI");
    println!("  wait <ms>             Let time pass");
    println!("  play                  Run in real time until input is needed");
    println!("  state                 Print the playback snapshot");
    println!("  help                  Show this help");
    println!("  quit                  Exit");
}
