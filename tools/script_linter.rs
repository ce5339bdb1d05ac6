/// Script Linter: validates dialogue scripts before they are played.
///
/// Usage: script_linter <script_file_or_dir> [--max-chars <n>]
use dialogue_playback::schema::line::Emotion;
use dialogue_playback::schema::script::ScriptFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_CHARS: usize = 120;

// Raw shapes keep the emotion as written, so unknown names can be reported
// before the library quietly degrades them.

#[derive(Debug, Deserialize)]
struct RawLine {
    speaker: String,
    text: String,
    #[serde(default)]
    emotion: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRonScript {
    title: String,
    #[serde(default)]
    lines: Vec<RawLine>,
}

#[derive(Debug, Deserialize)]
struct RawJsonScript {
    title: String,
    #[serde(default)]
    script: Vec<RawLine>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: script_linter <script_file_or_dir> [--max-chars <n>]");
        process::exit(0);
    }

    let target = &args[1];
    let mut max_chars = DEFAULT_MAX_CHARS;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--max-chars" && i + 1 < args.len() {
            i += 1;
            max_chars = args[i].parse().unwrap_or_else(|_| {
                eprintln!("Error: --max-chars must be a positive number");
                process::exit(1);
            });
        } else {
            eprintln!("Unknown argument: {}", args[i]);
            process::exit(1);
        }
        i += 1;
    }

    let target_path = Path::new(target);
    let mut files = Vec::new();
    if target_path.is_file() {
        files.push(target_path.to_path_buf());
    } else if target_path.is_dir() {
        collect_script_files(target_path, &mut files);
    } else {
        eprintln!("ERROR: Path '{}' does not exist", target);
        process::exit(1);
    }
    files.sort();

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for file in &files {
        tracing::debug!(path = %file.display(), "linting");
        let (file_errors, file_warnings) = lint_file(file, max_chars);
        let label = file.display().to_string();
        errors.extend(file_errors.into_iter().map(|e| format!("{}: {}", label, e)));
        warnings.extend(file_warnings.into_iter().map(|w| format!("{}: {}", label, w)));
    }

    println!("Checked {} script file(s)", files.len());
    println!("\n=== Script Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn collect_script_files(dir: &Path, files: &mut Vec<PathBuf>) {
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                collect_script_files(&path, files);
            } else if matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("ron") | Some("json")
            ) {
                files.push(path);
            }
        }
    }
}

fn lint_file(path: &Path, max_chars: usize) -> (Vec<String>, Vec<String>) {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return (vec![format!("cannot read file: {}", e)], Vec::new()),
    };

    let parsed = match ScriptFormat::from_path(path) {
        ScriptFormat::Ron => ron::from_str::<RawRonScript>(&contents)
            .map(|raw| (raw.title, raw.lines))
            .map_err(|e| e.to_string()),
        ScriptFormat::Json => serde_json::from_str::<RawJsonScript>(&contents)
            .map(|raw| (raw.title, raw.script))
            .map_err(|e| e.to_string()),
    };

    match parsed {
        Ok((title, lines)) => lint_lines(&title, &lines, max_chars),
        Err(e) => (vec![format!("parse error: {}", e)], Vec::new()),
    }
}

fn lint_lines(title: &str, lines: &[RawLine], max_chars: usize) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if title.trim().is_empty() {
        warnings.push("Script has an empty title".to_string());
    }

    if lines.is_empty() {
        warnings.push("Script has no lines (plays as 'End of Chapter')".to_string());
    }

    for (index, line) in lines.iter().enumerate() {
        if line.text.is_empty() {
            errors.push(format!("Line {} has empty text", index));
        } else if line.text.trim().is_empty() {
            warnings.push(format!("Line {} text is only whitespace", index));
        }

        let chars = line.text.chars().count();
        if chars > max_chars {
            warnings.push(format!(
                "Line {} is {} characters long (over {}); consider splitting it",
                index, chars, max_chars
            ));
        }

        if line.speaker.trim().is_empty() {
            warnings.push(format!("Line {} has a blank speaker", index));
        }

        match line.emotion.as_deref() {
            None => {}
            Some(name) if Emotion::from_name(name).is_some() => {}
            Some(name) => warnings.push(format!(
                "Line {} uses unknown emotion '{}' (will show as 'normal')",
                index, name
            )),
        }

        if let Some(ref note) = line.note {
            if note.trim().is_empty() {
                warnings.push(format!("Line {} has an empty note", index));
            }
        }
    }

    (errors, warnings)
}
