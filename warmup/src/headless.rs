//! Headless mode for the prompt deck.
//!
//! A line-oriented interface over stdin/stdout for scripting and automated
//! testing. Each input line is one command (see `help`); every response is
//! prefixed with a bracketed tag such as `[PROMPT]` or `[STATUS]`.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use warmup_core::{KeyValueStore, PromptEntry};

use crate::app::App;
use crate::command::{Command, COMMAND_HELP};

/// Run the command loop until `quit` or end of input.
pub fn run_headless<S, I, W>(mut app: App<S>, input: I, mut out: W) -> io::Result<()>
where
    S: KeyValueStore,
    I: BufRead,
    W: Write,
{
    writeln!(out, "=== Design Warmup Headless Mode ===")?;
    writeln!(
        out,
        "Catalog: {} prompts, {} matching",
        app.engine.catalog().len(),
        app.engine.match_count()
    )?;
    writeln!(out, "Type `help` for commands.")?;
    writeln!(out)?;

    app.ensure_prompt();
    print_current(&app, &mut out)?;

    let mut last_tick = Instant::now();
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Input arrives in bursts, so the timer catches up on each line.
        let now = Instant::now();
        app.tick(now - last_tick);
        last_tick = now;

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "[ERROR] {e}. Type `help` for help.")?;
                continue;
            }
        };

        match command {
            Command::Quit => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            Command::Help => print_help(&mut out)?,
            Command::Status => print_status(&app, &mut out)?,
            Command::Timer(_) | Command::StopTimer | Command::Favorite | Command::Presentation => {
                app.execute(command);
                print_message(&app, &mut out)?;
            }
            command => {
                app.execute(command);
                print_message(&app, &mut out)?;
                print_current(&app, &mut out)?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

fn print_message<S: KeyValueStore>(app: &App<S>, out: &mut impl Write) -> io::Result<()> {
    if let Some(message) = app.status_message() {
        writeln!(out, "[STATUS] {message}")?;
    }
    Ok(())
}

fn print_current<S: KeyValueStore>(app: &App<S>, out: &mut impl Write) -> io::Result<()> {
    match app.current_prompt() {
        Some(prompt) => print_prompt(prompt, app.engine.is_favorite(&prompt.id), out),
        None => writeln!(out, "[EMPTY] No prompts match the current filters"),
    }
}

fn print_prompt(prompt: &PromptEntry, favorite: bool, out: &mut impl Write) -> io::Result<()> {
    let star = if favorite { " ★" } else { "" };
    writeln!(out, "[PROMPT] {} | {}{} | {}", prompt.id, prompt.title, star, prompt.time)?;
    writeln!(out, "{}", prompt.body)?;
    if let Some(goal) = &prompt.goal {
        writeln!(out, "Goal: {goal}")?;
    }
    for step in &prompt.how_to {
        writeln!(out, "  - {step}")?;
    }
    if !prompt.tags.is_empty() {
        let tags: Vec<&str> = prompt.tags.iter().map(String::as_str).collect();
        writeln!(out, "Tags: {}", tags.join(", "))?;
    }
    writeln!(out)
}

fn print_status<S: KeyValueStore>(app: &App<S>, out: &mut impl Write) -> io::Result<()> {
    let engine = &app.engine;
    writeln!(out, "[STATUS]")?;
    writeln!(out, "  Filters: {}", engine.filters().summary())?;
    writeln!(out, "  Matching: {}", engine.match_count())?;
    writeln!(out, "  Remaining: {} ({:?})", engine.remaining(), engine.state())?;
    writeln!(out, "  Shown: {}", engine.history().len())?;
    writeln!(out, "  Can go back: {}", engine.can_go_back())?;
    writeln!(out, "  Favorites: {}", engine.favorites().len())?;
    writeln!(out, "  Presentation: {}", engine.preferences().presentation)?;
    writeln!(out, "  {}", app.timer.label())
}

fn print_help(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "[HELP]")?;
    for (usage, description) in COMMAND_HELP {
        writeln!(out, "  {usage:<15} {description}")?;
    }
    Ok(())
}
