use colored::Colorize;
use eyre::{eyre, Result};
use std::io::{self, BufRead, IsTerminal, Write};
use texswap_core::Language;

/// Asks for a language on the terminal. Fails when stdin is not interactive.
pub fn prompt_language() -> Result<Language> {
    if !io::stdin().is_terminal() {
        return Err(eyre!(
            "no language selected; pass --language or set `language` in the config"
        ));
    }
    select_language(&mut io::stdin().lock(), &mut io::stdout())
}

/// Shows the numbered language menu until a valid choice is read.
/// Accepts the menu number, the language code or the language name.
pub fn select_language(input: &mut impl BufRead, output: &mut impl Write) -> Result<Language> {
    writeln!(output, "\n{}", "Select your language:".bold())?;
    for (i, lang) in Language::ALL.iter().enumerate() {
        writeln!(
            output,
            "  {} {} ({})",
            format!("{}.", i + 1).bright_yellow(),
            lang.display_name(),
            lang.code()
        )?;
    }

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(eyre!("no language selected"));
        }

        let choice = line.trim();
        let by_index = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Language::ALL.get(i).copied());
        match by_index.or_else(|| choice.parse().ok()) {
            Some(lang) => return Ok(lang),
            None => writeln!(output, "{} '{}'", "Unknown choice".bright_red(), choice)?,
        }
    }
}

/// Waits for Enter, like the double-click friendly builds of the tool.
pub fn pause_for_exit() -> Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout)?;
    write!(stdout, "Press Enter to exit")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(())
}
