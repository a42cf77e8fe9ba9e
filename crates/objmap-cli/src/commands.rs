use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use objmap_suggest::{AcceptAll, LinePrompt, Prompt, SuggestError, Suggester, Suggestion};
use tracing::info_span;

use crate::cli::Cli;

/// Runs the interactive review. Prompts go to stderr, answers come from stdin.
pub fn run_suggest(cli: &Cli) -> Result<Suggestion> {
    let span = info_span!(
        "suggest",
        source = %cli.source.display(),
        target = %cli.target.display()
    );
    let _guard = span.enter();

    eprintln!(
        "Analyzing {} and {}...\n",
        cli.source.display(),
        cli.target.display()
    );
    let result = if cli.yes {
        suggest_with(AcceptAll, &cli.source, &cli.target)
    } else {
        let prompt = LinePrompt::new(io::stdin().lock(), io::stderr());
        suggest_with(prompt, &cli.source, &cli.target)
    };
    result.with_context(|| {
        format!(
            "suggest mapping from {} to {}",
            cli.source.display(),
            cli.target.display()
        )
    })
}

pub fn suggest_with<P: Prompt>(
    prompt: P,
    source: &Path,
    target: &Path,
) -> Result<Suggestion, SuggestError> {
    Suggester::new(prompt).run(source, target)
}

/// Writes the mapping fragment, and nothing else, to `out`.
pub fn emit(suggestion: &Suggestion, out: &mut impl Write) -> Result<()> {
    let json = suggestion
        .to_json()
        .context("render mapping fragment")?;
    writeln!(out, "{json}").context("write mapping fragment")?;
    Ok(())
}
