//! Terminal answer to the confirmation gate.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use pagemark_core::Prompt;

use crate::session::Session;

/// How a pending confirmation was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Confirmed(Prompt),
    Cancelled(Prompt),
}

/// Show the pending prompt on `output`, read a y/N answer from `input`, and
/// confirm or cancel accordingly.
///
/// With `assume_yes` the prompt is still shown but no answer is read.
/// Anything other than `y`/`yes` (including end of input) cancels. Files
/// changed by other processes while waiting are reloaded before the action
/// runs.
pub fn settle_pending<R: BufRead, W: Write>(
    session: &mut Session,
    assume_yes: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Decision> {
    let Some(prompt) = session.library().prompt().cloned() else {
        bail!("no confirmation is pending");
    };

    writeln!(output, "{}", prompt.title)?;
    write!(output, "{} [y/N] ", prompt.description)?;
    let accepted = if assume_yes {
        writeln!(output, "y")?;
        true
    } else {
        output.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer).context("read confirmation answer")?;
        is_yes(&answer)
    };

    if !accepted {
        let prompt = session.library_mut().cancel()?;
        tracing::debug!(title = %prompt.title, "declined");
        return Ok(Decision::Cancelled(prompt));
    }

    session.refresh()?;
    let prompt = session
        .library_mut()
        .confirm()
        .with_context(|| prompt.title.clone())?;
    Ok(Decision::Confirmed(prompt))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
