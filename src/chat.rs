// Terminal front end: one interview session over stdin/stdout.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::info;

use crate::llm::LanguageModel;
use crate::session::{Phase, Session, SessionSummary};

const INPUT_PROMPT: &str = "Please answer the question. > ";

/// Run an interview until the profile is complete or input ends.
///
/// When the profile completes, the radar chart is written to `chart_out` as
/// SVG if a path was given.
pub async fn run_interview_chat<R: BufRead, W: Write>(
    model: &dyn LanguageModel,
    mut input: R,
    mut output: W,
    chart_out: Option<&Path>,
) -> Result<SessionSummary> {
    let mut session = Session::start(model)
        .await
        .context("Failed to open interview session")?;

    if let Some(opening) = session.transcript().last() {
        writeln!(output, "assistant: {}", opening.content)?;
    }

    while session.phase() == Phase::Collecting {
        write!(output, "{}", INPUT_PROMPT)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            info!("Input closed before the interview completed");
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let outcome = session
            .handle_answer(model, &line)
            .await
            .context("Interview turn failed")?;
        writeln!(output, "assistant: {}", outcome.reply)?;

        if let Some(chart) = outcome.chart {
            writeln!(output, "\nFor Recruiter Only:")?;
            for (label, value) in chart.axes() {
                writeln!(output, "  {:<16} {:>4.1}", label, value)?;
            }
            if let Some(path) = chart_out {
                std::fs::write(path, chart.render_svg())
                    .with_context(|| format!("Failed to write chart to {}", path.display()))?;
                writeln!(output, "Chart written to {}", path.display())?;
            }
        }
    }

    Ok(session.finish())
}
