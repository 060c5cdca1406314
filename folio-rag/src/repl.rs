use crate::pipeline::Orchestrator;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str = "\nYour question: ";

fn is_exit_command(line: &str) -> bool {
    matches!(line.to_lowercase().as_str(), "quit" | "exit" | "q")
}

/// Reads questions line by line until an exit command or end of input.
/// Returns the number of questions answered.
pub async fn run_repl<R, W>(orchestrator: &Orchestrator, input: R, mut output: W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0usize;

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            output.write_all(b"\n").await?;
            break;
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if is_exit_command(query) {
            output.write_all(b"\nGoodbye!\n").await?;
            break;
        }

        let answer = orchestrator.answer(query).await;
        output
            .write_all(format!("\nAnswer:\n{answer}\n").as_bytes())
            .await?;
        answered += 1;
    }

    output.flush().await?;
    Ok(answered)
}
