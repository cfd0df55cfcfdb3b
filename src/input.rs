//! Manual steering from stdin
//!
//! Each line is one movement word (`a`/`h`/`left`, `d`/`l`/`right`). Commands
//! go through the same slot as sensor commands, so at most one is applied
//! per tick.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::control::ControlSlot;

/// Forward movement words from `reader` into `slot` until EOF or cancellation
pub async fn forward_commands<R>(reader: R, slot: Arc<ControlSlot>, cancel: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        let line = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line,
        };

        match line {
            Ok(Some(line)) => match crate::ControlCommand::from_str(&line) {
                Some(cmd) => slot.publish(cmd),
                None if line.trim().is_empty() => {}
                None => log::warn!("Unknown key command {:?}", line.trim()),
            },
            Ok(None) => {
                log::debug!("Keyboard input closed");
                break;
            }
            Err(e) => {
                log::warn!("Keyboard input error: {}", e);
                break;
            }
        }
    }
}

/// [`forward_commands`] reading the process's stdin
pub async fn forward_stdin(slot: Arc<ControlSlot>, cancel: CancellationToken) {
    forward_commands(BufReader::new(tokio::io::stdin()), slot, cancel).await;
}
