//! Batch message build
//!
//! Turns the ordered scene facts of a run into the ordered JSON message list
//! the dispatcher consumes. The rolling counter is owned by the caller: it
//! goes in as `start` and comes back as [`BatchOutput::next`].

use contracts::{MessageFamily, MsgCount, SceneFact};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::advisory::assemble_advisory;
use crate::alert::assemble_alert;
use crate::error::Result;
use crate::extract::AssemblyContext;

/// Messages of one family, in fact order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutput {
    /// Compact JSON documents
    pub messages: Vec<String>,
    /// Counter value for the next message
    pub next: MsgCount,
    /// Facts that produced no message
    pub dropped: usize,
}

fn render<T: Serialize>(message: &T) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Assemble and serialize one fact
pub fn assemble_json(
    family: MessageFamily,
    fact: &SceneFact,
    ctx: &AssemblyContext<'_>,
    msg_cnt: MsgCount,
) -> Result<String> {
    match family {
        MessageFamily::Alert => render(&assemble_alert(fact, ctx, msg_cnt)?),
        MessageFamily::Advisory => render(&assemble_advisory(fact, ctx, msg_cnt)?),
    }
}

/// Build every message of one family
///
/// A fact that fails assembly is logged and skipped; the counter only
/// advances for messages that were produced.
#[instrument(
    name = "assembler_build",
    skip(facts, ctx),
    fields(family = %family, facts = facts.len(), start = %start)
)]
pub fn build_messages(
    family: MessageFamily,
    facts: &[SceneFact],
    ctx: &AssemblyContext<'_>,
    start: MsgCount,
) -> BatchOutput {
    let mut messages = Vec::with_capacity(facts.len());
    let mut counter = start;
    let mut dropped = 0;

    for (index, fact) in facts.iter().enumerate() {
        match assemble_json(family, fact, ctx, counter) {
            Ok(json) => {
                messages.push(json);
                counter = counter.next();
            }
            Err(err) => {
                let annotation = fact
                    .get(contracts::keys::FRAME_ANNOTATION_UUID)
                    .and_then(|v| v.as_str())
                    .unwrap_or("?");
                warn!(index, annotation, error = %err, "Fact dropped during assembly");
                dropped += 1;
            }
        }
    }

    observability::record_messages_assembled(family.as_str(), messages.len(), dropped);
    info!(
        assembled = messages.len(),
        dropped,
        next = %counter,
        "Message batch built"
    );

    BatchOutput {
        messages,
        next: counter,
        dropped,
    }
}

/// Ordered ALERT JSON documents, counter starting at 0
pub fn alert_messages(facts: &[SceneFact], ctx: &AssemblyContext<'_>) -> Vec<String> {
    build_messages(MessageFamily::Alert, facts, ctx, MsgCount::ZERO).messages
}

/// Ordered ADVISORY JSON documents, counter starting at 0
pub fn advisory_messages(facts: &[SceneFact], ctx: &AssemblyContext<'_>) -> Vec<String> {
    build_messages(MessageFamily::Advisory, facts, ctx, MsgCount::ZERO).messages
}
