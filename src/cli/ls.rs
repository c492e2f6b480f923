//! trackify ls command implementation

use crate::card::{format_elapsed, Card, CardState};
use crate::error::Result;
use crate::gateway::Gateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::sort_cards;

#[derive(serde::Serialize)]
struct LsReport {
    cards: Vec<Card>,
}

pub async fn run(gateway: Gateway, options: OutputOptions) -> Result<()> {
    // Fetch errors degrade to an empty visible list.
    let (mut cards, fetch_warning) = match gateway.fetch_cards().await {
        Ok(cards) => (cards, None),
        Err(err) => {
            tracing::warn!(error = %err, "could not fetch cards, showing an empty list");
            (Vec::new(), Some(err.to_string()))
        }
    };
    sort_cards(&mut cards);

    let mut human = HumanOutput::new(format!("trackify ls: {} card(s)", cards.len()));
    if let Some(warning) = fetch_warning {
        human.push_warning(warning);
    }
    for card in &cards {
        human.push_detail(render_row(card));
    }
    if cards.is_empty() {
        human.push_next_step("trackify add \"What are you working on?\"");
    }

    let report = LsReport { cards };
    emit_success(options, "ls", &report, Some(&human))?;
    Ok(())
}

fn render_row(card: &Card) -> String {
    let state = match card.state() {
        CardState::Running => "running",
        CardState::Stopped => "stopped",
        CardState::Idle => "idle",
    };
    format!(
        "{:<13} {:>9} {:<7} {:<6} {:<10} {}",
        card.id,
        format_elapsed(card.time),
        state,
        card.urgency,
        card.created,
        card.description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_contains_formatted_time_and_state() {
        let mut card = Card::new("Write report");
        card.time = 65;
        card.stopped = true;
        let row = render_row(&card);
        assert!(row.contains("01:05"));
        assert!(row.contains("stopped"));
        assert!(row.contains("Write report"));
    }
}
