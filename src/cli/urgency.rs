//! trackify urgency command implementation

use crate::card::Urgency;
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct UrgencyReport {
    card: u64,
    urgency: Urgency,
    persisted: bool,
}

pub async fn run(gateway: Gateway, id: u64, level: &str, options: OutputOptions) -> Result<()> {
    let urgency = level.parse::<Urgency>()?;

    // Validate against a fetched snapshot when one is available: stopped
    // cards no longer change and an unknown id is a user error. When the
    // fetch itself fails the update is sent anyway and the remote store
    // decides.
    match gateway.fetch_cards().await {
        Ok(cards) => {
            let card = cards
                .iter()
                .find(|card| card.id == id)
                .ok_or(Error::CardNotFound(id))?;
            if card.stopped {
                return Err(Error::CardStopped(id));
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not fetch cards, skipping the stopped-card check");
        }
    }

    let persisted = match gateway.update_urgency(id, urgency).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(card = id, error = %err, "urgency change was not persisted remotely");
            false
        }
    };

    let mut human = HumanOutput::new("trackify urgency: level reassigned");
    human.push_summary("card", id.to_string());
    human.push_summary("urgency", urgency.to_string());
    if !persisted {
        human.push_warning(format!(
            "card store at {} did not accept the change",
            gateway.base_url()
        ));
    }

    let report = UrgencyReport {
        card: id,
        urgency,
        persisted,
    };
    emit_success(options, "urgency", &report, Some(&human))?;
    Ok(())
}
