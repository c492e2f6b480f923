//! trackify add command implementation

use crate::card::{Card, Urgency};
use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct AddReport {
    card: Card,
    persisted: bool,
}

pub async fn run(
    gateway: Gateway,
    description: &str,
    urgency: &str,
    options: OutputOptions,
) -> Result<()> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::InvalidArgument(
            "card description cannot be empty".to_string(),
        ));
    }

    let mut card = Card::new(description);
    card.urgency = urgency.parse::<Urgency>()?;

    // Remote failures are logged and reported as a warning; the card and its
    // id are still handed to the user, there is no rollback.
    let persisted = match gateway.create(&card).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(card = card.id, error = %err, "card was not persisted remotely");
            false
        }
    };

    let mut human = HumanOutput::new("trackify add: card created");
    human.push_summary("card", card.id.to_string());
    human.push_summary("description", card.description.clone());
    human.push_summary("urgency", card.urgency.to_string());
    if !persisted {
        human.push_warning(format!(
            "card store at {} did not accept the card",
            gateway.base_url()
        ));
    }
    human.push_next_step("trackify board");

    let report = AddReport { card, persisted };
    emit_success(options, "add", &report, Some(&human))?;
    Ok(())
}
