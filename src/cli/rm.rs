//! trackify rm command implementation

use crate::error::{Error, Result};
use crate::gateway::Gateway;
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(serde::Serialize)]
struct RmReport {
    card: u64,
    deleted: bool,
}

pub async fn run(gateway: Gateway, id: u64, options: OutputOptions) -> Result<()> {
    // The card counts as removed only when the remote delete succeeds. A 404
    // or a network failure leaves it in place and is reported as a warning,
    // not an error state.
    let (deleted, warning) = match gateway.delete(id).await {
        Ok(()) => (true, None),
        Err(Error::CardNotFound(_)) => {
            tracing::warn!(card = id, "card not found in the remote store, nothing removed");
            (false, Some(format!("card {id} not found, nothing removed")))
        }
        Err(err) => {
            tracing::warn!(card = id, error = %err, "card was not deleted remotely");
            (false, Some(format!("card {id} was not deleted: {err}")))
        }
    };

    let header = if deleted {
        "trackify rm: card deleted"
    } else {
        "trackify rm: card kept"
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("card", id.to_string());
    if let Some(warning) = warning {
        human.push_warning(warning);
    }

    let report = RmReport { card: id, deleted };
    emit_success(options, "rm", &report, Some(&human))?;
    Ok(())
}
