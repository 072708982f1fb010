//! Long-polling dispatcher setup.
//!
//! Polled messages are converted into the webhook update model and run
//! through the same processor, so both modes behave identically.

use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use tracing::{debug, warn};

use super::ThrottledBot;
use super::actions::UpdateProcessor;
use crate::events;

/// Build the dispatcher with the update processor as its only dependency.
pub fn build_dispatcher(
    bot: ThrottledBot,
    processor: UpdateProcessor,
) -> Dispatcher<ThrottledBot, anyhow::Error, teloxide::dispatching::DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![processor])
        .default_handler(|upd| async move {
            debug!("Ignoring non-message update {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("Error in polled update"))
        .enable_ctrlc_handler()
        .build()
}

/// Build the handler schema.
fn schema() -> UpdateHandler<anyhow::Error> {
    Update::filter_message().endpoint(process_polled_message)
}

/// Funnel a polled message into the shared processor.
async fn process_polled_message(
    update: Update,
    msg: Message,
    processor: UpdateProcessor,
) -> anyhow::Result<()> {
    let update_id = i64::from(update.id.0);

    let update = match events::Update::from_message(Some(update_id), &msg) {
        Ok(update) => update,
        Err(e) => {
            warn!(
                "Could not convert polled message {} in chat {}: {}",
                msg.id.0, msg.chat.id, e
            );
            return Ok(());
        }
    };

    let outcome = processor.process(&update).await;
    debug!("Polled update {} handled: {:?}", update_id, outcome);

    Ok(())
}
