//! The submission pipeline that runs off the session's mailbox.

use tracing::debug;

use super::{CheckoutContext, CheckoutError};
use crate::model::order::{Confirmation, SubmittedOrder};
use crate::notify::TemplateFields;

/// Sends both confirmations concurrently, then records the order.
///
/// The ordering is deliberate: the order log sees nothing unless both the
/// customer and the bakery were notified, so a half-announced order can
/// never be recorded. There are no timeouts or retries; a send that hangs
/// parks this submission until it resolves.
pub(super) async fn run_submission(
    ctx: &CheckoutContext,
    order: SubmittedOrder,
) -> Result<Confirmation, CheckoutError> {
    let fields = TemplateFields::from_order(&order);
    debug!(customer = %order.contact.email, mailbox = %ctx.mailbox, "Dispatching confirmations");

    tokio::try_join!(
        ctx.notifier.send(&order.contact.email, &fields),
        ctx.notifier.send(&ctx.mailbox, &fields),
    )
    .map_err(|e| CheckoutError::SubmissionFailed(e.to_string()))?;

    let summary = order.pickup_summary();
    let order_id = ctx
        .orders
        .record(order)
        .await
        .map_err(|e| CheckoutError::SubmissionFailed(e.to_string()))?;

    Ok(Confirmation { order_id, summary })
}
