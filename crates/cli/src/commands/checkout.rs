//! Scripted checkout: fill the cart, walk the wizard, pay.

use std::io::{self, Write};

use chrono::{Local, Utc};
use mithai_storefront::Store;
use mithai_storefront::cart::CartAction;
use mithai_storefront::checkout::{CardForm, CheckoutAction, PaymentForm, ReceiverForm};
use tokio::sync::broadcast::error::TryRecvError;

use crate::CheckoutArgs;
use crate::error::CliError;

/// `mithai checkout --item <id[:qty]>... ...`
pub async fn checkout(store: &mut Store, args: CheckoutArgs) -> Result<(), CliError> {
    let mut changes = store.subscribe();

    for spec in &args.items {
        let (id, quantity) = parse_item_spec(spec)?;
        store.add_item(id)?;
        if quantity > 1 {
            let item_id = store
                .state()
                .cart()
                .line(id)
                .map(|line| line.item.id.clone())
                .ok_or_else(|| CliError::InvalidItemSpec(spec.clone()))?;
            let quantity = i64::from(store.state().cart().quantity_of(id)) + i64::from(quantity) - 1;
            store.dispatch(CartAction::SetQuantity(item_id, quantity).into())?;
        }
    }

    store.dispatch(CheckoutAction::Open.into())?;
    store.dispatch(CheckoutAction::Proceed.into())?;
    store.dispatch(CheckoutAction::SubmitReceiver(receiver_form(&args)).into())?;

    let today = Local::now().date_naive();
    let order = store.pay(&payment_form(&args), today).await?;

    let mut seen = 0_usize;
    loop {
        match changes.try_recv() {
            Ok(change) => {
                seen += 1;
                tracing::debug!(?change, "state change");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "state changes skipped");
            }
        }
    }
    tracing::debug!(changes = seen, "checkout session finished");

    let mut out = io::stdout().lock();
    if let Some(toast) = store.state().notification_at(Utc::now()) {
        writeln!(out, "{}", toast.message)?;
        if let Some(detail) = &toast.detail {
            writeln!(out, "{detail}")?;
        }
    }
    writeln!(out, "Order {}", order.id)?;
    for line in &order.lines {
        writeln!(
            out,
            "  {} {} x{}  {}",
            line.item.glyph,
            line.item.name,
            line.quantity(),
            line.line_total()
        )?;
    }
    writeln!(out, "Total {} via {}", order.total, order.method)?;
    writeln!(out, "Sent to {}", order.receiver.recipient_label())?;
    Ok(())
}

/// Split `id` or `id:quantity`. Quantity defaults to 1 and must be positive.
fn parse_item_spec(spec: &str) -> Result<(&str, u32), CliError> {
    let invalid = || CliError::InvalidItemSpec(spec.to_string());
    let (id, quantity) = match spec.split_once(':') {
        Some((id, quantity)) => (id, quantity.parse::<u32>().map_err(|_| invalid())?),
        None => (spec, 1),
    };
    if id.is_empty() || quantity == 0 {
        return Err(invalid());
    }
    Ok((id, quantity))
}

fn receiver_form(args: &CheckoutArgs) -> ReceiverForm {
    let mut form = ReceiverForm {
        sender_name: args.sender.clone().unwrap_or_default(),
        receiver_name: args.receiver.clone().unwrap_or_default(),
        ..ReceiverForm::default()
    };
    form.set_phone(args.phone.as_deref().unwrap_or_default());
    form.set_email(args.email.as_deref().unwrap_or_default());
    form.set_message(args.message.as_deref().unwrap_or_default());
    form
}

fn payment_form(args: &CheckoutArgs) -> PaymentForm {
    if let Some(upi) = &args.upi {
        return PaymentForm::upi(upi);
    }
    let mut card = CardForm::default();
    card.set_number(args.card_number.as_deref().unwrap_or_default());
    card.set_name(args.card_name.as_deref().unwrap_or_default());
    card.set_expiry(args.expiry.as_deref().unwrap_or_default());
    card.set_cvv(args.cvv.as_deref().unwrap_or_default());
    PaymentForm::card(card)
}
