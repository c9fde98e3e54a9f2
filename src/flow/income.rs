//! Income entry dialog: source (with amount) → payment method → complete

use serde_json::Value;
use tracing::debug;

use super::{accepted_amount, FlowState, IncomeDraft, IncomeStep, Transition};
use crate::amount::format_amount;
use crate::models::{MessageKind, Reply};

const SOURCE_PROMPT: &str = "Fantastico! 💰 Da dove proviene questa entrata?";
const COMPLETE_MESSAGE: &str =
    "Tutto fatto! 📝 La tua entrata è stata registrata. Vuoi aggiungere un'altra transazione?";

pub fn start() -> Transition {
    ask_source()
}

pub fn advance(step: IncomeStep, mut draft: IncomeDraft, text: &str) -> Transition {
    debug!(?step, "Advancing income flow");

    match step {
        // The source answer has to carry the amount ("consulenza 500€")
        IncomeStep::AwaitingSource => match accepted_amount(text) {
            Some(amount) => {
                let reply = Reply::new(
                    format!(
                        "Eccellente! Hai ricevuto €{}. Come hai ricevuto il pagamento?",
                        format_amount(amount)
                    ),
                    MessageKind::IncomeFlow,
                )
                .with("step", "payment_method")
                .with("amount", amount);
                draft.source = Some(text.to_string());
                draft.amount = Some(amount);
                Transition::new(
                    reply,
                    FlowState::Income {
                        step: IncomeStep::AwaitingPaymentMethod,
                        draft,
                    },
                )
            }
            None => ask_source(),
        },

        IncomeStep::AwaitingPaymentMethod => {
            let payment_method = text.to_lowercase();
            draft.payment_method = Some(payment_method.clone());
            let summary = serde_json::to_value(&draft).unwrap_or(Value::Null);
            let reply = Reply::new(COMPLETE_MESSAGE, MessageKind::IncomeComplete)
                .with("step", "complete")
                .with("payment_method", payment_method)
                .with("income", summary);
            Transition::new(reply, FlowState::Idle)
        }
    }
}

fn ask_source() -> Transition {
    Transition::new(
        Reply::new(SOURCE_PROMPT, MessageKind::IncomeFlow).with("step", "source"),
        FlowState::Income {
            step: IncomeStep::AwaitingSource,
            draft: IncomeDraft::default(),
        },
    )
}
