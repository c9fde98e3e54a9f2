//! Expense entry dialog: category → amount → payment method → notes → complete

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use super::{accepted_amount, ExpenseDraft, ExpenseStep, FlowState, Transition};
use crate::amount::format_amount;
use crate::models::{MessageKind, Reply};

lazy_static! {
    static ref CATEGORY_PHRASE: Regex =
        Regex::new(r"(?i)(?:expense for|spesa per)\s+(.+)").unwrap();
}

const CATEGORY_PROMPT: &str = "Perfetto! 😊 Per cosa è questa spesa?";
const NOTES_PROMPT: &str = "Ottimo! Vuoi aggiungere delle note per questa spesa?";
const COMPLETE_MESSAGE: &str =
    "Tutto fatto! 📝 La tua spesa è stata registrata. Vuoi aggiungere un'altra transazione?";

/// Open the dialog. The opening message may already name the category.
pub fn start(text: &str) -> Transition {
    advance(ExpenseStep::AwaitingCategory, ExpenseDraft::default(), text)
}

/// Apply the user's `text` to the current step
pub fn advance(step: ExpenseStep, mut draft: ExpenseDraft, text: &str) -> Transition {
    debug!(?step, "Advancing expense flow");

    match step {
        // A named category is recorded, but the reply stays the category prompt
        ExpenseStep::AwaitingCategory => match category_from(text) {
            Some(category) => {
                let reply = Reply::new(CATEGORY_PROMPT, MessageKind::ExpenseFlow)
                    .with("step", "category")
                    .with("category", category.clone());
                draft.category = Some(category);
                Transition::new(reply, expecting(ExpenseStep::AwaitingAmount, draft))
            }
            None => ask_category(),
        },

        // An unparseable amount silently restarts from the category prompt
        ExpenseStep::AwaitingAmount => match accepted_amount(text) {
            Some(amount) => {
                let reply = Reply::new(
                    format!(
                        "Perfetto! Hai speso €{}. Come hai pagato? (Bonifico bancario, contanti, carta, ecc.)",
                        format_amount(amount)
                    ),
                    MessageKind::ExpenseFlow,
                )
                .with("step", "payment_method")
                .with("amount", amount);
                draft.amount = Some(amount);
                Transition::new(reply, expecting(ExpenseStep::AwaitingPaymentMethod, draft))
            }
            None => ask_category(),
        },

        ExpenseStep::AwaitingPaymentMethod => {
            let payment_method = text.to_lowercase();
            let reply = Reply::new(NOTES_PROMPT, MessageKind::ExpenseFlow)
                .with("step", "notes")
                .with("payment_method", payment_method.clone());
            draft.payment_method = Some(payment_method);
            Transition::new(reply, expecting(ExpenseStep::AwaitingNotes, draft))
        }

        ExpenseStep::AwaitingNotes => {
            draft.notes = Some(text.to_string());
            let summary = serde_json::to_value(&draft).unwrap_or(Value::Null);
            let reply = Reply::new(COMPLETE_MESSAGE, MessageKind::ExpenseComplete)
                .with("step", "complete")
                .with("notes", text)
                .with("expense", summary);
            Transition::new(reply, FlowState::Idle)
        }
    }
}

fn ask_category() -> Transition {
    Transition::new(
        Reply::new(CATEGORY_PROMPT, MessageKind::ExpenseFlow).with("step", "category"),
        expecting(ExpenseStep::AwaitingCategory, ExpenseDraft::default()),
    )
}

fn expecting(step: ExpenseStep, draft: ExpenseDraft) -> FlowState {
    FlowState::Expense { step, draft }
}

fn category_from(text: &str) -> Option<String> {
    let captured = CATEGORY_PHRASE.captures(text)?.get(1)?.as_str().trim();
    let category = captured.trim_end_matches(['.', '!', '?']).trim();
    (!category.is_empty()).then(|| category.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_of(transition: &Transition) -> Option<&str> {
        transition.reply.step()
    }

    #[test]
    fn test_start_asks_category() {
        let t = start("add expense");
        assert_eq!(t.reply.text, CATEGORY_PROMPT);
        assert_eq!(t.reply.kind, MessageKind::ExpenseFlow);
        assert_eq!(step_of(&t), Some("category"));
        assert_eq!(
            t.next,
            FlowState::Expense {
                step: ExpenseStep::AwaitingCategory,
                draft: ExpenseDraft::default()
            }
        );
    }

    #[test]
    fn test_category_requires_expense_for_phrase() {
        let t = advance(ExpenseStep::AwaitingCategory, ExpenseDraft::default(), "groceries");
        assert_eq!(t.reply.text, CATEGORY_PROMPT);
        assert_eq!(
            t.next,
            FlowState::Expense {
                step: ExpenseStep::AwaitingCategory,
                draft: ExpenseDraft::default()
            }
        );

        let t = advance(
            ExpenseStep::AwaitingCategory,
            ExpenseDraft::default(),
            "Spesa per benzina.",
        );
        assert_eq!(t.reply.text, CATEGORY_PROMPT);
        assert_eq!(step_of(&t), Some("category"));
        assert_eq!(t.reply.context["category"], "benzina");
        assert_eq!(
            t.next,
            FlowState::Expense {
                step: ExpenseStep::AwaitingAmount,
                draft: ExpenseDraft {
                    category: Some("benzina".to_string()),
                    ..Default::default()
                }
            }
        );
    }

    #[test]
    fn test_opening_message_with_category_gets_category_prompt() {
        let t = start("spesa per cancelleria");
        assert_eq!(t.reply.text, CATEGORY_PROMPT);
        assert_eq!(step_of(&t), Some("category"));
        assert!(matches!(
            t.next,
            FlowState::Expense {
                step: ExpenseStep::AwaitingAmount,
                ..
            }
        ));
    }

    #[test]
    fn test_full_dialog_accumulates_draft() {
        let t = start("expense for office supplies");
        let FlowState::Expense { step, draft } = t.next else {
            panic!("expected expense flow");
        };

        let t = advance(step, draft, "45,50€");
        assert_eq!(
            t.reply.text,
            "Perfetto! Hai speso €45.5. Come hai pagato? (Bonifico bancario, contanti, carta, ecc.)"
        );
        assert_eq!(t.reply.context["amount"], 45.5);
        let FlowState::Expense { step, draft } = t.next else {
            panic!("expected expense flow");
        };

        let t = advance(step, draft, "Carta");
        assert_eq!(t.reply.context["payment_method"], "carta");
        let FlowState::Expense { step, draft } = t.next else {
            panic!("expected expense flow");
        };
        assert_eq!(step, ExpenseStep::AwaitingNotes);

        let t = advance(step, draft, "Toner per la stampante");
        assert_eq!(t.reply.kind, MessageKind::ExpenseComplete);
        assert_eq!(step_of(&t), Some("complete"));
        assert_eq!(t.next, FlowState::Idle);

        let expense = &t.reply.context["expense"];
        assert_eq!(expense["category"], "office supplies");
        assert_eq!(expense["amount"], 45.5);
        assert_eq!(expense["paymentMethod"], "carta");
        assert_eq!(expense["notes"], "Toner per la stampante");
    }

    #[test]
    fn test_bad_amount_falls_back_to_category_prompt() {
        let draft = ExpenseDraft {
            category: Some("taxi".to_string()),
            ..Default::default()
        };
        let t = advance(ExpenseStep::AwaitingAmount, draft, "non ricordo");
        assert_eq!(t.reply.text, CATEGORY_PROMPT);
        assert_eq!(
            t.next,
            FlowState::Expense {
                step: ExpenseStep::AwaitingCategory,
                draft: ExpenseDraft::default()
            }
        );
    }
}
