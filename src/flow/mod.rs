//! Multi-turn data-entry flows
//!
//! Each session carries an explicit `FlowState`. The expense and income
//! handlers are transition functions: given the current step, the partial
//! record collected so far and the user's text, they return the reply and
//! the next state.

use serde::{Deserialize, Serialize};

use crate::models::Reply;

pub mod expense;
pub mod income;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStep {
    AwaitingCategory,
    AwaitingAmount,
    AwaitingPaymentMethod,
    AwaitingNotes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeStep {
    AwaitingSource,
    AwaitingPaymentMethod,
}

/// Partial expense collected across turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

/// Partial income collected across turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeDraft {
    pub source: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
}

/// Where a session is in a data-entry dialog
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FlowState {
    #[default]
    Idle,
    Expense {
        step: ExpenseStep,
        draft: ExpenseDraft,
    },
    Income {
        step: IncomeStep,
        draft: IncomeDraft,
    },
}

impl FlowState {
    pub fn is_idle(&self) -> bool {
        matches!(self, FlowState::Idle)
    }
}

/// Result of one flow transition
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub reply: Reply,
    pub next: FlowState,
}

impl Transition {
    pub fn new(reply: Reply, next: FlowState) -> Self {
        Self { reply, next }
    }
}

/// Amounts of zero count as "not found", matching how the flows treat them
fn accepted_amount(text: &str) -> Option<f64> {
    crate::amount::extract_amount(text).filter(|amount| *amount > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_is_rejected() {
        assert_eq!(accepted_amount("0€"), None);
        assert_eq!(accepted_amount("€12,30"), Some(12.30));
    }

    #[test]
    fn test_default_is_idle() {
        assert!(FlowState::default().is_idle());
    }
}
