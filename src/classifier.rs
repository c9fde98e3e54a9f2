//! Intent Classifier
//!
//! Maps a user message to one of a fixed set of intents by keyword
//! membership. Keywords are bilingual (English/Italian) and checked in
//! priority order: expense, income, report, account, client, help.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Expense,
    Income,
    Report,
    Account,
    Client,
    Help,
    Default,
}

/// Static keyword lists
const EXPENSE_KEYWORDS: &[&str] = &["add expense", "expense", "spesa", "costo"];
const INCOME_KEYWORDS: &[&str] = &["add income", "income", "entrata", "ricavo"];
const REPORT_KEYWORDS: &[&str] = &["report", "rapporto", "analisi"];
const ACCOUNT_KEYWORDS: &[&str] = &["account", "conto", "saldo"];
const CLIENT_KEYWORDS: &[&str] = &["client", "cliente", "customer"];
const HELP_KEYWORDS: &[&str] = &["help", "aiuto", "cosa puoi fare"];

/// Priority order matters: "expense report" is an expense
const INTENT_TABLE: &[(Intent, &[&str])] = &[
    (Intent::Expense, EXPENSE_KEYWORDS),
    (Intent::Income, INCOME_KEYWORDS),
    (Intent::Report, REPORT_KEYWORDS),
    (Intent::Account, ACCOUNT_KEYWORDS),
    (Intent::Client, CLIENT_KEYWORDS),
    (Intent::Help, HELP_KEYWORDS),
];

/// Intent classifier
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify the latest user message
    pub fn classify(message: &str) -> Intent {
        let lowered = message.to_lowercase();

        INTENT_TABLE
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Default)
    }
}
