//! Rule-based conversational assistant
//!
//! Decides the reply to a user message from its intent and the session's
//! flow state, and records both messages in the session store.

use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::{Intent, IntentClassifier};
use crate::error::ServiceError;
use crate::flow::{expense, income, FlowState, Transition};
use crate::memory::SessionStore;
use crate::models::{Message, MessageKind, Reply, SessionSummary};
use crate::Result;

pub const DEFAULT_SESSION_ID: &str = "default";

const REPORT_TEXT: &str = "📊 Che tipo di report vorresti generare? Posso creare report per:\n• Entrate e uscite mensili\n• Analisi delle categorie\n• Bilancio annuale\n• Cash flow";

const ACCOUNT_TEXT: &str = "🏦 Posso aiutarti con la gestione degli account. Vuoi:\n• Vedere il saldo degli account\n• Aggiungere un nuovo account\n• Modificare un account esistente";

const CLIENT_TEXT: &str = "👥 Gestione clienti attiva! Posso aiutarti a:\n• Aggiungere un nuovo cliente\n• Cercare un cliente esistente\n• Modificare i dettagli di un cliente";

pub const HELP_TEXT: &str = "👋 Ciao! Sono il tuo assistente finanziario AI. Posso aiutarti con:\n\n💰 **Gestione Transazioni**\n• Aggiungere entrate e uscite\n• Categorizzare le spese\n• Tracciare i pagamenti\n\n📊 **Report e Analisi**\n• Generare report finanziari\n• Analizzare trend di spesa\n• Monitorare cash flow\n\n👥 **Gestione Clienti**\n• Aggiungere nuovi clienti\n• Gestire contatti\n• Tracciare pagamenti clienti\n\n🏦 **Account Management**\n• Gestire conti bancari\n• Monitorare saldi\n• Riconciliare transazioni\n\nCosa posso fare per te oggi?";

const CLARIFICATION_TEXT: &str = "🤔 Non sono sicuro di aver capito. Puoi dirmi cosa vorresti fare? Ad esempio:\n• \"Aggiungi una spesa\"\n• \"Mostra il report mensile\"\n• \"Gestisci clienti\"\n• \"Aiuto\" per vedere tutte le opzioni";

/// Pure reply logic: no storage, no clock beyond message timestamps
pub struct Assistant;

impl Assistant {
    /// Decide the reply to `text` given the session's current flow state
    pub fn respond(flow: &FlowState, text: &str) -> Transition {
        let intent = IntentClassifier::classify(text);
        debug!(?intent, idle = flow.is_idle(), "Classified message");

        match (flow, intent) {
            // Help is always answered; a pending dialog stays pending
            (_, Intent::Help) => Transition::new(fixed_reply(Intent::Help), flow.clone()),

            // Asking for the other kind of entry abandons the current one
            (FlowState::Expense { .. }, Intent::Income) => income::start(),
            (FlowState::Income { .. }, Intent::Expense) => expense::start(text),

            (FlowState::Expense { step, draft }, _) => expense::advance(*step, draft.clone(), text),
            (FlowState::Income { step, draft }, _) => income::advance(*step, draft.clone(), text),

            (FlowState::Idle, Intent::Expense) => expense::start(text),
            (FlowState::Idle, Intent::Income) => income::start(),
            (FlowState::Idle, other) => Transition::new(fixed_reply(other), FlowState::Idle),
        }
    }
}

/// Canned replies for intents that do not open a dialog
fn fixed_reply(intent: Intent) -> Reply {
    match intent {
        Intent::Report => Reply::new(REPORT_TEXT, MessageKind::Report)
            .with("action", "report_selection"),
        Intent::Account => Reply::new(ACCOUNT_TEXT, MessageKind::Account)
            .with("action", "account_management"),
        Intent::Client => Reply::new(CLIENT_TEXT, MessageKind::Client)
            .with("action", "client_management"),
        Intent::Help => Reply::new(HELP_TEXT, MessageKind::Help),
        Intent::Expense | Intent::Income | Intent::Default => {
            Reply::new(CLARIFICATION_TEXT, MessageKind::Clarification)
        }
    }
}

/// Both sides of one chat turn
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub user_message: Message,
    pub ai_response: Message,
    pub session_id: String,
}

/// Chat front door used by the HTTP layer
#[derive(Clone, Default)]
pub struct ChatService {
    sessions: SessionStore,
}

impl ChatService {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// Record the user's message, decide the reply, record it, return both
    pub async fn send(&self, session_id: Option<&str>, message: &str) -> Result<Exchange> {
        let text = message.trim();
        if text.is_empty() {
            return Err(ServiceError::Validation("Message cannot be empty".to_string()));
        }

        // The id is used exactly as sent; only a missing one falls back
        let session_id = session_id.unwrap_or(DEFAULT_SESSION_ID).to_string();

        let exchange = self
            .sessions
            .with_session(&session_id, |session| {
                let user_message = Message::from_user(text);
                session.append(user_message.clone());

                let transition = Assistant::respond(session.flow(), text);
                session.set_flow(transition.next);

                let ai_response = Message::from_reply(transition.reply);
                session.append(ai_response.clone());

                Exchange {
                    user_message,
                    ai_response,
                    session_id: session.session_id.clone(),
                }
            })
            .await;

        info!(
            session_id = %exchange.session_id,
            kind = ?exchange.ai_response.kind,
            "Chat exchange recorded"
        );

        Ok(exchange)
    }

    pub async fn history(&self, session_id: &str) -> Vec<Message> {
        self.sessions.history(session_id).await
    }

    pub async fn sessions(&self) -> Vec<SessionSummary> {
        self.sessions.summaries().await
    }
}
