//! Core data models for the chat assistant and the finance API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use crate::state::Record;

//
// ================= Chat =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

/// Tag classifying what produced a message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    ExpenseFlow,
    ExpenseComplete,
    IncomeFlow,
    IncomeComplete,
    Report,
    Account,
    Client,
    Help,
    Clarification,
}

/// A single chat message. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: Uuid,
    #[serde(rename = "message")]
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "messageType")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

impl Message {
    pub fn from_user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            kind: MessageKind::Text,
            context: Map::new(),
        }
    }

    pub fn from_reply(reply: Reply) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: reply.text,
            sender: Sender::Assistant,
            timestamp: Utc::now(),
            kind: reply.kind,
            context: reply.context,
        }
    }
}

/// What a handler decided to answer, before it becomes a `Message`
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub kind: MessageKind,
    pub context: Map<String, Value>,
}

impl Reply {
    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            context: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.context.insert(key.to_string(), value.into());
        self
    }

    /// The `step` annotation flow handlers attach, if any
    pub fn step(&self) -> Option<&str> {
        self.context.get("step").and_then(Value::as_str)
    }
}

/// One row of the session listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub last_message: String,
    pub last_activity: DateTime<Utc>,
    pub message_count: usize,
}

//
// ================= Finance Enums =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Savings,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Bank,
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Cash,
    Card,
    Savings,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl TransactionType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            "savings" => Some(TransactionType::Savings),
            _ => None,
        }
    }
}

impl AccountType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "bank" => Some(AccountType::Bank),
            "cash" => Some(AccountType::Cash),
            "card" => Some(AccountType::Card),
            "savings" => Some(AccountType::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Savings => "savings",
        };
        write!(f, "{}", s)
    }
}

//
// ================= Transaction =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    /// Display code, e.g. `T-1001`
    pub transaction_id: String,
    pub category: String,
    pub name: String,
    pub details: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub received_date: Option<DateTime<Utc>>,
    pub client_id: Option<String>,
    pub account_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub category: String,
    pub name: String,
    pub details: Option<String>,
    pub amount: f64,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
    pub received_date: Option<DateTime<Utc>>,
    pub client_id: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub category: Option<String>,
    pub name: Option<String>,
    pub details: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub received_date: Option<DateTime<Utc>>,
    pub client_id: Option<String>,
    pub account_id: Option<String>,
}

impl Transaction {
    pub fn create(code: String, new: NewTransaction) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            transaction_id: code,
            category: new.category,
            name: new.name,
            details: new.details,
            amount: new.amount,
            kind: new.kind,
            payment_method: new.payment_method,
            notes: new.notes,
            received_date: new.received_date,
            client_id: new.client_id,
            account_id: new.account_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: TransactionUpdate) {
        if let Some(v) = update.category {
            self.category = v;
        }
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.details.is_some() {
            self.details = update.details;
        }
        if let Some(v) = update.amount {
            self.amount = v;
        }
        if let Some(v) = update.kind {
            self.kind = v;
        }
        if let Some(v) = update.payment_method {
            self.payment_method = v;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        if update.received_date.is_some() {
            self.received_date = update.received_date;
        }
        if update.client_id.is_some() {
            self.client_id = update.client_id;
        }
        if update.account_id.is_some() {
            self.account_id = update.account_id;
        }
        self.updated_at = Utc::now();
    }
}

//
// ================= Client =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    /// Display code, e.g. `CL-1001`
    pub client_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub company_type: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub company_type: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub company_type: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

impl Client {
    pub fn create(code: String, new: NewClient) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            client_id: code,
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            contact: new.contact,
            company_type: new.company_type,
            notes: new.notes,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: ClientUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if update.email.is_some() {
            self.email = update.email;
        }
        if update.phone.is_some() {
            self.phone = update.phone;
        }
        if update.address.is_some() {
            self.address = update.address;
        }
        if update.contact.is_some() {
            self.contact = update.contact;
        }
        if update.company_type.is_some() {
            self.company_type = update.company_type;
        }
        if update.notes.is_some() {
            self.notes = update.notes;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
        self.updated_at = Utc::now();
    }
}

//
// ================= Account =================
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub balance: f64,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    #[serde(default)]
    pub balance: f64,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AccountType>,
    pub balance: Option<f64>,
    pub account_number: Option<String>,
    pub bank_name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl Account {
    pub fn create(new: NewAccount) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            balance: new.balance,
            account_number: new.account_number,
            bank_name: new.bank_name,
            description: new.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: AccountUpdate) {
        if let Some(v) = update.name {
            self.name = v;
        }
        if let Some(v) = update.kind {
            self.kind = v;
        }
        if let Some(v) = update.balance {
            self.balance = v;
        }
        if update.account_number.is_some() {
            self.account_number = update.account_number;
        }
        if update.bank_name.is_some() {
            self.bank_name = update.bank_name;
        }
        if update.description.is_some() {
            self.description = update.description;
        }
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
        self.updated_at = Utc::now();
    }
}

//
// ================= Preferences =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: String,
    pub theme: Theme,
    pub language: String,
    pub currency: String,
    pub date_format: String,
    pub notifications: NotificationSettings,
    pub dashboard_layout: Option<Value>,
    pub remember_login: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub theme: Option<Theme>,
    pub language: Option<String>,
    pub currency: Option<String>,
    pub date_format: Option<String>,
    pub notifications: Option<NotificationSettings>,
    pub dashboard_layout: Option<Value>,
    pub remember_login: Option<bool>,
}

impl UserPreferences {
    pub fn defaults_for(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            theme: Theme::Light,
            language: "it".to_string(),
            currency: "EUR".to_string(),
            date_format: "DD/MM/YYYY".to_string(),
            notifications: NotificationSettings::default(),
            dashboard_layout: None,
            remember_login: false,
            updated_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: PreferencesUpdate) {
        if let Some(v) = update.theme {
            self.theme = v;
        }
        if let Some(v) = update.language {
            self.language = v;
        }
        if let Some(v) = update.currency {
            self.currency = v;
        }
        if let Some(v) = update.date_format {
            self.date_format = v;
        }
        if let Some(v) = update.notifications {
            self.notifications = v;
        }
        if update.dashboard_layout.is_some() {
            self.dashboard_layout = update.dashboard_layout;
        }
        if let Some(v) = update.remember_login {
            self.remember_login = v;
        }
        self.updated_at = Utc::now();
    }
}

//
// ================= Record Impls =================
//

impl Record for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Account {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for UserPreferences {
    fn id(&self) -> &str {
        &self.user_id
    }
}
