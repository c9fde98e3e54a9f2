//! Analytics over the stored transactions and accounts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::{Account, Transaction, TransactionType};
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub net_balance: f64,
    pub transaction_count: usize,
    pub by_category: Vec<CategoryTotal>,
    pub account_balance: f64,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Monthly,
    Category,
    Annual,
    CashFlow,
}

impl ReportType {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "monthly" => Ok(ReportType::Monthly),
            "category" => Ok(ReportType::Category),
            "annual" => Ok(ReportType::Annual),
            "cash_flow" | "cashflow" => Ok(ReportType::CashFlow),
            other => Err(ServiceError::Validation(format!(
                "Unknown report type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: Uuid,
    pub report_type: ReportType,
    pub period: String,
    pub summary: Overview,
    pub generated_at: DateTime<Utc>,
}

/// Totals per transaction type and per category
pub fn overview(transactions: &[Transaction], accounts: &[Account]) -> Overview {
    let mut totals: HashMap<TransactionType, f64> = HashMap::new();
    let mut categories: HashMap<&str, (f64, usize)> = HashMap::new();

    for tx in transactions {
        *totals.entry(tx.kind).or_insert(0.0) += tx.amount;

        let slot = categories.entry(tx.category.as_str()).or_insert((0.0, 0));
        slot.0 += tx.amount;
        slot.1 += 1;
    }

    let mut by_category: Vec<CategoryTotal> = categories
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category: category.to_string(),
            total,
            count,
        })
        .collect();
    by_category.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });

    let total_income = totals.get(&TransactionType::Income).copied().unwrap_or(0.0);
    let total_expenses = totals.get(&TransactionType::Expense).copied().unwrap_or(0.0);
    let total_savings = totals.get(&TransactionType::Savings).copied().unwrap_or(0.0);

    Overview {
        total_income,
        total_expenses,
        total_savings,
        net_balance: total_income - total_expenses,
        transaction_count: transactions.len(),
        by_category,
        account_balance: accounts
            .iter()
            .filter(|a| a.is_active)
            .map(|a| a.balance)
            .sum(),
        generated_at: Utc::now(),
    }
}

pub fn build_report(
    report_type: ReportType,
    period: Option<String>,
    transactions: &[Transaction],
    accounts: &[Account],
) -> Report {
    let now = Utc::now();
    Report {
        report_id: Uuid::new_v4(),
        report_type,
        period: period.unwrap_or_else(|| now.format("%Y-%m").to_string()),
        summary: overview(transactions, accounts),
        generated_at: now,
    }
}
