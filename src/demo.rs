//! Demo records loaded at boot when `SEED_DEMO_DATA` is on

use tracing::debug;

use crate::api::finance::AppState;
use crate::models::{
    Account, AccountType, Client, NewAccount, NewClient, NewTransaction, PaymentMethod,
    Transaction, TransactionType,
};
use crate::Result;

fn account(name: &str, kind: AccountType, balance: f64, bank: Option<&str>) -> Account {
    Account::create(NewAccount {
        name: name.to_string(),
        kind,
        balance,
        account_number: None,
        bank_name: bank.map(str::to_string),
        description: None,
    })
}

fn transaction(
    category: &str,
    name: &str,
    amount: f64,
    kind: TransactionType,
    payment_method: PaymentMethod,
) -> NewTransaction {
    NewTransaction {
        category: category.to_string(),
        name: name.to_string(),
        details: None,
        amount,
        kind,
        payment_method,
        notes: None,
        received_date: None,
        client_id: None,
        account_id: None,
    }
}

/// Seed accounts, one client and a handful of transactions
pub async fn seed(state: &AppState) -> Result<()> {
    let accounts = [
        account("Conto Principale", AccountType::Bank, 12_500.0, Some("Intesa Sanpaolo")),
        account("Cassa", AccountType::Cash, 350.0, None),
        account("Carta Aziendale", AccountType::Card, 1_200.0, Some("UniCredit")),
    ];
    let main_account = accounts[0].id.clone();
    for acc in accounts {
        state.accounts.insert(acc).await?;
    }

    let client = Client::create(
        state.client_codes.next_code(),
        NewClient {
            name: "Rossi S.r.l.".to_string(),
            email: Some("info@rossi.it".to_string()),
            phone: None,
            address: Some("Via Roma 1, Milano".to_string()),
            contact: Some("Mario Rossi".to_string()),
            company_type: Some("srl".to_string()),
            notes: None,
        },
    );
    let client = state.clients.insert(client).await?;

    let mut invoice = transaction(
        "Consulenza",
        "Fattura 2024/001",
        2_400.0,
        TransactionType::Income,
        PaymentMethod::Bank,
    );
    invoice.client_id = Some(client.id.clone());
    invoice.account_id = Some(main_account.clone());

    let drafts = [
        invoice,
        transaction("Ufficio", "Affitto", 900.0, TransactionType::Expense, PaymentMethod::Bank),
        transaction("Trasporti", "Carburante", 65.5, TransactionType::Expense, PaymentMethod::Card),
        transaction("Risparmi", "Accantonamento", 500.0, TransactionType::Savings, PaymentMethod::Bank),
    ];
    for draft in drafts {
        let tx = Transaction::create(state.transaction_codes.next_code(), draft);
        state.transactions.insert(tx).await?;
    }

    debug!(client = %client.client_id, "Demo records inserted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[tokio::test]
    async fn test_seed_populates_every_collection() {
        let state = AppState::in_memory(&Config::for_tests());
        tokio_test::assert_ok!(seed(&state).await);

        assert_eq!(state.accounts.list().await.unwrap().len(), 3);
        assert_eq!(state.clients.list().await.unwrap().len(), 1);

        let transactions = state.transactions.list().await.unwrap();
        assert_eq!(transactions.len(), 4);
        assert_eq!(transactions[0].transaction_id, "T-1001");
        assert!(transactions[0].client_id.is_some());
    }
}
