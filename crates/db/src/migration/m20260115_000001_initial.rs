//! Initial migration: the bit-exact ledger schema (§6) plus the reserved cashbook seed rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(TRANSFER_DETAILS_SQL).await?;
        db.execute_unprepared(EXCHANGE_DETAILS_SQL).await?;
        db.execute_unprepared(LEDGER_SQL).await?;
        db.execute_unprepared(SEED_CASHBOOK_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE currency AS ENUM ('USD', 'EUR');
CREATE TYPE transaction_type AS ENUM ('transfer', 'exchange', 'deposit', 'withdrawal');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    balance DECIMAL(19, 2) NOT NULL DEFAULT 0,
    currency currency NOT NULL
);

CREATE INDEX idx_accounts_user_id ON accounts(user_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    type transaction_type NOT NULL,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_transactions_account_id ON transactions(account_id);
CREATE INDEX idx_transactions_timestamp ON transactions(timestamp DESC);
";

const TRANSFER_DETAILS_SQL: &str = r"
CREATE TABLE transfer_details (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    recipient_account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    amount DECIMAL(19, 2) NOT NULL CHECK (amount > 0),
    currency currency NOT NULL
);

CREATE INDEX idx_transfer_details_transaction_id ON transfer_details(transaction_id);
CREATE INDEX idx_transfer_details_recipient_account_id ON transfer_details(recipient_account_id);
";

const EXCHANGE_DETAILS_SQL: &str = r"
CREATE TABLE exchange_details (
    id UUID PRIMARY KEY,
    transaction_id UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    source_account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    target_account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    source_amount DECIMAL(19, 2) NOT NULL CHECK (source_amount > 0),
    source_currency currency NOT NULL,
    target_amount DECIMAL(19, 2) NOT NULL CHECK (target_amount > 0),
    target_currency currency NOT NULL,
    exchange_rate DECIMAL(19, 2) NOT NULL CHECK (exchange_rate > 0),
    CHECK (source_currency <> target_currency)
);

CREATE INDEX idx_exchange_details_transaction_id ON exchange_details(transaction_id);
CREATE INDEX idx_exchange_details_target_account_id ON exchange_details(target_account_id);
";

const LEDGER_SQL: &str = r#"
CREATE TABLE ledger (
    id UUID PRIMARY KEY,
    "transaction" UUID NOT NULL REFERENCES transactions(id) ON DELETE CASCADE,
    "account" UUID NOT NULL REFERENCES accounts(id) ON DELETE RESTRICT,
    amount DECIMAL(19, 4) NOT NULL,
    currency currency NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_ledger_transaction ON ledger("transaction");
CREATE INDEX idx_ledger_account ON ledger("account");
"#;

const SEED_CASHBOOK_SQL: &str = r"
INSERT INTO users (id, email, password_hash, created_at, updated_at)
VALUES (
    '00000000-0000-0000-0000-000000000001',
    'cashbook@system.internal',
    '!',
    now(),
    now()
);

INSERT INTO accounts (id, user_id, balance, currency)
VALUES
    ('00000000-0000-0000-0000-000000000010', '00000000-0000-0000-0000-000000000001', 0, 'USD'),
    ('00000000-0000-0000-0000-000000000011', '00000000-0000-0000-0000-000000000001', 0, 'EUR');
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS ledger;
DROP TABLE IF EXISTS exchange_details;
DROP TABLE IF EXISTS transfer_details;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS accounts;
DROP TABLE IF EXISTS users;
DROP TYPE IF EXISTS transaction_type;
DROP TYPE IF EXISTS currency;
";
