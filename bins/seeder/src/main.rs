//! Database seeder for local development and testing.
//!
//! Seeds the two demo users from the spec's end-to-end scenarios (§8): user A and user B,
//! each holding 1000 USD and 500 EUR. The two reserved cashbook accounts are seeded by the
//! initial migration, not here.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use ledger_db::entities::{accounts, ledger, sea_orm_active_enums, transactions, users};
use ledger_shared::types::id::{eur_cashbook_account_id, usd_cashbook_account_id};

/// Demo user A's fixed identifier (consistent across re-runs).
const USER_A_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);
/// Demo user B's fixed identifier.
const USER_B_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);
/// User A's USD account.
const USER_A_USD_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0020);
/// User A's EUR account.
const USER_A_EUR_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0021);
/// User B's USD account.
const USER_B_USD_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0022);
/// User B's EUR account.
const USER_B_EUR_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0023);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = ledger_db::connect(&database_url).await.expect("failed to connect to database");

    println!("Seeding user A ({USER_A_ID})...");
    seed_user(&db, USER_A_ID, "user-a@ledger.test").await;
    seed_account(&db, USER_A_USD_ID, USER_A_ID, sea_orm_active_enums::Currency::Usd, dec!(1000.00)).await;
    seed_account(&db, USER_A_EUR_ID, USER_A_ID, sea_orm_active_enums::Currency::Eur, dec!(500.00)).await;

    println!("Seeding user B ({USER_B_ID})...");
    seed_user(&db, USER_B_ID, "user-b@ledger.test").await;
    seed_account(&db, USER_B_USD_ID, USER_B_ID, sea_orm_active_enums::Currency::Usd, dec!(1000.00)).await;
    seed_account(&db, USER_B_EUR_ID, USER_B_ID, sea_orm_active_enums::Currency::Eur, dec!(500.00)).await;

    println!("Seeding opening ledger entries...");
    seed_opening_balance(&db, USER_A_USD_ID, usd_cashbook_account_id().into_inner(), dec!(1000.00), sea_orm_active_enums::Currency::Usd).await;
    seed_opening_balance(&db, USER_A_EUR_ID, eur_cashbook_account_id().into_inner(), dec!(500.00), sea_orm_active_enums::Currency::Eur).await;
    seed_opening_balance(&db, USER_B_USD_ID, usd_cashbook_account_id().into_inner(), dec!(1000.00), sea_orm_active_enums::Currency::Usd).await;
    seed_opening_balance(&db, USER_B_EUR_ID, eur_cashbook_account_id().into_inner(), dec!(500.00), sea_orm_active_enums::Currency::Eur).await;

    println!("Seeding complete!");
}

async fn seed_user(db: &DatabaseConnection, id: Uuid, email: &str) {
    if users::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
        println!("  User {email} already exists, skipping...");
        return;
    }

    let user = users::ActiveModel {
        id: Set(id),
        email: Set(email.to_string()),
        password_hash: Set("!".to_string()),
        created_at: Set(Utc::now().into()),
        updated_at: Set(Utc::now().into()),
    };

    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert user {email}: {e}");
    }
}

async fn seed_account(
    db: &DatabaseConnection,
    id: Uuid,
    user_id: Uuid,
    currency: sea_orm_active_enums::Currency,
    balance: Decimal,
) {
    if accounts::Entity::find_by_id(id).one(db).await.ok().flatten().is_some() {
        println!("  Account {id} already exists, skipping...");
        return;
    }

    let account = accounts::ActiveModel {
        id: Set(id),
        user_id: Set(user_id),
        balance: Set(balance),
        currency: Set(currency),
    };

    if let Err(e) = account.insert(db).await {
        eprintln!("Failed to insert account {id}: {e}");
    }
}

/// Records a balanced pair of ledger entries crediting `account_id` and debiting
/// `cashbook_id`, anchored by one `Deposit` transaction, so the account's opening balance
/// satisfies I1/I2 from the start.
async fn seed_opening_balance(
    db: &DatabaseConnection,
    account_id: Uuid,
    cashbook_id: Uuid,
    amount: Decimal,
    currency: sea_orm_active_enums::Currency,
) {
    if ledger::Entity::find()
        .filter(ledger::Column::AccountId.eq(account_id))
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        return;
    }

    let transaction_id = Uuid::now_v7();
    let now = Utc::now();

    let transaction = transactions::ActiveModel {
        id: Set(transaction_id),
        transaction_type: Set(sea_orm_active_enums::TransactionType::Deposit),
        account_id: Set(account_id),
        timestamp: Set(now.into()),
    };

    if let Err(e) = transaction.insert(db).await {
        eprintln!("Failed to insert opening-balance transaction for {account_id}: {e}");
        return;
    }

    let credit = ledger::ActiveModel {
        id: Set(Uuid::now_v7()),
        transaction_id: Set(transaction_id),
        account_id: Set(account_id),
        amount: Set(amount),
        currency: Set(currency),
        timestamp: Set(now.into()),
    };
    let debit = ledger::ActiveModel {
        id: Set(Uuid::now_v7()),
        transaction_id: Set(transaction_id),
        account_id: Set(cashbook_id),
        amount: Set(-amount),
        currency: Set(currency),
        timestamp: Set(now.into()),
    };

    if let Err(e) = credit.insert(db).await {
        eprintln!("Failed to insert opening-balance credit for {account_id}: {e}");
    }
    if let Err(e) = debit.insert(db).await {
        eprintln!("Failed to insert opening-balance debit for {cashbook_id}: {e}");
        return;
    }

    // The account's own stored balance was set directly at creation time; the cashbook's
    // was seeded at zero by the migration and must absorb this debit to keep I2 intact.
    match accounts::Entity::find_by_id(cashbook_id).one(db).await {
        Ok(Some(cashbook)) => {
            let new_balance = cashbook.balance - amount;
            let mut active: accounts::ActiveModel = cashbook.into();
            active.balance = Set(new_balance);
            if let Err(e) = active.update(db).await {
                eprintln!("Failed to update cashbook {cashbook_id} balance: {e}");
            }
        }
        Ok(None) => eprintln!("Cashbook account {cashbook_id} not found; run the migrator first"),
        Err(e) => eprintln!("Failed to load cashbook {cashbook_id}: {e}"),
    }
}
