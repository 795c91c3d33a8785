//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresCustomerStore` and `PostgresCardStore` backed by a
//! PostgreSQL database via `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag.
//!
//! # Schema
//!
//! - `cliente`: `id SERIAL` primary key, unique `cpf`
//! - `cartao`: `id SERIAL` primary key, unique `numero`, `cliente_id`
//!   foreign key to `cliente(id)`
//!
//! Lookups run inside a read-only transaction.

use crate::core::error::{StorageError, StoreResult};
use crate::core::store::{CardStore, CustomerStore};
use crate::core::{Card, Customer};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

const BACKEND: &str = "PostgreSQL";

// ---------------------------------------------------------------------------
// Connection and schema management
// ---------------------------------------------------------------------------

/// Open a connection pool
pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| StorageError::Connection {
            backend: BACKEND,
            message: e.to_string(),
        })
}

/// Apply the required tables (idempotent).
///
/// Safe to call on every startup.
pub async fn ensure_schema(pool: &PgPool) -> StoreResult<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cliente (
            id SERIAL PRIMARY KEY,
            nome VARCHAR(100) NOT NULL,
            cpf VARCHAR(11) NOT NULL,
            uf CHAR(2) NULL,
            CONSTRAINT cliente_cpf_key UNIQUE (cpf)
        )",
    )
    .execute(pool)
    .await
    .map_err(storage_error)?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cartao (
            id SERIAL PRIMARY KEY,
            numero VARCHAR(19) NOT NULL,
            data_validade DATE NOT NULL,
            bloqueado BOOLEAN NOT NULL DEFAULT FALSE,
            cliente_id INTEGER NOT NULL REFERENCES cliente(id),
            CONSTRAINT cartao_numero_key UNIQUE (numero)
        )",
    )
    .execute(pool)
    .await
    .map_err(storage_error)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_cartao_cliente ON cartao (cliente_id)")
        .execute(pool)
        .await
        .map_err(storage_error)?;

    Ok(())
}

/// Classify a sqlx error
fn storage_error(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            StorageError::Constraint {
                backend: BACKEND,
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            }
        }
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Connection {
            backend: BACKEND,
            message: err.to_string(),
        },
        _ => StorageError::Query {
            backend: BACKEND,
            message: err.to_string(),
        },
    }
}

async fn read_only(pool: &PgPool) -> StoreResult<Transaction<'static, Postgres>> {
    let mut tx = pool.begin().await.map_err(storage_error)?;
    sqlx::query("SET TRANSACTION READ ONLY")
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;
    Ok(tx)
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    nome: String,
    cpf: String,
    uf: Option<String>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: Some(row.id),
            cpf: Some(row.cpf),
            name: Some(row.nome),
            state: row.uf,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CardRow {
    id: i32,
    numero: String,
    data_validade: NaiveDate,
    bloqueado: bool,
    cliente_id: i32,
}

impl From<CardRow> for Card {
    fn from(row: CardRow) -> Self {
        Self {
            id: Some(row.id),
            number: Some(row.numero),
            expires_on: Some(row.data_validade),
            blocked: Some(row.bloqueado),
            customer_id: Some(row.cliente_id),
        }
    }
}

const CUSTOMER_COLUMNS: &str = "id, nome, cpf, uf";
const CARD_COLUMNS: &str = "id, numero, data_validade, bloqueado, cliente_id";

// ---------------------------------------------------------------------------
// PostgresCustomerStore
// ---------------------------------------------------------------------------

/// Customer store backed by the `cliente` table
#[derive(Clone, Debug)]
pub struct PostgresCustomerStore {
    pool: PgPool,
}

impl PostgresCustomerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerStore for PostgresCustomerStore {
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Customer>> {
        let mut tx = read_only(&self.pool).await?;
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM cliente WHERE id = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(row.map(Customer::from))
    }

    async fn find_by_cpf(&self, cpf: &str) -> StoreResult<Option<Customer>> {
        let mut tx = read_only(&self.pool).await?;
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM cliente WHERE cpf = $1",
            CUSTOMER_COLUMNS
        ))
        .bind(cpf)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(row.map(Customer::from))
    }

    async fn save(&self, customer: Customer) -> StoreResult<Customer> {
        let sql = match customer.id {
            None => format!(
                "INSERT INTO cliente (nome, cpf, uf) VALUES ($1, $2, $3) RETURNING {}",
                CUSTOMER_COLUMNS
            ),
            Some(_) => format!(
                "INSERT INTO cliente (id, nome, cpf, uf) VALUES ($4, $1, $2, $3) \
                 ON CONFLICT (id) DO UPDATE \
                 SET nome = EXCLUDED.nome, cpf = EXCLUDED.cpf, uf = EXCLUDED.uf \
                 RETURNING {}",
                CUSTOMER_COLUMNS
            ),
        };

        let mut query = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(&customer.name)
            .bind(&customer.cpf)
            .bind(&customer.state);
        if let Some(id) = customer.id {
            query = query.bind(id);
        }

        let row = query.fetch_one(&self.pool).await.map_err(storage_error)?;
        Ok(row.into())
    }
}

// ---------------------------------------------------------------------------
// PostgresCardStore
// ---------------------------------------------------------------------------

/// Card store backed by the `cartao` table
#[derive(Clone, Debug)]
pub struct PostgresCardStore {
    pool: PgPool,
}

impl PostgresCardStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CardStore for PostgresCardStore {
    async fn find_by_id(&self, id: i32) -> StoreResult<Option<Card>> {
        let mut tx = read_only(&self.pool).await?;
        let row = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cartao WHERE id = $1",
            CARD_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(row.map(Card::from))
    }

    async fn find_by_customer_id(&self, customer_id: i32) -> StoreResult<Vec<Card>> {
        let mut tx = read_only(&self.pool).await?;
        let rows = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cartao WHERE cliente_id = $1 ORDER BY id",
            CARD_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(rows.into_iter().map(Card::from).collect())
    }

    async fn find_by_number(&self, number: &str) -> StoreResult<Option<Card>> {
        let mut tx = read_only(&self.pool).await?;
        let row = sqlx::query_as::<_, CardRow>(&format!(
            "SELECT {} FROM cartao WHERE numero = $1",
            CARD_COLUMNS
        ))
        .bind(number)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;
        tx.commit().await.map_err(storage_error)?;

        Ok(row.map(Card::from))
    }

    async fn save(&self, card: Card) -> StoreResult<Card> {
        let sql = match card.id {
            None => format!(
                "INSERT INTO cartao (numero, data_validade, bloqueado, cliente_id) \
                 VALUES ($1, $2, $3, $4) RETURNING {}",
                CARD_COLUMNS
            ),
            Some(_) => format!(
                "INSERT INTO cartao (id, numero, data_validade, bloqueado, cliente_id) \
                 VALUES ($5, $1, $2, $3, $4) \
                 ON CONFLICT (id) DO UPDATE \
                 SET numero = EXCLUDED.numero, data_validade = EXCLUDED.data_validade, \
                     bloqueado = EXCLUDED.bloqueado, cliente_id = EXCLUDED.cliente_id \
                 RETURNING {}",
                CARD_COLUMNS
            ),
        };

        let mut query = sqlx::query_as::<_, CardRow>(&sql)
            .bind(&card.number)
            .bind(card.expires_on)
            .bind(card.is_blocked())
            .bind(card.customer_id);
        if let Some(id) = card.id {
            query = query.bind(id);
        }

        let row = query.fetch_one(&self.pool).await.map_err(storage_error)?;
        Ok(row.into())
    }
}
