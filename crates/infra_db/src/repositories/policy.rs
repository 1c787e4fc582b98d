//! Policy repository implementation
//!
//! Database access for policy aggregates. Rows map to and from the
//! aggregate through its snapshot; the list and count queries build
//! their filter clauses dynamically, mirroring the two optional filters
//! of the listing endpoint.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use core_kernel::{Currency, Money, PolicyId, PortError, Rut};
use domain_policy::{Policy, PolicyQuery, PolicySnapshot, PolicyStatus, PolicyStore};

use crate::error::DatabaseError;

const SELECT_COLUMNS: &str = "SELECT id, policy_number, client_rut, client_name, client_email, \
     premium, premium_currency, coverage, coverage_currency, status, \
     start_date, end_date, description, insurance_type, created_at, updated_at \
     FROM policies";

/// Repository for policy aggregates backed by PostgreSQL
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::PolicyRepository;
///
/// let repo = PolicyRepository::new(pool);
/// let policy = repo.get(policy_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Creates a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or updates a policy by id
    pub async fn upsert(&self, policy: &Policy) -> Result<(), DatabaseError> {
        let row = PolicyRow::from_snapshot(policy.snapshot());

        sqlx::query(
            r#"
            INSERT INTO policies (
                id, policy_number, client_rut, client_name, client_email,
                premium, premium_currency, coverage, coverage_currency, status,
                start_date, end_date, description, insurance_type, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                description = EXCLUDED.description,
                insurance_type = EXCLUDED.insurance_type,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(row.id)
        .bind(&row.policy_number)
        .bind(&row.client_rut)
        .bind(&row.client_name)
        .bind(&row.client_email)
        .bind(row.premium)
        .bind(&row.premium_currency)
        .bind(row.coverage)
        .bind(&row.coverage_currency)
        .bind(&row.status)
        .bind(row.start_date)
        .bind(row.end_date)
        .bind(&row.description)
        .bind(&row.insurance_type)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Retrieves a policy by its identifier
    pub async fn get(&self, id: PolicyId) -> Result<Option<Policy>, DatabaseError> {
        let row: Option<PolicyRow> = sqlx::query_as(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PolicyRow::into_policy).transpose()
    }

    /// Lists policies matching the query, newest first
    pub async fn list(&self, query: &PolicyQuery) -> Result<Vec<Policy>, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(SELECT_COLUMNS);
        push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(i64::from(query.size));
        builder.push(" OFFSET ").push_bind(query.offset() as i64);

        let rows: Vec<PolicyRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(PolicyRow::into_policy).collect()
    }

    /// Counts policies matching the query's filters
    pub async fn count_matching(&self, query: &PolicyQuery) -> Result<u64, DatabaseError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM policies");
        push_filters(&mut builder, query);

        let count: i64 = builder.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count as u64)
    }

    /// Returns true if a policy with this number exists
    pub async fn exists_by_number(&self, policy_number: &str) -> Result<bool, DatabaseError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM policies WHERE policy_number = $1)")
                .bind(policy_number)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Removes a policy by its identifier
    pub async fn delete(&self, id: PolicyId) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM policies WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Appends the optional status / client RUT filters as WHERE clauses
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &PolicyQuery) {
    let mut prefix = " WHERE ";

    if let Some(status) = query.status {
        builder.push(prefix).push("status = ").push_bind(status.code());
        prefix = " AND ";
    }

    if let Some(rut) = &query.client_rut {
        builder
            .push(prefix)
            .push("client_rut = ")
            .push_bind(rut.canonical());
    }
}

#[async_trait]
impl PolicyStore for PolicyRepository {
    async fn save(&self, policy: &Policy) -> Result<(), PortError> {
        self.upsert(policy).await.map_err(PortError::from)
    }

    async fn find_by_id(&self, id: PolicyId) -> Result<Option<Policy>, PortError> {
        self.get(id).await.map_err(PortError::from)
    }

    async fn find_all(&self, query: &PolicyQuery) -> Result<Vec<Policy>, PortError> {
        self.list(query).await.map_err(PortError::from)
    }

    async fn count(&self, query: &PolicyQuery) -> Result<u64, PortError> {
        self.count_matching(query).await.map_err(PortError::from)
    }

    async fn exists_by_policy_number(&self, policy_number: &str) -> Result<bool, PortError> {
        self.exists_by_number(policy_number)
            .await
            .map_err(PortError::from)
    }

    async fn delete_by_id(&self, id: PolicyId) -> Result<(), PortError> {
        self.delete(id).await.map_err(PortError::from)
    }
}

impl core_kernel::DomainPort for PolicyRepository {}

/// Database row representation of a policy
#[derive(Debug, Clone, sqlx::FromRow)]
struct PolicyRow {
    id: Uuid,
    policy_number: String,
    client_rut: String,
    client_name: String,
    client_email: String,
    premium: Decimal,
    premium_currency: String,
    coverage: Decimal,
    coverage_currency: String,
    status: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    description: Option<String>,
    insurance_type: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PolicyRow {
    fn from_snapshot(snapshot: PolicySnapshot) -> Self {
        Self {
            id: (*snapshot.id.as_uuid()),
            policy_number: snapshot.policy_number,
            client_rut: snapshot.client_rut.canonical(),
            client_name: snapshot.client_name,
            client_email: snapshot.client_email,
            premium: snapshot.premium.amount(),
            premium_currency: snapshot.premium.currency().code().to_string(),
            coverage: snapshot.coverage.amount(),
            coverage_currency: snapshot.coverage.currency().code().to_string(),
            status: snapshot.status.code().to_string(),
            start_date: snapshot.start_date,
            end_date: snapshot.end_date,
            description: snapshot.description,
            insurance_type: snapshot.insurance_type,
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }

    /// Rebuilds the aggregate from a stored row
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::CorruptRow` if a stored value no longer
    /// parses as its domain type
    fn into_policy(self) -> Result<Policy, DatabaseError> {
        let client_rut = Rut::parse(&self.client_rut)
            .map_err(|e| DatabaseError::corrupt_row("client_rut", e))?;

        let premium_currency: Currency = self
            .premium_currency
            .parse()
            .map_err(|e| DatabaseError::corrupt_row("premium_currency", e))?;
        let premium = Money::new(self.premium, premium_currency)
            .map_err(|e| DatabaseError::corrupt_row("premium", e))?;

        let coverage_currency: Currency = self
            .coverage_currency
            .parse()
            .map_err(|e| DatabaseError::corrupt_row("coverage_currency", e))?;
        let coverage = Money::new(self.coverage, coverage_currency)
            .map_err(|e| DatabaseError::corrupt_row("coverage", e))?;

        let status: PolicyStatus = self
            .status
            .parse()
            .map_err(|e| DatabaseError::corrupt_row("status", e))?;

        Ok(Policy::from_snapshot(PolicySnapshot {
            id: PolicyId::from_uuid(self.id),
            policy_number: self.policy_number,
            client_rut,
            client_name: self.client_name,
            client_email: self.client_email,
            premium,
            coverage,
            status,
            start_date: self.start_date,
            end_date: self.end_date,
            description: self.description,
            insurance_type: self.insurance_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }))
    }
}
