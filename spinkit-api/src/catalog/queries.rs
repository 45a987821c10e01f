//! Listing queries
//!
//! One generic implementation serves all four listing tables. Filters are
//! pushed as bound parameters; only table and column names (compile-time
//! constants) are formatted into SQL.

use spinkit_common::pagination::{calculate_pagination, Paginated};
use spinkit_common::{Result, SortOrder};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

/// Inclusive numeric bounds on one column
#[derive(Debug, Clone, Copy)]
pub struct Range {
    pub column: &'static str,
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Server-side listing filter
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    /// Match rows carrying any of these genres (case-insensitive)
    pub genres: Vec<String>,
    /// Case-insensitive substring match on a text column
    pub contains: Option<(&'static str, String)>,
    pub ranges: Vec<Range>,
}

impl ListingFilter {
    /// Parse a comma-separated genre list
    pub fn with_genres(mut self, raw: Option<&str>) -> Self {
        if let Some(raw) = raw {
            self.genres = raw
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect();
        }
        self
    }

    pub fn with_contains(mut self, column: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.contains = Some((column, value.to_string()));
        }
        self
    }

    pub fn with_range(mut self, column: &'static str, min: Option<i64>, max: Option<i64>) -> Self {
        if min.is_some() || max.is_some() {
            self.ranges.push(Range { column, min, max });
        }
        self
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");

        if !self.genres.is_empty() {
            qb.push(" AND EXISTS (SELECT 1 FROM json_each(genres) WHERE lower(json_each.value) IN (");
            let mut list = qb.separated(", ");
            for genre in &self.genres {
                list.push_bind(genre.to_lowercase());
            }
            list.push_unseparated("))");
        }

        if let Some((column, value)) = &self.contains {
            qb.push(format!(" AND instr(lower({}), lower(", column));
            qb.push_bind(value.clone());
            qb.push(")) > 0");
        }

        for range in &self.ranges {
            if let Some(min) = range.min {
                qb.push(format!(" AND {} >= ", range.column));
                qb.push_bind(min);
            }
            if let Some(max) = range.max {
                qb.push(format!(" AND {} <= ", range.column));
                qb.push_bind(max);
            }
        }
    }
}

/// ORDER BY clause; `id` breaks ties so pages never overlap
fn order_clause(sort: SortOrder) -> &'static str {
    match sort {
        SortOrder::Name => " ORDER BY name COLLATE NOCASE ASC, id ASC",
        SortOrder::Newest => " ORDER BY added_date DESC, id ASC",
        SortOrder::ScoreHigh => " ORDER BY score DESC, id ASC",
        SortOrder::ScoreLow => " ORDER BY score ASC, id ASC",
    }
}

/// One page of a listing table
pub async fn list_page<T>(
    pool: &SqlitePool,
    table: &'static str,
    filter: &ListingFilter,
    sort: SortOrder,
    page: i64,
    limit: i64,
) -> Result<Paginated<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let mut count = QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) FROM {}", table));
    filter.push_where(&mut count);
    let total_items: i64 = count.build_query_scalar::<i64>().fetch_one(pool).await?;

    let window = calculate_pagination(total_items, page, limit);

    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {}", table));
    filter.push_where(&mut select);
    select.push(order_clause(sort));
    select.push(" LIMIT ");
    select.push_bind(window.limit);
    select.push(" OFFSET ");
    select.push_bind(window.offset);

    debug!(table, sql = select.sql(), "Listing query");

    let items: Vec<T> = select.build_query_as::<T>().fetch_all(pool).await?;

    Ok(Paginated::new(items, total_items, window))
}

/// Single row by id
pub async fn find_by_id<T>(pool: &SqlitePool, table: &'static str, id: &str) -> Result<Option<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let row = sqlx::query_as::<_, T>(&format!("SELECT * FROM {} WHERE id = ?", table))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Rows whose `location` contains `city` (case-insensitive), by name
pub async fn find_by_location<T>(pool: &SqlitePool, table: &'static str, city: &str) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let filter = ListingFilter::default().with_contains("location", Some(city));
    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {}", table));
    filter.push_where(&mut select);
    select.push(order_clause(SortOrder::Name));

    Ok(select.build_query_as::<T>().fetch_all(pool).await?)
}

/// Rows carrying `genre` (case-insensitive), by name
pub async fn find_by_genre<T>(pool: &SqlitePool, table: &'static str, genre: &str) -> Result<Vec<T>>
where
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let filter = ListingFilter::default().with_genres(Some(genre));
    let mut select = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {}", table));
    filter.push_where(&mut select);
    select.push(order_clause(SortOrder::Name));

    Ok(select.build_query_as::<T>().fetch_all(pool).await?)
}

/// Listing count per genre in one table
///
/// Genres are grouped case-insensitively; a row listing the same genre twice
/// counts once. The display name is the lexically smallest spelling seen.
pub async fn genre_counts(pool: &SqlitePool, table: &'static str) -> Result<Vec<(String, i64)>> {
    let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
        "SELECT min(j.value) AS name, COUNT(DISTINCT t.id) AS n
         FROM {} AS t, json_each(t.genres) AS j
         GROUP BY lower(j.value)",
        table
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
