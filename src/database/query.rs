use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::pagination::PageRequest;

/// Bindable filter value. The fixed set of variants covers every column type
/// the list endpoints filter on.
#[derive(Debug, Clone)]
pub enum Arg {
    Text(String),
    Int(i64),
    Uuid(Uuid),
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Eq,
    ILike,
    Gte,
    Lte,
}

/// Fixed-shape WHERE-clause builder shared by every list endpoint. Column
/// names are program literals (callers pass allowlisted columns only);
/// values are always bound parameters.
#[derive(Debug, Default)]
pub struct Filters {
    clauses: Vec<(&'static str, Op, Arg)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(&mut self, column: &'static str, value: Arg) -> &mut Self {
        self.clauses.push((column, Op::Eq, value));
        self
    }

    /// Case-insensitive substring match
    pub fn contains(&mut self, column: &'static str, needle: &str) -> &mut Self {
        self.clauses
            .push((column, Op::ILike, Arg::Text(format!("%{}%", needle))));
        self
    }

    pub fn gte(&mut self, column: &'static str, value: Arg) -> &mut Self {
        self.clauses.push((column, Op::Gte, value));
        self
    }

    pub fn lte(&mut self, column: &'static str, value: Arg) -> &mut Self {
        self.clauses.push((column, Op::Lte, value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        for (i, (column, op, arg)) in self.clauses.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            qb.push(*column);
            qb.push(match op {
                Op::Eq => " = ",
                Op::ILike => " ILIKE ",
                Op::Gte => " >= ",
                Op::Lte => " <= ",
            });
            match arg {
                Arg::Text(v) => qb.push_bind(v.clone()),
                Arg::Int(v) => qb.push_bind(*v),
                Arg::Uuid(v) => qb.push_bind(*v),
            };
        }
    }
}

/// Run the bounded page read plus the matching COUNT against one table,
/// returning the page items and the unpaged total.
pub async fn fetch_page<T>(
    pool: &PgPool,
    table: &str,
    filters: &Filters,
    page: &PageRequest,
) -> Result<(Vec<T>, i64), sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let mut qb = QueryBuilder::new(format!("SELECT * FROM {}", table));
    filters.push_where(&mut qb);
    qb.push(format!(" ORDER BY {} DESC", page.sort));
    qb.push(" LIMIT ");
    qb.push_bind(page.limit);
    qb.push(" OFFSET ");
    qb.push_bind(page.offset());
    let items = qb.build_query_as::<T>().fetch_all(pool).await?;

    let mut count_qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", table));
    filters.push_where(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    Ok((items, total))
}

/// Batch lookup by id, used to populate referenced entities on list results.
pub async fn fetch_by_ids<T>(pool: &PgPool, table: &str, ids: &[Uuid]) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let sql = format!("SELECT * FROM {} WHERE id = ANY($1)", table);
    sqlx::query_as::<_, T>(&sql).bind(ids).fetch_all(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_of(filters: &Filters, table: &str) -> String {
        let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT * FROM {}", table));
        filters.push_where(&mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn empty_filters_add_no_where() {
        let filters = Filters::new();
        assert!(filters.is_empty());
        assert_eq!(sql_of(&filters, "pieces"), "SELECT * FROM pieces");
    }

    #[test]
    fn clauses_join_with_and() {
        let mut filters = Filters::new();
        filters
            .eq("theme", Arg::Text("space".into()))
            .gte("piece_count", Arg::Int(100))
            .contains("name", "cruiser");
        let sql = sql_of(&filters, "sets");
        assert_eq!(
            sql,
            "SELECT * FROM sets WHERE theme = $1 AND piece_count >= $2 AND name ILIKE $3"
        );
    }

    #[test]
    fn contains_wraps_needle_in_wildcards() {
        let mut filters = Filters::new();
        filters.contains("name", "brick");
        match &filters.clauses[0].2 {
            Arg::Text(pattern) => assert_eq!(pattern, "%brick%"),
            other => panic!("unexpected arg: {:?}", other),
        }
    }
}
