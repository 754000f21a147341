//! SQL rendering of chart listing predicates.
//!
//! [`ChartFilterQueryBuilder`] turns a [`ChartPredicate`] into a WHERE clause
//! fragment over the `chart_entry c` alias plus its positional parameters.
//! Every value is bound, never interpolated.

use journal_core::ChartPredicate;

use crate::escape_like;

/// Generates SQL WHERE clause fragments for chart filtering.
///
/// # Example
///
/// ```rust,ignore
/// use journal_core::ChartFilterParams;
/// use journal_db::ChartFilterQueryBuilder;
///
/// let predicate = ChartFilterParams {
///     search: Some("tsla".into()),
///     execution: Some("executed".into()),
///     ..Default::default()
/// }
/// .to_predicate();
///
/// let (sql, params) = ChartFilterQueryBuilder::new(&predicate, 0).build();
/// // sql: "(c.chart_name ILIKE $1 ESCAPE '\' OR c.stock_symbol ILIKE $1 ESCAPE '\') AND c.execution = $2"
/// // params: ["%tsla%", "executed"]
/// ```
pub struct ChartFilterQueryBuilder<'a> {
    predicate: &'a ChartPredicate,
    param_offset: usize,
}

impl<'a> ChartFilterQueryBuilder<'a> {
    /// Create a builder. `param_offset` is the number of parameters already
    /// bound ahead of the fragment.
    pub fn new(predicate: &'a ChartPredicate, param_offset: usize) -> Self {
        Self {
            predicate,
            param_offset,
        }
    }

    /// Build the fragment and its parameters, in placeholder order.
    ///
    /// An unconstrained predicate yields `("TRUE", [])`.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        let mut param_idx = self.param_offset;

        if let Some(search) = &self.predicate.search {
            param_idx += 1;
            clauses.push(format!(
                "(c.chart_name ILIKE ${0} ESCAPE '\\' OR c.stock_symbol ILIKE ${0} ESCAPE '\\')",
                param_idx
            ));
            params.push(format!("%{}%", escape_like(search)));
        }

        let exact = [
            ("c.strategy", &self.predicate.strategy),
            ("c.market_cap", &self.predicate.market_cap),
            ("c.execution", &self.predicate.execution),
        ];
        for (column, value) in exact {
            if let Some(value) = value {
                param_idx += 1;
                clauses.push(format!("{} = ${}", column, param_idx));
                params.push(value.clone());
            }
        }

        // Dates are stored as YYYY-MM-DD text, so lexicographic order is
        // calendar order.
        if let Some(range) = &self.predicate.date_range {
            clauses.push(format!(
                "c.chart_date BETWEEN ${} AND ${}",
                param_idx + 1,
                param_idx + 2
            ));
            params.push(range.start.clone());
            params.push(range.end.clone());
        }

        if clauses.is_empty() {
            ("TRUE".to_string(), params)
        } else {
            (clauses.join(" AND "), params)
        }
    }
}
