//! Query-building helpers shared by the repositories
//!
//! Case-insensitive search never relies on SQL `LOWER`: SQLite's built-in
//! version only folds ASCII. Searchable fields are stored a second time in a
//! `search_*` column, folded with [`fold_case`], and the needle is folded the
//! same way before matching.

use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};
use sea_orm::{ColumnTrait, Condition};

/// Unicode lowercase, used for both stored search columns and needles.
pub fn fold_case(raw: &str) -> String {
    raw.to_lowercase()
}

/// `column LIKE '%needle%'` over a folded column, with `%`, `_` and `\` in
/// the needle matched literally.
pub fn contains_folded<C>(column: C, needle: &str) -> SimpleExpr
where
    C: ColumnTrait,
{
    let pattern = format!("%{}%", escape_like(&fold_case(needle)));
    Expr::col(column).like(LikeExpr::new(pattern).escape('\\'))
}

/// OR of `contains_folded` over every column
pub fn any_contains_folded<C>(columns: &[C], needle: &str) -> Condition
where
    C: ColumnTrait,
{
    columns
        .iter()
        .fold(Condition::any(), |cond, col| cond.add(contains_folded(*col, needle)))
}

fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
