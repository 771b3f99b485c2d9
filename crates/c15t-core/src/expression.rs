//! # Category Expressions
//!
//! A script declares which consent it needs either as a single category or
//! as a boolean combination of categories. `CategoryExpr` is that
//! combination: a tagged union of `And`/`Or`/`Not` nodes over category
//! leaves, evaluated by structural recursion against the current grants.
//!
//! Expressions are trees by construction — there is no way to build a
//! cycle — so evaluation always terminates.
//!
//! ## Wire Format
//!
//! The serde representation matches the declaration format integrators
//! write in configuration:
//!
//! ```json
//! "marketing"
//! {"and": ["marketing", "measurement"]}
//! {"or": ["experience", {"not": "marketing"}]}
//! ```

use serde::{Deserialize, Serialize};

use crate::category::ConsentCategory;

/// A boolean combination of consent categories.
///
/// Evaluation semantics:
/// - a leaf resolves to whether that category is currently granted;
/// - `And` requires every sub-expression true — an empty `and` is
///   vacuously true;
/// - `Or` requires at least one sub-expression true — an empty `or` is
///   false;
/// - `Not` negates its sub-expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryExpr {
    /// A single category leaf.
    Category(ConsentCategory),
    /// Conjunction of sub-expressions.
    And {
        /// The sub-expressions that must all hold.
        and: Vec<CategoryExpr>,
    },
    /// Disjunction of sub-expressions.
    Or {
        /// The sub-expressions of which at least one must hold.
        or: Vec<CategoryExpr>,
    },
    /// Negation of a sub-expression.
    Not {
        /// The negated sub-expression.
        not: Box<CategoryExpr>,
    },
}

impl CategoryExpr {
    /// Conjunction over the given expressions.
    pub fn and(exprs: impl IntoIterator<Item = CategoryExpr>) -> Self {
        Self::And {
            and: exprs.into_iter().collect(),
        }
    }

    /// Disjunction over the given expressions.
    pub fn or(exprs: impl IntoIterator<Item = CategoryExpr>) -> Self {
        Self::Or {
            or: exprs.into_iter().collect(),
        }
    }

    /// Negation of the given expression.
    pub fn not(expr: CategoryExpr) -> Self {
        Self::Not {
            not: Box::new(expr),
        }
    }

    /// Evaluate the expression against a view of the current grants.
    ///
    /// `granted` is any function from category to grant status — typically
    /// a closure over the consent state. A category the state does not
    /// track reports `false` there, so unknown references never grant.
    pub fn evaluate<F>(&self, granted: &F) -> bool
    where
        F: Fn(ConsentCategory) -> bool,
    {
        match self {
            Self::Category(c) => granted(*c),
            Self::And { and } => and.iter().all(|e| e.evaluate(granted)),
            Self::Or { or } => or.iter().any(|e| e.evaluate(granted)),
            Self::Not { not } => !not.evaluate(granted),
        }
    }

    /// Collect every category the expression references, in canonical
    /// order and without duplicates.
    ///
    /// Used by UI surfaces to list the categories a script depends on.
    pub fn categories(&self) -> Vec<ConsentCategory> {
        let mut set = std::collections::BTreeSet::new();
        self.collect_categories(&mut set);
        set.into_iter().collect()
    }

    fn collect_categories(&self, out: &mut std::collections::BTreeSet<ConsentCategory>) {
        match self {
            Self::Category(c) => {
                out.insert(*c);
            }
            Self::And { and } => {
                for e in and {
                    e.collect_categories(out);
                }
            }
            Self::Or { or } => {
                for e in or {
                    e.collect_categories(out);
                }
            }
            Self::Not { not } => not.collect_categories(out),
        }
    }
}

impl From<ConsentCategory> for CategoryExpr {
    fn from(category: ConsentCategory) -> Self {
        Self::Category(category)
    }
}
