//! Search expressions over a faces component tree: `@keyword` commands, id paths and
//! lists of both, resolved through a chain of keyword resolvers.

pub mod context;
pub mod handler;
pub mod keyword;
pub mod resolvers;
pub mod split;

pub use context::{SearchExpressionContext, SearchExpressionHint, SearchKeywordContext};
pub use handler::SearchExpressionHandler;
pub use keyword::{CompositeSearchKeywordResolver, SearchKeywordResolver};
pub use split::{extract_first_command, split_command, split_expressions};

#[cfg(test)]
#[path = "tests/keyword_tests.rs"]
mod keyword_tests;

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod resolver_tests;
