pub mod alias;
pub mod filter;

pub use alias::{AliasError, Category, resolve};
pub use filter::{
    FilterError, FilterOperator, FilterParam, OrderByParam, SortDirection, parse_delimited,
    parse_filter_parameter, parse_integer_filter, parse_order_by, parse_search, parse_text_filter,
};
