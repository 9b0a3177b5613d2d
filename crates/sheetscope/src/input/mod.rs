//! Input contract: headers plus untyped row records.

mod dataset;
mod value;

pub use dataset::{Dataset, Row, cell, validate_shape};
pub use value::Value;
pub(crate) use value::{format_number, number_to_json};
