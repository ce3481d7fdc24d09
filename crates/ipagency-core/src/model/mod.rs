pub mod cell;
pub mod outcome;
pub mod row;

pub use cell::CellValue;
pub use outcome::{ImportOutcome, RowFailure};
pub use row::Row;
