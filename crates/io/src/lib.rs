//! # banditnn-io
//!
//! Read point sets from dense CSV and sparse Matrix Market files, and write
//! per-run search reports as small `Key,value` text files.

mod error;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{Orientation, read_dense_csv, read_matrix_market};
pub use writer::{
    medoid_report_name, query_report_name, render_medoid_report, render_query_report,
    write_medoid_report, write_query_report,
};
