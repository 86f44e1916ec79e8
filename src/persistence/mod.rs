//! Persistence layer for orgtree
//!
//! CSV relations in and out:
//! - employees (`employee_id, job_title_current, profile_summary, location, name`)
//! - connections (`employee_id_a, employee_id_b`)
//! - predictions (`employee_id, manager_id`), also used for ground truth

pub mod relations;

pub use relations::{
    load_connections, load_employees, load_predictions, read_connections, read_employees,
    read_predictions, write_predictions, write_predictions_to, CONNECTION_COLUMNS,
    EMPLOYEE_COLUMNS, PREDICTION_COLUMNS,
};

use thiserror::Error;

/// Errors reading or writing relations
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {relation} relation: {source}")]
    Csv {
        relation: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("The {relation} relation is missing required columns: {}", .columns.join(", "))]
    MissingColumns {
        relation: &'static str,
        columns: Vec<String>,
    },
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
