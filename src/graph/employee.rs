//! Rows of the employee, connection and prediction relations

use super::types::{EmployeeId, ManagerAssignment};
use serde::{Deserialize, Serialize};

/// An employee row
///
/// Field names follow the employee relation columns; text fields that are
/// missing in the input are empty strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier
    #[serde(rename = "employee_id")]
    pub id: EmployeeId,

    /// Current job title
    #[serde(rename = "job_title_current", default)]
    pub job_title: String,

    /// Free-text profile summary
    #[serde(rename = "profile_summary", default)]
    pub summary: String,

    /// Office location
    #[serde(default)]
    pub location: String,

    /// Display name
    #[serde(default)]
    pub name: String,
}

impl Employee {
    /// Create an employee with a title and empty profile fields
    pub fn new(id: impl Into<EmployeeId>, job_title: impl Into<String>) -> Self {
        Employee {
            id: id.into(),
            job_title: job_title.into(),
            summary: String::new(),
            location: String::new(),
            name: String::new(),
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Text handed to the embedding function: title and summary joined by ". "
    pub fn profile_text(&self) -> String {
        format!("{}. {}", self.job_title, self.summary)
    }
}

/// An undirected social tie between two employees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    #[serde(rename = "employee_id_a")]
    pub a: EmployeeId,
    #[serde(rename = "employee_id_b")]
    pub b: EmployeeId,
}

impl Connection {
    pub fn new(a: impl Into<EmployeeId>, b: impl Into<EmployeeId>) -> Self {
        Connection {
            a: a.into(),
            b: b.into(),
        }
    }

    /// Endpoints ordered ascending, so `(a, b)` and `(b, a)` compare equal
    pub fn normalized(&self) -> (EmployeeId, EmployeeId) {
        if self.a <= self.b {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.a == self.b
    }
}

/// One row of the prediction relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub employee_id: EmployeeId,
    pub manager_id: ManagerAssignment,
}

impl Prediction {
    pub fn new(employee_id: impl Into<EmployeeId>, manager_id: ManagerAssignment) -> Self {
        Prediction {
            employee_id: employee_id.into(),
            manager_id,
        }
    }
}
