//! Classification prompt construction.

use crate::classify::Department;

/// Build the single prompt sent to the model.
pub fn build_prompt(subject: &str, body: &str) -> String {
    let departments = Department::ALL
        .iter()
        .map(Department::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Classify this email into one of the departments: {departments}.\n\
         Subject: {subject}\n\
         Body: {body}"
    )
}
