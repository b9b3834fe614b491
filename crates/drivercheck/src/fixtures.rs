//! Row data for the workloads.
//!
//! Names are derived from the loop index so every run inserts the same data.

use chrono::{DateTime, SubsecRound, Utc};

use crate::drivers::Param;

/// Name of the `n`th inserted row.
pub fn user_name(n: usize) -> String {
    format!("name {}", n)
}

/// Name written to the `n`th row by the update phase.
pub fn updated_name(n: usize) -> String {
    format!("name {} updated", n)
}

/// Current time at whole-second precision.
pub fn timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

/// Parameters for inserting the `n`th row.
pub fn insert_params(n: usize) -> [Param; 2] {
    [Param::Text(user_name(n)), Param::Timestamp(timestamp())]
}

/// Parameters for updating the row with `id`, which holds the `n`th name.
pub fn update_params(n: usize, id: i32) -> [Param; 3] {
    [
        Param::Text(updated_name(n)),
        Param::Timestamp(timestamp()),
        Param::Int(id),
    ]
}

/// Parameters for the select workload: every row with an id above zero.
pub fn select_params() -> [Param; 1] {
    [Param::Int(0)]
}
