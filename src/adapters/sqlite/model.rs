use diesel::prelude::*;

use super::schema::population_history;

/// One species population at one time step.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = population_history)]
pub struct NewHistoryRow {
    pub time_step: i64,
    pub species: String,
    pub population: f64,
}

#[derive(Queryable, Debug, Clone)]
pub struct HistoryRow {
    pub time_step: i64,
    pub species: String,
    pub population: f64,
}
