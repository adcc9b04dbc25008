//! Tables shared by the integration tests.
#![allow(dead_code)]

use query_builder_sql::{Error, Table};

/// `people` keyed by `ID`, with a name, a city and a revenue.
pub fn people() -> Result<Table, Error> {
    let people = Table::new("people").pk(&["ID"])?;
    people.column("name");
    people.column("city");
    people.column("revenue");
    Ok(people)
}

/// `people` keyed by `peopleID`, with a city.
pub fn people_by_id() -> Result<Table, Error> {
    let people = Table::new("people").pk(&["peopleID"])?;
    people.column("city");
    Ok(people)
}

/// `department` keyed by `ID`.
pub fn department() -> Result<Table, Error> {
    Table::new("department").pk(&["ID"])
}
