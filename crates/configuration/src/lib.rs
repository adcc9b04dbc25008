pub mod configuration;
pub mod error;
pub mod version1;

pub use configuration::{make_runtime_configuration, Configuration};
pub use version1::{
    parse_configuration, write_parsed_configuration, DatabaseProperties, ParsedConfiguration,
};
