//! Configuration for the query builder.

use crate::error::MakeRuntimeConfigurationError;
use crate::version1::{self, DatabaseProperties, ParsedConfiguration};

/// The 'Configuration' type collects everything the builder needs while
/// generating SQL.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which is where the serialized format is
/// checked.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub database_properties: DatabaseProperties,
}

/// Validate a parsed configuration and turn it into a runtime one.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    if parsed_config.version != version1::CURRENT_VERSION {
        return Err(MakeRuntimeConfigurationError::UnsupportedVersion {
            version: parsed_config.version,
            expected: version1::CURRENT_VERSION,
        });
    }

    let quote = &parsed_config.database.identifier_quote;
    let mut chars = quote.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_alphanumeric() && !c.is_whitespace() => {}
        _ => {
            return Err(MakeRuntimeConfigurationError::InvalidIdentifierQuote {
                quote: quote.clone(),
                message: "expected a single punctuation character".to_string(),
            })
        }
    }

    tracing::debug!(
        quote_identifiers = parsed_config.database.quote_identifiers,
        "Loaded configuration"
    );

    Ok(Configuration {
        database_properties: parsed_config.database,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_accepts_the_empty_configuration() {
        let configuration = make_runtime_configuration(ParsedConfiguration::empty()).unwrap();
        assert_eq!(
            configuration.database_properties,
            DatabaseProperties::default()
        );
    }

    #[test]
    fn it_rejects_other_versions() {
        let parsed = ParsedConfiguration {
            version: 2,
            ..ParsedConfiguration::empty()
        };
        assert_eq!(
            make_runtime_configuration(parsed),
            Err(MakeRuntimeConfigurationError::UnsupportedVersion {
                version: 2,
                expected: 1
            })
        );
    }

    #[test]
    fn it_rejects_invalid_quotes() {
        for quote in ["", "ab", "x", " "] {
            let parsed = ParsedConfiguration {
                database: DatabaseProperties {
                    quote_identifiers: true,
                    identifier_quote: quote.to_string(),
                },
                ..ParsedConfiguration::empty()
            };
            assert!(matches!(
                make_runtime_configuration(parsed),
                Err(MakeRuntimeConfigurationError::InvalidIdentifierQuote { .. })
            ));
        }
    }
}
