//! Unique aliases within a single Select.

use indexmap::IndexSet;

/// Hands out aliases that are unique within one Select.
///
/// Views and selected expressions draw from the same pool. A view is named
/// after the first letter of its name, or after a rotating letter when it has
/// none; collisions get a numeric suffix (`a`, `a1`, `a2`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct AliasMap {
    next: char,
    aliases: IndexSet<String>,
}

impl Default for AliasMap {
    fn default() -> AliasMap {
        AliasMap {
            next: 'a',
            aliases: IndexSet::new(),
        }
    }
}

impl AliasMap {
    pub fn new() -> AliasMap {
        AliasMap::default()
    }

    /// Allocate an alias for a FROM source.
    pub fn view_alias(&mut self, name: Option<&str>) -> String {
        let stem = match name.and_then(|name| name.chars().next()) {
            Some(first) => first.to_lowercase().collect(),
            None => {
                let letter = self.next;
                self.next = match letter {
                    'z' => 'a',
                    other => char::from_u32(u32::from(other) + 1).unwrap_or('a'),
                };
                letter.to_string()
            }
        };
        self.allocate(&stem)
    }

    /// Allocate an alias for a selected expression, if it asks for one.
    pub fn alias(&mut self, name: Option<&str>) -> Option<String> {
        name.map(|name| self.allocate(name))
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains(alias)
    }

    fn allocate(&mut self, stem: &str) -> String {
        let mut alias = stem.to_string();
        let mut index = 1;
        while self.aliases.contains(&alias) {
            alias = format!("{stem}{index}");
            index += 1;
        }
        self.aliases.insert(alias.clone());
        alias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_suffixes_colliding_aliases() {
        let mut aliases = AliasMap::new();
        assert_eq!(aliases.view_alias(Some("a")), "a");
        assert_eq!(aliases.view_alias(Some("apple")), "a1");
        assert_eq!(aliases.view_alias(Some("Ant")), "a2");
    }

    #[test]
    fn it_rotates_letters_for_unnamed_views() {
        let mut aliases = AliasMap::new();
        assert_eq!(aliases.view_alias(None), "a");
        assert_eq!(aliases.view_alias(None), "b");
        assert_eq!(aliases.view_alias(Some("bob")), "b1");
    }

    #[test]
    fn it_shares_the_pool_between_views_and_expressions() {
        let mut aliases = AliasMap::new();
        assert_eq!(aliases.view_alias(Some("name")), "n");
        assert_eq!(aliases.alias(Some("n")), Some("n1".to_string()));
        assert_eq!(aliases.alias(Some("name")), Some("name".to_string()));
        assert_eq!(aliases.alias(Some("name")), Some("name1".to_string()));
        assert_eq!(aliases.alias(None), None);
    }

    #[test]
    fn it_keeps_copies_independent() {
        let mut aliases = AliasMap::new();
        aliases.view_alias(Some("people"));
        let mut copy = aliases.clone();
        assert_eq!(copy.view_alias(Some("people")), "p1");
        assert!(!aliases.contains("p1"));
        assert_eq!(aliases.view_alias(Some("people")), "p1");
    }
}
