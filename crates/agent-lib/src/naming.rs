//! Namespec templates for emitted host and plugin names.

/// Default host namespec: the plain hostname.
pub const DEFAULT_HOST_NAMESPEC: &str = "{hn}";
/// Default plugin-name prefix: the entity name followed by a dot.
pub const DEFAULT_PLUGIN_NAMESPEC: &str = "{cn}.";

/// A name template with three macros: `{hn}` hostname, `{cn}` entity
/// (container or service) name, `{cid}` short container id.
#[derive(Debug, Clone)]
pub struct NameSpec {
    template: String,
}

impl NameSpec {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, hostname: &str, name: &str, container_id: &str) -> String {
        self.template
            .replace("{hn}", hostname)
            .replace("{cn}", name)
            .replace("{cid}", container_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plugin_namespec_prefixes_entity_name() {
        let spec = NameSpec::new(DEFAULT_PLUGIN_NAMESPEC);
        assert_eq!(spec.render("node1", "web", "0123456789ab"), "web.");
    }

    #[test]
    fn test_all_macros_substituted() {
        let spec = NameSpec::new("{hn}:{cn}:{cid}");
        assert_eq!(
            spec.render("node1", "web", "0123456789ab"),
            "node1:web:0123456789ab"
        );
    }

    #[test]
    fn test_literal_text_passes_through() {
        let spec = NameSpec::new("static");
        assert_eq!(spec.render("node1", "web", "id"), "static");
    }
}
