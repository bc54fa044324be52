//! Mapping from text roles to concrete fonts

use doc_model::TextRole;
use text_engine::{FontSpec, Typography};

/// Font used to draw text of `role`
pub fn role_font(role: TextRole, typography: &Typography) -> FontSpec {
    match role {
        TextRole::Metadata => FontSpec::bold(typography.caption),
        TextRole::Title => FontSpec::bold(typography.x_large),
        TextRole::Subtitle | TextRole::Heading => FontSpec::bold(typography.large),
        TextRole::Body => FontSpec::regular(typography.regular),
        TextRole::Strong => FontSpec::bold(typography.regular),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text_engine::FontWeight;

    #[test]
    fn test_default_roles() {
        let typography = Typography::default();
        assert_eq!(role_font(TextRole::Title, &typography).size, 28.0);
        assert_eq!(role_font(TextRole::Heading, &typography).size, 20.0);
        assert_eq!(
            role_font(TextRole::Body, &typography).weight,
            FontWeight::Regular
        );
        assert_eq!(
            role_font(TextRole::Strong, &typography),
            FontSpec::bold(16.0)
        );
    }
}
