use super::*;
use crate::subgraphs::{DirectiveSiteId, OverrideDirective};

/// The fetch reasons marker, with and without its namespace.
const REQUIRE_FETCH_REASONS: &[&str] = &["openfed__requireFetchReasons", "requireFetchReasons"];

enum DirectiveNameMatch {
    Marker(Markers),
    Deprecated,
    Key,
    Override,
    Provides,
    Requires,
    RequiresScopes,
    Tag,
    /// Directives that don't matter for composition.
    Other,
}

fn match_directive_name(name: &str) -> DirectiveNameMatch {
    if REQUIRE_FETCH_REASONS.contains(&name) {
        return DirectiveNameMatch::Marker(Markers::REQUIRE_FETCH_REASONS);
    }

    let name = name.strip_prefix("federation__").unwrap_or(name);

    match name {
        "shareable" => DirectiveNameMatch::Marker(Markers::SHAREABLE),
        "external" => DirectiveNameMatch::Marker(Markers::EXTERNAL),
        "interfaceObject" => DirectiveNameMatch::Marker(Markers::INTERFACE_OBJECT),
        "inaccessible" => DirectiveNameMatch::Marker(Markers::INACCESSIBLE),
        "authenticated" => DirectiveNameMatch::Marker(Markers::AUTHENTICATED),
        "extends" => DirectiveNameMatch::Marker(Markers::EXTENDS),
        "deprecated" => DirectiveNameMatch::Deprecated,
        "key" => DirectiveNameMatch::Key,
        "override" => DirectiveNameMatch::Override,
        "provides" => DirectiveNameMatch::Provides,
        "requires" => DirectiveNameMatch::Requires,
        "requiresScopes" => DirectiveNameMatch::RequiresScopes,
        "tag" => DirectiveNameMatch::Tag,
        _ => DirectiveNameMatch::Other,
    }
}

/// Record the federation directives at a location. `coordinate` names the location in
/// diagnostics.
pub(super) fn ingest_directives(
    ctx: &mut Context<'_>,
    directive_site_id: DirectiveSiteId,
    directives: ast::Iter<'_, ast::Directive<'_>>,
    coordinate: &str,
) {
    for directive in directives {
        match match_directive_name(directive.name()) {
            DirectiveNameMatch::Marker(marker) => {
                ctx.subgraphs[directive_site_id].markers |= marker;
            }
            DirectiveNameMatch::Deprecated => {
                let reason = directive
                    .argument("reason")
                    .and_then(|argument| argument.value().as_str())
                    .map(|reason| ctx.subgraphs.strings.intern(reason));

                ctx.subgraphs[directive_site_id].deprecated = Some(reason);
            }
            DirectiveNameMatch::Override => {
                let Some(from) = directive.argument("from").and_then(|v| v.value().as_str()) else {
                    continue;
                };

                let from = ctx.subgraphs.strings.intern(from);
                ctx.subgraphs[directive_site_id].r#override = Some(OverrideDirective { from });
            }
            DirectiveNameMatch::Provides => {
                let Some(fields) = directive.argument("fields").and_then(|arg| arg.value().as_str()) else {
                    continue;
                };

                match field_sets::parse_field_set(ctx.subgraphs, fields) {
                    Ok(field_set) => ctx.subgraphs[directive_site_id].provides = Some(field_set),
                    Err(reason) => ctx.push_error(SubgraphError::InvalidFieldSet {
                        directive: "provides",
                        coordinate: coordinate.to_owned(),
                        reason,
                    }),
                }
            }
            DirectiveNameMatch::Requires => {
                let Some(fields) = directive.argument("fields").and_then(|arg| arg.value().as_str()) else {
                    continue;
                };

                match field_sets::parse_field_set(ctx.subgraphs, fields) {
                    Ok(field_set) => ctx.subgraphs[directive_site_id].requires = Some(field_set),
                    Err(reason) => ctx.push_error(SubgraphError::InvalidFieldSet {
                        directive: "requires",
                        coordinate: coordinate.to_owned(),
                        reason,
                    }),
                }
            }
            DirectiveNameMatch::RequiresScopes => {
                let scopes = directive
                    .argument("scopes")
                    .into_iter()
                    .flat_map(|scopes| scopes.value().as_items())
                    .flatten();

                for scope in scopes {
                    let inner_scopes: Vec<subgraphs::StringId> = match scope {
                        ConstValue::List(scopes) => scopes
                            .items()
                            .filter_map(|scope| match scope {
                                ConstValue::String(string) => Some(ctx.subgraphs.strings.intern(string.as_str())),
                                _ => None,
                            })
                            .collect(),
                        _ => vec![],
                    };

                    ctx.subgraphs[directive_site_id].requires_scopes.push(inner_scopes);
                }
            }
            DirectiveNameMatch::Tag => {
                let Some(name) = directive.argument("name").and_then(|argument| argument.value().as_str()) else {
                    continue;
                };

                let name = ctx.subgraphs.strings.intern(name);
                ctx.subgraphs[directive_site_id].tags.push(name);
            }
            // Keys are attached to the definition, see ingest_keys().
            DirectiveNameMatch::Key | DirectiveNameMatch::Other => (),
        }
    }
}

pub(super) fn ingest_keys(
    ctx: &mut Context<'_>,
    definition_id: DefinitionId,
    directives: ast::Iter<'_, ast::Directive<'_>>,
) {
    for directive in directives {
        let DirectiveNameMatch::Key = match_directive_name(directive.name()) else {
            continue;
        };

        let type_name = ctx.subgraphs.walk(definition_id).name().to_owned();

        let Some(fields) = directive.argument("fields").and_then(|v| v.value().as_str()) else {
            ctx.push_error(SubgraphError::InvalidFieldSet {
                directive: "key",
                coordinate: type_name,
                reason: "the fields argument is missing".to_owned(),
            });
            continue;
        };

        let resolvable = directive
            .argument("resolvable")
            .and_then(|v| v.value().as_bool())
            .unwrap_or(true); // defaults to true

        match field_sets::parse_field_set(ctx.subgraphs, fields) {
            Ok(selection_set) => {
                ctx.subgraphs.push_key(definition_id, selection_set, resolvable);
            }
            Err(reason) => ctx.push_error(SubgraphError::InvalidFieldSet {
                directive: "key",
                coordinate: type_name,
                reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(name: &str) -> Option<Markers> {
        match match_directive_name(name) {
            DirectiveNameMatch::Marker(marker) => Some(marker),
            _ => None,
        }
    }

    #[test]
    fn federation_namespace_is_accepted() {
        assert_eq!(marker("federation__shareable"), Some(Markers::SHAREABLE));
        assert_eq!(marker("shareable"), Some(Markers::SHAREABLE));
        assert_eq!(marker("openfed__requireFetchReasons"), Some(Markers::REQUIRE_FETCH_REASONS));
        assert_eq!(marker("key"), None);
        assert!(matches!(match_directive_name("federation__key"), DirectiveNameMatch::Key));
        assert!(matches!(match_directive_name("custom"), DirectiveNameMatch::Other));
    }
}
