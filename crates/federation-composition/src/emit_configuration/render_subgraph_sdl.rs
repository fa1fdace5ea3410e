use crate::{
    DefinitionKind,
    emit_federated_graph::emit_value,
    federated_graph::{Description, INDENT, write_quoted},
    subgraphs::{ArgumentRecord, DefinitionWalker, DirectiveSiteRecord, FieldWalker, Markers, SubgraphWalker, Subgraphs},
};
use std::fmt::{self, Display, Write as _};

/// Render the normalized SDL of one subgraph: extensions folded into their base definition,
/// root types under their default names, directive markers resolved on each field.
pub(super) fn render_subgraph_sdl(subgraph: SubgraphWalker<'_>) -> String {
    Renderer { subgraph }.to_string()
}

struct Renderer<'a> {
    subgraph: SubgraphWalker<'a>,
}

/// The markers rendered at the definition level. The propagated ones are rendered on the fields
/// they apply to.
const DEFINITION_MARKERS: Markers = Markers::INTERFACE_OBJECT
    .union(Markers::INACCESSIBLE)
    .union(Markers::AUTHENTICATED);

impl fmt::Display for Renderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, definition) in self.subgraph.definitions().enumerate() {
            if idx > 0 {
                f.write_char('\n')?;
            }

            write_definition(f, definition)?;
        }

        Ok(())
    }
}

fn write_definition(f: &mut fmt::Formatter<'_>, definition: DefinitionWalker<'_>) -> fmt::Result {
    let subgraphs = definition.subgraphs;
    let record = definition.record();

    if let Some(description) = definition.description() {
        Description(description, "").fmt(f)?;
    }

    let keyword = match definition.kind() {
        DefinitionKind::Object => "type",
        DefinitionKind::Interface => "interface",
        DefinitionKind::InputObject => "input",
        DefinitionKind::Enum => "enum",
        DefinitionKind::Union => "union",
        DefinitionKind::Scalar => "scalar",
    };

    write!(f, "{keyword} {}", definition.name())?;

    for (idx, interface) in definition.implements_interfaces().enumerate() {
        f.write_str(if idx == 0 { " implements " } else { " & " })?;
        f.write_str(interface)?;
    }

    for key in definition.keys() {
        f.write_str(" @key(fields: ")?;
        write_quoted(f, &key.render_selection_set())?;

        if !key.view().resolvable {
            f.write_str(", resolvable: false")?;
        }

        f.write_char(')')?;
    }

    write_markers(f, definition.markers() & DEFINITION_MARKERS)?;

    for site in definition.directives() {
        write_scopes_and_tags(f, subgraphs, site)?;
    }

    match definition.kind() {
        DefinitionKind::Object | DefinitionKind::Interface => {
            f.write_str(" {\n")?;

            for field in definition.fields() {
                write_output_field(f, field)?;
            }

            f.write_str("}\n")
        }
        DefinitionKind::InputObject => {
            f.write_str(" {\n")?;

            for field in definition.fields() {
                let field_record = field.record();

                if let Some(description) = field.description() {
                    Description(description, INDENT).fmt(f)?;
                }

                write!(f, "{INDENT}{}: {}", field.name(), subgraphs.display_field_type(field.r#type()))?;

                if let Some(default_value) = &field_record.default_value {
                    write!(f, " = {}", emit_value(subgraphs, default_value))?;
                }

                write_site(f, subgraphs, field_record.markers, field.directives())?;
                f.write_char('\n')?;
            }

            f.write_str("}\n")
        }
        DefinitionKind::Enum => {
            f.write_str(" {\n")?;

            for value in &record.enum_values {
                if let Some(description) = value.description {
                    Description(&subgraphs[description], INDENT).fmt(f)?;
                }

                write!(f, "{INDENT}{}", &subgraphs[value.name])?;

                let site = &subgraphs[value.directives];
                write_site(f, subgraphs, site.markers, site)?;
                f.write_char('\n')?;
            }

            f.write_str("}\n")
        }
        DefinitionKind::Union => {
            for (idx, member) in record.union_members.iter().enumerate() {
                f.write_str(if idx == 0 { " = " } else { " | " })?;
                f.write_str(&subgraphs[*member])?;
            }

            f.write_char('\n')
        }
        DefinitionKind::Scalar => f.write_char('\n'),
    }
}

fn write_output_field(f: &mut fmt::Formatter<'_>, field: FieldWalker<'_>) -> fmt::Result {
    let subgraphs = field.subgraphs;

    if let Some(description) = field.description() {
        Description(description, INDENT).fmt(f)?;
    }

    write!(f, "{INDENT}{}", field.name())?;

    let arguments = field.arguments();

    if !arguments.is_empty() {
        f.write_char('(')?;

        for (idx, argument) in arguments.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }

            write_argument(f, subgraphs, argument)?;
        }

        f.write_char(')')?;
    }

    write!(f, ": {}", subgraphs.display_field_type(field.r#type()))?;
    write_site(f, subgraphs, field.record().markers, field.directives())?;

    f.write_char('\n')
}

fn write_argument(f: &mut fmt::Formatter<'_>, subgraphs: &Subgraphs, argument: &ArgumentRecord) -> fmt::Result {
    write!(
        f,
        "{}: {}",
        &subgraphs[argument.name],
        subgraphs.display_field_type(argument.r#type)
    )?;

    if let Some(default_value) = &argument.default_value {
        write!(f, " = {}", emit_value(subgraphs, default_value))?;
    }

    let site = &subgraphs[argument.directives];
    write_site(f, subgraphs, site.markers, site)
}

/// The directives of a field, argument or enum value. `markers` are the effective ones.
fn write_site(f: &mut fmt::Formatter<'_>, subgraphs: &Subgraphs, markers: Markers, site: &DirectiveSiteRecord) -> fmt::Result {
    write_markers(f, markers)?;

    if let Some(r#override) = site.r#override {
        f.write_str(" @override(from: ")?;
        write_quoted(f, &subgraphs[r#override.from])?;
        f.write_char(')')?;
    }

    for (name, field_set) in [("provides", &site.provides), ("requires", &site.requires)] {
        if let Some(field_set) = field_set {
            write!(f, " @{name}(fields: ")?;
            write_quoted(f, &subgraphs.render_field_set(field_set))?;
            f.write_char(')')?;
        }
    }

    match site.deprecated {
        Some(Some(reason)) => {
            f.write_str(" @deprecated(reason: ")?;
            write_quoted(f, &subgraphs[reason])?;
            f.write_char(')')?;
        }
        Some(None) => f.write_str(" @deprecated")?,
        None => (),
    }

    write_scopes_and_tags(f, subgraphs, site)
}

fn write_markers(f: &mut fmt::Formatter<'_>, markers: Markers) -> fmt::Result {
    for (marker, directive) in [
        (Markers::SHAREABLE, "@shareable"),
        (Markers::EXTERNAL, "@external"),
        (Markers::REQUIRE_FETCH_REASONS, "@openfed__requireFetchReasons"),
        (Markers::INTERFACE_OBJECT, "@interfaceObject"),
        (Markers::INACCESSIBLE, "@inaccessible"),
        (Markers::AUTHENTICATED, "@authenticated"),
    ] {
        if markers.contains(marker) {
            f.write_char(' ')?;
            f.write_str(directive)?;
        }
    }

    Ok(())
}

fn write_scopes_and_tags(f: &mut fmt::Formatter<'_>, subgraphs: &Subgraphs, site: &DirectiveSiteRecord) -> fmt::Result {
    if !site.requires_scopes.is_empty() {
        f.write_str(" @requiresScopes(scopes: [")?;

        for (idx, scopes) in site.requires_scopes.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }

            f.write_char('[')?;

            for (idx, scope) in scopes.iter().enumerate() {
                if idx > 0 {
                    f.write_str(", ")?;
                }

                write_quoted(f, &subgraphs[*scope])?;
            }

            f.write_char(']')?;
        }

        f.write_str("])")?;
    }

    for tag in &site.tags {
        f.write_str(" @tag(name: ")?;
        write_quoted(f, &subgraphs[*tag])?;
        f.write_char(')')?;
    }

    Ok(())
}
