use super::display_utils::*;
use crate::federated_graph::*;
use std::fmt::{self, Write};

const PRELUDE: &str = r#"directive @join__type(graph: join__Graph!, key: join__FieldSet, resolvable: Boolean = true, isInterfaceObject: Boolean = false) repeatable on OBJECT | INTERFACE | UNION | ENUM | INPUT_OBJECT | SCALAR

directive @join__field(graph: join__Graph, requires: join__FieldSet, provides: join__FieldSet, type: String, external: Boolean, override: String) repeatable on FIELD_DEFINITION | INPUT_FIELD_DEFINITION

directive @join__implements(graph: join__Graph!, interface: String!) repeatable on OBJECT | INTERFACE

directive @join__unionMember(graph: join__Graph!, member: String!) repeatable on UNION

directive @join__graph(name: String!, url: String!) on ENUM_VALUE

scalar join__FieldSet

"#;

/// Render a GraphQL SDL string for a federated graph. It includes join directives about
/// subgraphs, entities and the fields each subgraph resolves.
pub fn render_federated_sdl(graph: &FederatedGraph) -> String {
    FederatedSdl { graph }.to_string()
}

struct FederatedSdl<'a> {
    graph: &'a FederatedGraph,
}

impl fmt::Display for FederatedSdl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sdl = String::new();
        write_federated_sdl(self.graph, &mut sdl)?;
        f.write_str(&sdl)
    }
}

fn write_federated_sdl(graph: &FederatedGraph, sdl: &mut String) -> fmt::Result {
    sdl.push_str(PRELUDE);

    write_schema_definition(graph, sdl)?;
    write_subgraphs_enum(graph, sdl)?;

    for definition in &graph.type_definitions {
        if let Some(description) = definition.description() {
            write!(sdl, "{}", Description(description, ""))?;
        }

        match definition {
            TypeDefinition::Object(object) => write_composite_type("type", object, graph, sdl)?,
            TypeDefinition::Interface(interface) => write_composite_type("interface", interface, graph, sdl)?,
            TypeDefinition::Union(union) => {
                write!(sdl, "union {}", union.name)?;
                write_directives(sdl, &union.directives, DirectiveFilter::All)?;
                write_join_types(&union.join_types, graph, sdl)?;

                for member in &union.join_members {
                    let subgraph_name = GraphEnumVariantName(&graph.subgraph(member.subgraph_id).name);
                    write!(sdl, "\n{INDENT}@join__unionMember(graph: {subgraph_name}, member: ")?;
                    write_quoted(sdl, &member.member)?;
                    sdl.push(')');
                }

                sdl.push_str(if union.join_types.is_empty() { " =" } else { "\n=" });

                let mut members = union.members.iter().peekable();

                while let Some(member) = members.next() {
                    sdl.push(' ');
                    sdl.push_str(member);

                    if members.peek().is_some() {
                        sdl.push_str(" |");
                    }
                }

                sdl.push_str("\n\n");
            }
            TypeDefinition::Enum(r#enum) => {
                write!(sdl, "enum {}", r#enum.name)?;
                write_directives(sdl, &r#enum.directives, DirectiveFilter::All)?;
                write_join_types(&r#enum.join_types, graph, sdl)?;
                open_block(!r#enum.join_types.is_empty(), sdl);

                for value in &r#enum.values {
                    if let Some(description) = &value.description {
                        write!(sdl, "{}", Description(description, INDENT))?;
                    }

                    write!(sdl, "{INDENT}{}", value.name)?;
                    write_directives(sdl, &value.directives, DirectiveFilter::All)?;
                    sdl.push('\n');
                }

                sdl.push_str("}\n\n");
            }
            TypeDefinition::InputObject(input_object) => {
                write!(sdl, "input {}", input_object.name)?;
                write_directives(sdl, &input_object.directives, DirectiveFilter::All)?;
                write_join_types(&input_object.join_types, graph, sdl)?;
                open_block(!input_object.join_types.is_empty(), sdl);

                for field in &input_object.fields {
                    if let Some(description) = &field.description {
                        write!(sdl, "{}", Description(description, INDENT))?;
                    }

                    sdl.push_str(INDENT);
                    write_input_value(sdl, field, DirectiveFilter::All)?;
                    sdl.push('\n');
                }

                sdl.push_str("}\n\n");
            }
            TypeDefinition::Scalar(scalar) => {
                write!(sdl, "scalar {}", scalar.name)?;
                write_directives(sdl, &scalar.directives, DirectiveFilter::All)?;
                write_join_types(&scalar.join_types, graph, sdl)?;
                sdl.push_str("\n\n");
            }
        }
    }

    // Normalize to a single final newline.
    while let Some('\n') = sdl.chars().next_back() {
        sdl.pop();
    }
    sdl.push('\n');

    Ok(())
}

fn write_schema_definition(graph: &FederatedGraph, sdl: &mut String) -> fmt::Result {
    let roots = &graph.root_operation_types;

    sdl.push_str("schema {\n");
    writeln!(sdl, "{INDENT}query: {}", roots.query)?;

    if let Some(mutation) = &roots.mutation {
        writeln!(sdl, "{INDENT}mutation: {mutation}")?;
    }

    if let Some(subscription) = &roots.subscription {
        writeln!(sdl, "{INDENT}subscription: {subscription}")?;
    }

    sdl.push_str("}\n\n");
    Ok(())
}

fn write_subgraphs_enum(graph: &FederatedGraph, sdl: &mut String) -> fmt::Result {
    sdl.push_str("enum join__Graph {\n");

    for subgraph in &graph.subgraphs {
        write!(sdl, "{INDENT}{} @join__graph(name: ", GraphEnumVariantName(&subgraph.name))?;
        write_quoted(sdl, &subgraph.name)?;
        sdl.push_str(", url: ");
        write_quoted(sdl, &subgraph.url)?;
        sdl.push_str(")\n");
    }

    sdl.push_str("}\n\n");
    Ok(())
}

fn write_composite_type(
    keyword: &str,
    composite: &CompositeType,
    graph: &FederatedGraph,
    sdl: &mut String,
) -> fmt::Result {
    write!(sdl, "{keyword} {}", composite.name)?;

    if !composite.implements_interfaces.is_empty() {
        sdl.push_str(" implements ");
        sdl.push_str(&composite.implements_interfaces.join(" & "));
    }

    write_directives(sdl, &composite.directives, DirectiveFilter::All)?;
    write_join_types(&composite.join_types, graph, sdl)?;

    for implements in &composite.join_implements {
        let subgraph_name = GraphEnumVariantName(&graph.subgraph(implements.subgraph_id).name);
        write!(sdl, "\n{INDENT}@join__implements(graph: {subgraph_name}, interface: ")?;
        write_quoted(sdl, &implements.interface)?;
        sdl.push(')');
    }

    open_block(!composite.join_types.is_empty() || !composite.join_implements.is_empty(), sdl);

    for field in &composite.fields {
        write_field(field, composite, graph, sdl)?;
    }

    sdl.push_str("}\n\n");
    Ok(())
}

fn write_field(field: &Field, parent: &CompositeType, graph: &FederatedGraph, sdl: &mut String) -> fmt::Result {
    if let Some(description) = &field.description {
        write!(sdl, "{}", Description(description, INDENT))?;
    }

    write!(sdl, "{INDENT}{}", field.name)?;
    write_arguments(sdl, field.arguments.iter(), DirectiveFilter::All)?;
    write!(sdl, ": {}", field.r#type)?;

    if !join_fields_are_implied(field, parent) {
        for join_field in &field.join_fields {
            write_join_field(join_field, graph, sdl)?;
        }
    }

    write_directives(sdl, &field.directives, DirectiveFilter::All)?;
    sdl.push('\n');

    Ok(())
}

/// The join fields can be left out when every subgraph defining the parent type defines the field
/// the same way.
fn join_fields_are_implied(field: &Field, parent: &CompositeType) -> bool {
    let plain = field.join_fields.iter().all(|join_field| {
        join_field.r#type.is_none()
            && join_field.requires.is_none()
            && join_field.provides.is_none()
            && !join_field.external
            && join_field.r#override.is_none()
    });

    let mut parent_subgraphs: Vec<SubgraphId> = parent.join_types.iter().map(|join_type| join_type.subgraph_id).collect();
    parent_subgraphs.dedup();

    plain
        && field.join_fields.len() == parent_subgraphs.len()
        && field
            .join_fields
            .iter()
            .all(|join_field| parent_subgraphs.contains(&join_field.subgraph_id))
}

fn write_join_field(join_field: &JoinField, graph: &FederatedGraph, sdl: &mut String) -> fmt::Result {
    let subgraph_name = GraphEnumVariantName(&graph.subgraph(join_field.subgraph_id).name);
    write!(sdl, " @join__field(graph: {subgraph_name}")?;

    if let Some(requires) = &join_field.requires {
        sdl.push_str(", requires: ");
        write_quoted(sdl, requires)?;
    }

    if let Some(provides) = &join_field.provides {
        sdl.push_str(", provides: ");
        write_quoted(sdl, provides)?;
    }

    if let Some(r#type) = &join_field.r#type {
        sdl.push_str(", type: ");
        write_quoted(sdl, &r#type.to_string())?;
    }

    if join_field.external {
        sdl.push_str(", external: true");
    }

    if let Some(r#override) = &join_field.r#override {
        sdl.push_str(", override: ");
        write_quoted(sdl, r#override)?;
    }

    sdl.push(')');
    Ok(())
}

fn write_join_types(join_types: &[JoinType], graph: &FederatedGraph, sdl: &mut String) -> fmt::Result {
    for join_type in join_types {
        let subgraph_name = GraphEnumVariantName(&graph.subgraph(join_type.subgraph_id).name);
        write!(sdl, "\n{INDENT}@join__type(graph: {subgraph_name}")?;

        if let Some(key) = &join_type.key {
            sdl.push_str(", key: ");
            write_quoted(sdl, key)?;
        }

        if !join_type.resolvable {
            sdl.push_str(", resolvable: false");
        }

        if join_type.is_interface_object {
            sdl.push_str(", isInterfaceObject: true");
        }

        sdl.push(')');
    }

    Ok(())
}

/// Directives on their own lines put the opening brace on the next line too.
fn open_block(directives_on_own_lines: bool, sdl: &mut String) {
    sdl.push_str(if directives_on_own_lines { "\n{\n" } else { " {\n" });
}
