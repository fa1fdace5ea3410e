use super::display_utils::*;
use crate::federated_graph::*;
use std::fmt::{self, Display, Write as _};

/// Render a GraphQL SDL string for a federated graph. It does not include any
/// federation-specific directives, it only reflects the final API schema as visible
/// for consumers.
pub fn render_api_sdl(graph: &FederatedGraph) -> String {
    Renderer { graph }.to_string()
}

struct Renderer<'a> {
    graph: &'a FederatedGraph,
}

impl fmt::Display for Renderer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Renderer { graph } = self;
        let mut write_leading_whitespace = {
            let mut first_block = true;
            move |f: &mut fmt::Formatter<'_>| {
                if first_block {
                    first_block = false;
                    Ok(())
                } else {
                    f.write_char('\n')
                }
            }
        };

        for definition in &graph.type_definitions {
            if definition.is_inaccessible() {
                continue;
            }

            write_leading_whitespace(f)?;

            if let Some(description) = definition.description() {
                Description(description, "").fmt(f)?;
            }

            match definition {
                TypeDefinition::Object(object) => write_composite_type("type", object, graph, f)?,
                TypeDefinition::Interface(interface) => write_composite_type("interface", interface, graph, f)?,
                TypeDefinition::Union(union) => {
                    f.write_str("union ")?;
                    f.write_str(&union.name)?;
                    write_directives(f, &union.directives, DirectiveFilter::Api)?;
                    f.write_str(" =")?;

                    let mut members = union.members.iter().filter(|member| is_accessible(graph, member)).peekable();

                    while let Some(member) = members.next() {
                        f.write_char(' ')?;
                        f.write_str(member)?;

                        if members.peek().is_some() {
                            f.write_str(" |")?;
                        }
                    }

                    f.write_char('\n')?;
                }
                TypeDefinition::Enum(r#enum) => {
                    f.write_str("enum ")?;
                    f.write_str(&r#enum.name)?;
                    write_directives(f, &r#enum.directives, DirectiveFilter::Api)?;
                    f.write_str(" {\n")?;

                    for value in &r#enum.values {
                        if is_inaccessible(&value.directives) {
                            continue;
                        }

                        if let Some(description) = &value.description {
                            Description(description, INDENT).fmt(f)?;
                        }

                        f.write_str(INDENT)?;
                        f.write_str(&value.name)?;
                        write_directives(f, &value.directives, DirectiveFilter::Api)?;
                        f.write_char('\n')?;
                    }

                    f.write_str("}\n")?;
                }
                TypeDefinition::InputObject(input_object) => {
                    f.write_str("input ")?;
                    f.write_str(&input_object.name)?;
                    write_directives(f, &input_object.directives, DirectiveFilter::Api)?;
                    f.write_str(" {\n")?;

                    for field in &input_object.fields {
                        if is_inaccessible(&field.directives) {
                            continue;
                        }

                        if let Some(description) = &field.description {
                            Description(description, INDENT).fmt(f)?;
                        }

                        f.write_str(INDENT)?;
                        write_input_value(f, field, DirectiveFilter::Api)?;
                        f.write_char('\n')?;
                    }

                    f.write_str("}\n")?;
                }
                TypeDefinition::Scalar(scalar) => {
                    f.write_str("scalar ")?;
                    f.write_str(&scalar.name)?;
                    write_directives(f, &scalar.directives, DirectiveFilter::Api)?;
                    f.write_char('\n')?;
                }
            }
        }

        Ok(())
    }
}

fn write_composite_type(
    keyword: &str,
    composite: &CompositeType,
    graph: &FederatedGraph,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    f.write_str(keyword)?;
    f.write_char(' ')?;
    f.write_str(&composite.name)?;

    let mut interfaces = composite
        .implements_interfaces
        .iter()
        .filter(|interface| is_accessible(graph, interface))
        .peekable();

    if interfaces.peek().is_some() {
        f.write_str(" implements ")?;

        while let Some(interface) = interfaces.next() {
            f.write_str(interface)?;

            if interfaces.peek().is_some() {
                f.write_str(" & ")?;
            }
        }
    }

    write_directives(f, &composite.directives, DirectiveFilter::Api)?;
    f.write_str(" {\n")?;

    for field in &composite.fields {
        if is_inaccessible(&field.directives) {
            continue;
        }

        if let Some(description) = &field.description {
            Description(description, INDENT).fmt(f)?;
        }

        f.write_str(INDENT)?;
        f.write_str(&field.name)?;
        write_arguments(
            f,
            field
                .arguments
                .iter()
                .filter(|argument| !is_inaccessible(&argument.directives)),
            DirectiveFilter::Api,
        )?;
        write!(f, ": {}", field.r#type)?;
        write_directives(f, &field.directives, DirectiveFilter::Api)?;
        f.write_char('\n')?;
    }

    f.write_str("}\n")
}

fn is_accessible(graph: &FederatedGraph, type_name: &str) -> bool {
    graph
        .definition(type_name)
        .is_some_and(|definition| !definition.is_inaccessible())
}
