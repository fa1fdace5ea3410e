use crate::{
    Subgraphs,
    subgraphs::{DefinitionId, FieldId, Selection},
};
use cynic_parser::executable as ast;

/// Parse the `fields` argument of `@key`, `@provides` or `@requires` as a selection set.
pub(super) fn parse_field_set(subgraphs: &mut Subgraphs, fields: &str) -> Result<Vec<Selection>, String> {
    let fields = format!("{{ {fields} }}");
    let parsed = cynic_parser::parse_executable_document(&fields)
        .map_err(|err| format!("could not parse the field set as a selection set: {err}"))?;

    let Some(operation) = parsed.operations().next() else {
        return Err("the field set must be a selection set".to_owned());
    };

    let selection_set = build_selection_set(operation.selection_set(), subgraphs)?;

    if selection_set.is_empty() {
        return Err("the field set must not be empty".to_owned());
    }

    Ok(selection_set)
}

fn build_selection_set(
    selections: ast::Iter<'_, ast::Selection<'_>>,
    subgraphs: &mut Subgraphs,
) -> Result<Vec<Selection>, String> {
    selections
        .map(|selection| match selection {
            ast::Selection::Field(item) => {
                if item.arguments().next().is_some() {
                    return Err(format!("the field \"{}\" must not have arguments", item.name()));
                }

                if item.alias().is_some() {
                    return Err(format!("the field \"{}\" must not be aliased", item.name()));
                }

                let field = subgraphs.strings.intern(item.name());
                let subselection = build_selection_set(item.selection_set(), subgraphs)?;

                Ok(Selection::Field { field, subselection })
            }
            ast::Selection::InlineFragment(fragment) => {
                let on = fragment
                    .type_condition()
                    .ok_or("inline fragments must have a type condition")?;
                let subselection = build_selection_set(fragment.selection_set(), subgraphs)?;

                Ok(Selection::InlineFragment {
                    on: subgraphs.strings.intern(on),
                    subselection,
                })
            }
            _ => Err("fragment spreads are not allowed".to_owned()),
        })
        .collect()
}

/// Resolve a field set against the definitions of its subgraph, collecting every field it
/// selects. Returns a description of the first problem found.
pub(super) fn resolve_field_set(
    subgraphs: &Subgraphs,
    definition_id: DefinitionId,
    selections: &[Selection],
    selected_fields: &mut Vec<FieldId>,
) -> Result<(), String> {
    let definition = subgraphs.walk(definition_id);

    for selection in selections {
        match selection {
            Selection::Field { field, subselection } => {
                let Some(field) = definition.find_field(*field) else {
                    return Err(format!(
                        "the type \"{}\" has no field \"{}\"",
                        definition.name(),
                        &subgraphs[*field]
                    ));
                };

                selected_fields.push(field.id);

                let field_type = definition.subgraph().definition_by_name(field.type_name());

                match (field_type, subselection.is_empty()) {
                    (Some(field_type), false) if field_type.kind().has_output_fields() => {
                        resolve_field_set(subgraphs, field_type.id, subselection, selected_fields)?;
                    }
                    (Some(field_type), true) if field_type.kind().has_output_fields() => {
                        return Err(format!(
                            "the field \"{}\" has the composite type \"{}\" and needs a selection set",
                            field.coordinate(),
                            field_type.name()
                        ));
                    }
                    (_, false) => {
                        return Err(format!(
                            "the field \"{}\" has a leaf type and can not have a selection set",
                            field.coordinate()
                        ));
                    }
                    (_, true) => (),
                }
            }
            Selection::InlineFragment { on, subselection } => {
                let Some(target) = definition.subgraph().definition_by_name(&subgraphs[*on]) else {
                    return Err(format!("the type condition \"{}\" is not defined", &subgraphs[*on]));
                };

                resolve_field_set(subgraphs, target.id, subselection, selected_fields)?;
            }
        }
    }

    Ok(())
}
