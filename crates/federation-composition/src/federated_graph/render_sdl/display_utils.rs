use crate::federated_graph::*;
use std::fmt::{self, Display, Write};

pub(crate) const INDENT: &str = "    ";

pub(crate) fn write_quoted(sdl: &mut impl Write, s: &str) -> fmt::Result {
    sdl.write_char('"')?;
    for c in s.chars() {
        match c {
            '\r' => sdl.write_str("\\r"),
            '\n' => sdl.write_str("\\n"),
            '\t' => sdl.write_str("\\t"),
            '\\' => sdl.write_str("\\\\"),
            '"' => sdl.write_str("\\\""),
            c if c.is_control() => write!(sdl, "\\u{:04X}", c as u32),
            c => sdl.write_char(c),
        }?
    }
    sdl.write_char('"')
}

/// A block string description, at the given indentation.
pub(crate) struct Description<'a>(pub &'a str, pub &'a str);

impl Display for Description<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Description(description, indentation) = self;

        writeln!(f, r#"{indentation}""""#)?;

        for line in description.lines() {
            writeln!(f, r#"{indentation}{}"#, line.replace(r#"""""#, r#"\""""#))?;
        }

        writeln!(f, r#"{indentation}""""#)
    }
}

/// The name of the `join__Graph` enum value for a subgraph: `my-accounts` is `MY_ACCOUNTS`.
pub(super) struct GraphEnumVariantName<'a>(pub &'a str);

impl Display for GraphEnumVariantName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for char in self.0.chars() {
            match char {
                '-' | '_' | ' ' | '.' => f.write_char('_')?,
                other => {
                    for char in other.to_uppercase() {
                        f.write_char(char)?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Which directives a rendering keeps.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum DirectiveFilter {
    All,
    /// Only the directives that are part of the client-facing schema.
    Api,
}

pub(super) fn write_directives(sdl: &mut impl Write, directives: &[Directive], filter: DirectiveFilter) -> fmt::Result {
    for directive in directives {
        match directive {
            Directive::Deprecated { reason: None } => sdl.write_str(" @deprecated")?,
            Directive::Deprecated { reason: Some(reason) } => {
                sdl.write_str(" @deprecated(reason: ")?;
                write_quoted(sdl, reason)?;
                sdl.write_char(')')?;
            }
            _ if filter == DirectiveFilter::Api => (),
            Directive::Inaccessible => sdl.write_str(" @inaccessible")?,
            Directive::Authenticated => sdl.write_str(" @authenticated")?,
            Directive::RequiresScopes(scopes) => {
                sdl.write_str(" @requiresScopes(scopes: [")?;

                for (idx, scope) in scopes.iter().enumerate() {
                    if idx > 0 {
                        sdl.write_str(", ")?;
                    }

                    sdl.write_char('[')?;

                    for (idx, scope) in scope.iter().enumerate() {
                        if idx > 0 {
                            sdl.write_str(", ")?;
                        }

                        write_quoted(sdl, scope)?;
                    }

                    sdl.write_char(']')?;
                }

                sdl.write_str("])")?;
            }
            Directive::Tag(name) => {
                sdl.write_str(" @tag(name: ")?;
                write_quoted(sdl, name)?;
                sdl.write_char(')')?;
            }
        }
    }

    Ok(())
}

/// `(a: Int, b: String = "x")`, nothing when there are no arguments left after filtering.
pub(super) fn write_arguments<'a>(
    sdl: &mut impl Write,
    arguments: impl Iterator<Item = &'a InputValueDefinition>,
    filter: DirectiveFilter,
) -> fmt::Result {
    let mut arguments = arguments.peekable();

    if arguments.peek().is_none() {
        return Ok(());
    }

    sdl.write_char('(')?;

    while let Some(argument) = arguments.next() {
        write_input_value(sdl, argument, filter)?;

        if arguments.peek().is_some() {
            sdl.write_str(", ")?;
        }
    }

    sdl.write_char(')')
}

/// `name: Type = default @directives`
pub(super) fn write_input_value(
    sdl: &mut impl Write,
    input_value: &InputValueDefinition,
    filter: DirectiveFilter,
) -> fmt::Result {
    write!(sdl, "{}: {}", input_value.name, input_value.r#type)?;

    if let Some(default_value) = &input_value.default_value {
        write!(sdl, " = {default_value}")?;
    }

    write_directives(sdl, &input_value.directives, filter)
}

pub(super) fn is_inaccessible(directives: &[Directive]) -> bool {
    directives.contains(&Directive::Inaccessible)
}
