use crate::{
    composition_ir::DirectivesIr,
    subgraphs::{DirectiveSiteRecord, Markers},
};

/// Merge the directives of the same element across subgraphs.
pub(super) fn compose_directives<'a>(sites: impl Iterator<Item = &'a DirectiveSiteRecord>) -> DirectivesIr {
    let mut directives = DirectivesIr::default();

    for site in sites {
        if directives.deprecated.is_none() {
            directives.deprecated = site.deprecated;
        }

        directives.inaccessible |= site.has(Markers::INACCESSIBLE);
        directives.authenticated |= site.has(Markers::AUTHENTICATED);

        for scopes in &site.requires_scopes {
            if !directives.requires_scopes.contains(scopes) {
                directives.requires_scopes.push(scopes.clone());
            }
        }

        for tag in &site.tags {
            if !directives.tags.contains(tag) {
                directives.tags.push(*tag);
            }
        }
    }

    directives
}
