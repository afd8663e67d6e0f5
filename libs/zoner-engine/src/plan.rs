use std::any::TypeId;

use zoner_api::{is_leaf, TypeInfo};

use crate::crawl::Descend;
use crate::error::MapError;
use crate::resolver::Resolver;

/// Check, from types alone, that every field the traversal can reach has a
/// target field to write to.
///
/// Follows `Shared<T>` members and collections of them (also behind
/// `Option`) whenever the descend policy could enter them. Fields typed
/// as `Object` or `Value` carry no static type and are not followed, so a
/// passing plan does not rule out `MissingTargetField` at conversion time.
pub fn validate(
    source: &'static TypeInfo,
    target: &TypeInfo,
    resolver: &Resolver,
    include_statics: bool,
    descend: Descend,
) -> Result<(), MapError> {
    let mut seen = Vec::new();
    walk(source, target, resolver, include_statics, descend, &mut seen)
}

fn walk(
    info: &'static TypeInfo,
    target: &TypeInfo,
    resolver: &Resolver,
    include_statics: bool,
    descend: Descend,
    seen: &mut Vec<TypeId>,
) -> Result<(), MapError> {
    if seen.contains(&info.type_id()) {
        return Ok(());
    }
    seen.push(info.type_id());

    for field in info.all_fields() {
        if field.is_static() && !include_statics {
            continue;
        }
        let meta = resolver.metadata_for(field);
        if !meta.skip {
            let name = meta.target_name(field.name());
            if target.field_named(name).is_none() {
                return Err(MapError::MissingTargetField {
                    field: name.to_string(),
                    target_type: target.name(),
                    owner: field.owner_name(),
                    source_field: field.name(),
                });
            }
        }

        let declared = field.declared();
        if is_leaf(declared) || !descend.may_descend(declared) {
            continue;
        }
        if let Some(nested) = declared.nested() {
            walk(nested, target, resolver, include_statics, descend, seen)?;
        }
    }
    Ok(())
}
