//! Locates a command definition inside a resolved interface model

use crate::error::SchemaError;
use crate::model::{CommandDefinition, InterfaceModel, ModelEntity};

/// Select the single command entity named `name` from the model.
///
/// A model that declares the name zero times fails with
/// [`SchemaError::CommandNotFound`]; a malformed model declaring it more than
/// once fails closed with [`SchemaError::AmbiguousCommand`] rather than
/// silently picking one.
pub fn find_command<'a>(
    model: &'a InterfaceModel,
    name: &str,
) -> Result<&'a CommandDefinition, SchemaError> {
    let mut found: Option<&CommandDefinition> = None;

    for entity in model.values() {
        if let ModelEntity::Command(def) = entity {
            if def.name == name {
                if found.is_some() {
                    return Err(SchemaError::AmbiguousCommand(name.to_string()));
                }
                found = Some(def);
            }
        }
    }

    found.ok_or_else(|| SchemaError::CommandNotFound(name.to_string()))
}
