//! Typed channel lookup within a component.

use tracing::debug;

use crate::bif::{Channel, Component, DataType};
use crate::util::{Error, Result};

/// Resolve a channel by exact name and expected element type.
///
/// `None` means the component has no usable data of this kind, either because
/// the name is absent or because the declared type differs. Callers skip the
/// component; this is never a hard failure.
pub fn find_channel<'a>(
    component: &'a Component,
    name: &str,
    expected: DataType,
) -> Option<&'a Channel> {
    let channel = component.channels().iter().find(|ch| ch.name() == name)?;
    if channel.data_type() != expected {
        debug!(
            component = component.name(),
            channel = name,
            expected = %expected,
            actual = %channel.data_type(),
            "channel type mismatch, treating as absent"
        );
        return None;
    }
    Some(channel)
}

/// Like [`find_channel`] but reports the precise reason as an error, for
/// callers that need the diagnostic (the component is still only skipped).
pub fn require_channel<'a>(
    component: &'a Component,
    name: &str,
    expected: DataType,
) -> Result<&'a Channel> {
    match component.channels().iter().find(|ch| ch.name() == name) {
        None => Err(Error::ChannelNotFound(name.to_string())),
        Some(ch) if ch.data_type() != expected => Err(Error::ChannelTypeMismatch {
            name: name.to_string(),
            expected,
            actual: ch.data_type(),
        }),
        Some(ch) => Ok(ch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bif::{Channel, ComponentType, Layout};

    fn component() -> Component {
        let layout = Layout::with_tile_counts(&[1]);
        let mut comp = Component::new("liquid", ComponentType::Point, layout.clone());
        comp.add_channel(Channel::new("position", DataType::FloatV3, &layout)).unwrap();
        comp.add_channel(Channel::new("density", DataType::Float, &layout)).unwrap();
        comp
    }

    #[test]
    fn test_find_channel() {
        let comp = component();
        assert!(find_channel(&comp, "position", DataType::FloatV3).is_some());
        // Absent name and wrong type are both "not found", not errors.
        assert!(find_channel(&comp, "velocity", DataType::FloatV3).is_none());
        assert!(find_channel(&comp, "density", DataType::FloatV3).is_none());
    }

    #[test]
    fn test_require_channel_diagnostics() {
        let comp = component();
        assert!(matches!(
            require_channel(&comp, "velocity", DataType::FloatV3),
            Err(Error::ChannelNotFound(_))
        ));
        assert!(matches!(
            require_channel(&comp, "density", DataType::FloatV3),
            Err(Error::ChannelTypeMismatch { .. })
        ));
        assert!(require_channel(&comp, "position", DataType::FloatV3).is_ok());
    }
}
