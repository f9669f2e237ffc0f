use core::fmt;

use heapless::Vec;

use super::types::{AreaLayout, DisplayOffset, TouchArea, TouchPoint};
use crate::config::MAX_TOUCH_AREAS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryError {
    Capacity,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity => write!(f, "more than {MAX_TOUCH_AREAS} touch areas"),
        }
    }
}

/// Hit-test regions in the currently rendered coordinate space.
///
/// Areas are rebuilt wholesale from the base layout on every offset change;
/// only the enabled flag survives a rebuild.
#[derive(Clone, Debug)]
pub struct TouchAreaRegistry {
    layout: Vec<AreaLayout, MAX_TOUCH_AREAS>,
    areas: Vec<TouchArea, MAX_TOUCH_AREAS>,
    offset: DisplayOffset,
}

impl Default for TouchAreaRegistry {
    fn default() -> Self {
        Self::empty()
    }
}

impl TouchAreaRegistry {
    pub const fn empty() -> Self {
        Self {
            layout: Vec::new(),
            areas: Vec::new(),
            offset: DisplayOffset::ZERO,
        }
    }

    pub fn new(layout: &[AreaLayout]) -> Result<Self, RegistryError> {
        let mut registry = Self::empty();
        registry.set_layout(layout)?;
        Ok(registry)
    }

    /// Replaces the base layout and rebuilds at the current offset.
    pub fn set_layout(&mut self, layout: &[AreaLayout]) -> Result<(), RegistryError> {
        let layout = Vec::from_slice(layout).map_err(|_| RegistryError::Capacity)?;
        self.layout = layout;
        self.areas.clear();
        for base in &self.layout {
            // Capacities match, the push cannot fail.
            let _ = self.areas.push(TouchArea::from_layout(base, self.offset));
        }
        Ok(())
    }

    pub fn rebuild(&mut self, offset: DisplayOffset) {
        self.offset = offset;
        for (area, base) in self.areas.iter_mut().zip(self.layout.iter()) {
            let enabled = area.enabled;
            *area = TouchArea::from_layout(base, offset);
            area.enabled = enabled;
        }
        log::debug!(
            "touch: rebuilt {} areas at offset ({},{})",
            self.areas.len(),
            offset.dx,
            offset.dy
        );
    }

    /// Id of the first enabled area containing `point`, in registration order.
    pub fn find_touched(&self, point: &TouchPoint) -> Option<u16> {
        self.areas
            .iter()
            .find(|area| area.contains(point))
            .map(|area| area.id)
    }

    /// Unknown ids are ignored.
    pub fn set_enabled(&mut self, id: u16, enabled: bool) {
        if let Some(area) = self.areas.iter_mut().find(|area| area.id == id) {
            area.enabled = enabled;
        }
    }

    pub fn is_enabled(&self, id: u16) -> bool {
        self.areas
            .iter()
            .find(|area| area.id == id)
            .is_some_and(|area| area.enabled)
    }

    pub fn areas(&self) -> &[TouchArea] {
        &self.areas
    }

    pub fn offset(&self) -> DisplayOffset {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
