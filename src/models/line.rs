//! Properties shared by line spanners and their segments

use super::geometry::PointF;
use super::properties::{Color, Pid, Placement, PropertyError, PropertyFlags, PropertyValue};
use super::style::{ElementStyle, Sid, Style};
use std::collections::HashMap;

/// Common state of a line element (a spanner or one of its segments)
///
/// Properties bound through the element style start out `Styled` and follow
/// the score style until the user edits them.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBase {
    pub track: usize,
    pub color: Color,
    pub visible: bool,
    pub autoplace: bool,
    pub placement: Placement,
    /// Offset from the anchor position, in staff spaces
    pub offset: PointF,
    /// Minimum distance to other elements, in staff spaces
    pub min_distance: f64,
    element_style: ElementStyle,
    flags: HashMap<Pid, PropertyFlags>,
}

impl Default for LineBase {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBase {
    pub fn new() -> Self {
        Self {
            track: 0,
            color: Color::BLACK,
            visible: true,
            autoplace: true,
            placement: Placement::Above,
            offset: PointF::default(),
            min_distance: 0.0,
            element_style: &[],
            flags: HashMap::new(),
        }
    }

    /// Bind properties to style values and copy the current values in
    pub fn init_element_style(&mut self, table: ElementStyle, style: &Style) {
        self.element_style = table;
        for &(sid, pid) in table {
            let value = PropertyValue::from(style.value(sid));
            if let Err(e) = self.store(pid, &value) {
                log::warn!("Style value {:?} does not fit property {:?}: {}", sid, pid, e);
                continue;
            }
            self.flags.insert(pid, PropertyFlags::Styled);
        }
    }

    pub fn element_style(&self) -> ElementStyle {
        self.element_style
    }

    /// Style value bound to `pid` by the element style table
    pub fn styled_sid(&self, pid: Pid) -> Option<Sid> {
        self.element_style
            .iter()
            .find(|(_, p)| *p == pid)
            .map(|(sid, _)| *sid)
    }

    pub fn property_flags(&self, pid: Pid) -> PropertyFlags {
        self.flags.get(&pid).copied().unwrap_or_default()
    }

    pub fn set_property_flags(&mut self, pid: Pid, flags: PropertyFlags) {
        self.flags.insert(pid, flags);
    }

    pub fn get_property(&self, pid: Pid) -> Option<PropertyValue> {
        match pid {
            Pid::Color => Some(PropertyValue::Color(self.color)),
            Pid::Visible => Some(PropertyValue::Bool(self.visible)),
            Pid::Autoplace => Some(PropertyValue::Bool(self.autoplace)),
            Pid::Placement => Some(PropertyValue::Placement(self.placement)),
            Pid::Offset => Some(PropertyValue::Point(self.offset)),
            Pid::MinDistance => Some(PropertyValue::Double(self.min_distance)),
            _ => None,
        }
    }

    /// Set a property owned by the line. Returns `Ok(false)` if `pid` is not
    /// one of them.
    pub fn set_property(&mut self, pid: Pid, value: &PropertyValue) -> Result<bool, PropertyError> {
        if !self.store(pid, value)? {
            return Ok(false);
        }
        if self.property_flags(pid) == PropertyFlags::Styled {
            self.flags.insert(pid, PropertyFlags::Unstyled);
        }
        Ok(true)
    }

    /// Restore a property to `value` and let it follow the style again
    pub fn reset_property(&mut self, pid: Pid, value: &PropertyValue) -> Result<bool, PropertyError> {
        if !self.store(pid, value)? {
            return Ok(false);
        }
        if self.flags.contains_key(&pid) {
            self.flags.insert(pid, PropertyFlags::Styled);
        }
        Ok(true)
    }

    /// Defaults for properties that are not style bound
    pub fn property_default(&self, pid: Pid) -> Option<PropertyValue> {
        match pid {
            Pid::Color => Some(PropertyValue::Color(Color::BLACK)),
            Pid::Visible | Pid::Autoplace => Some(PropertyValue::Bool(true)),
            Pid::Offset => Some(PropertyValue::Point(PointF::default())),
            Pid::MinDistance => Some(PropertyValue::Double(0.0)),
            _ => None,
        }
    }

    /// Re-apply style values to every property that still follows the style.
    /// `resolve` picks the style value for a property, falling back to the
    /// element style table.
    pub fn style_changed(&mut self, style: &Style, resolve: impl Fn(Pid) -> Option<Sid>) {
        let styled: Vec<Pid> = self
            .flags
            .iter()
            .filter(|(_, flags)| **flags == PropertyFlags::Styled)
            .map(|(pid, _)| *pid)
            .collect();
        for pid in styled {
            let Some(sid) = resolve(pid).or_else(|| self.styled_sid(pid)) else {
                continue;
            };
            let value = PropertyValue::from(style.value(sid));
            if let Err(e) = self.store(pid, &value) {
                log::warn!("Cannot apply style {:?} to {:?}: {}", sid, pid, e);
            }
        }
    }

    fn store(&mut self, pid: Pid, value: &PropertyValue) -> Result<bool, PropertyError> {
        let convert = |e: PropertyError| e.for_pid(pid);
        match pid {
            Pid::Color => self.color = value.to_color().map_err(convert)?,
            Pid::Visible => self.visible = value.to_bool().map_err(convert)?,
            Pid::Autoplace => self.autoplace = value.to_bool().map_err(convert)?,
            Pid::Placement => self.placement = value.to_placement().map_err(convert)?,
            Pid::Offset => self.offset = value.to_point().map_err(convert)?,
            Pid::MinDistance => self.min_distance = value.to_double().map_err(convert)?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}
