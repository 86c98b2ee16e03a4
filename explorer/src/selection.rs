use crate::error::InvalidAttributeError;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    X,
    Y,
    Id,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::X => f.write_str("the X axis"),
            Role::Y => f.write_str("the Y axis"),
            Role::Id => f.write_str("the point identifier"),
        }
    }
}

/// The attributes chosen for each role, along with the attributes they
/// may be chosen from.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    options: Vec<String>,
    x: Option<String>,
    y: Option<String>,
    id: Option<String>,
}

/// A complete selection, borrowed from [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub id: &'a str,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the valid attributes and points every role at the first one,
    /// so that a chart can be drawn right after a load.
    pub fn set_options(&mut self, attributes: impl IntoIterator<Item = String>) {
        self.options = attributes.into_iter().collect();
        let first = self.options.first().cloned();
        self.x = first.clone();
        self.y = first.clone();
        self.id = first;
    }

    /// Assigns `attribute` to `role`. On error the previous choice is kept.
    pub fn set(&mut self, role: Role, attribute: &str) -> Result<(), InvalidAttributeError> {
        if !self.options.iter().any(|option| option == attribute) {
            return Err(InvalidAttributeError {
                role,
                attribute: attribute.into(),
            });
        }
        *self.slot(role) = Some(attribute.into());
        Ok(())
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::X => self.x.as_deref(),
            Role::Y => self.y.as_deref(),
            Role::Id => self.id.as_deref(),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn is_complete(&self) -> bool {
        self.axes().is_some()
    }

    pub fn axes(&self) -> Option<Axes<'_>> {
        Some(Axes {
            x: self.x.as_deref()?,
            y: self.y.as_deref()?,
            id: self.id.as_deref()?,
        })
    }

    fn slot(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::X => &mut self.x,
            Role::Y => &mut self.y,
            Role::Id => &mut self.id,
        }
    }
}
