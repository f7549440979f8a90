//! Declared configuration schemas.
//!
//! A [`ConfigBlock`] maps option names to a default value and an allowed
//! domain. Values are checked against the domain when set, so an invalid
//! option fails where it is assigned rather than deep inside model
//! construction. Blocks declared `implicit` accept arbitrary keys and are
//! used for open-ended argument bags such as property package arguments.

use crate::error::{PfError, PfResult};
use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Value stored in a configuration option.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum ConfigValue {
    Bool(bool),
    Float(f64),
    Str(String),
    Block(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Sentinel used by options that inherit from a parent block.
    pub const USE_DEFAULT: &'static str = "useDefault";

    pub fn use_default() -> Self {
        ConfigValue::Str(Self::USE_DEFAULT.to_string())
    }

    pub fn is_use_default(&self) -> bool {
        matches!(self, ConfigValue::Str(s) if s == Self::USE_DEFAULT)
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
            ConfigValue::Block(_) => "block",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Block(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Bool(b) => write!(f, "{b}"),
            ConfigValue::Float(v) => write!(f, "{v}"),
            ConfigValue::Str(s) => write!(f, "'{s}'"),
            ConfigValue::Block(b) => {
                write!(f, "{{")?;
                for (i, (key, value)) in b.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(v: bool) -> Self {
        ConfigValue::Bool(v)
    }
}

impl From<f64> for ConfigValue {
    fn from(v: f64) -> Self {
        ConfigValue::Float(v)
    }
}

impl From<&str> for ConfigValue {
    fn from(v: &str) -> Self {
        ConfigValue::Str(v.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(v: String) -> Self {
        ConfigValue::Str(v)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(v: BTreeMap<String, ConfigValue>) -> Self {
        ConfigValue::Block(v)
    }
}

/// Allowed values for an option.
#[derive(Debug, Clone, PartialEq)]
pub enum Domain {
    Bool,
    In(Vec<ConfigValue>),
    NonNegativeFloat,
    Block,
    Any,
}

impl Domain {
    pub fn accepts(&self, value: &ConfigValue) -> bool {
        match self {
            Domain::Bool => matches!(value, ConfigValue::Bool(_)),
            Domain::In(allowed) => allowed.contains(value),
            Domain::NonNegativeFloat => {
                matches!(value, ConfigValue::Float(v) if v.is_finite() && *v >= 0.0)
            }
            Domain::Block => matches!(value, ConfigValue::Block(_)),
            Domain::Any => true,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Domain::Bool => write!(f, "bool"),
            Domain::In(allowed) => {
                write!(f, "one of [")?;
                for (i, v) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Domain::NonNegativeFloat => write!(f, "non-negative float"),
            Domain::Block => write!(f, "block"),
            Domain::Any => write!(f, "any value"),
        }
    }
}

/// One declared option.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigEntry {
    pub default: ConfigValue,
    pub domain: Domain,
    pub doc: &'static str,
    value: ConfigValue,
}

impl ConfigEntry {
    pub fn value(&self) -> &ConfigValue {
        &self.value
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default
    }
}

/// Ordered set of declared options.
///
/// ```
/// use pf_core::{ConfigBlock, ConfigValue, Domain};
///
/// let mut config = ConfigBlock::new()
///     .declare("has_pressure_change", false.into(), Domain::Bool, "Add a pressure change term");
/// config.set("has_pressure_change", true).unwrap();
/// assert_eq!(config.get_bool("has_pressure_change").unwrap(), true);
/// assert!(config.set("has_pressure_change", 1.0).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigBlock {
    entries: Vec<(String, ConfigEntry)>,
    implicit: bool,
}

impl ConfigBlock {
    /// Create an empty block that only accepts declared options.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            implicit: false,
        }
    }

    /// Create an open-ended block that accepts undeclared keys.
    pub fn implicit() -> Self {
        Self {
            entries: Vec::new(),
            implicit: true,
        }
    }

    /// Declare an option with its default and domain.
    ///
    /// Re-declaring a name replaces the previous declaration.
    pub fn declare(
        mut self,
        name: &str,
        default: ConfigValue,
        domain: Domain,
        doc: &'static str,
    ) -> Self {
        let entry = ConfigEntry {
            value: default.clone(),
            default,
            domain,
            doc,
        };
        match self.position(name) {
            Some(i) => self.entries[i].1 = entry,
            None => self.entries.push((name.to_string(), entry)),
        }
        self
    }

    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Assign a value, checking it against the option's domain.
    pub fn set(&mut self, name: &str, value: impl Into<ConfigValue>) -> PfResult<()> {
        let value = value.into();
        match self.position(name) {
            Some(i) => {
                let entry = &mut self.entries[i].1;
                if !entry.domain.accepts(&value) {
                    return Err(PfError::DomainViolation {
                        name: name.to_string(),
                        value: value.to_string(),
                        domain: entry.domain.to_string(),
                    });
                }
                entry.value = value;
                Ok(())
            }
            None if self.implicit => {
                self.entries.push((
                    name.to_string(),
                    ConfigEntry {
                        default: value.clone(),
                        domain: Domain::Any,
                        doc: "",
                        value,
                    },
                ));
                Ok(())
            }
            None => Err(PfError::UnknownOption {
                name: name.to_string(),
            }),
        }
    }

    /// Assign several values; stops at the first failure.
    pub fn set_all<'a, I>(&mut self, values: I) -> PfResult<()>
    where
        I: IntoIterator<Item = (&'a String, &'a ConfigValue)>,
    {
        for (name, value) in values {
            self.set(name, value.clone())?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entry(name).map(ConfigEntry::value)
    }

    pub fn entry(&self, name: &str) -> Option<&ConfigEntry> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    fn require(&self, name: &str) -> PfResult<&ConfigValue> {
        self.get(name).ok_or_else(|| PfError::UnknownOption {
            name: name.to_string(),
        })
    }

    pub fn get_bool(&self, name: &str) -> PfResult<bool> {
        let value = self.require(name)?;
        value.as_bool().ok_or_else(|| PfError::OptionType {
            name: name.to_string(),
            found: value.type_name(),
            expected: "bool",
        })
    }

    pub fn get_str(&self, name: &str) -> PfResult<&str> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| PfError::OptionType {
            name: name.to_string(),
            found: value.type_name(),
            expected: "string",
        })
    }

    pub fn get_block(&self, name: &str) -> PfResult<&BTreeMap<String, ConfigValue>> {
        let value = self.require(name)?;
        value.as_block().ok_or_else(|| PfError::OptionType {
            name: name.to_string(),
            found: value.type_name(),
            expected: "block",
        })
    }

    /// Iterate over option names and current values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(n, e)| (n.as_str(), e.value()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
