//! Types and procedures that represents a command line argument,
//! or collections of command line arguments

use std::ops::Deref;
use std::path::Path;
use std::{borrow::Borrow, ffi::OsStr, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Type for represent a command line argument
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Argument {
    value: String,
}

impl Argument {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&String> for Argument {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&Path> for Argument {
    fn from(value: &Path) -> Self {
        Self::from(format!("{}", value.display()))
    }
}

impl From<PathBuf> for Argument {
    fn from(value: PathBuf) -> Self {
        Self::from(value.as_path())
    }
}

impl From<&PathBuf> for Argument {
    fn from(value: &PathBuf) -> Self {
        Self::from(value.as_path())
    }
}

impl Deref for Argument {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl Borrow<str> for Argument {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl AsRef<OsStr> for Argument {
    fn as_ref(&self) -> &OsStr {
        OsStr::new(&self.value)
    }
}

impl core::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Strong type for represent a linear collection of [`Argument`]
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    /// Wraps an existing [`std::vec::Vec`] of [`Argument`]
    pub fn from_vec(vec: Vec<Argument>) -> Self {
        Self(vec)
    }

    /// Returns a new collection of [`Argument`] with the specified capacity
    pub fn with_capacity(cap: usize) -> Self {
        Self(Vec::with_capacity(cap))
    }

    /// Creates and stores a new [`Argument`] to the end of this collection
    pub fn create_and_push<T>(&mut self, val: T)
    where
        T: Into<Argument>,
    {
        self.0.push(val.into())
    }

    /// Appends a new [`Argument`] to the end of this collection
    pub fn push(&mut self, arg: Argument) {
        self.0.push(arg)
    }

    /// Given an optional, adds the wrapper inner value if there's some element,
    /// otherwise leaves
    pub fn push_opt(&mut self, arg: Option<Argument>) {
        if let Some(val) = arg {
            self.0.push(val)
        }
    }

    /// Extends the underlying collection from a Iterator of [`Argument`]
    pub fn extend(&mut self, iter: impl IntoIterator<Item = Argument>) {
        self.0.extend(iter);
    }

    /// Extends the underlying collection given a slice of [`Argument`]
    pub fn extend_from_slice(&mut self, slice: &[Argument]) {
        self.0.extend_from_slice(slice);
    }
}

impl Deref for Arguments {
    type Target = [Argument];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Arguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Argument;
    type IntoIter = std::slice::Iter<'a, Argument>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Argument> for Arguments {
    fn from_iter<I: IntoIterator<Item = Argument>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a Argument> for Arguments {
    fn from_iter<I: IntoIterator<Item = &'a Argument>>(iter: I) -> Self {
        Self(iter.into_iter().cloned().collect())
    }
}

impl core::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut args = self.0.iter();
        if let Some(first) = args.next() {
            write!(f, "{first}")?;
        }
        args.try_for_each(|arg| write!(f, " {arg}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arguments_display_joins_with_spaces() {
        let mut args = Arguments::with_capacity(3);
        args.create_and_push("-c");
        args.push(Argument::from("-fPIC"));
        args.push_opt(None);
        args.push_opt(Some(Argument::from(Path::new("src/example.cpp"))));

        assert_eq!(args.to_string(), "-c -fPIC src/example.cpp");
        assert_eq!(args.len(), 3);
    }

    #[test]
    fn test_empty_arguments_display() {
        assert_eq!(Arguments::default().to_string(), "");
    }
}
