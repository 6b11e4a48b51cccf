use autoserde_schema::node::{EnumDescriptor, EnumEncoding, EnumMode};

///
/// EnumTable
///
/// Built once per enum and shared by both plans. Every constant gets its
/// wire value up front so there is exactly one strategy per enum.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumTable {
    pub path: String,
    pub encoding: EnumEncoding,
    pub entries: Vec<EnumEntry>,
}

///
/// EnumEntry
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumEntry {
    pub ordinal: usize,
    pub name: String,

    /// Text written for this constant; unused under `Ordinal`.
    pub wire: String,

    pub overridden: bool,
}

///
/// EnumWire
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnumWire<'a> {
    Text(&'a str),
    Index(u64),
}

///
/// EnumStrategy
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EnumStrategy {
    /// No constant carries an override; the declared name is written.
    Declared,

    /// At least one override exists; every constant is dispatched explicitly.
    Dispatch,
}

impl EnumTable {
    #[must_use]
    pub fn build(descriptor: &EnumDescriptor, default_mode: EnumMode) -> Self {
        let encoding = descriptor.encoding(default_mode);
        let entries = descriptor
            .constants
            .iter()
            .enumerate()
            .map(|(ordinal, constant)| {
                let wire = match encoding {
                    EnumEncoding::CustomString => constant.display_text().to_string(),
                    EnumEncoding::OverrideOrName => constant
                        .rename
                        .clone()
                        .unwrap_or_else(|| constant.name.clone()),
                    EnumEncoding::DeclaredName | EnumEncoding::Ordinal => constant.name.clone(),
                };

                EnumEntry {
                    ordinal,
                    name: constant.name.clone(),
                    wire,
                    overridden: constant.rename.is_some(),
                }
            })
            .collect();

        Self {
            path: descriptor.path.clone(),
            encoding,
            entries,
        }
    }

    #[must_use]
    pub const fn strategy(&self) -> EnumStrategy {
        match self.encoding {
            EnumEncoding::OverrideOrName => EnumStrategy::Dispatch,
            _ => EnumStrategy::Declared,
        }
    }

    #[must_use]
    pub const fn is_ordinal(&self) -> bool {
        matches!(self.encoding, EnumEncoding::Ordinal)
    }

    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&EnumEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Wire value for a declared constant name.
    #[must_use]
    pub fn encode(&self, name: &str) -> Option<EnumWire<'_>> {
        let entry = self.entry(name)?;

        Some(if self.is_ordinal() {
            EnumWire::Index(entry.ordinal as u64)
        } else {
            EnumWire::Text(&entry.wire)
        })
    }

    /// Constant for a wire string. Overrides are matched before the declared
    /// names of constants that have none.
    #[must_use]
    pub fn decode_text(&self, text: &str) -> Option<&EnumEntry> {
        match self.encoding {
            EnumEncoding::Ordinal => None,
            EnumEncoding::CustomString | EnumEncoding::DeclaredName => {
                self.entries.iter().find(|e| e.wire == text)
            }
            EnumEncoding::OverrideOrName => self
                .entries
                .iter()
                .find(|e| e.overridden && e.wire == text)
                .or_else(|| self.entries.iter().find(|e| !e.overridden && e.name == text)),
        }
    }

    /// Constant at a wire ordinal, range-checked.
    #[must_use]
    pub fn decode_index(&self, index: u64) -> Option<&EnumEntry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }

    /// Textual form of a constant when used as a map key.
    #[must_use]
    pub fn key_text(&self, name: &str) -> Option<String> {
        self.encode(name).map(|wire| match wire {
            EnumWire::Text(s) => s.to_string(),
            EnumWire::Index(i) => i.to_string(),
        })
    }

    /// Inverse of `key_text`.
    #[must_use]
    pub fn decode_key(&self, key: &str) -> Option<&EnumEntry> {
        if self.is_ordinal() {
            key.parse::<u64>().ok().and_then(|i| self.decode_index(i))
        } else {
            self.decode_text(key)
        }
    }
}
