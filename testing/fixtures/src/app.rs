use std::collections::BTreeMap;

// getter/setter pairs over plain fields
macro_rules! accessors {
    ($ty:ident { $($get:ident / $set:ident => $field:ident: $fty:ty),* $(,)? }) => {
        #[allow(non_snake_case, clippy::clone_on_copy)]
        impl $ty {
            $(
                #[must_use]
                pub fn $get(&self) -> $fty {
                    self.$field.clone()
                }

                pub fn $set(&mut self, v: $fty) {
                    self.$field = v;
                }
            )*
        }
    };
}

macro_rules! foo_type {
    ($ty:ident) => {
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $ty {
            name: String,
            count: i32,
            tags: Vec<String>,
            labels: BTreeMap<String, String>,
            status: Status,
            nick: Option<String>,
        }

        accessors!($ty {
            getName / setName => name: String,
            getCount / setCount => count: i32,
            getTags / setTags => tags: Vec<String>,
            getLabels / setLabels => labels: BTreeMap<String, String>,
            getStatus / setStatus => status: Status,
            getNick / setNick => nick: Option<String>,
        });
    };
}

///
/// Status
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[allow(clippy::upper_case_acronyms)]
pub enum Status {
    #[default]
    ACTIVE,
    DONE,
}

///
/// Priority
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Priority {
    #[default]
    LOW,
    HIGH,
}

foo_type!(Foo);
foo_type!(LooseFoo);

///
/// Report
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    owner: Foo,
    entries: Vec<Foo>,
    scores: BTreeMap<Status, Vec<Option<f64>>>,
    note: Option<String>,
    size: u64,
    priority: Priority,
    flag: bool,
}

accessors!(Report {
    getOwner / setOwner => owner: Foo,
    getEntries / setEntries => entries: Vec<Foo>,
    getScores / setScores => scores: BTreeMap<Status, Vec<Option<f64>>>,
    getNote / setNote => note: Option<String>,
    getSize / setSize => size: u64,
    getPriority / setPriority => priority: Priority,
    isFlag / setFlag => flag: bool,
});

autoserde::include_unit!("app/foo_encoder.rs");
autoserde::include_unit!("app/foo_decoder.rs");
autoserde::include_unit!("app/loose_foo_encoder.rs");
autoserde::include_unit!("app/loose_foo_decoder.rs");
autoserde::include_unit!("app/report_encoder.rs");
autoserde::include_unit!("app/report_decoder.rs");
