#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod store;

pub(crate) use fixtures::{expense, income};
pub(crate) use store::{ScriptedStore, StoreCall, StoreMethod};
