//! Domain types for DebtLab

pub mod record;

pub use record::{
    DebtRecord, Holder, HolderAmount, RecordKey, SecurityType, MILLIONS_PER_TRILLION,
};
