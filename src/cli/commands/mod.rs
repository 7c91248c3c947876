//! Command handlers, one module per command family.

pub(crate) mod accounts;
pub(crate) mod market;
pub(crate) mod portfolio;
pub(crate) mod trade;
