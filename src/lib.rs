// Copyright (c) 2016-2021 Fabian Schuiki

//! A grammar-driven parser for Web IDL interface definitions.

// Re-export everything from the common crate.
pub extern crate widl_common as common;
pub use crate::common::*;

// Pull in subcrates.
pub extern crate widl_pargen as pargen;
pub extern crate widl_syntax as syntax;
