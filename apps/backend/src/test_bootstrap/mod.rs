//! Unit-test bootstrap: logging initialization shared by every
//! `#[cfg(test)]` module via the `ctor` hook in `lib.rs`.

pub mod logging;
