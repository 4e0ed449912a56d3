#![cfg_attr(not(test), allow(dead_code, unused_imports))]

#[cfg(test)]
mod engine;
