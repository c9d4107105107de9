#![allow(dead_code)]

pub mod catalogs;
pub mod params;
