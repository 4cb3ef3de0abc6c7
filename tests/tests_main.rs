#[path = "helpers/mod.rs"]
mod helpers;

#[path = "finder/mod.rs"]
mod finder;

#[path = "reflect/mod.rs"]
mod reflect;
