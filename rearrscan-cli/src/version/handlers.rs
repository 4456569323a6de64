use crate::consts::{PKG_NAME, VERSION};

pub fn version_string() -> String {
    format!("{} {}", PKG_NAME, VERSION)
}

pub fn run_version() {
    println!("{}", version_string());
}
