pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (build on ",
        env!("VERGEN_BUILD_TIMESTAMP"),
        ")"
    )
}
