fn main() {
    // Prefer pkg-config metadata (isl ships isl.pc); fall back to linking
    // the library by name from the default search path.
    if pkg_config::Config::new()
        .atleast_version("0.20")
        .probe("isl")
        .is_err()
    {
        println!("cargo:rustc-link-lib=isl");
    }
}
